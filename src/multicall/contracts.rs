// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! ABI of the aggregation contract
//!
//! Only the two entry points the aggregator uses are declared. Both are part
//! of the Multicall2 interface, which Multicall3 preserves.

use alloy_sol_types::sol;

sol! {
    /// Multicall aggregation contract.
    /// See: https://www.multicall3.com/
    #[sol(all_derives)]
    interface IMulticall3 {
        struct Call {
            address target;
            bytes callData;
        }

        struct Result {
            bool success;
            bytes returnData;
        }

        /// Reverts if any call fails.
        function aggregate(Call[] calldata calls)
            external
            payable
            returns (uint256 blockNumber, bytes[] memory returnData);

        /// With `requireSuccess = false`, reports each call's outcome independently.
        function tryAggregate(bool requireSuccess, Call[] calldata calls)
            external
            payable
            returns (Result[] memory returnData);
    }
}

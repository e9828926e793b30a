// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Call descriptions and batch results

use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::{keccak256, Address, Bytes, Selector};
use alloy_sol_types::{SolCall, SolType};

use crate::errors::MulticallError;

/// One read call to be executed through the aggregation contract
///
/// Arguments are opaque ABI-encoded bytes; only the output shape is known to
/// the aggregator, so it can decode each call's return data.
///
/// # Examples
///
/// ```rust
/// use alloy_primitives::{address, Address};
/// use alloy_sol_types::SolValue;
/// use semiocall::multicall::MulticallCall;
///
/// let token = address!("a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48");
/// let holder = address!("00000000000000000000000000000000000000aa");
///
/// let call = MulticallCall::from_signature(
///     token,
///     "balanceOf(address)",
///     holder.abi_encode(),
///     "uint256",
/// )
/// .unwrap();
/// assert_eq!(call.selector().as_slice(), &[0x70, 0xa0, 0x82, 0x31]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MulticallCall {
    target: Address,
    selector: Selector,
    args: Bytes,
    output: DynSolType,
}

impl MulticallCall {
    /// Describe a call from its parts
    pub fn new(
        target: Address,
        selector: impl Into<Selector>,
        args: impl Into<Bytes>,
        output: DynSolType,
    ) -> Self {
        Self {
            target,
            selector: selector.into(),
            args: args.into(),
            output,
        }
    }

    /// Describe a call from a canonical function signature and output type
    ///
    /// `signature` is the canonical form used for selector derivation, e.g.
    /// `"transfer(address,uint256)"`. `output` is a Solidity type string;
    /// use a tuple such as `"(uint112,uint112,uint32)"` for functions with
    /// several return values.
    pub fn from_signature(
        target: Address,
        signature: &str,
        args: impl Into<Bytes>,
        output: &str,
    ) -> Result<Self, MulticallError> {
        validate_signature(signature)?;
        let output = DynSolType::parse(output).map_err(|e| {
            MulticallError::invalid_signature(format!("output type `{output}`: {e}"))
        })?;

        let selector = Selector::from_slice(&keccak256(signature.as_bytes())[..4]);
        Ok(Self::new(target, selector, args, output))
    }

    /// Describe a call from a typed `sol!` call
    ///
    /// The output shape is the call's return tuple.
    pub fn from_sol_call<C: SolCall>(target: Address, call: &C) -> Result<Self, MulticallError> {
        let name = <C::ReturnTuple<'static> as SolType>::SOL_NAME;
        let output = DynSolType::parse(name).map_err(|e| {
            MulticallError::invalid_signature(format!("return type `{name}`: {e}"))
        })?;

        let mut args = Vec::new();
        call.abi_encode_raw(&mut args);
        Ok(Self::new(target, C::SELECTOR, args, output))
    }

    /// Contract the call is made against
    pub fn target(&self) -> Address {
        self.target
    }

    /// Function selector
    pub fn selector(&self) -> Selector {
        self.selector
    }

    /// ABI-encoded arguments, without the selector
    pub fn args(&self) -> &Bytes {
        &self.args
    }

    /// Declared output shape
    pub fn output(&self) -> &DynSolType {
        &self.output
    }

    /// Full call payload: selector followed by the arguments
    pub fn calldata(&self) -> Bytes {
        let mut data = Vec::with_capacity(4 + self.args.len());
        data.extend_from_slice(self.selector.as_slice());
        data.extend_from_slice(&self.args);
        data.into()
    }

    /// Decode return data according to the declared output shape
    pub fn decode(&self, data: &[u8]) -> Result<DynSolValue, alloy_dyn_abi::Error> {
        self.output.abi_decode_params(data)
    }
}

fn validate_signature(signature: &str) -> Result<(), MulticallError> {
    let invalid = |reason: &str| {
        MulticallError::invalid_signature(format!("`{signature}`: {reason}"))
    };

    let open = signature
        .find('(')
        .ok_or_else(|| invalid("missing parameter list"))?;
    if open == 0 {
        return Err(invalid("missing function name"));
    }
    if !signature.ends_with(')') {
        return Err(invalid("parameter list is not closed"));
    }
    if signature.chars().any(char::is_whitespace) {
        return Err(invalid("canonical signatures contain no whitespace"));
    }

    let name = &signature[..open];
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
    {
        return Err(invalid("function name is not an identifier"));
    }

    let params = &signature[open..];
    if params != "()" {
        DynSolType::parse(params).map_err(|e| invalid(&e.to_string()))?;
    }

    Ok(())
}

/// Outcome of one call in a best-effort batch
#[derive(Debug, Clone, PartialEq)]
pub struct TryCallResult {
    /// Whether the call succeeded
    pub success: bool,
    /// Raw return data; empty when the call failed
    pub return_data: Bytes,
    /// Decoded return data; `None` when the call failed
    pub value: Option<DynSolValue>,
}

impl TryCallResult {
    /// A failed call with no data
    pub fn failed() -> Self {
        Self {
            success: false,
            return_data: Bytes::new(),
            value: None,
        }
    }
}

/// Outcome of an all-or-nothing batch
///
/// On failure `results` is always empty: which call failed is not reported.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateOutcome<T> {
    /// Whether every call in the batch succeeded
    pub success: bool,
    /// Per-call results in input order; empty on failure
    pub results: Vec<T>,
}

impl<T> AggregateOutcome<T> {
    /// A successful batch
    pub fn succeeded(results: Vec<T>) -> Self {
        Self {
            success: true,
            results,
        }
    }

    /// A failed batch
    pub fn failed() -> Self {
        Self {
            success: false,
            results: Vec::new(),
        }
    }
}

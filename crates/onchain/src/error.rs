// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Classification of alloy failures into the `ContractError` taxonomy
//!
//! The service surfaces every failure to the caller with its underlying
//! message, so the mapping only decides the error class: node-reported
//! rejections (reverts, out-of-gas) versus transport-level failures.

use alloy::providers::PendingTransactionError;
use alloy::transports::{RpcError, TransportErrorKind};
use contract_client::ContractError;

/// Classify an error from a contract read or send
pub(crate) fn call_error(err: alloy::contract::Error) -> ContractError {
    match err {
        alloy::contract::Error::TransportError(rpc) => rpc_error(rpc),
        other => ContractError::InvalidResponse {
            message: other.to_string(),
        },
    }
}

/// Classify an error raised while watching a pending transaction
pub(crate) fn watch_error(err: PendingTransactionError) -> ContractError {
    match err {
        PendingTransactionError::TransportError(rpc) => rpc_error(rpc),
        other => ContractError::Transport {
            message: other.to_string(),
        },
    }
}

/// Classify a raw JSON-RPC error
///
/// An `ErrorResp` is the node rejecting the call itself (revert, gas,
/// invalid transaction); everything else failed before reaching the chain.
pub(crate) fn rpc_error(err: RpcError<TransportErrorKind>) -> ContractError {
    match err {
        RpcError::ErrorResp(payload) => ContractError::Reverted {
            message: payload.to_string(),
        },
        other => ContractError::Transport {
            message: other.to_string(),
        },
    }
}

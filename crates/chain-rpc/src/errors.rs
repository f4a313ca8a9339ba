//! Transport-specific error types.
//!
//! `RpcClientError` wraps reqwest and decoding failures; it is converted to
//! the transport-agnostic `basevault_core::errors::ChainError` at the crate
//! boundary.

use thiserror::Error;

use basevault_core::errors::{ChainError, Error};

/// EIP-1193 error code for a user-rejected request.
const CODE_USER_REJECTED: i64 = 4001;

#[derive(Error, Debug)]
pub enum RpcClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Invalid hex in response: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("ABI encoding failed: {0}")]
    Abi(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl From<RpcClientError> for Error {
    fn from(err: RpcClientError) -> Self {
        let chain_err = match err {
            RpcClientError::Http(e) => ChainError::Transport(e.to_string()),
            RpcClientError::Rpc { code, message } if code == CODE_USER_REJECTED => {
                ChainError::SubmissionRejected(message)
            }
            RpcClientError::Rpc { code, message } => ChainError::Rpc { code, message },
            RpcClientError::InvalidHex(e) => ChainError::MalformedResponse(e.to_string()),
            RpcClientError::Abi(msg) => ChainError::MalformedResponse(msg),
            RpcClientError::MalformedResponse(msg) => ChainError::MalformedResponse(msg),
        };
        Error::Chain(chain_err)
    }
}

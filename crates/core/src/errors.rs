//! Core error types for the BaseVault client engine.
//!
//! This module defines transport- and storage-agnostic error types. Adapter
//! crates (JSON-RPC, SQLite) convert their specific errors to these types at
//! the boundary.

use rust_decimal::Decimal;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the client engine.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Chain operation failed: {0}")]
    Chain(#[from] ChainError),

    #[error("Cache operation failed: {0}")]
    Database(#[from] DatabaseError),

    /// Another create/extend/withdraw sequence is already in flight for the
    /// session. Re-entrant actions are rejected, never interleaved.
    #[error("Another operation is in flight: {0}")]
    OperationInFlight(String),

    /// The wallet is connected to a different chain than the session expects.
    /// No transaction is attempted while this precondition is unmet.
    #[error("Wrong chain: expected chain id {expected}, connected to {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Validation errors detected client-side before any submission.
///
/// No partial state change occurs when one of these is returned.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Insufficient balance: need {required} but only {available} available")]
    InsufficientBalance {
        required: Decimal,
        available: Decimal,
    },

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Amount out of range: {0}")]
    AmountOutOfRange(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),
}

/// Errors surfaced by the chain gateways.
///
/// Submission failures and on-chain reverts are kept as distinct variants,
/// but the orchestrator applies the same recovery to both: discard draft
/// state and return to idle. No automatic retries.
#[derive(Error, Debug)]
pub enum ChainError {
    /// The RPC transport failed (network error, bad endpoint).
    #[error("RPC transport failed: {0}")]
    Transport(String),

    /// The node answered with a JSON-RPC error object.
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The node returned data the client could not decode.
    #[error("Malformed RPC response: {0}")]
    MalformedResponse(String),

    /// The wallet refused to sign or broadcast the transaction.
    #[error("Submission rejected: {0}")]
    SubmissionRejected(String),

    /// The transaction was mined but reverted.
    #[error("Transaction {tx_hash} reverted on-chain")]
    Reverted { tx_hash: String },

    /// No receipt appeared for the transaction within the polling window.
    #[error("Timed out waiting for receipt of {tx_hash}")]
    ReceiptTimeout { tx_hash: String },
}

/// Storage-agnostic error type for metadata-cache operations.
///
/// The storage layer converts its specific errors (Diesel, SQLite) into this
/// format.
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    #[error("Database query failed: {0}")]
    QueryFailed(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Database transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    #[error("Internal database error: {0}")]
    Internal(String),
}

// === From implementations for common error types ===

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}

//! Crate-wide error type.
//!
//! Every failure in the core is one of a small set of typed conditions.
//! Ordering violations and malformed input are caller/input errors and are
//! never recovered locally: they abort the current cursor operation or
//! region build and surface to the caller unchanged.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConsensusError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed header, missing column-header line, short rows.
    #[error("invalid format: {0}")]
    Format(String),

    /// A cursor was asked to move backward in contig or position.
    #[error("ordering violation: {0}")]
    Order(String),

    /// A non-positive position was requested, or a mapped position falls
    /// outside the buffer.
    #[error("position out of range: {0}")]
    Range(String),

    /// Unknown sample name, or a contig/position never reached before the
    /// stream was exhausted.
    #[error("not found: {0}")]
    NotFound(String),

    /// A single row that cannot be represented (e.g. multi-allelic record
    /// needing incompatible repositioning).
    #[error("unsupported record: {0}")]
    Unsupported(String),

    /// Defensive check failed; indicates a bug, not bad input.
    #[error("internal invariant violated: {0}")]
    InternalInvariant(String),

    /// An argument outside its documented domain (e.g. phase not 0 or 1).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Type alias for Results using `ConsensusError`
pub type Result<T> = std::result::Result<T, ConsensusError>;

impl ConsensusError {
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format(message.into())
    }

    pub fn order(message: impl Into<String>) -> Self {
        Self::Order(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }
}

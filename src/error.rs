use std::io;

use thiserror::Error;

use crate::types::{TransactionId, Usage};

pub type Result<T> = std::result::Result<T, KrimpError>;

#[derive(Debug, Error)]
pub enum KrimpError {
    /// A code length was requested for a code that no transaction uses, or
    /// on a table whose total usage is zero. On a non-empty database this
    /// means the table is inconsistent; it is not retried.
    #[error("degenerate encoding for code [{code}]: usage {usage} of {usage_total}")]
    DegenerateEncoding {
        code: String,
        usage: Usage,
        usage_total: u64,
    },

    #[error("transaction {index} out of range for a database of {len}")]
    TransactionOutOfRange { index: TransactionId, len: usize },

    #[error("invalid {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error(transparent)]
    Io(#[from] io::Error),
}

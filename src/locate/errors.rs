use crate::edit::EditError;
use crate::scan::ScanError;
use std::fmt;
use thiserror::Error;

/// What kind of block a failed lookup was after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Declaration,
    Named,
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockKind::Declaration => write!(f, "declaration"),
            BlockKind::Named => write!(f, "named block"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocateError {
    #[error("unable to find code block - {kind}[{pattern}]")]
    BlockNotFound { kind: BlockKind, pattern: String },

    #[error("invalid search pattern `{pattern}`: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Edit(#[from] EditError),
}

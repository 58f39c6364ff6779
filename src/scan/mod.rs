//! Lexically aware bracket matching.
//!
//! Naive brace counting breaks as soon as a `}` shows up inside a string
//! literal or a comment. This module carries just enough of a lexer to avoid
//! that: string literals (single, double and backtick quoted), line comments
//! and block comments. Everything else is treated as plain code.

pub mod errors;
pub mod matcher;
pub mod state;

pub use errors::ScanError;
pub use matcher::{find_matching_bracket_position, Bracket};
pub use state::{CodeBytes, ScanState};

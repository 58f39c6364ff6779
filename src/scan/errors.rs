use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("unsupported opening bracket '{0}'")]
    UnsupportedBracket(char),

    #[error("no '{open}' found at or after byte {start}")]
    OpenBracketNotFound { open: char, start: usize },

    #[error("unmatched '{open}' opened at byte {offset} ({depth} still open at end of text)")]
    UnmatchedBracket {
        open: char,
        offset: usize,
        depth: usize,
    },

    #[error("offset {offset} is outside text of length {len}")]
    OffsetOutOfRange { offset: usize, len: usize },
}

use crate::scan::errors::ScanError;
use crate::scan::state::CodeBytes;
use tracing::trace;

/// Bracket pairs the matcher can balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bracket {
    /// `(` / `)`
    Paren,
    /// `{` / `}`
    Brace,
    /// `[` / `]`
    Square,
}

impl Bracket {
    pub fn from_open(open: char) -> Option<Self> {
        match open {
            '(' => Some(Bracket::Paren),
            '{' => Some(Bracket::Brace),
            '[' => Some(Bracket::Square),
            _ => None,
        }
    }

    pub fn open(self) -> char {
        match self {
            Bracket::Paren => '(',
            Bracket::Brace => '{',
            Bracket::Square => '[',
        }
    }

    pub fn close(self) -> char {
        match self {
            Bracket::Paren => ')',
            Bracket::Brace => '}',
            Bracket::Square => ']',
        }
    }
}

/// Find the byte offset of the bracket closing the first `open` at or after `start`.
///
/// The opening bracket is located with a plain search; from there on, brackets
/// inside string literals and comments are ignored. The returned offset points
/// at the closing character itself.
///
/// # Example
///
/// ```
/// use brace_patcher::scan::find_matching_bracket_position;
///
/// let text = r#"foo(" ) ")"#;
/// assert_eq!(find_matching_bracket_position(text, '(', 0).unwrap(), 9);
/// ```
pub fn find_matching_bracket_position(
    text: &str,
    open: char,
    start: usize,
) -> Result<usize, ScanError> {
    let bracket = Bracket::from_open(open).ok_or(ScanError::UnsupportedBracket(open))?;

    if start > text.len() {
        return Err(ScanError::OffsetOutOfRange {
            offset: start,
            len: text.len(),
        });
    }

    let open_byte = bracket.open() as u8;
    let close_byte = bracket.close() as u8;

    let open_at = text.as_bytes()[start..]
        .iter()
        .position(|&b| b == open_byte)
        .map(|pos| pos + start)
        .ok_or(ScanError::OpenBracketNotFound { open, start })?;

    let mut depth = 1usize;
    for (offset, byte) in CodeBytes::new(text, open_at + 1) {
        if byte == open_byte {
            depth += 1;
        } else if byte == close_byte {
            depth -= 1;
            if depth == 0 {
                trace!(open_at, close_at = offset, "matched {}", open);
                return Ok(offset);
            }
        }
    }

    Err(ScanError::UnmatchedBracket {
        open,
        offset: open_at,
        depth,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_nesting() {
        let text = "a(b(c)d)e";
        assert_eq!(find_matching_bracket_position(text, '(', 0).unwrap(), 7);
        assert_eq!(find_matching_bracket_position(text, '(', 2).unwrap(), 5);
    }

    #[test]
    fn paren_inside_string_is_ignored() {
        let text = r#"foo(" ) ")"#;
        let end = find_matching_bracket_position(text, '(', 0).unwrap();
        assert_eq!(&text[end..=end], ")");
        assert_eq!(end, text.len() - 1);
    }

    #[test]
    fn braces_in_comments_are_ignored() {
        let text = "void a() {\n  // }\n  /* { */\n  b();\n}\nrest";
        let end = find_matching_bracket_position(text, '{', 0).unwrap();
        assert_eq!(&text[end + 1..], "\nrest");
    }

    #[test]
    fn char_literal_brace() {
        let text = "if (c == '}') { x(); }";
        let end = find_matching_bracket_position(text, '{', 13).unwrap();
        assert_eq!(end, text.len() - 1);
    }

    #[test]
    fn other_bracket_kinds_do_not_count() {
        let text = "{ a(}) }";
        // only braces are balanced when matching a brace
        assert_eq!(find_matching_bracket_position(text, '{', 0).unwrap(), 4);
    }

    #[test]
    fn square_brackets() {
        let text = "xs = [[1, 2], \"]\"]";
        assert_eq!(
            find_matching_bracket_position(text, '[', 0).unwrap(),
            text.len() - 1
        );
    }

    #[test]
    fn search_starts_at_offset() {
        let text = "{ } { { } }";
        assert_eq!(find_matching_bracket_position(text, '{', 1).unwrap(), 10);
    }

    #[test]
    fn unmatched_reports_open_position() {
        let err = find_matching_bracket_position("x { { }", '{', 0).unwrap_err();
        assert_eq!(
            err,
            ScanError::UnmatchedBracket {
                open: '{',
                offset: 2,
                depth: 1
            }
        );
    }

    #[test]
    fn unterminated_string_is_unmatched() {
        let err = find_matching_bracket_position("f(\")", '(', 0).unwrap_err();
        assert!(matches!(err, ScanError::UnmatchedBracket { .. }));
    }

    #[test]
    fn missing_open_bracket() {
        let err = find_matching_bracket_position("abc", '{', 0).unwrap_err();
        assert_eq!(err, ScanError::OpenBracketNotFound { open: '{', start: 0 });
    }

    #[test]
    fn unsupported_bracket() {
        let err = find_matching_bracket_position("<a>", '<', 0).unwrap_err();
        assert_eq!(err, ScanError::UnsupportedBracket('<'));
    }

    #[test]
    fn start_past_end() {
        let err = find_matching_bracket_position("{}", '{', 3).unwrap_err();
        assert_eq!(err, ScanError::OffsetOutOfRange { offset: 3, len: 2 });
    }

    #[test]
    fn multibyte_text_around_brackets() {
        let text = "fun é() { \"→}\" }";
        let end = find_matching_bracket_position(text, '{', 0).unwrap();
        assert!(text.is_char_boundary(end));
        assert_eq!(&text[end..], "}");
    }
}

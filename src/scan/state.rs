//! Scanner states and their transitions.
//!
//! The transition function works on bytes. Every delimiter it recognises is
//! ASCII, and UTF-8 continuation bytes never collide with ASCII, so offsets
//! produced here always land on char boundaries.

/// Lexical mode of the scanner. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanState {
    #[default]
    Normal,
    /// `// ...` up to the end of the line
    LineComment,
    /// `/* ... */`
    BlockComment,
    /// `'...'`, also covers Java/Kotlin char literals
    SingleQuoteString,
    /// `"..."`. Kotlin `${...}` interpolation is not balanced: a quote nested
    /// inside the interpolation closes the outer string.
    DoubleQuoteString,
    /// `` `...` ``, closed by the next backtick; escapes and `${}` are not interpreted
    TemplateString,
}

/// Result of feeding one position to [`ScanState::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub next: ScanState,
    /// Bytes consumed, at least 1. Escapes and two-byte comment delimiters consume 2.
    pub consumed: usize,
}

impl Step {
    const fn new(next: ScanState, consumed: usize) -> Self {
        Self { next, consumed }
    }
}

impl ScanState {
    /// Compute the transition for the byte at `index`.
    ///
    /// `index` must be in bounds.
    pub fn step(self, bytes: &[u8], index: usize) -> Step {
        use ScanState::*;

        let byte = bytes[index];
        let peek = bytes.get(index + 1).copied();

        match self {
            Normal => match (byte, peek) {
                (b'/', Some(b'/')) => Step::new(LineComment, 2),
                (b'/', Some(b'*')) => Step::new(BlockComment, 2),
                (b'\'', _) => Step::new(SingleQuoteString, 1),
                (b'"', _) => Step::new(DoubleQuoteString, 1),
                (b'`', _) => Step::new(TemplateString, 1),
                _ => Step::new(Normal, 1),
            },
            LineComment => match byte {
                b'\n' => Step::new(Normal, 1),
                _ => Step::new(LineComment, 1),
            },
            BlockComment => match (byte, peek) {
                (b'*', Some(b'/')) => Step::new(Normal, 2),
                _ => Step::new(BlockComment, 1),
            },
            SingleQuoteString => quoted(self, byte, b'\''),
            DoubleQuoteString => quoted(self, byte, b'"'),
            TemplateString => match byte {
                b'`' => Step::new(Normal, 1),
                _ => Step::new(TemplateString, 1),
            },
        }
    }

    pub fn is_code(self) -> bool {
        self == ScanState::Normal
    }
}

fn quoted(state: ScanState, byte: u8, terminator: u8) -> Step {
    if byte == b'\\' {
        Step::new(state, 2)
    } else if byte == terminator {
        Step::new(ScanState::Normal, 1)
    } else {
        Step::new(state, 1)
    }
}

/// Iterator over the bytes of `text` that are plain code, i.e. not part of a
/// string literal, a comment, or one of their delimiters.
///
/// Yields `(offset, byte)` pairs. Scanning starts in [`ScanState::Normal`] at
/// the given offset.
#[derive(Debug, Clone)]
pub struct CodeBytes<'a> {
    bytes: &'a [u8],
    pos: usize,
    state: ScanState,
}

impl<'a> CodeBytes<'a> {
    pub fn new(text: &'a str, start: usize) -> Self {
        Self {
            bytes: text.as_bytes(),
            pos: start,
            state: ScanState::Normal,
        }
    }

    /// State the scanner is in before the next unread byte.
    pub fn state(&self) -> ScanState {
        self.state
    }
}

impl Iterator for CodeBytes<'_> {
    type Item = (usize, u8);

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.bytes.len() {
            let at = self.pos;
            let before = self.state;
            let step = before.step(self.bytes, at);
            self.state = step.next;
            self.pos += step.consumed;

            if before.is_code() && step.next.is_code() {
                return Some((at, self.bytes[at]));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code_of(text: &str) -> String {
        CodeBytes::new(text, 0).map(|(_, b)| b as char).collect()
    }

    #[test]
    fn strings_are_skipped() {
        assert_eq!(code_of(r#"a("}")b"#), "a()b");
        assert_eq!(code_of("a('{')b"), "a()b");
        assert_eq!(code_of("a(`}`)b"), "a()b");
    }

    #[test]
    fn escaped_quote_stays_inside_string() {
        assert_eq!(code_of(r#"x = "a\"}" + y"#), "x =  + y");
        assert_eq!(code_of(r"c = '\''; d"), "c = ; d");
    }

    #[test]
    fn template_string_ignores_backslash() {
        // the backslash does not escape the closing backtick
        assert_eq!(code_of(r"`a\`}"), "}");
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(code_of("a // }\nb"), "a b");
        assert_eq!(code_of("a /* } */ b"), "a  b");
        assert_eq!(code_of("a /* \" */ b"), "a  b");
    }

    #[test]
    fn line_comment_ends_at_newline() {
        let text = "// {\n}";
        let code: Vec<_> = CodeBytes::new(text, 0).collect();
        assert_eq!(code, vec![(5, b'}')]);
    }

    #[test]
    fn unterminated_string_swallows_rest() {
        let mut iter = CodeBytes::new("a \"open { }", 0);
        assert_eq!(iter.next(), Some((0, b'a')));
        assert_eq!(iter.next(), Some((1, b' ')));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.state(), ScanState::DoubleQuoteString);
    }

    #[test]
    fn interpolated_quote_closes_outer_string() {
        // `"${m("}")}"` is read as `"${m("`, `}`, `")}"`
        assert_eq!(code_of(r#"p("${m("}")}")"#), "p(})");
    }

    #[test]
    fn escape_at_end_of_text() {
        let text = "\"\\";
        assert_eq!(CodeBytes::new(text, 0).count(), 0);
    }
}

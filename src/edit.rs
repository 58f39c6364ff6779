use thiserror::Error;

/// The fundamental edit primitive: byte-span replacement on an in-memory text.
///
/// Every mutation in this crate compiles down to this. Intelligence lives in
/// span acquisition (the locators), not in application. Applying an edit never
/// touches its input; it produces a new text, and any offsets computed against
/// the old text are invalid for the new one.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "TextEdit does nothing until apply() is called"]
pub struct TextEdit {
    /// Starting byte offset (inclusive)
    pub byte_start: usize,
    /// Ending byte offset (exclusive)
    pub byte_end: usize,
    /// New text to place at [byte_start, byte_end)
    pub new_text: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("Invalid byte range: [{byte_start}, {byte_end}) in text of length {len}")]
    InvalidByteRange {
        byte_start: usize,
        byte_end: usize,
        len: usize,
    },

    #[error("Byte offset {offset} is not on a UTF-8 character boundary")]
    NotCharBoundary { offset: usize },
}

impl TextEdit {
    /// Zero-width edit inserting `text` at `offset`.
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self {
            byte_start: offset,
            byte_end: offset,
            new_text: text.into(),
        }
    }

    /// Edit replacing `[byte_start, byte_end)` with `text`.
    pub fn replace(byte_start: usize, byte_end: usize, text: impl Into<String>) -> Self {
        Self {
            byte_start,
            byte_end,
            new_text: text.into(),
        }
    }

    fn validate(&self, source: &str) -> Result<(), EditError> {
        if self.byte_start > self.byte_end || self.byte_end > source.len() {
            return Err(EditError::InvalidByteRange {
                byte_start: self.byte_start,
                byte_end: self.byte_end,
                len: source.len(),
            });
        }

        for offset in [self.byte_start, self.byte_end] {
            if !source.is_char_boundary(offset) {
                return Err(EditError::NotCharBoundary { offset });
            }
        }

        Ok(())
    }

    /// Produce the edited text.
    pub fn apply(&self, source: &str) -> Result<String, EditError> {
        self.validate(source)?;

        let mut out = String::with_capacity(
            source.len() + self.new_text.len() - (self.byte_end - self.byte_start),
        );
        out.push_str(&source[..self.byte_start]);
        out.push_str(&self.new_text);
        out.push_str(&source[self.byte_end..]);
        Ok(out)
    }
}

/// Splice `insertion` into `text` at `offset`.
///
/// `result == text[..offset] + insertion + text[offset..]`. The insertion is
/// taken verbatim. When `offset` is a block's closing-bracket offset, the
/// inserted text becomes the last thing inside that block.
///
/// ```
/// use brace_patcher::edit::insert_contents_at_offset;
///
/// let out = insert_contents_at_offset("{ a; }", "b; ", 5).unwrap();
/// assert_eq!(out, "{ a; b; }");
/// ```
pub fn insert_contents_at_offset(
    text: &str,
    insertion: &str,
    offset: usize,
) -> Result<String, EditError> {
    TextEdit::insert(offset, insertion).apply(text)
}

/// Replace `text[start..=end]` with `replacement`.
///
/// `end` is inclusive, so a located block's `start`/`end` can be passed
/// straight through to swap out the whole block.
pub fn replace_contents_with_offset(
    text: &str,
    replacement: &str,
    start: usize,
    end: usize,
) -> Result<String, EditError> {
    let byte_end = end.checked_add(1).ok_or(EditError::InvalidByteRange {
        byte_start: start,
        byte_end: end,
        len: text.len(),
    })?;

    // the char at `end` may be wider than one byte
    let byte_end = match text.get(end..).and_then(|rest| rest.chars().next()) {
        Some(ch) => end + ch.len_utf8(),
        None => byte_end,
    };

    TextEdit::replace(start, byte_end, replacement).apply(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_at_start_middle_end() {
        assert_eq!(insert_contents_at_offset("abc", "X", 0).unwrap(), "Xabc");
        assert_eq!(insert_contents_at_offset("abc", "X", 1).unwrap(), "aXbc");
        assert_eq!(insert_contents_at_offset("abc", "X", 3).unwrap(), "abcX");
    }

    #[test]
    fn insert_into_empty() {
        assert_eq!(insert_contents_at_offset("", "hello", 0).unwrap(), "hello");
    }

    #[test]
    fn insert_out_of_range() {
        let err = insert_contents_at_offset("abc", "X", 4).unwrap_err();
        assert_eq!(
            err,
            EditError::InvalidByteRange {
                byte_start: 4,
                byte_end: 4,
                len: 3
            }
        );
    }

    #[test]
    fn insert_inside_multibyte_char() {
        let err = insert_contents_at_offset("é", "X", 1).unwrap_err();
        assert_eq!(err, EditError::NotCharBoundary { offset: 1 });
    }

    #[test]
    fn inverted_range() {
        let edit = TextEdit::replace(3, 1, "x");
        assert!(matches!(
            edit.apply("hello"),
            Err(EditError::InvalidByteRange { .. })
        ));
    }

    #[test]
    fn replace_inclusive_end() {
        let text = "a { b } c";
        assert_eq!(
            replace_contents_with_offset(text, "{}", 2, 6).unwrap(),
            "a {} c"
        );
    }

    #[test]
    fn replace_multibyte_last_char() {
        assert_eq!(replace_contents_with_offset("xé", "y", 1, 1).unwrap(), "xy");
    }

    #[test]
    fn replace_past_end() {
        assert!(replace_contents_with_offset("abc", "x", 1, 3).is_err());
    }
}

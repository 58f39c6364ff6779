use serde::Serialize;

/// A located span of source text.
///
/// `start` and `end` are byte offsets, both inclusive: `code == text[start..=end]`.
/// `end` always points at the closing bracket. The span is only meaningful
/// for the exact text it was located in; any edit to that text invalidates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeBlock {
    pub start: usize,
    pub end: usize,
    pub code: String,
}

impl CodeBlock {
    /// Slice `text[start..=end]` into a block. `end` must point at an ASCII bracket.
    pub(crate) fn from_span(text: &str, start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            code: text[start..=end].to_string(),
        }
    }

    /// Offset just past the first character of the block.
    ///
    /// For declaration and named blocks, which start at their `{`, this is
    /// where a "head" insertion lands.
    pub fn inner_start(&self) -> usize {
        self.start + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_is_inclusive() {
        let text = "x { y }";
        let block = CodeBlock::from_span(text, 2, 6);
        assert_eq!(block.code, "{ y }");
        assert_eq!(block.inner_start(), 3);
    }

    #[test]
    fn serializes_to_json() {
        let block = CodeBlock::from_span("{}", 0, 1);
        let json = serde_json::to_string(&block).unwrap();
        assert_eq!(json, r#"{"start":0,"end":1,"code":"{}"}"#);
    }
}

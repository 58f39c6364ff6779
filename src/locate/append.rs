//! Insertions into located blocks.

use crate::edit::insert_contents_at_offset;
use crate::locate::block::CodeBlock;
use crate::locate::errors::{BlockKind, LocateError};
use crate::locate::locator::{find_declaration_code_block, find_named_code_block};
use crate::scan::ScanState;
use clap::ValueEnum;
use serde::Deserialize;
use tracing::debug;

/// Where inside a declaration body an insertion lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum InsertPosition {
    /// Right after the opening `{`
    Head,
    /// Right before the closing `}`
    #[default]
    Tail,
    /// Before the last `return` directly in the body, or [`Tail`](Self::Tail) if there is none
    TailBeforeLastReturn,
}

impl InsertPosition {
    fn offset_in(self, text: &str, block: &CodeBlock) -> usize {
        match self {
            InsertPosition::Head => block.inner_start(),
            InsertPosition::Tail => block.end,
            InsertPosition::TailBeforeLastReturn => {
                last_return_offset(text, block).unwrap_or(block.end)
            }
        }
    }
}

/// Append `insertion` as the last thing inside the body of `declaration`.
///
/// Fails with [`LocateError::BlockNotFound`] when the declaration is absent.
///
/// ```
/// use brace_patcher::locate::append_contents_inside_declaration_block;
///
/// let src = "void bar() {\n  a();\n}";
/// let out = append_contents_inside_declaration_block(src, r"void bar\(\)", "  b();\n").unwrap();
/// assert_eq!(out, "void bar() {\n  a();\n  b();\n}");
/// ```
pub fn append_contents_inside_declaration_block(
    text: &str,
    declaration: &str,
    insertion: &str,
) -> Result<String, LocateError> {
    insert_contents_inside_declaration_block(text, declaration, insertion, InsertPosition::Tail)
}

/// Insert `insertion` into the body of `declaration` at `position`.
pub fn insert_contents_inside_declaration_block(
    text: &str,
    declaration: &str,
    insertion: &str,
    position: InsertPosition,
) -> Result<String, LocateError> {
    let block = find_declaration_code_block(text, declaration)?;
    let offset = position.offset_in(text, &block);
    debug!(declaration, ?position, offset, "inserting into declaration block");
    Ok(insert_contents_at_offset(text, insertion, offset)?)
}

/// Append `insertion` right before the closing brace of the named block `name`.
///
/// Fails with [`LocateError::BlockNotFound`] when the block is absent.
pub fn append_contents_inside_named_block(
    text: &str,
    name: &str,
    insertion: &str,
) -> Result<String, LocateError> {
    let block = find_named_code_block(text, name)?.ok_or_else(|| LocateError::BlockNotFound {
        kind: BlockKind::Named,
        pattern: name.to_string(),
    })?;
    debug!(name, offset = block.end, "appending into named block");
    Ok(insert_contents_at_offset(text, insertion, block.end)?)
}

/// Offset to insert at so the insertion precedes the last top-level `return`
/// statement of `block`. Returns the start of the `return` line when the
/// keyword is the first thing on its line, otherwise the keyword itself.
///
/// A `return` only counts when it starts a statement. One that is the body of
/// a brace-less `if`/`else`/loop or the operand of an expression (`?:`, `=`)
/// stays attached to its guard and is skipped.
fn last_return_offset(text: &str, block: &CodeBlock) -> Option<usize> {
    const KEYWORD: &str = "return";
    let bytes = text.as_bytes();

    let mut state = ScanState::Normal;
    let mut pos = block.inner_start();
    let mut depth = 0usize;
    let mut prev = Token {
        byte: b'{',
        offset: block.start,
        closes_guard: false,
    };
    let mut fresh_line = false;
    let mut parens: Vec<bool> = Vec::new();
    let mut last = None;

    while pos < block.end {
        let byte = bytes[pos];
        let step = state.step(bytes, pos);
        match (state, step.next) {
            (ScanState::Normal, ScanState::Normal) if byte == b'\n' => fresh_line = true,
            (ScanState::Normal, ScanState::Normal) if byte.is_ascii_whitespace() => {}
            (ScanState::Normal, ScanState::Normal) => {
                if byte == b'r'
                    && depth == 0
                    && is_word_at(text, pos, KEYWORD)
                    && prev.ends_statement(text, fresh_line)
                {
                    last = Some(pos);
                }
                let mut closes_guard = false;
                match byte {
                    b'{' => depth += 1,
                    b'}' => depth = depth.saturating_sub(1),
                    b'(' => parens.push(opens_guard(text, pos)),
                    b')' => closes_guard = parens.pop().unwrap_or(false),
                    _ => {}
                }
                prev = Token {
                    byte,
                    offset: pos,
                    closes_guard,
                };
                fresh_line = false;
            }
            (ScanState::LineComment, ScanState::Normal) => fresh_line = true,
            (
                ScanState::SingleQuoteString
                | ScanState::DoubleQuoteString
                | ScanState::TemplateString,
                ScanState::Normal,
            ) => {
                prev = Token {
                    byte,
                    offset: pos,
                    closes_guard: false,
                };
                fresh_line = false;
            }
            _ => {}
        }
        state = step.next;
        pos += step.consumed;
    }

    let keyword_at = last?;
    let line_start = text[..keyword_at].rfind('\n').map_or(0, |nl| nl + 1);
    let indent_only = text[line_start..keyword_at]
        .bytes()
        .all(|b| b == b' ' || b == b'\t');
    if indent_only && line_start > block.start {
        Some(line_start)
    } else {
        Some(keyword_at)
    }
}

/// Last significant code byte seen before a candidate `return`.
#[derive(Debug, Clone, Copy)]
struct Token {
    byte: u8,
    offset: usize,
    /// `)` closing the condition of `if`, `while` or `for`
    closes_guard: bool,
}

impl Token {
    /// Whether a statement can begin right after this token.
    fn ends_statement(&self, text: &str, fresh_line: bool) -> bool {
        match self.byte {
            b'{' | b';' | b'}' => true,
            // newline-terminated statements (Kotlin, Groovy)
            _ if !fresh_line => false,
            b')' => !self.closes_guard,
            b']' | b'"' | b'\'' | b'`' => true,
            b if is_ident(b) => !matches!(word_ending_at(text, self.offset), "else" | "do"),
            _ => false,
        }
    }
}

fn is_ident(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

fn is_word_at(text: &str, offset: usize, word: &str) -> bool {
    let bytes = text.as_bytes();
    text[offset..].starts_with(word)
        && (offset == 0 || !is_ident(bytes[offset - 1]))
        && bytes
            .get(offset + word.len())
            .map_or(true, |&b| !is_ident(b))
}

fn word_ending_at(text: &str, offset: usize) -> &str {
    let end = offset + 1;
    let start = text.as_bytes()[..end]
        .iter()
        .rposition(|&b| !is_ident(b))
        .map_or(0, |i| i + 1);
    &text[start..end]
}

/// Whether the `(` at `offset` opens the condition of `if`, `while` or `for`.
fn opens_guard(text: &str, offset: usize) -> bool {
    let before = text[..offset].trim_end();
    match before.len().checked_sub(1) {
        Some(last) if is_ident(before.as_bytes()[last]) => {
            matches!(word_ending_at(before, last), "if" | "while" | "for")
        }
        _ => false,
    }
}

use crate::locate::block::CodeBlock;
use crate::locate::errors::{BlockKind, LocateError};
use crate::locate::lang::Language;
use crate::scan::{find_matching_bracket_position, ScanError};
use regex::Regex;
use tracing::debug;

fn compile(pattern: &str) -> Result<Regex, LocateError> {
    Regex::new(pattern).map_err(|e| LocateError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

/// Find the first construction of `class_name` (`new Foo(...)` in Java and
/// Groovy, `Foo(...)` or `object : Foo(...)` in Kotlin).
///
/// The block starts at `new`/`object`/the class name and ends at the closing
/// parenthesis of the argument list. When the call is immediately followed by
/// a `{` (only whitespace in between), it is an anonymous class or object
/// expression and the block is extended to the end of that body.
///
/// Returns `Ok(None)` when there is no such call site.
///
/// ```
/// use brace_patcher::locate::{find_new_instance_code_block, Language};
///
/// let src = "Runnable r = new Runnable() {\n  public void run() {}\n};";
/// let block = find_new_instance_code_block(src, "Runnable", Language::Java)
///     .unwrap()
///     .unwrap();
/// assert_eq!(block.code, "new Runnable() {\n  public void run() {}\n}");
/// ```
pub fn find_new_instance_code_block(
    text: &str,
    class_name: &str,
    language: Language,
) -> Result<Option<CodeBlock>, LocateError> {
    let re = compile(&language.instance_pattern(class_name))?;
    let Some(found) = re.find(text) else {
        debug!(class_name, %language, "no instance construction found");
        return Ok(None);
    };

    // skip the leading space the pattern anchors on
    let start = found.start() + 1;
    let mut end = find_matching_bracket_position(text, '(', start)?;

    let after_call = &text[end + 1..];
    if after_call.trim_start().starts_with('{') {
        debug!(class_name, "anonymous class body follows constructor call");
        end = find_matching_bracket_position(text, '{', end)?;
    }

    Ok(Some(CodeBlock::from_span(text, start, end)))
}

/// Find the body of the first declaration matching `declaration`.
///
/// `declaration` is a regular expression fragment such as `void onCreate\(` or
/// `class MainApplication`. The anchor is the first match of the fragment
/// followed (on the same line) by `(` or `{`; the body is the first `{` at or
/// after that anchor up to its matching `}`.
pub fn find_declaration_code_block(
    text: &str,
    declaration: &str,
) -> Result<CodeBlock, LocateError> {
    let re = compile(&format!(r"\s*(?:{declaration}).*?[({{]"))?;
    let found = re.find(text).ok_or_else(|| LocateError::BlockNotFound {
        kind: BlockKind::Declaration,
        pattern: declaration.to_string(),
    })?;

    let open_at = text[found.start()..]
        .find('{')
        .map(|pos| pos + found.start())
        .ok_or(ScanError::OpenBracketNotFound {
            open: '{',
            start: found.start(),
        })?;
    let end = find_matching_bracket_position(text, '{', open_at)?;

    debug!(declaration, start = open_at, end, "located declaration block");
    Ok(CodeBlock::from_span(text, open_at, end))
}

/// Find a named configuration block such as `plugins { ... }` in a build script.
///
/// `name` is matched literally. The returned block covers only the braces and
/// their contents. Returns `Ok(None)` when no `name {` is present.
pub fn find_named_code_block(text: &str, name: &str) -> Result<Option<CodeBlock>, LocateError> {
    let re = compile(&format!(r"{}\s*\{{", regex::escape(name)))?;
    let Some(found) = re.find(text) else {
        debug!(name, "named block not present");
        return Ok(None);
    };

    let open_at = found.end() - 1;
    let end = find_matching_bracket_position(text, '{', open_at)?;
    Ok(Some(CodeBlock::from_span(text, open_at, end)))
}

/// Byte offset of the first match of `pattern` at or after `offset`.
pub fn search_from_offset(
    text: &str,
    pattern: &str,
    offset: usize,
) -> Result<Option<usize>, LocateError> {
    let re = compile(pattern)?;
    let Some(rest) = text.get(offset..) else {
        return Err(ScanError::OffsetOutOfRange {
            offset,
            len: text.len(),
        }
        .into());
    };
    Ok(re.find(rest).map(|m| m.start() + offset))
}

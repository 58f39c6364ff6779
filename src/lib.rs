//! Brace Patcher: block location and text insertion for C-family sources
//!
//! Finds structural regions (class bodies, method bodies, anonymous class
//! bodies, build-script blocks such as `plugins { }`) in Java, Kotlin and
//! Gradle text with regular expressions plus lexically aware bracket
//! matching, then splices text into them by byte offset. There is no syntax
//! tree: the only lexical knowledge is strings and comments, which is enough
//! to keep brace counting honest.
//!
//! # Architecture
//!
//! - [`scan`]: bracket matching over an explicit scanner state machine
//! - [`locate`]: regex anchors resolved into [`CodeBlock`] spans, and
//!   insertions into those spans
//! - [`edit`]: the single byte-span replacement primitive every insertion uses
//! - [`imports`]: line-based import injection below the `package` line
//! - [`config`]: declarative TOML mod plans applying ordered steps to one text
//!
//! Every operation is a pure function from text to text (or to a span).
//! Offsets are only valid for the exact text they were computed on, so a
//! chain of mutations must re-locate after every step.
//!
//! # Example
//!
//! ```
//! use brace_patcher::locate::{append_contents_inside_named_block, find_named_code_block};
//!
//! let gradle = "plugins {\n  id 'com.android.application'\n}";
//! let patched = append_contents_inside_named_block(gradle, "plugins", "  id 'org.example.plugin'\n")?;
//!
//! let block = find_named_code_block(&patched, "plugins")?.expect("block is present");
//! assert!(block.code.contains("org.example.plugin"));
//! # Ok::<(), brace_patcher::LocateError>(())
//! ```

pub mod config;
pub mod edit;
pub mod imports;
pub mod locate;
pub mod scan;

// Re-exports
pub use config::{
    apply_plan, load_from_path, load_from_str, ConfigError, ModPlan, PlanError, PlanOutcome, PlanParseError,
    StepResult,
};
pub use edit::{insert_contents_at_offset, replace_contents_with_offset, EditError, TextEdit};
pub use imports::add_imports;
pub use locate::{
    append_contents_inside_declaration_block, append_contents_inside_named_block,
    find_declaration_code_block, find_named_code_block, find_new_instance_code_block,
    insert_contents_inside_declaration_block, search_from_offset, BlockKind, CodeBlock,
    ImportStyle, InsertPosition, Language, LocateError,
};
pub use scan::{find_matching_bracket_position, Bracket, ScanError, ScanState};

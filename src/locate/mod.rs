//! Regex search plus bracket matching for locating code blocks.
//!
//! Each locator finds an anchor with a regular expression and then resolves the
//! block boundaries with [`find_matching_bracket_position`](crate::scan::find_matching_bracket_position).
//! Only the leftmost match is ever considered.

pub mod append;
pub mod block;
pub mod errors;
pub mod lang;
pub mod locator;

pub use append::{
    append_contents_inside_declaration_block, append_contents_inside_named_block,
    insert_contents_inside_declaration_block, InsertPosition,
};
pub use block::CodeBlock;
pub use errors::{BlockKind, LocateError};
pub use lang::{ImportStyle, Language};
pub use locator::{
    find_declaration_code_block, find_named_code_block, find_new_instance_code_block,
    search_from_offset,
};

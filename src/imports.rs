//! Line-based import injection.
//!
//! Unlike the block locators this never looks at brackets: it finds the
//! `package` line and inserts import statements right below it.

use crate::locate::ImportStyle;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

fn package_line() -> &'static Regex {
    static PACKAGE_LINE: OnceLock<Regex> = OnceLock::new();
    PACKAGE_LINE.get_or_init(|| Regex::new(r"^package .*;?$").expect("package regex is valid"))
}

/// Insert `import <name>` lines for every name not already mentioned in `text`.
///
/// The presence check is a plain substring search over the whole text, so a
/// name that only appears in a comment or string still counts as present.
/// New imports go directly below the first `package` line, in the order
/// given; without a package line they go to the very top of the text.
///
/// ```
/// use brace_patcher::imports::add_imports;
/// use brace_patcher::locate::ImportStyle;
///
/// let out = add_imports("package com.example;\n\nclass Foo {}", &["java.util.List"], ImportStyle::Semicolon);
/// assert_eq!(out, "package com.example;\nimport java.util.List;\n\nclass Foo {}");
/// ```
pub fn add_imports<S: AsRef<str>>(text: &str, imports: &[S], style: ImportStyle) -> String {
    let mut lines: Vec<&str> = text.split('\n').collect();
    let package_index = lines.iter().position(|line| package_line().is_match(line));
    let mut insert_at = package_index.map_or(0, |idx| idx + 1);

    let statements: Vec<String> = imports
        .iter()
        .map(|name| name.as_ref())
        .filter(|name| !text.contains(*name))
        .map(|name| format!("import {name}{}", style.terminator()))
        .collect();

    if statements.is_empty() {
        return text.to_string();
    }

    debug!(
        count = statements.len(),
        has_package = package_index.is_some(),
        "adding imports"
    );

    for statement in &statements {
        lines.insert(insert_at, statement.as_str());
        insert_at += 1;
    }
    lines.join("\n")
}

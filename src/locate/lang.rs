//! Per-language pattern templates.
//!
//! Everything language specific lives in this table. The locators only ever
//! ask a [`Language`] for a compiled-ready pattern string.

use clap::ValueEnum;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Source language of the text being patched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Java,
    #[serde(alias = "kt")]
    #[value(alias = "kt")]
    Kotlin,
    /// Groovy, which covers `build.gradle` / `settings.gradle` scripts
    #[serde(alias = "gradle")]
    #[value(alias = "gradle")]
    Groovy,
}

/// Whether generated import statements end with a `;`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStyle {
    Semicolon,
    Bare,
}

impl ImportStyle {
    pub fn terminator(self) -> &'static str {
        match self {
            ImportStyle::Semicolon => ";",
            ImportStyle::Bare => "",
        }
    }
}

const CLASS_PLACEHOLDER: &str = "{class}";

impl Language {
    /// Regex template for an instance-construction call site.
    ///
    /// Every template starts with the single space that precedes the
    /// construct; the located block starts right after it.
    fn instance_template(self) -> &'static str {
        match self {
            Language::Java | Language::Groovy => r" new {class}\(",
            Language::Kotlin => r" (?:object\s*:\s*)?{class}\(",
        }
    }

    /// Regex matching a construction of `class_name`. The name is matched literally.
    pub fn instance_pattern(self, class_name: &str) -> String {
        self.instance_template()
            .replace(CLASS_PLACEHOLDER, &regex::escape(class_name))
    }

    pub fn import_style(self) -> ImportStyle {
        match self {
            Language::Java => ImportStyle::Semicolon,
            Language::Kotlin | Language::Groovy => ImportStyle::Bare,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Language::Java => "java",
            Language::Kotlin => "kotlin",
            Language::Groovy => "groovy",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "java" => Ok(Language::Java),
            "kt" | "kotlin" => Ok(Language::Kotlin),
            "groovy" | "gradle" => Ok(Language::Groovy),
            other => Err(format!("unknown language tag '{other}'")),
        }
    }
}

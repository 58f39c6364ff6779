//! Mod plan loading: TOML text to a validated [`ModPlan`].

use crate::config::schema::{ModPlan, ValidationError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A plan that could not be read from text. Carries no path; see [`ConfigError`].
#[derive(Debug, Error)]
pub enum PlanParseError {
    #[error("malformed mod plan TOML{}: {source}", step_suffix(.step))]
    Toml {
        /// 1-based `[[steps]]` entry the error points into, if any
        step: Option<usize>,
        #[source]
        source: toml_edit::de::Error,
    },

    #[error("invalid mod plan: {0}")]
    Invalid(#[from] ValidationError),
}

fn step_suffix(step: &Option<usize>) -> String {
    step.map(|n| format!(" in step #{n}")).unwrap_or_default()
}

/// A plan file that could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read mod plan {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: PlanParseError,
    },
}

/// Parse and validate a mod plan.
pub fn load_from_str(input: &str) -> Result<ModPlan, PlanParseError> {
    let plan: ModPlan = toml_edit::de::from_str(input).map_err(|source| PlanParseError::Toml {
        step: source.span().and_then(|span| step_at(input, span.start)),
        source,
    })?;
    plan.validate()?;
    Ok(plan)
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<ModPlan, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Which `[[steps]]` entry contains byte `offset` of `input`.
fn step_at(input: &str, offset: usize) -> Option<usize> {
    let mut line_start = 0;
    let mut step = None;
    for line in input.split_inclusive('\n') {
        if line_start > offset {
            break;
        }
        if line.trim_start().starts_with("[[steps]]") {
            step = Some(step.unwrap_or(0) + 1);
        }
        line_start += line.len();
    }
    step
}

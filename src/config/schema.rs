use crate::locate::{InsertPosition, Language};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// An ordered chain of mutations applied to a single source text.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct ModPlan {
    #[serde(default)]
    pub meta: Metadata,
    #[serde(default)]
    pub steps: Vec<StepDefinition>,
}

impl ModPlan {
    /// Check every step and collect all problems instead of stopping at the first.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        if self.steps.is_empty() {
            issues.push(ValidationIssue::EmptyStepList);
        }

        let mut first_use: HashMap<&str, usize> = HashMap::new();
        for (index, step) in self.steps.iter().enumerate() {
            let position = index + 1;
            let step_ref = StepRef::new(&step.id, position);
            if step.id.trim().is_empty() {
                issues.push(ValidationIssue::MissingField {
                    step: step_ref.clone(),
                    field: "id",
                });
            } else if let Some(&first) = first_use.get(step.id.as_str()) {
                issues.push(ValidationIssue::DuplicateId {
                    id: step.id.clone(),
                    first,
                    again: position,
                });
            } else {
                first_use.insert(&step.id, position);
            }

            step.operation
                .check(&step_ref, self.meta.language.is_some(), &mut issues);
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Metadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Default language for steps that need one
    #[serde(default)]
    pub language: Option<Language>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StepDefinition {
    pub id: String,
    #[serde(flatten)]
    pub operation: Operation,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Operation {
    /// Append to the end of a class or method body
    AppendDeclaration { declaration: String, text: String },
    /// Insert into a class or method body at a chosen position
    InsertDeclaration {
        declaration: String,
        text: String,
        #[serde(default)]
        position: InsertPosition,
    },
    /// Append to the end of a named block such as `plugins { }`
    AppendBlock { name: String, text: String },
    /// Add missing import lines below the package declaration
    AddImports {
        imports: Vec<String>,
        #[serde(default)]
        language: Option<Language>,
    },
}

impl Operation {
    pub fn kind(&self) -> &'static str {
        match self {
            Operation::AppendDeclaration { .. } => "append-declaration",
            Operation::InsertDeclaration { .. } => "insert-declaration",
            Operation::AppendBlock { .. } => "append-block",
            Operation::AddImports { .. } => "add-imports",
        }
    }

    fn check(&self, step: &StepRef, has_default_language: bool, issues: &mut Vec<ValidationIssue>) {
        let missing = |field: &'static str| ValidationIssue::MissingField {
            step: step.clone(),
            field,
        };

        match self {
            Operation::AppendDeclaration { declaration, text }
            | Operation::InsertDeclaration {
                declaration, text, ..
            } => {
                if declaration.trim().is_empty() {
                    issues.push(missing("declaration"));
                } else if let Err(e) = regex::Regex::new(declaration) {
                    issues.push(ValidationIssue::InvalidDeclaration {
                        step: step.clone(),
                        pattern: declaration.clone(),
                        message: e.to_string(),
                    });
                }
                if text.is_empty() {
                    issues.push(missing("text"));
                }
            }
            Operation::AppendBlock { name, text } => {
                if name.trim().is_empty() {
                    issues.push(missing("name"));
                }
                if text.is_empty() {
                    issues.push(missing("text"));
                }
            }
            Operation::AddImports { imports, language } => {
                if imports.is_empty() {
                    issues.push(missing("imports"));
                }
                if imports.iter().any(|name| name.trim().is_empty()) {
                    issues.push(ValidationIssue::BlankImport { step: step.clone() });
                }
                if language.is_none() && !has_default_language {
                    issues.push(ValidationIssue::MissingLanguage { step: step.clone() });
                }
            }
        }
    }
}

/// Every problem found in a plan, in step order.
#[derive(Debug, Clone, Error)]
#[error("{}", render_issues(.issues))]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

fn render_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// How messages name a step: by id, or by 1-based position when the id is blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepRef {
    Id(String),
    Position(usize),
}

impl StepRef {
    fn new(id: &str, position: usize) -> Self {
        if id.trim().is_empty() {
            StepRef::Position(position)
        } else {
            StepRef::Id(id.to_string())
        }
    }
}

impl fmt::Display for StepRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepRef::Id(id) => write!(f, "'{id}'"),
            StepRef::Position(n) => write!(f, "#{n}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationIssue {
    #[error("mod plan contains no steps")]
    EmptyStepList,

    #[error("step {step} is missing `{field}`")]
    MissingField { step: StepRef, field: &'static str },

    #[error("step id '{id}' is used by steps #{first} and #{again}")]
    DuplicateId {
        id: String,
        first: usize,
        again: usize,
    },

    #[error("step {step}: declaration `{pattern}` is not a valid pattern: {message}")]
    InvalidDeclaration {
        step: StepRef,
        pattern: String,
        message: String,
    },

    #[error("step {step}: import names cannot be blank")]
    BlankImport { step: StepRef },

    #[error("step {step} adds imports but neither the step nor [meta] sets a language")]
    MissingLanguage { step: StepRef },
}

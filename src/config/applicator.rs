//! Mod plan applicator - threads one source text through every step
//!
//! Steps run strictly in order and each one sees the text produced by the
//! previous step, so offsets never leak across a mutation. The first failing
//! step aborts the plan; nothing is returned for a partially applied plan.

use crate::config::schema::{ModPlan, Operation, StepDefinition};
use crate::imports::add_imports;
use crate::locate::{
    append_contents_inside_declaration_block, append_contents_inside_named_block,
    insert_contents_inside_declaration_block, Language, LocateError,
};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

/// Per-step result of a successful plan run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepResult {
    /// The step changed the text
    Applied { id: String },
    /// The step ran but produced identical text (e.g. all imports present)
    Unchanged { id: String },
}

impl StepResult {
    pub fn id(&self) -> &str {
        match self {
            StepResult::Applied { id } | StepResult::Unchanged { id } => id,
        }
    }
}

impl fmt::Display for StepResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepResult::Applied { id } => write!(f, "{id}: applied"),
            StepResult::Unchanged { id } => write!(f, "{id}: unchanged"),
        }
    }
}

/// Final text plus what each step did.
#[derive(Debug, Clone)]
#[must_use = "PlanOutcome carries the patched text"]
pub struct PlanOutcome {
    pub text: String,
    pub steps: Vec<StepResult>,
}

impl PlanOutcome {
    pub fn changed(&self) -> bool {
        self.steps
            .iter()
            .any(|step| matches!(step, StepResult::Applied { .. }))
    }
}

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("step '{id}' ({kind}) failed: {source}")]
    Step {
        id: String,
        kind: &'static str,
        #[source]
        source: LocateError,
    },

    #[error("step '{id}' needs a language but neither the step nor [meta] sets one")]
    MissingLanguage { id: String },
}

/// Apply every step of `plan` to `source`, in order.
pub fn apply_plan(plan: &ModPlan, source: &str) -> Result<PlanOutcome, PlanError> {
    let mut text = source.to_string();
    let mut steps = Vec::with_capacity(plan.steps.len());

    for step in &plan.steps {
        let next = apply_step(plan, step, &text)?;
        let result = if next == text {
            StepResult::Unchanged {
                id: step.id.clone(),
            }
        } else {
            StepResult::Applied {
                id: step.id.clone(),
            }
        };
        debug!(step = %step.id, kind = step.operation.kind(), %result, "step done");
        steps.push(result);
        text = next;
    }

    info!(plan = %plan.meta.name, steps = steps.len(), "mod plan applied");
    Ok(PlanOutcome { text, steps })
}

fn apply_step(plan: &ModPlan, step: &StepDefinition, text: &str) -> Result<String, PlanError> {
    let wrap = |source: LocateError| PlanError::Step {
        id: step.id.clone(),
        kind: step.operation.kind(),
        source,
    };

    match &step.operation {
        Operation::AppendDeclaration {
            declaration,
            text: insertion,
        } => append_contents_inside_declaration_block(text, declaration, insertion).map_err(wrap),
        Operation::InsertDeclaration {
            declaration,
            text: insertion,
            position,
        } => insert_contents_inside_declaration_block(text, declaration, insertion, *position)
            .map_err(wrap),
        Operation::AppendBlock {
            name,
            text: insertion,
        } => append_contents_inside_named_block(text, name, insertion).map_err(wrap),
        Operation::AddImports { imports, language } => {
            let language: Language = language
                .or(plan.meta.language)
                .ok_or_else(|| PlanError::MissingLanguage {
                    id: step.id.clone(),
                })?;
            Ok(add_imports(text, imports, language.import_style()))
        }
    }
}

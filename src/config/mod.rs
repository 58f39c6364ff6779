pub mod applicator;
pub mod loader;
pub mod schema;

pub use applicator::{apply_plan, PlanError, PlanOutcome, StepResult};
pub use loader::{load_from_path, load_from_str, ConfigError, PlanParseError};
pub use schema::{
    Metadata, ModPlan, Operation, StepDefinition, StepRef, ValidationError, ValidationIssue,
};

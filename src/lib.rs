pub mod clock;
pub mod conflict;
pub mod duration_policy;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod materializer;
pub mod persistence;
pub mod plan;
pub mod recurrence;
pub mod task;
pub mod template;
pub(crate) mod template_validation;
pub mod working_hours;

pub use clock::MidnightOverflow;
pub use conflict::{CandidateSlot, find_conflicts};
pub use materializer::{MaterializeError, RangeOutcome, SkippedDate};
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqlitePlanStore;
pub use persistence::{
    PersistenceError, PlanStore, load_plan_from_csv, load_plan_from_json, save_plan_to_csv,
    save_plan_to_json, validate_plan, validate_templates,
};
pub use plan::{ExpansionSummary, PlanError, StorePlan};
pub use recurrence::{RecurrenceKind, RecurrencePattern, RecurrenceValidationError};
pub use task::TaskRecord;
pub use template::EventTemplate;
pub use template_validation::TemplateValidationError;
pub use working_hours::WorkingHours;

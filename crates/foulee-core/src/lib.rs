//! Core of foulee: profile validation, 16-week marathon plan generation,
//! week selection, and the single plan slot the front ends render from.

pub mod export;
pub mod form;
pub mod plan;
pub mod profile;
pub mod selection;
pub mod slot;

pub use form::PlanForm;
pub use plan::{PLAN_WEEKS, Phase, Session, SessionKind, TrainingPlan, WeeklyPlan, generate_plan};
pub use profile::{Field, FieldErrors, NormalizedProfile, RawProfileInput, Sex, validate};
pub use selection::{WeekSelection, select};
pub use slot::{PlanService, PlanSlot, RequestToken, SubmitOutcome};

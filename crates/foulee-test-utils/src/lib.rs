//! Shared fixtures for foulee tests.
//!
//! Each fixture is a raw form input as a user would type it, plus helpers to
//! validate and generate from it.

use foulee_core::{NormalizedProfile, RawProfileInput, TrainingPlan, generate_plan, validate};

/// Young, light runner: BMI about 21.3, gets the hills overlay.
pub fn young_light() -> RawProfileInput {
    RawProfileInput::new("femme", "28", "165", "58", "03:45:00")
}

/// Age 50 with BMI about 27.8, gets the strength overlay.
pub fn older_heavy() -> RawProfileInput {
    RawProfileInput::new("homme", "50", "175", "85", "04:30:00")
}

/// Age 35 with BMI about 22.9, no overlay.
pub fn neutral() -> RawProfileInput {
    RawProfileInput::new("autre", "35", "175", "70", "03:30:00")
}

/// Every fixture above, for property-style loops.
pub fn all_valid() -> Vec<RawProfileInput> {
    vec![young_light(), older_heavy(), neutral()]
}

/// Validate a fixture, panicking with the field errors if it is invalid.
pub fn profile(raw: &RawProfileInput) -> NormalizedProfile {
    validate(raw).unwrap_or_else(|e| panic!("fixture should validate: {e}"))
}

/// Validate and generate in one step.
pub fn plan(raw: &RawProfileInput) -> TrainingPlan {
    generate_plan(&profile(raw))
}

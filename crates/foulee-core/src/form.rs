//! Form state threaded through validate → generate.
//!
//! One value holds the raw fields, the per-field errors of the last
//! submission, the displayed plan, and the week selection.

use std::sync::Arc;

use crate::plan::{TrainingPlan, generate_plan};
use crate::profile::{Field, FieldErrors, NormalizedProfile, RawProfileInput, validate};
use crate::selection::WeekSelection;

#[derive(Debug, Clone, Default)]
pub struct PlanForm {
    pub input: RawProfileInput,
    errors: FieldErrors,
    plan: Option<Arc<TrainingPlan>>,
    selection: WeekSelection,
}

impl PlanForm {
    pub fn new(input: RawProfileInput) -> Self {
        Self {
            input,
            ..Self::default()
        }
    }

    /// Validate the current input.
    ///
    /// On failure the errors are kept for display and any previous plan and
    /// selection are cleared so stale results never sit next to new errors.
    pub fn submit(&mut self) -> Result<NormalizedProfile, FieldErrors> {
        match validate(&self.input) {
            Ok(profile) => {
                self.errors = FieldErrors::new();
                Ok(profile)
            }
            Err(errors) => {
                self.errors = errors.clone();
                self.clear_plan();
                Err(errors)
            }
        }
    }

    /// Submit and generate in one step, without any simulated delay.
    pub fn submit_and_generate(&mut self) -> Result<Arc<TrainingPlan>, FieldErrors> {
        let profile = self.submit()?;
        let plan = Arc::new(generate_plan(&profile));
        self.accept(Arc::clone(&plan));
        Ok(plan)
    }

    /// Install a freshly generated plan, replacing the previous one.
    pub fn accept(&mut self, plan: Arc<TrainingPlan>) {
        self.plan = Some(plan);
        self.selection.clear();
    }

    pub fn clear_plan(&mut self) {
        self.plan = None;
        self.selection.clear();
    }

    pub fn plan(&self) -> Option<&TrainingPlan> {
        self.plan.as_deref()
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error_for(&self, field: Field) -> Option<&str> {
        self.errors.get(field)
    }

    pub fn selection(&self) -> &WeekSelection {
        &self.selection
    }

    /// Mutable selection, only while a plan is displayed.
    pub fn selection_mut(&mut self) -> Option<&mut WeekSelection> {
        self.plan.as_ref()?;
        Some(&mut self.selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> RawProfileInput {
        RawProfileInput::new("femme", "28", "165", "58", "03:45:00")
    }

    #[test]
    fn successful_submission_produces_plan() {
        let mut form = PlanForm::new(valid_input());
        let plan = form.submit_and_generate().expect("should generate");
        assert_eq!(plan.len(), 16);
        assert!(form.errors().is_empty());
        assert!(form.plan().is_some());
    }

    #[test]
    fn failed_submission_clears_plan_and_selection() {
        let mut form = PlanForm::new(valid_input());
        form.submit_and_generate().expect("should generate");
        form.selection_mut().unwrap().toggle_week(4);
        assert_eq!(form.selection().get(), Some(4));

        form.input.goal_time = "3:3:0".to_owned();
        let errors = form.submit().expect_err("should fail");
        assert!(errors.contains(Field::GoalTime));
        assert!(form.plan().is_none());
        assert_eq!(form.selection().get(), None);
        assert!(form.error_for(Field::GoalTime).is_some());
        assert!(form.error_for(Field::Age).is_none());
    }

    #[test]
    fn resubmission_clears_old_errors() {
        let mut form = PlanForm::new(RawProfileInput::default());
        assert!(form.submit().is_err());
        assert_eq!(form.errors().len(), 5);

        form.input = valid_input();
        form.submit().expect("should validate");
        assert!(form.errors().is_empty());
    }

    #[test]
    fn selection_requires_plan() {
        let mut form = PlanForm::new(valid_input());
        assert!(form.selection_mut().is_none());
        form.submit_and_generate().unwrap();
        assert!(form.selection_mut().is_some());
    }
}

//! Single display slot for the current plan, and the service that fills it.
//!
//! Submissions pass through a simulated delay before their plan becomes
//! visible. Each accepted submission gets a [`RequestToken`]; only the most
//! recently issued token may commit, so a slow older request can never
//! overwrite a newer one.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::plan::{TrainingPlan, generate_plan};
use crate::profile::{FieldErrors, NormalizedProfile, RawProfileInput, validate};

/// Identifies one submission. Later submissions get larger tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
struct SlotState {
    latest: u64,
    plan: Option<Arc<TrainingPlan>>,
}

/// The single plan slot. Cloning shares the same slot.
///
/// Issue order is authoritative: the most recently issued token wins, even
/// if an older request happens to finish its delay later.
#[derive(Debug, Clone, Default)]
pub struct PlanSlot {
    inner: Arc<Mutex<SlotState>>,
}

impl PlanSlot {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Issue a token for a new submission, superseding all earlier ones.
    pub fn issue(&self) -> RequestToken {
        let mut state = self.lock();
        state.latest += 1;
        RequestToken(state.latest)
    }

    /// Whether `token` is still the most recent submission.
    pub fn is_current(&self, token: RequestToken) -> bool {
        self.lock().latest == token.0
    }

    /// Store `plan` if `token` is the latest issued token.
    ///
    /// Returns `false` (and leaves the slot untouched) when a later
    /// submission or a clear happened in the meantime.
    pub fn commit(&self, token: RequestToken, plan: Arc<TrainingPlan>) -> bool {
        let mut state = self.lock();
        if state.latest != token.0 {
            return false;
        }
        state.plan = Some(plan);
        true
    }

    /// Empty the slot and invalidate every in-flight submission.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.latest += 1;
        state.plan = None;
    }

    pub fn current(&self) -> Option<Arc<TrainingPlan>> {
        self.lock().plan.clone()
    }

    /// Value of the most recently issued token (0 before any submission).
    pub fn generation(&self) -> u64 {
        self.lock().latest
    }
}

/// Result of one submission through [`PlanService`].
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// The plan was generated and is now in the slot.
    Committed(Arc<TrainingPlan>),
    /// A later submission was issued before this one finished its delay.
    Superseded,
    /// The submission was cancelled during its delay.
    Cancelled,
    /// Validation failed; the slot was cleared.
    Invalid(FieldErrors),
}

impl SubmitOutcome {
    pub fn plan(&self) -> Option<&Arc<TrainingPlan>> {
        match self {
            Self::Committed(plan) => Some(plan),
            _ => None,
        }
    }
}

/// Validates, waits out the simulated delay, generates, and commits.
#[derive(Debug, Clone)]
pub struct PlanService {
    slot: PlanSlot,
    delay: Duration,
}

impl PlanService {
    pub fn new(delay: Duration) -> Self {
        Self::with_slot(PlanSlot::new(), delay)
    }

    pub fn with_slot(slot: PlanSlot, delay: Duration) -> Self {
        Self { slot, delay }
    }

    pub fn slot(&self) -> &PlanSlot {
        &self.slot
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Submit raw input using the configured delay.
    pub async fn submit(&self, raw: &RawProfileInput) -> SubmitOutcome {
        self.submit_with(raw, self.delay, &CancellationToken::new()).await
    }

    /// Submit raw input with an explicit delay and cancellation token.
    pub async fn submit_with(
        &self,
        raw: &RawProfileInput,
        delay: Duration,
        cancel: &CancellationToken,
    ) -> SubmitOutcome {
        match validate(raw) {
            Ok(profile) => {
                let token = self.slot.issue();
                self.run(token, profile, delay, cancel).await
            }
            Err(errors) => {
                self.slot.clear();
                debug!(invalid = errors.len(), "submission rejected, slot cleared");
                SubmitOutcome::Invalid(errors)
            }
        }
    }

    /// Finish an already-issued submission: delay, generate, commit.
    pub async fn run(
        &self,
        token: RequestToken,
        profile: NormalizedProfile,
        delay: Duration,
        cancel: &CancellationToken,
    ) -> SubmitOutcome {
        if !delay.is_zero() {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = cancel.cancelled() => {
                    debug!(token = token.value(), "submission cancelled");
                    return SubmitOutcome::Cancelled;
                }
            }
        }

        if !self.slot.is_current(token) {
            warn!(
                token = token.value(),
                latest = self.slot.generation(),
                "submission superseded during its delay, skipping generation"
            );
            return SubmitOutcome::Superseded;
        }

        let plan = Arc::new(generate_plan(&profile));
        if self.slot.commit(token, Arc::clone(&plan)) {
            info!(token = token.value(), weeks = plan.len(), "plan committed");
            SubmitOutcome::Committed(plan)
        } else {
            warn!(
                token = token.value(),
                latest = self.slot.generation(),
                "plan discarded, superseded by a later submission"
            );
            SubmitOutcome::Superseded
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan() -> Arc<TrainingPlan> {
        let raw = RawProfileInput::new("homme", "35", "175", "70", "03:30:00");
        Arc::new(generate_plan(&validate(&raw).unwrap()))
    }

    #[test]
    fn only_latest_token_commits() {
        let slot = PlanSlot::new();
        let first = slot.issue();
        let second = slot.issue();
        assert!(first < second);

        assert!(!slot.commit(first, plan()));
        assert!(slot.current().is_none());
        assert!(slot.commit(second, plan()));
        assert!(slot.current().is_some());
    }

    #[test]
    fn clear_invalidates_in_flight_tokens() {
        let slot = PlanSlot::new();
        let token = slot.issue();
        assert!(slot.commit(token, plan()));

        let pending = slot.issue();
        slot.clear();
        assert!(slot.current().is_none());
        assert!(!slot.is_current(pending));
        assert!(!slot.commit(pending, plan()));
    }

    #[tokio::test]
    async fn superseded_request_skips_generation() {
        let svc = PlanService::new(Duration::ZERO);
        let profile = validate(&RawProfileInput::new("homme", "35", "175", "70", "03:30:00")).unwrap();
        let stale = svc.slot().issue();
        svc.slot().issue();

        let outcome = svc.run(stale, profile, Duration::ZERO, &CancellationToken::new()).await;
        assert!(matches!(outcome, SubmitOutcome::Superseded));
        assert!(svc.slot().current().is_none());
    }

    #[test]
    fn clones_share_the_slot() {
        let slot = PlanSlot::new();
        let other = slot.clone();
        let token = other.issue();
        assert!(slot.commit(token, plan()));
        assert!(other.current().is_some());
        assert_eq!(slot.generation(), 1);
    }
}

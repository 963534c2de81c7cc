//! Training plan model and generation.

pub mod generate;

use std::fmt;

use serde::Serialize;

pub use generate::{Overlay, body_mass_index, generate_plan};

/// Number of weeks in every generated plan.
pub const PLAN_WEEKS: u8 = 16;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Contiguous week range sharing one base session template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Foundation,
    Build,
    Peak,
    Taper,
    Race,
}

impl Phase {
    /// Phase for a 1-based week number. Weeks past 16 count as race weeks.
    pub fn for_week(week: u8) -> Self {
        match week {
            0..=4 => Self::Foundation,
            5..=8 => Self::Build,
            9..=12 => Self::Peak,
            13..=14 => Self::Taper,
            _ => Self::Race,
        }
    }

    /// Label shown in the calendar.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Foundation => "Fondation",
            Self::Build => "Développement",
            Self::Peak => "Pic",
            Self::Taper => "Affûtage",
            Self::Race => "Course",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Foundation => "foundation",
            Self::Build => "build",
            Self::Peak => "peak",
            Self::Taper => "taper",
            Self::Race => "race",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------

/// What a session is, independent of its wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    EasyRun,
    LongRun,
    Intervals,
    Threshold,
    VeryLongRun,
    RacePace,
    ShakeOut,
    Rest,
    Race,
    Strength,
    Hills,
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::EasyRun => "easy_run",
            Self::LongRun => "long_run",
            Self::Intervals => "intervals",
            Self::Threshold => "threshold",
            Self::VeryLongRun => "very_long_run",
            Self::RacePace => "race_pace",
            Self::ShakeOut => "shake_out",
            Self::Rest => "rest",
            Self::Race => "race",
            Self::Strength => "strength",
            Self::Hills => "hills",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Plan values
// ---------------------------------------------------------------------------

/// One entry of a week's session list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub kind: SessionKind,
    /// Nominal duration, for sessions that have a single one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minutes: Option<u32>,
    pub description: String,
}

impl Session {
    pub fn new(kind: SessionKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            minutes: None,
            description: description.into(),
        }
    }

    pub fn timed(kind: SessionKind, minutes: u32, description: impl Into<String>) -> Self {
        Self {
            kind,
            minutes: Some(minutes),
            description: description.into(),
        }
    }

    pub fn is_rest(&self) -> bool {
        self.kind == SessionKind::Rest
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

/// The sessions of one week. Immutable once generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeeklyPlan {
    week: u8,
    phase: Phase,
    sessions: Vec<Session>,
}

impl WeeklyPlan {
    pub(crate) fn new(week: u8, sessions: Vec<Session>) -> Self {
        Self {
            week,
            phase: Phase::for_week(week),
            sessions,
        }
    }

    /// 1-based week number.
    pub fn week(&self) -> u8 {
        self.week
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    /// Session descriptions in order.
    pub fn descriptions(&self) -> Vec<&str> {
        self.sessions.iter().map(|s| s.description.as_str()).collect()
    }

    pub fn has_rest(&self) -> bool {
        self.sessions.iter().any(Session::is_rest)
    }

    pub fn count(&self, kind: SessionKind) -> usize {
        self.sessions.iter().filter(|s| s.kind == kind).count()
    }

    /// Nominal duration of the week's long or very long run.
    pub fn long_run_minutes(&self) -> Option<u32> {
        self.sessions
            .iter()
            .find(|s| matches!(s.kind, SessionKind::LongRun | SessionKind::VeryLongRun))
            .and_then(|s| s.minutes)
    }

    /// Calendar heading for the week.
    pub fn title(&self) -> String {
        format!("Semaine {}", self.week)
    }
}

/// A complete plan: exactly [`PLAN_WEEKS`] weeks in ascending order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TrainingPlan {
    weeks: Vec<WeeklyPlan>,
}

impl TrainingPlan {
    pub(crate) fn new(weeks: Vec<WeeklyPlan>) -> Self {
        debug_assert_eq!(weeks.len(), usize::from(PLAN_WEEKS));
        Self { weeks }
    }

    pub fn weeks(&self) -> &[WeeklyPlan] {
        &self.weeks
    }

    /// Week by 1-based number.
    pub fn week(&self, week: u8) -> Option<&WeeklyPlan> {
        let idx = usize::from(week).checked_sub(1)?;
        self.weeks.get(idx)
    }

    pub fn len(&self) -> usize {
        self.weeks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WeeklyPlan> {
        self.weeks.iter()
    }
}

impl<'a> IntoIterator for &'a TrainingPlan {
    type Item = &'a WeeklyPlan;
    type IntoIter = std::slice::Iter<'a, WeeklyPlan>;

    fn into_iter(self) -> Self::IntoIter {
        self.weeks.iter()
    }
}

//! Plan export: plain-text calendar, JSON, TOML, and CSV documents.

use std::fmt;
use std::fmt::Write as _;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::plan::TrainingPlan;
use crate::profile::{NormalizedProfile, Sex};

/// Errors that can occur while serializing a plan document.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialization failed: {0}")]
    Toml(#[from] toml::ser::Error),
}

/// Output format for [`render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Text,
    Json,
    Toml,
    Csv,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Text => "text",
            Self::Json => "json",
            Self::Toml => "toml",
            Self::Csv => "csv",
        };
        f.write_str(s)
    }
}

impl FromStr for ExportFormat {
    type Err = ExportFormatParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "toml" => Ok(Self::Toml),
            "csv" => Ok(Self::Csv),
            other => Err(ExportFormatParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`ExportFormat`] string.
#[derive(Debug, Clone, Error)]
#[error("invalid format {0:?} (expected text, json, toml, or csv)")]
pub struct ExportFormatParseError(pub String);

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

/// Profile fields echoed in exported documents.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileSummary {
    pub sex: Sex,
    pub age_years: u32,
    pub height_cm: u32,
    pub weight_kg: f64,
    pub goal_time: String,
    /// Rounded to one decimal.
    pub body_mass_index: f64,
}

impl From<&NormalizedProfile> for ProfileSummary {
    fn from(p: &NormalizedProfile) -> Self {
        Self {
            sex: p.sex(),
            age_years: p.age_years(),
            height_cm: p.height_cm(),
            weight_kg: p.weight_kg(),
            goal_time: p.goal_time(),
            body_mass_index: (p.body_mass_index() * 10.0).round() / 10.0,
        }
    }
}

/// Serializable wrapper around a plan.
#[derive(Debug, Clone, Serialize)]
pub struct PlanDocument<'a> {
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileSummary>,
    pub weeks: &'a TrainingPlan,
}

impl<'a> PlanDocument<'a> {
    pub fn new(plan: &'a TrainingPlan, profile: Option<&NormalizedProfile>) -> Self {
        Self {
            generated_at: Utc::now(),
            profile: profile.map(ProfileSummary::from),
            weeks: plan,
        }
    }
}

/// Render a plan in the requested format.
pub fn render(
    plan: &TrainingPlan,
    profile: Option<&NormalizedProfile>,
    format: ExportFormat,
) -> Result<String, ExportError> {
    match format {
        ExportFormat::Text => Ok(render_text(plan)),
        ExportFormat::Json => to_json(&PlanDocument::new(plan, profile)),
        ExportFormat::Toml => to_toml(&PlanDocument::new(plan, profile)),
        ExportFormat::Csv => Ok(to_csv(plan)),
    }
}

/// Calendar listing, one block per week.
pub fn render_text(plan: &TrainingPlan) -> String {
    let mut out = String::new();
    for week in plan {
        let _ = writeln!(out, "{} ({})", week.title(), week.phase().label());
        for (i, session) in week.sessions().iter().enumerate() {
            let _ = writeln!(out, "  {}. {session}", i + 1);
        }
        out.push('\n');
    }
    out
}

pub fn to_json(doc: &PlanDocument<'_>) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(doc)?)
}

pub fn to_toml(doc: &PlanDocument<'_>) -> Result<String, ExportError> {
    Ok(toml::to_string_pretty(doc)?)
}

/// One row per session: `week,phase,order,kind,minutes,description`.
pub fn to_csv(plan: &TrainingPlan) -> String {
    let mut out = String::from("week,phase,order,kind,minutes,description\n");
    for week in plan {
        for (i, session) in week.sessions().iter().enumerate() {
            let minutes = session.minutes.map(|m| m.to_string()).unwrap_or_default();
            let _ = writeln!(
                out,
                "{},{},{},{},{},{}",
                week.week(),
                week.phase(),
                i + 1,
                session.kind,
                minutes,
                csv_quote(&session.description),
            );
        }
    }
    out
}

fn csv_quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

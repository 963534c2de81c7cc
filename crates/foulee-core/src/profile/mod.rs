//! Runner profile: raw form input, validation, and the normalized profile
//! consumed by the plan generator.

pub mod validate;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use validate::{parse_goal_time, validate};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Sex of the runner, as selected in the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "homme", alias = "male")]
    Male,
    #[serde(rename = "femme", alias = "female")]
    Female,
    #[serde(rename = "autre", alias = "other")]
    Other,
}

impl Sex {
    /// All values in form order.
    pub const ALL: [Sex; 3] = [Sex::Male, Sex::Female, Sex::Other];

    /// Human-readable label shown next to the form field.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Male => "Homme",
            Self::Female => "Femme",
            Self::Other => "Autre",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Male => "homme",
            Self::Female => "femme",
            Self::Other => "autre",
        };
        f.write_str(s)
    }
}

impl FromStr for Sex {
    type Err = SexParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "homme" | "male" => Ok(Self::Male),
            "femme" | "female" => Ok(Self::Female),
            "autre" | "other" => Ok(Self::Other),
            _ => Err(SexParseError(s.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`Sex`] string.
#[derive(Debug, Clone, Error)]
#[error("invalid sex: {0:?} (expected homme, femme, or autre)")]
pub struct SexParseError(pub String);

// ---------------------------------------------------------------------------

/// One of the five form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Sex,
    Age,
    Height,
    Weight,
    GoalTime,
}

impl Field {
    /// All fields in form order.
    pub const ALL: [Field; 5] = [
        Field::Sex,
        Field::Age,
        Field::Height,
        Field::Weight,
        Field::GoalTime,
    ];

    /// Form label for the field.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sex => "Genre",
            Self::Age => "Âge (années)",
            Self::Height => "Taille (cm)",
            Self::Weight => "Poids (kg)",
            Self::GoalTime => "Objectif de temps (hh:mm:ss)",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Sex => "sex",
            Self::Age => "age",
            Self::Height => "height",
            Self::Weight => "weight",
            Self::GoalTime => "goal_time",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Raw input
// ---------------------------------------------------------------------------

/// The five form fields exactly as the user typed them.
///
/// Every field defaults to empty so partial JSON bodies and profile files
/// still deserialize; validation reports what is missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawProfileInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,
    pub age: String,
    pub height: String,
    pub weight: String,
    pub goal_time: String,
}

impl RawProfileInput {
    /// Build a raw input with every field filled in.
    pub fn new(
        sex: impl Into<String>,
        age: impl Into<String>,
        height: impl Into<String>,
        weight: impl Into<String>,
        goal_time: impl Into<String>,
    ) -> Self {
        Self {
            sex: Some(sex.into()),
            age: age.into(),
            height: height.into(),
            weight: weight.into(),
            goal_time: goal_time.into(),
        }
    }

    /// Current text of a field (empty when unset).
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Sex => self.sex.as_deref().unwrap_or(""),
            Field::Age => &self.age,
            Field::Height => &self.height,
            Field::Weight => &self.weight,
            Field::GoalTime => &self.goal_time,
        }
    }

    /// Replace the text of a field. An empty sex value unsets it.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Sex => self.sex = (!value.is_empty()).then_some(value),
            Field::Age => self.age = value,
            Field::Height => self.height = value,
            Field::Weight => self.weight = value,
            Field::GoalTime => self.goal_time = value,
        }
    }

    /// Overlay every non-empty field of `other` onto `self`.
    pub fn merge(&mut self, other: RawProfileInput) {
        for field in Field::ALL {
            let value = other.value(field);
            if !value.is_empty() {
                self.set(field, value.to_owned());
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Validation errors
// ---------------------------------------------------------------------------

/// Per-field validation messages. Never empty when returned as an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    /// Message tied to `field`, if that field is invalid.
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(field, msg)| format!("{field}: {msg}")).collect();
        write!(f, "invalid profile: {}", parts.join("; "))
    }
}

impl std::error::Error for FieldErrors {}

// ---------------------------------------------------------------------------
// Normalized profile
// ---------------------------------------------------------------------------

/// A validated runner profile. Only [`validate`] constructs one, and it is
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedProfile {
    sex: Sex,
    age_years: u32,
    height_cm: u32,
    weight_kg: f64,
    goal_seconds: u32,
}

impl NormalizedProfile {
    pub(crate) fn from_parts(
        sex: Sex,
        age_years: u32,
        height_cm: u32,
        weight_kg: f64,
        goal_seconds: u32,
    ) -> Self {
        Self {
            sex,
            age_years,
            height_cm,
            weight_kg,
            goal_seconds,
        }
    }

    pub fn sex(&self) -> Sex {
        self.sex
    }

    pub fn age_years(&self) -> u32 {
        self.age_years
    }

    pub fn height_cm(&self) -> u32 {
        self.height_cm
    }

    pub fn weight_kg(&self) -> f64 {
        self.weight_kg
    }

    /// Target finish time in seconds.
    pub fn goal_seconds(&self) -> u32 {
        self.goal_seconds
    }

    /// Target finish time rendered as `HH:MM:SS`.
    pub fn goal_time(&self) -> String {
        format_hms(self.goal_seconds)
    }

    pub fn body_mass_index(&self) -> f64 {
        crate::plan::body_mass_index(self.weight_kg, self.height_cm)
    }
}

/// Format seconds as `HH:MM:SS` (hours grow past two digits if needed).
pub fn format_hms(total: u32) -> String {
    let h = total / 3600;
    let m = (total % 3600) / 60;
    let s = total % 60;
    format!("{h:02}:{m:02}:{s:02}")
}

//! Field-by-field validation of raw form input.
//!
//! Every field is checked independently and all failures are collected in a
//! single pass, so the form can show one message per invalid field.

use tracing::debug;

use super::{Field, FieldErrors, NormalizedProfile, RawProfileInput, Sex};

const SEX_MESSAGE: &str = "Veuillez sélectionner votre genre (homme, femme ou autre).";
const AGE_MESSAGE: &str = "L'âge doit être un nombre entier supérieur à 0.";
const HEIGHT_MESSAGE: &str = "La taille doit être un nombre entier de centimètres supérieur à 0.";
const WEIGHT_MESSAGE: &str = "Le poids doit être un nombre de kilogrammes supérieur à 0.";
const GOAL_TIME_MESSAGE: &str = "L'objectif de temps doit respecter le format HH:MM:SS.";

/// Validate raw form input into a [`NormalizedProfile`].
///
/// Returns every invalid field's message when anything fails.
pub fn validate(raw: &RawProfileInput) -> Result<NormalizedProfile, FieldErrors> {
    let mut errors = FieldErrors::new();

    let sex = raw
        .sex
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .and_then(|s| s.parse::<Sex>().ok());
    if sex.is_none() {
        errors.insert(Field::Sex, SEX_MESSAGE);
    }

    let age = parse_positive_int(&raw.age);
    if age.is_none() {
        errors.insert(Field::Age, AGE_MESSAGE);
    }

    let height = parse_positive_int(&raw.height);
    if height.is_none() {
        errors.insert(Field::Height, HEIGHT_MESSAGE);
    }

    let weight = parse_positive_number(&raw.weight);
    if weight.is_none() {
        errors.insert(Field::Weight, WEIGHT_MESSAGE);
    }

    let goal_seconds = parse_goal_time(&raw.goal_time);
    if goal_seconds.is_none() {
        errors.insert(Field::GoalTime, GOAL_TIME_MESSAGE);
    }

    match (sex, age, height, weight, goal_seconds) {
        (Some(sex), Some(age), Some(height), Some(weight), Some(goal)) => {
            debug!(%sex, age, height, weight, goal_seconds = goal, "profile validated");
            Ok(NormalizedProfile::from_parts(sex, age, height, weight, goal))
        }
        _ => {
            debug!(invalid = errors.len(), "profile rejected");
            Err(errors)
        }
    }
}

/// Parse a strict `HH:MM:SS` string into seconds.
///
/// Only the shape is checked: two digits, colon, two digits, colon, two
/// digits. `"99:99:99"` is accepted.
pub fn parse_goal_time(s: &str) -> Option<u32> {
    let bytes = s.as_bytes();
    if bytes.len() != 8 || bytes[2] != b':' || bytes[5] != b':' {
        return None;
    }

    let pair = |i: usize| -> Option<u32> {
        let (hi, lo) = (bytes[i], bytes[i + 1]);
        if hi.is_ascii_digit() && lo.is_ascii_digit() {
            Some(u32::from(hi - b'0') * 10 + u32::from(lo - b'0'))
        } else {
            None
        }
    };

    let (h, m, sec) = (pair(0)?, pair(3)?, pair(6)?);
    Some(h * 3600 + m * 60 + sec)
}

fn parse_positive_int(s: &str) -> Option<u32> {
    s.trim().parse::<u32>().ok().filter(|v| *v > 0)
}

fn parse_positive_number(s: &str) -> Option<f64> {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_raw() -> RawProfileInput {
        RawProfileInput::new("femme", "28", "165", "58", "03:45:00")
    }

    fn errors_for(raw: &RawProfileInput) -> FieldErrors {
        validate(raw).expect_err("should be rejected")
    }

    #[test]
    fn accepts_valid_input() {
        let profile = validate(&valid_raw()).expect("should validate");
        assert_eq!(profile.sex(), Sex::Female);
        assert_eq!(profile.age_years(), 28);
        assert_eq!(profile.height_cm(), 165);
        assert_eq!(profile.weight_kg(), 58.0);
        assert_eq!(profile.goal_seconds(), 3 * 3600 + 45 * 60);
    }

    #[test]
    fn trims_numeric_fields() {
        let raw = RawProfileInput::new("homme", " 40 ", "180 ", " 72.5", "04:00:00");
        let profile = validate(&raw).expect("should validate");
        assert_eq!(profile.age_years(), 40);
        assert_eq!(profile.weight_kg(), 72.5);
    }

    #[test]
    fn missing_sex_is_an_error() {
        let mut raw = valid_raw();
        raw.sex = None;
        let errors = errors_for(&raw);
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec![Field::Sex]);

        raw.sex = Some("   ".to_owned());
        assert!(errors_for(&raw).contains(Field::Sex));
    }

    #[test]
    fn unknown_sex_is_an_error() {
        let mut raw = valid_raw();
        raw.sex = Some("robot".to_owned());
        assert!(errors_for(&raw).contains(Field::Sex));
    }

    #[test]
    fn rejects_empty_zero_negative_age() {
        for bad in ["", "0", "-3", "abc", "28.5"] {
            let mut raw = valid_raw();
            raw.age = bad.to_owned();
            let errors = errors_for(&raw);
            assert_eq!(
                errors.fields().collect::<Vec<_>>(),
                vec![Field::Age],
                "age {bad:?} should be the only error"
            );
        }
    }

    #[test]
    fn rejects_empty_zero_negative_height() {
        for bad in ["", "0", "-170"] {
            let mut raw = valid_raw();
            raw.height = bad.to_owned();
            let errors = errors_for(&raw);
            assert_eq!(errors.fields().collect::<Vec<_>>(), vec![Field::Height]);
        }
    }

    #[test]
    fn rejects_empty_zero_negative_weight() {
        for bad in ["", "0", "-58", "0.0", "NaN", "inf"] {
            let mut raw = valid_raw();
            raw.weight = bad.to_owned();
            let errors = errors_for(&raw);
            assert_eq!(
                errors.fields().collect::<Vec<_>>(),
                vec![Field::Weight],
                "weight {bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_malformed_goal_time() {
        for bad in ["3:30:00", "03:30", "abc", "3:3:0", "", " 03:30:00", "03-30-00", "03:30:0a"] {
            let mut raw = valid_raw();
            raw.goal_time = bad.to_owned();
            let errors = errors_for(&raw);
            assert_eq!(
                errors.fields().collect::<Vec<_>>(),
                vec![Field::GoalTime],
                "goal time {bad:?} should be rejected"
            );
            assert_eq!(errors.get(Field::GoalTime), Some(GOAL_TIME_MESSAGE));
        }
    }

    #[test]
    fn goal_time_has_no_range_check() {
        assert_eq!(parse_goal_time("99:99:99"), Some(99 * 3600 + 99 * 60 + 99));
        assert_eq!(parse_goal_time("00:00:00"), Some(0));
    }

    #[test]
    fn collects_all_errors_in_one_pass() {
        let raw = RawProfileInput::default();
        let errors = errors_for(&raw);
        assert_eq!(errors.len(), 5);
        for field in Field::ALL {
            assert!(errors.get(field).is_some(), "missing message for {field}");
        }
    }
}

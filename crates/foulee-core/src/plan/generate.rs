//! Plan generation: phase templates, demographic overlays, rest backstop.
//!
//! Pure logic: the same profile always yields the same plan.

use tracing::debug;

use crate::profile::{NormalizedProfile, format_hms};

use super::{PLAN_WEEKS, Phase, Session, SessionKind, TrainingPlan, WeeklyPlan};

/// Marathon distance used to derive the target pace.
const MARATHON_KM: f64 = 42.195;

/// Weekly step of the long-run progression, in minutes.
const LONG_RUN_STEP: u32 = 15;
const BUILD_LONG_RUN_BASE: u32 = 60;
const PEAK_LONG_RUN_BASE: u32 = 120;
const TAPER_LONG_RUN_BASE: u32 = 120;

/// Extra session appended after a week's base sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    /// Light strength or cross-training (older or heavier runners).
    Strength,
    /// Hill repeats or general physical prep (young, light runners).
    Hills,
}

impl Overlay {
    /// Pick the overlay for a profile, if any.
    ///
    /// Thresholds are literal: age over 45 or BMI of 26 and up gets
    /// strength work; otherwise under 30 with BMI under 22 gets hills.
    pub fn for_profile(profile: &NormalizedProfile) -> Option<Self> {
        let age = profile.age_years();
        let bmi = profile.body_mass_index();
        if age > 45 || bmi >= 26.0 {
            Some(Self::Strength)
        } else if age < 30 && bmi < 22.0 {
            Some(Self::Hills)
        } else {
            None
        }
    }

    /// Last week (inclusive) the overlay applies to.
    pub fn last_week(&self) -> u8 {
        match self {
            Self::Strength => 14,
            Self::Hills => 12,
        }
    }

    fn session(&self) -> Session {
        match self {
            Self::Strength => Session::timed(
                SessionKind::Strength,
                30,
                "Renforcement musculaire ou cross-training léger 30 min",
            ),
            Self::Hills => Session::new(
                SessionKind::Hills,
                "Côtes ou préparation physique générale : 8 × 30 s en montée",
            ),
        }
    }
}

/// Body-mass index in kg/m². Zero when the height is zero.
pub fn body_mass_index(weight_kg: f64, height_cm: u32) -> f64 {
    if height_cm == 0 {
        return 0.0;
    }
    let meters = f64::from(height_cm) / 100.0;
    weight_kg / (meters * meters)
}

/// Generate the 16-week plan for a validated profile.
pub fn generate_plan(profile: &NormalizedProfile) -> TrainingPlan {
    let overlay = Overlay::for_profile(profile);
    let weeks = (1..=PLAN_WEEKS)
        .map(|week| build_week(week, profile, overlay))
        .collect();

    debug!(
        age = profile.age_years(),
        bmi = profile.body_mass_index(),
        ?overlay,
        "plan generated"
    );
    TrainingPlan::new(weeks)
}

fn build_week(week: u8, profile: &NormalizedProfile, overlay: Option<Overlay>) -> WeeklyPlan {
    let mut sessions = base_sessions(week, profile);

    if let Some(overlay) = overlay.filter(|o| week <= o.last_week()) {
        sessions.push(overlay.session());
    }

    if !sessions.iter().any(Session::is_rest) {
        sessions.push(Session::new(SessionKind::Rest, "Jour de repos"));
    }

    WeeklyPlan::new(week, sessions)
}

fn base_sessions(week: u8, profile: &NormalizedProfile) -> Vec<Session> {
    let w = u32::from(week);
    let pace = pace_hint(profile.goal_seconds());

    match Phase::for_week(week) {
        Phase::Foundation => vec![
            Session::new(SessionKind::EasyRun, "Footing facile 30–40 min"),
            Session::new(SessionKind::LongRun, "Sortie longue 45–60 min"),
        ],
        Phase::Build => {
            let long = BUILD_LONG_RUN_BASE + LONG_RUN_STEP * (w - 4);
            vec![
                Session::timed(SessionKind::EasyRun, 40, "Footing facile 40 min"),
                Session::new(
                    SessionKind::Intervals,
                    "Fractionné : 8 × 400 m rapides, récupération 1 min 30",
                ),
                Session::timed(SessionKind::LongRun, long, format!("Sortie longue {long} min")),
            ]
        }
        Phase::Peak => {
            let long = PEAK_LONG_RUN_BASE + LONG_RUN_STEP * (w - 8);
            vec![
                Session::timed(SessionKind::EasyRun, 45, "Footing facile 45 min"),
                Session::new(
                    SessionKind::Threshold,
                    format!("Seuil : 3 × 15 min à allure marathon{pace}"),
                ),
                Session::timed(
                    SessionKind::VeryLongRun,
                    long,
                    format!("Sortie très longue {long} min"),
                ),
            ]
        }
        Phase::Taper => {
            let long = TAPER_LONG_RUN_BASE - LONG_RUN_STEP * (w - 12);
            vec![
                Session::timed(SessionKind::EasyRun, 35, "Footing facile 35 min"),
                Session::new(
                    SessionKind::RacePace,
                    format!("Allure marathon : 2 × 10 min{pace}"),
                ),
                Session::timed(SessionKind::LongRun, long, format!("Sortie longue {long} min")),
            ]
        }
        Phase::Race => vec![
            Session::timed(SessionKind::ShakeOut, 20, "Footing très léger 20 min"),
            Session::new(SessionKind::Rest, "Repos complet"),
            Session::new(SessionKind::Rest, "Repos complet"),
            Session::new(SessionKind::Race, race_day(profile.goal_seconds())),
        ],
    }
}

/// Target pace suffix, empty when there is no goal time.
fn pace_hint(goal_seconds: u32) -> String {
    if goal_seconds == 0 {
        return String::new();
    }
    let per_km = (f64::from(goal_seconds) / MARATHON_KM).round() as u32;
    format!(" (allure cible {}:{:02}/km)", per_km / 60, per_km % 60)
}

fn race_day(goal_seconds: u32) -> String {
    if goal_seconds == 0 {
        "Jour de course : marathon".to_owned()
    } else {
        format!("Jour de course : marathon (objectif {})", format_hms(goal_seconds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{RawProfileInput, validate};

    fn profile(age: &str, height: &str, weight: &str) -> NormalizedProfile {
        validate(&RawProfileInput::new("autre", age, height, weight, "03:30:00"))
            .expect("fixture should validate")
    }

    #[test]
    fn bmi_formula() {
        let bmi = body_mass_index(58.0, 165);
        assert!((bmi - 21.30).abs() < 0.01, "got {bmi}");
        assert_eq!(body_mass_index(70.0, 0), 0.0);
    }

    #[test]
    fn overlay_selection_thresholds() {
        // Age over 45.
        assert_eq!(Overlay::for_profile(&profile("46", "180", "70")), Some(Overlay::Strength));
        // Exactly 45 with normal BMI: no overlay.
        assert_eq!(Overlay::for_profile(&profile("45", "180", "70")), None);
        // BMI >= 26 wins even for a young runner.
        assert_eq!(Overlay::for_profile(&profile("25", "170", "80")), Some(Overlay::Strength));
        // Young and light.
        assert_eq!(Overlay::for_profile(&profile("29", "180", "65")), Some(Overlay::Hills));
        // 30 is not under 30.
        assert_eq!(Overlay::for_profile(&profile("30", "180", "65")), None);
        // Young but BMI between 22 and 26.
        assert_eq!(Overlay::for_profile(&profile("25", "175", "72")), None);
    }

    #[test]
    fn overlay_bmi_boundaries_are_exact() {
        // 2.00 m keeps the arithmetic exact: 104 kg is BMI 26.0, 88 kg is 22.0.
        assert_eq!(body_mass_index(104.0, 200), 26.0);
        assert_eq!(body_mass_index(88.0, 200), 22.0);

        assert_eq!(Overlay::for_profile(&profile("35", "200", "104")), Some(Overlay::Strength));
        assert_eq!(Overlay::for_profile(&profile("35", "200", "103.9")), None);

        assert_eq!(Overlay::for_profile(&profile("25", "200", "88")), None);
        assert_eq!(Overlay::for_profile(&profile("25", "200", "87.9")), Some(Overlay::Hills));
    }

    #[test]
    fn build_long_run_progression() {
        let plan = generate_plan(&profile("35", "175", "70"));
        let minutes: Vec<u32> = (5..=8)
            .map(|w| plan.week(w).unwrap().long_run_minutes().unwrap())
            .collect();
        assert_eq!(minutes, vec![75, 90, 105, 120]);
    }

    #[test]
    fn peak_and_taper_long_runs() {
        let plan = generate_plan(&profile("35", "175", "70"));
        let peak: Vec<u32> = (9..=12)
            .map(|w| plan.week(w).unwrap().long_run_minutes().unwrap())
            .collect();
        assert_eq!(peak, vec![135, 150, 165, 180]);
        assert_eq!(plan.week(13).unwrap().long_run_minutes(), Some(105));
        assert_eq!(plan.week(14).unwrap().long_run_minutes(), Some(90));
    }

    #[test]
    fn backstop_appends_single_rest_day() {
        let plan = generate_plan(&profile("35", "175", "70"));
        for week in plan.iter().filter(|w| w.week() <= 14) {
            assert_eq!(week.count(SessionKind::Rest), 1, "week {}", week.week());
            assert!(week.sessions().last().unwrap().is_rest());
        }
        for week in plan.iter().filter(|w| w.week() >= 15) {
            assert_eq!(week.count(SessionKind::Rest), 2, "week {}", week.week());
        }
    }

    #[test]
    fn overlay_precedes_backstop() {
        let plan = generate_plan(&profile("50", "175", "70"));
        let kinds: Vec<SessionKind> = plan.week(3).unwrap().sessions().iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SessionKind::EasyRun,
                SessionKind::LongRun,
                SessionKind::Strength,
                SessionKind::Rest
            ]
        );
    }

    #[test]
    fn pace_hint_uses_goal_time() {
        // 3:30:00 over 42.195 km is about 4:59/km.
        assert_eq!(pace_hint(3 * 3600 + 30 * 60), " (allure cible 4:59/km)");
        assert_eq!(pace_hint(0), "");
    }

    #[test]
    fn race_day_mentions_goal() {
        assert_eq!(race_day(3 * 3600 + 45 * 60), "Jour de course : marathon (objectif 03:45:00)");
        assert_eq!(race_day(0), "Jour de course : marathon");
    }
}

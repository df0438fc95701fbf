//! Projection tools
//!
//! Run the engine for one direction and shape the outcome for the caller.
//! Distinguished engine outcomes (unreachable, diverging, ...) are successful
//! tool calls carrying an explanation; only database failures are errors.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::calculator::{
    normalize_request, solve, Direction, Limits, ProjectionError, ProjectionResult, RawProfile,
};
use crate::db::Database;
use super::validate_profile_name;
use crate::models::{WeightLossProfile, WeightLossProfileSave};

/// Response for calculate_target_date / calculate_calorie_intake / update_profile
#[derive(Debug, Serialize)]
pub struct ProjectionResponse {
    pub success: bool,
    /// `target_date`, `daily_calorie_intake`, or the outcome name on failure
    pub outcome: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection: Option<ProjectionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ProjectionError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_profile: Option<String>,
}

impl ProjectionResponse {
    fn failed(error: ProjectionError) -> Self {
        tracing::warn!(outcome = error.kind(), "projection not solved: {}", error);
        Self {
            success: false,
            outcome: error.kind().to_string(),
            message: error.to_string(),
            projection: None,
            error: Some(error),
            saved_profile: None,
        }
    }

    fn solved(projection: ProjectionResult, saved_profile: Option<String>) -> Self {
        let (outcome, message) = match &projection {
            ProjectionResult::TargetDate(p) => (
                "target_date",
                format!(
                    "Target weight reached on {} ({:.1} days at a net {:.0} kcal/day deficit)",
                    p.target_date.format("%Y-%m-%d"),
                    p.days_required,
                    p.net_daily_deficit_kcal
                ),
            ),
            ProjectionResult::DailyCalorieIntake(p) => (
                "daily_calorie_intake",
                format!(
                    "Eat {:.0} kcal/day to reach the target weight by {} ({:.1} days, TDEE {:.0} kcal/day)",
                    p.daily_calorie_intake_kcal,
                    p.target_date.format("%Y-%m-%d"),
                    p.days_remaining,
                    p.energy.tdee_kcal
                ),
            ),
        };
        Self {
            success: true,
            outcome: outcome.to_string(),
            message,
            projection: Some(projection),
            error: None,
            saved_profile,
        }
    }
}

/// Solve for the date the target weight is reached at the given intake
pub fn calculate_target_date(
    db: &Database,
    raw: &RawProfile,
    save_as: Option<&str>,
    now: DateTime<Utc>,
    limits: &Limits,
) -> Result<ProjectionResponse, String> {
    project(db, raw, Direction::TargetDate, save_as, now, limits)
}

/// Solve for the daily intake that reaches the target weight by the given date
pub fn calculate_calorie_intake(
    db: &Database,
    raw: &RawProfile,
    save_as: Option<&str>,
    now: DateTime<Utc>,
    limits: &Limits,
) -> Result<ProjectionResponse, String> {
    project(db, raw, Direction::RequiredIntake, save_as, now, limits)
}

/// Normalize, solve, and optionally save under `save_as`
pub(crate) fn project(
    db: &Database,
    raw: &RawProfile,
    direction: Direction,
    save_as: Option<&str>,
    now: DateTime<Utc>,
    limits: &Limits,
) -> Result<ProjectionResponse, String> {
    let save_as = save_as.map(validate_profile_name).transpose()?;

    let (profile, request) = match normalize_request(raw, direction) {
        Ok(normalized) => normalized,
        Err(e) => return Ok(ProjectionResponse::failed(e)),
    };

    let projection = match solve(&profile, &request, now, limits) {
        Ok(projection) => projection,
        Err(e) => return Ok(ProjectionResponse::failed(e)),
    };

    let Some(name) = save_as else {
        return Ok(ProjectionResponse::solved(projection, None));
    };

    let (daily_calorie_intake, target_date) = match &projection {
        ProjectionResult::TargetDate(p) => (p.daily_calorie_intake_kcal, p.target_date),
        ProjectionResult::DailyCalorieIntake(p) => (p.daily_calorie_intake_kcal, p.target_date),
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let saved = WeightLossProfile::save(
        &conn,
        name,
        &WeightLossProfileSave {
            profile: &profile,
            daily_calorie_intake,
            target_date,
        },
    )
    .map_err(|e| format!("Failed to save profile: {}", e))?;

    Ok(ProjectionResponse::solved(projection, Some(saved.name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use chrono::{TimeDelta, TimeZone};
    use serde_json::json;

    fn db() -> Database {
        let db = Database::in_memory().unwrap();
        db.with_conn(run_migrations).unwrap();
        db
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
    }

    fn raw() -> RawProfile {
        serde_json::from_value(json!({
            "age": 30,
            "sex": "male",
            "height_feet": 5,
            "height_inches": 10,
            "current_weight_lbs": 200,
            "target_weight_lbs": 180,
            "activity_level": "moderate",
            "daily_calorie_intake": 2000
        }))
        .unwrap()
    }

    #[test]
    fn test_target_date_without_saving() {
        let db = db();
        let response =
            calculate_target_date(&db, &raw(), None, now(), &Limits::default()).unwrap();
        assert!(response.success);
        assert_eq!(response.outcome, "target_date");
        assert!(response.message.contains("2026-03-19"));
        assert!(response.saved_profile.is_none());

        let count = db.with_conn(WeightLossProfile::count).unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_target_date_saves_profile() {
        let db = db();
        let response =
            calculate_target_date(&db, &raw(), Some("alex"), now(), &Limits::default()).unwrap();
        assert_eq!(response.saved_profile.as_deref(), Some("alex"));

        let stored = db
            .with_conn(|conn| WeightLossProfile::get_by_name(conn, "alex"))
            .unwrap()
            .unwrap();
        assert_eq!(stored.daily_calorie_intake, Some(2000.0));
        assert!(stored.target_date.unwrap().starts_with("2026-03-19"));
    }

    #[test]
    fn test_calorie_intake_saves_solved_intake() {
        let db = db();
        let mut raw = raw();
        raw.daily_calorie_intake = None;
        raw.target_date = Some(json!((now() + TimeDelta::days(60)).to_rfc3339()));

        let response =
            calculate_calorie_intake(&db, &raw, Some("alex"), now(), &Limits::default()).unwrap();
        assert!(response.success);
        assert_eq!(response.outcome, "daily_calorie_intake");

        let stored = db
            .with_conn(|conn| WeightLossProfile::get_by_name(conn, "alex"))
            .unwrap()
            .unwrap();
        let intake = stored.daily_calorie_intake.unwrap();
        assert!((intake - 1737.16).abs() < 0.01);
    }

    #[test]
    fn test_distinguished_outcome_is_not_saved() {
        let db = db();
        let mut raw = raw();
        raw.daily_calorie_intake = Some(json!(4000));

        let response =
            calculate_target_date(&db, &raw, Some("alex"), now(), &Limits::default()).unwrap();
        assert!(!response.success);
        assert_eq!(response.outcome, "diverging_goal");
        assert!(response.projection.is_none());

        let stored = db
            .with_conn(|conn| WeightLossProfile::get_by_name(conn, "alex"))
            .unwrap();
        assert!(stored.is_none());
    }

    #[test]
    fn test_invalid_input_reported() {
        let db = db();
        let mut raw = raw();
        raw.activity_level = Some(json!("unknown"));

        let response =
            calculate_target_date(&db, &raw, None, now(), &Limits::default()).unwrap();
        assert!(!response.success);
        assert_eq!(response.outcome, "invalid_input");
        assert!(response.message.contains("activity_level"));
    }

    #[test]
    fn test_past_target_date() {
        let db = db();
        let mut raw = raw();
        raw.target_date = Some(json!("2025-12-31"));

        let response =
            calculate_calorie_intake(&db, &raw, None, now(), &Limits::default()).unwrap();
        assert_eq!(response.outcome, "invalid_horizon");
    }

    #[test]
    fn test_saved_name_is_trimmed() {
        let db = db();
        let response =
            calculate_target_date(&db, &raw(), Some(" alex "), now(), &Limits::default()).unwrap();
        assert_eq!(response.saved_profile.as_deref(), Some("alex"));

        let response = crate::tools::profiles::update_profile(
            &db,
            "alex",
            &raw(),
            now(),
            &Limits::default(),
        )
        .unwrap();
        assert!(response.success);
        assert_eq!(db.with_conn(WeightLossProfile::count).unwrap(), 1);
    }

    #[test]
    fn test_blank_save_name_rejected() {
        let db = db();
        for name in ["", "   "] {
            let result = calculate_target_date(&db, &raw(), Some(name), now(), &Limits::default());
            assert!(result.is_err(), "{:?} was accepted", name);
        }
        assert_eq!(db.with_conn(WeightLossProfile::count).unwrap(), 0);
    }
}

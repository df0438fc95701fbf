//! Input normalization
//!
//! Turns a loosely typed profile (numbers or numeric strings, as submitted by
//! a form) into the canonical types the energy model needs. Every failure is
//! reported before any arithmetic runs.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::energy::{ActivityLevel, Sex};
use super::error::{InputIssue, ProjectionError, SolveResult};

/// Profile as supplied by the caller, before validation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawProfile {
    pub age: Option<Value>,
    pub sex: Option<Value>,
    #[serde(alias = "heightInFeet")]
    pub height_feet: Option<Value>,
    #[serde(alias = "heightInInches")]
    pub height_inches: Option<Value>,
    #[serde(alias = "currentWeightInPounds")]
    pub current_weight_lbs: Option<Value>,
    #[serde(alias = "targetWeightInPounds")]
    pub target_weight_lbs: Option<Value>,
    #[serde(alias = "activityLevel")]
    pub activity_level: Option<Value>,
    #[serde(alias = "dailyCalorieIntake")]
    pub daily_calorie_intake: Option<Value>,
    #[serde(alias = "targetDate")]
    pub target_date: Option<Value>,
}

/// Validated biometric profile in caller units (pounds, feet/inches)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileInput {
    pub age_years: u32,
    pub sex: Sex,
    pub height_feet: u32,
    pub height_inches: u32,
    pub current_weight_lbs: f64,
    pub target_weight_lbs: f64,
    pub activity_level: ActivityLevel,
}

/// Which quantity is being solved for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Given an intake, find the date
    TargetDate,
    /// Given a date, find the intake
    RequiredIntake,
}

/// The known quantity for one projection
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "solve_for", rename_all = "snake_case")]
pub enum ProjectionRequest {
    TargetDate { daily_calorie_intake: f64 },
    RequiredIntake { target_date: DateTime<Utc> },
}

/// Normalize the biometric part of a raw profile
pub fn normalize_profile(raw: &RawProfile) -> SolveResult<ProfileInput> {
    let age_years = whole_number("age", raw.age.as_ref(), 1)?;
    let sex = category("sex", raw.sex.as_ref(), Sex::ACCEPTED, Sex::from_str)?;
    let height_feet = whole_number("height_feet", raw.height_feet.as_ref(), 0)?;
    let height_inches = whole_number("height_inches", raw.height_inches.as_ref(), 0)?;
    if height_inches > 11 {
        return Err(ProjectionError::invalid(
            "height_inches",
            InputIssue::OutOfRange {
                value: f64::from(height_inches),
                min: 0.0,
                max: Some(11.0),
            },
        ));
    }
    let current_weight_lbs = non_negative("current_weight_lbs", raw.current_weight_lbs.as_ref())?;
    let target_weight_lbs = non_negative("target_weight_lbs", raw.target_weight_lbs.as_ref())?;
    let activity_level = category(
        "activity_level",
        raw.activity_level.as_ref(),
        ActivityLevel::ACCEPTED,
        ActivityLevel::from_str,
    )?;

    Ok(ProfileInput {
        age_years,
        sex,
        height_feet,
        height_inches,
        current_weight_lbs,
        target_weight_lbs,
        activity_level,
    })
}

/// Normalize a daily intake in kcal/day
pub fn normalize_intake(value: Option<&Value>) -> SolveResult<f64> {
    non_negative("daily_calorie_intake", value)
}

/// Normalize a target date
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM[:SS]` (read as UTC), a bare
/// `YYYY-MM-DD` (midnight UTC), or epoch milliseconds.
pub fn normalize_target_date(value: Option<&Value>) -> SolveResult<DateTime<Utc>> {
    const FIELD: &str = "target_date";
    match value {
        None | Some(Value::Null) => Err(ProjectionError::invalid(FIELD, InputIssue::Missing)),
        Some(Value::String(s)) if s.trim().is_empty() => {
            Err(ProjectionError::invalid(FIELD, InputIssue::Missing))
        }
        Some(Value::String(s)) => parse_date(s).ok_or_else(|| {
            ProjectionError::invalid(FIELD, InputIssue::BadDate { value: s.clone() })
        }),
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .ok_or_else(|| {
                ProjectionError::invalid(FIELD, InputIssue::BadDate { value: n.to_string() })
            }),
        Some(other) => Err(ProjectionError::invalid(
            FIELD,
            InputIssue::BadDate { value: other.to_string() },
        )),
    }
}

/// Normalize a full request for one direction
///
/// Only the field the direction needs is read; the other may be absent.
pub fn normalize_request(
    raw: &RawProfile,
    direction: Direction,
) -> SolveResult<(ProfileInput, ProjectionRequest)> {
    let profile = normalize_profile(raw)?;
    let request = match direction {
        Direction::TargetDate => ProjectionRequest::TargetDate {
            daily_calorie_intake: normalize_intake(raw.daily_calorie_intake.as_ref())?,
        },
        Direction::RequiredIntake => ProjectionRequest::RequiredIntake {
            target_date: normalize_target_date(raw.target_date.as_ref())?,
        },
    };
    Ok((profile, request))
}

fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let trimmed = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Coerce a JSON number or numeric string to a finite f64
fn number(field: &'static str, value: Option<&Value>) -> SolveResult<f64> {
    let parsed = match value {
        None | Some(Value::Null) => {
            return Err(ProjectionError::invalid(field, InputIssue::Missing));
        }
        Some(Value::String(s)) if s.trim().is_empty() => {
            return Err(ProjectionError::invalid(field, InputIssue::Missing));
        }
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(Value::Number(n)) => n.as_f64(),
        Some(_) => None,
    };

    match parsed {
        Some(n) if n.is_finite() => Ok(n),
        _ => Err(ProjectionError::invalid(
            field,
            InputIssue::NotNumeric {
                value: value.map(display_value).unwrap_or_default(),
            },
        )),
    }
}

fn non_negative(field: &'static str, value: Option<&Value>) -> SolveResult<f64> {
    let n = number(field, value)?;
    if n < 0.0 {
        return Err(ProjectionError::invalid(
            field,
            InputIssue::OutOfRange { value: n, min: 0.0, max: None },
        ));
    }
    Ok(n)
}

fn whole_number(field: &'static str, value: Option<&Value>, min: u32) -> SolveResult<u32> {
    let n = number(field, value)?;
    if n.fract() != 0.0 {
        return Err(ProjectionError::invalid(field, InputIssue::NotInteger { value: n }));
    }
    if n < f64::from(min) || n > f64::from(u32::MAX) {
        return Err(ProjectionError::invalid(
            field,
            InputIssue::OutOfRange {
                value: n,
                min: f64::from(min),
                max: None,
            },
        ));
    }
    Ok(n as u32)
}

fn category<T>(
    field: &'static str,
    value: Option<&Value>,
    expected: &'static [&'static str],
    parse: fn(&str) -> Option<T>,
) -> SolveResult<T> {
    match value {
        None | Some(Value::Null) => Err(ProjectionError::invalid(field, InputIssue::Missing)),
        Some(Value::String(s)) if s.trim().is_empty() => {
            Err(ProjectionError::invalid(field, InputIssue::Missing))
        }
        Some(Value::String(s)) => parse(s).ok_or_else(|| {
            ProjectionError::invalid(
                field,
                InputIssue::UnknownCategory { value: s.clone(), expected },
            )
        }),
        Some(other) => Err(ProjectionError::invalid(
            field,
            InputIssue::UnknownCategory { value: other.to_string(), expected },
        )),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn form_profile() -> RawProfile {
        serde_json::from_value(json!({
            "age": "30",
            "sex": "male",
            "heightInFeet": "5",
            "heightInInches": "10",
            "currentWeightInPounds": "200",
            "targetWeightInPounds": "180",
            "activityLevel": "moderate",
            "dailyCalorieIntake": "2000"
        }))
        .unwrap()
    }

    fn issue_for(err: ProjectionError) -> (&'static str, InputIssue) {
        match err {
            ProjectionError::InvalidInput { field, issue } => (field, issue),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_normalize_string_fields() {
        let profile = normalize_profile(&form_profile()).unwrap();
        assert_eq!(profile.age_years, 30);
        assert_eq!(profile.sex, Sex::Male);
        assert_eq!(profile.height_feet, 5);
        assert_eq!(profile.height_inches, 10);
        assert_eq!(profile.current_weight_lbs, 200.0);
        assert_eq!(profile.target_weight_lbs, 180.0);
        assert_eq!(profile.activity_level, ActivityLevel::Moderate);
    }

    #[test]
    fn test_normalize_numeric_fields() {
        let raw = RawProfile {
            age: Some(json!(41)),
            sex: Some(json!("female")),
            height_feet: Some(json!(5)),
            height_inches: Some(json!(4)),
            current_weight_lbs: Some(json!(150.5)),
            target_weight_lbs: Some(json!(140)),
            activity_level: Some(json!("extra heavy")),
            ..Default::default()
        };
        let profile = normalize_profile(&raw).unwrap();
        assert_eq!(profile.current_weight_lbs, 150.5);
        assert_eq!(profile.activity_level, ActivityLevel::ExtraHeavy);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let raw = form_profile();
        let before = raw.clone();
        normalize_request(&raw, Direction::TargetDate).unwrap();
        assert_eq!(raw, before);
    }

    #[test]
    fn test_missing_field() {
        let mut raw = form_profile();
        raw.age = None;
        let (field, issue) = issue_for(normalize_profile(&raw).unwrap_err());
        assert_eq!(field, "age");
        assert_eq!(issue, InputIssue::Missing);

        raw.age = Some(json!("  "));
        let (_, issue) = issue_for(normalize_profile(&raw).unwrap_err());
        assert_eq!(issue, InputIssue::Missing);
    }

    #[test]
    fn test_non_numeric_field() {
        let mut raw = form_profile();
        raw.current_weight_lbs = Some(json!("heavy-ish"));
        let (field, issue) = issue_for(normalize_profile(&raw).unwrap_err());
        assert_eq!(field, "current_weight_lbs");
        assert_eq!(issue, InputIssue::NotNumeric { value: "heavy-ish".to_string() });

        raw.current_weight_lbs = Some(json!("NaN"));
        let (_, issue) = issue_for(normalize_profile(&raw).unwrap_err());
        assert!(matches!(issue, InputIssue::NotNumeric { .. }));

        raw.current_weight_lbs = Some(json!(true));
        let (_, issue) = issue_for(normalize_profile(&raw).unwrap_err());
        assert!(matches!(issue, InputIssue::NotNumeric { .. }));
    }

    #[test]
    fn test_integer_and_range_checks() {
        let mut raw = form_profile();
        raw.age = Some(json!(30.5));
        let (_, issue) = issue_for(normalize_profile(&raw).unwrap_err());
        assert_eq!(issue, InputIssue::NotInteger { value: 30.5 });

        raw.age = Some(json!(0));
        let (field, issue) = issue_for(normalize_profile(&raw).unwrap_err());
        assert_eq!(field, "age");
        assert!(matches!(issue, InputIssue::OutOfRange { .. }));

        let mut raw = form_profile();
        raw.height_inches = Some(json!(12));
        let (field, _) = issue_for(normalize_profile(&raw).unwrap_err());
        assert_eq!(field, "height_inches");

        let mut raw = form_profile();
        raw.target_weight_lbs = Some(json!(-5));
        let (field, _) = issue_for(normalize_profile(&raw).unwrap_err());
        assert_eq!(field, "target_weight_lbs");
    }

    #[test]
    fn test_unknown_categories_rejected() {
        let mut raw = form_profile();
        raw.activity_level = Some(json!("couch potato"));
        let (field, issue) = issue_for(normalize_profile(&raw).unwrap_err());
        assert_eq!(field, "activity_level");
        assert!(matches!(issue, InputIssue::UnknownCategory { .. }));

        let mut raw = form_profile();
        raw.sex = Some(json!(1));
        let (field, _) = issue_for(normalize_profile(&raw).unwrap_err());
        assert_eq!(field, "sex");
    }

    #[test]
    fn test_request_requires_direction_field() {
        let mut raw = form_profile();
        let (_, request) = normalize_request(&raw, Direction::TargetDate).unwrap();
        assert_eq!(request, ProjectionRequest::TargetDate { daily_calorie_intake: 2000.0 });

        let (field, _) = issue_for(normalize_request(&raw, Direction::RequiredIntake).unwrap_err());
        assert_eq!(field, "target_date");

        raw.daily_calorie_intake = None;
        raw.target_date = Some(json!("2026-12-25"));
        let (_, request) = normalize_request(&raw, Direction::RequiredIntake).unwrap();
        assert!(matches!(request, ProjectionRequest::RequiredIntake { .. }));
    }

    #[test]
    fn test_target_date_formats() {
        let midnight = Utc.with_ymd_and_hms(2026, 12, 25, 0, 0, 0).unwrap();
        assert_eq!(normalize_target_date(Some(&json!("2026-12-25"))).unwrap(), midnight);
        assert_eq!(
            normalize_target_date(Some(&json!("2026-12-25T00:00:00Z"))).unwrap(),
            midnight
        );
        assert_eq!(
            normalize_target_date(Some(&json!("2026-12-25T01:00:00+01:00"))).unwrap(),
            midnight
        );
        assert_eq!(
            normalize_target_date(Some(&json!("2026-12-25T08:30"))).unwrap(),
            Utc.with_ymd_and_hms(2026, 12, 25, 8, 30, 0).unwrap()
        );
        assert_eq!(
            normalize_target_date(Some(&json!(midnight.timestamp_millis()))).unwrap(),
            midnight
        );
    }

    #[test]
    fn test_bad_target_date() {
        let (_, issue) = issue_for(normalize_target_date(Some(&json!("next tuesday"))).unwrap_err());
        assert_eq!(issue, InputIssue::BadDate { value: "next tuesday".to_string() });
        let (_, issue) = issue_for(normalize_target_date(None).unwrap_err());
        assert_eq!(issue, InputIssue::Missing);
    }
}

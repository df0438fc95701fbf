//! Profile management tools

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::calculator::{Direction, Limits, RawProfile};
use crate::db::Database;
use crate::models::WeightLossProfile;

use super::calculator::{project, ProjectionResponse};
use super::validate_profile_name;

/// Profile summary for listing
#[derive(Debug, Serialize)]
pub struct ProfileSummary {
    pub id: i64,
    pub name: String,
    pub complete: bool,
    pub daily_calorie_intake: Option<f64>,
    pub target_date: Option<String>,
    pub updated_at: String,
}

impl From<&WeightLossProfile> for ProfileSummary {
    fn from(profile: &WeightLossProfile) -> Self {
        Self {
            id: profile.id,
            name: profile.name.clone(),
            complete: profile.is_complete(),
            daily_calorie_intake: profile.daily_calorie_intake,
            target_date: profile.target_date.clone(),
            updated_at: profile.updated_at.clone(),
        }
    }
}

/// Response for list_profiles
#[derive(Debug, Serialize)]
pub struct ListProfilesResponse {
    pub profiles: Vec<ProfileSummary>,
    pub total: usize,
}

/// Response for delete operations
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub deleted_name: String,
}

/// Create an empty profile (no-op if it already exists)
pub fn create_profile(db: &Database, name: &str) -> Result<WeightLossProfile, String> {
    let name = validate_profile_name(name)?;
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    WeightLossProfile::create_empty(&conn, name)
        .map_err(|e| format!("Failed to create profile: {}", e))
}

/// Get a stored profile
pub fn get_profile(db: &Database, name: &str) -> Result<Option<WeightLossProfile>, String> {
    let name = validate_profile_name(name)?;
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    WeightLossProfile::get_by_name(&conn, name).map_err(|e| format!("Failed to get profile: {}", e))
}

/// List all stored profiles
pub fn list_profiles(db: &Database) -> Result<ListProfilesResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let profiles =
        WeightLossProfile::list(&conn).map_err(|e| format!("Failed to list profiles: {}", e))?;

    let summaries: Vec<ProfileSummary> = profiles.iter().map(ProfileSummary::from).collect();
    Ok(ListProfilesResponse {
        total: summaries.len(),
        profiles: summaries,
    })
}

/// Delete a stored profile
pub fn delete_profile(db: &Database, name: &str) -> Result<DeleteResponse, String> {
    let name = validate_profile_name(name)?;
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let deleted = WeightLossProfile::delete(&conn, name)
        .map_err(|e| format!("Failed to delete profile: {}", e))?;
    if !deleted {
        return Err(format!("Profile not found: {}", name));
    }
    Ok(DeleteResponse {
        success: true,
        deleted_name: name.to_string(),
    })
}

/// Replace an existing profile's inputs and recompute its target date
///
/// The profile must already exist; the new values are saved only if the
/// projection produces a date.
pub fn update_profile(
    db: &Database,
    name: &str,
    raw: &RawProfile,
    now: DateTime<Utc>,
    limits: &Limits,
) -> Result<ProjectionResponse, String> {
    let name = validate_profile_name(name)?;
    if get_profile(db, name)?.is_none() {
        return Err(format!("Profile not found: {}", name));
    }
    project(db, raw, Direction::TargetDate, Some(name), now, limits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use chrono::TimeZone;
    use serde_json::json;

    fn db() -> Database {
        let db = Database::in_memory().unwrap();
        db.with_conn(run_migrations).unwrap();
        db
    }

    fn raw(intake: f64) -> RawProfile {
        serde_json::from_value(json!({
            "age": "45",
            "sex": "female",
            "heightInFeet": "5",
            "heightInInches": "4",
            "currentWeightInPounds": "150",
            "targetWeightInPounds": "140",
            "activityLevel": "sedentary",
            "dailyCalorieIntake": intake
        }))
        .unwrap()
    }

    #[test]
    fn test_create_and_list() {
        let db = db();
        create_profile(&db, " alex ").unwrap();
        create_profile(&db, "sam").unwrap();
        create_profile(&db, "alex").unwrap();

        let listed = list_profiles(&db).unwrap();
        assert_eq!(listed.total, 2);
        assert!(listed.profiles.iter().all(|p| !p.complete));
        assert!(create_profile(&db, "   ").is_err());
    }

    #[test]
    fn test_update_requires_existing_profile() {
        let db = db();
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let err = update_profile(&db, "ghost", &raw(1200.0), now, &Limits::default()).unwrap_err();
        assert!(err.contains("ghost"));
    }

    #[test]
    fn test_update_recomputes_target_date() {
        let db = db();
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        create_profile(&db, "alex").unwrap();

        // TDEE = 1310.388 × 1.2; 35000 kcal at a ~372.5 kcal/day deficit
        let response = update_profile(&db, "alex", &raw(1200.0), now, &Limits::default()).unwrap();
        assert!(response.success);

        let stored = get_profile(&db, "alex").unwrap().unwrap();
        assert!(stored.is_complete());
        assert_eq!(stored.sex.as_deref(), Some("female"));
        assert!(stored.target_date.is_some());
    }

    #[test]
    fn test_failed_update_keeps_previous_values() {
        let db = db();
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        create_profile(&db, "alex").unwrap();
        update_profile(&db, "alex", &raw(1200.0), now, &Limits::default()).unwrap();

        let response = update_profile(&db, "alex", &raw(2500.0), now, &Limits::default()).unwrap();
        assert_eq!(response.outcome, "diverging_goal");

        let stored = get_profile(&db, "alex").unwrap().unwrap();
        assert_eq!(stored.daily_calorie_intake, Some(1200.0));
    }

    #[test]
    fn test_delete_profile() {
        let db = db();
        create_profile(&db, "alex").unwrap();
        assert!(delete_profile(&db, "alex").unwrap().success);
        assert!(delete_profile(&db, "alex").is_err());
    }
}

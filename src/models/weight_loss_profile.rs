//! Weight-loss profile model
//!
//! The inputs a user last projected with, and the result of that projection.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::calculator::{ProfileInput, RawProfile};
use crate::db::{DbError, DbResult};

/// Stored profile. Fields are optional until the first save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightLossProfile {
    pub id: i64,
    pub name: String,
    pub age: Option<u32>,
    pub sex: Option<String>,
    pub height_feet: Option<u32>,
    pub height_inches: Option<u32>,
    pub current_weight_lbs: Option<f64>,
    pub target_weight_lbs: Option<f64>,
    pub activity_level: Option<String>,
    pub daily_calorie_intake: Option<f64>,
    pub target_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Values written by a save
#[derive(Debug, Clone)]
pub struct WeightLossProfileSave<'a> {
    pub profile: &'a ProfileInput,
    pub daily_calorie_intake: f64,
    pub target_date: DateTime<Utc>,
}

impl WeightLossProfile {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            age: row.get("age")?,
            sex: row.get("sex")?,
            height_feet: row.get("height_feet")?,
            height_inches: row.get("height_inches")?,
            current_weight_lbs: row.get("current_weight_lbs")?,
            target_weight_lbs: row.get("target_weight_lbs")?,
            activity_level: row.get("activity_level")?,
            daily_calorie_intake: row.get("daily_calorie_intake")?,
            target_date: row.get("target_date")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Create an empty profile, or return the existing one with this name
    pub fn create_empty(conn: &Connection, name: &str) -> DbResult<Self> {
        conn.execute(
            "INSERT INTO weight_loss_profiles (name) VALUES (?1) ON CONFLICT(name) DO NOTHING",
            params![name],
        )?;

        Self::get_by_name(conn, name)?.ok_or_else(|| DbError::ProfileNotFound(name.to_string()))
    }

    /// Get a profile by name
    pub fn get_by_name(conn: &Connection, name: &str) -> DbResult<Option<Self>> {
        let profile = conn
            .query_row(
                "SELECT * FROM weight_loss_profiles WHERE name = ?1",
                params![name],
                Self::from_row,
            )
            .optional()?;
        Ok(profile)
    }

    /// List all profiles, most recently updated first
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM weight_loss_profiles ORDER BY updated_at DESC, name ASC",
        )?;
        let profiles = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(profiles)
    }

    /// Count stored profiles
    pub fn count(conn: &Connection) -> DbResult<i64> {
        let count = conn.query_row("SELECT COUNT(*) FROM weight_loss_profiles", [], |row| {
            row.get(0)
        })?;
        Ok(count)
    }

    /// Save normalized inputs and the projection result (upsert by name)
    pub fn save(conn: &Connection, name: &str, data: &WeightLossProfileSave) -> DbResult<Self> {
        let p = data.profile;
        conn.execute(
            r#"
            INSERT INTO weight_loss_profiles (
                name, age, sex, height_feet, height_inches,
                current_weight_lbs, target_weight_lbs, activity_level,
                daily_calorie_intake, target_date
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ON CONFLICT(name) DO UPDATE SET
                age = excluded.age,
                sex = excluded.sex,
                height_feet = excluded.height_feet,
                height_inches = excluded.height_inches,
                current_weight_lbs = excluded.current_weight_lbs,
                target_weight_lbs = excluded.target_weight_lbs,
                activity_level = excluded.activity_level,
                daily_calorie_intake = excluded.daily_calorie_intake,
                target_date = excluded.target_date,
                updated_at = datetime('now')
            "#,
            params![
                name,
                p.age_years,
                p.sex.as_str(),
                p.height_feet,
                p.height_inches,
                p.current_weight_lbs,
                p.target_weight_lbs,
                p.activity_level.as_str(),
                data.daily_calorie_intake,
                data.target_date.to_rfc3339_opts(SecondsFormat::Millis, true),
            ],
        )?;

        tracing::info!(profile = name, "saved weight-loss profile");

        Self::get_by_name(conn, name)?.ok_or_else(|| DbError::ProfileNotFound(name.to_string()))
    }

    /// Delete a profile by name. Returns whether a row was removed.
    pub fn delete(conn: &Connection, name: &str) -> DbResult<bool> {
        let rows = conn.execute(
            "DELETE FROM weight_loss_profiles WHERE name = ?1",
            params![name],
        )?;
        Ok(rows > 0)
    }

    /// Whether every biometric field has been filled in
    pub fn is_complete(&self) -> bool {
        self.age.is_some()
            && self.sex.is_some()
            && self.height_feet.is_some()
            && self.height_inches.is_some()
            && self.current_weight_lbs.is_some()
            && self.target_weight_lbs.is_some()
            && self.activity_level.is_some()
    }

    /// Rebuild the loosely typed form of this profile for re-normalization
    pub fn to_raw(&self) -> RawProfile {
        RawProfile {
            age: self.age.map(Value::from),
            sex: self.sex.clone().map(Value::from),
            height_feet: self.height_feet.map(Value::from),
            height_inches: self.height_inches.map(Value::from),
            current_weight_lbs: self.current_weight_lbs.map(Value::from),
            target_weight_lbs: self.target_weight_lbs.map(Value::from),
            activity_level: self.activity_level.clone().map(Value::from),
            daily_calorie_intake: self.daily_calorie_intake.map(Value::from),
            target_date: self.target_date.clone().map(Value::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::{normalize_profile, ActivityLevel, Sex};
    use crate::db::migrations::run_migrations;
    use chrono::TimeZone;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn input() -> ProfileInput {
        ProfileInput {
            age_years: 30,
            sex: Sex::Male,
            height_feet: 5,
            height_inches: 10,
            current_weight_lbs: 200.0,
            target_weight_lbs: 180.0,
            activity_level: ActivityLevel::ExtraHeavy,
        }
    }

    #[test]
    fn test_create_empty_is_idempotent() {
        let conn = conn();
        let first = WeightLossProfile::create_empty(&conn, "default").unwrap();
        let second = WeightLossProfile::create_empty(&conn, "default").unwrap();
        assert_eq!(first.id, second.id);
        assert!(!first.is_complete());
        assert_eq!(WeightLossProfile::count(&conn).unwrap(), 1);
    }

    #[test]
    fn test_save_and_reload() {
        let conn = conn();
        let profile = input();
        let target_date = Utc.with_ymd_and_hms(2026, 3, 19, 22, 46, 17).unwrap();
        let saved = WeightLossProfile::save(
            &conn,
            "alex",
            &WeightLossProfileSave {
                profile: &profile,
                daily_calorie_intake: 2000.0,
                target_date,
            },
        )
        .unwrap();

        assert!(saved.is_complete());
        assert_eq!(saved.activity_level.as_deref(), Some("extra-heavy"));
        assert_eq!(saved.target_date.as_deref(), Some("2026-03-19T22:46:17.000Z"));

        // Stored values normalize back to the same input
        let reloaded = normalize_profile(&saved.to_raw()).unwrap();
        assert_eq!(reloaded, profile);
    }

    #[test]
    fn test_save_overwrites_existing() {
        let conn = conn();
        let empty = WeightLossProfile::create_empty(&conn, "alex").unwrap();
        let mut profile = input();
        profile.current_weight_lbs = 195.0;
        let saved = WeightLossProfile::save(
            &conn,
            "alex",
            &WeightLossProfileSave {
                profile: &profile,
                daily_calorie_intake: 1800.0,
                target_date: Utc::now(),
            },
        )
        .unwrap();
        assert_eq!(saved.id, empty.id);
        assert_eq!(saved.current_weight_lbs, Some(195.0));
        assert_eq!(saved.daily_calorie_intake, Some(1800.0));
    }

    #[test]
    fn test_delete() {
        let conn = conn();
        WeightLossProfile::create_empty(&conn, "alex").unwrap();
        assert!(WeightLossProfile::delete(&conn, "alex").unwrap());
        assert!(!WeightLossProfile::delete(&conn, "alex").unwrap());
        assert!(WeightLossProfile::get_by_name(&conn, "alex").unwrap().is_none());
    }
}

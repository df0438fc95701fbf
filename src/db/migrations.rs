//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
    }

    Ok(())
}

/// Get the applied schema version (0 for a fresh database)
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Latest schema version this build knows about
pub fn latest_schema_version() -> i32 {
    SCHEMA_VERSION
}

/// Migration v1: weight-loss profiles
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- WEIGHT LOSS PROFILES
        -- Inputs last used for a projection, plus its result.
        -- Biometric columns stay NULL until first saved.
        -- ============================================
        CREATE TABLE weight_loss_profiles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,

            age INTEGER CHECK(age IS NULL OR age >= 1),
            sex TEXT CHECK(sex IS NULL OR sex IN ('male', 'female')),
            height_feet INTEGER CHECK(height_feet IS NULL OR height_feet >= 0),
            height_inches INTEGER CHECK(height_inches IS NULL OR height_inches BETWEEN 0 AND 11),
            current_weight_lbs REAL CHECK(current_weight_lbs IS NULL OR current_weight_lbs >= 0),
            target_weight_lbs REAL CHECK(target_weight_lbs IS NULL OR target_weight_lbs >= 0),
            activity_level TEXT CHECK(activity_level IS NULL OR activity_level IN
                ('sedentary', 'light', 'moderate', 'heavy', 'extra-heavy')),

            daily_calorie_intake REAL,           -- kcal/day
            target_date TEXT,                    -- RFC 3339, UTC

            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_weight_loss_profiles_updated ON weight_loss_profiles(updated_at);
        "#,
    )?;

    Ok(())
}

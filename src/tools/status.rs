//! Status Tool
//!
//! Provides runtime status information about the weightcalc service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::calculator::Limits;
use crate::db::Database;
use crate::models::WeightLossProfile;

/// Calculator usage instructions for AI assistants
pub const CALCULATOR_INSTRUCTIONS: &str = r#"
# Weight-Loss Calculator Instructions

## Profile fields

| Field | Type | Notes |
|-------|------|-------|
| age | whole number ≥ 1 | years |
| sex | `male` or `female` | |
| height_feet | whole number ≥ 0 | |
| height_inches | whole number 0-11 | |
| current_weight_lbs | number ≥ 0 | pounds |
| target_weight_lbs | number ≥ 0 | pounds; above current means weight gain |
| activity_level | `sedentary`, `light`, `moderate`, `heavy`, `extra-heavy` | |

Numbers may be passed as JSON numbers or numeric strings.

## Two directions

- **calculate_target_date** — also pass `daily_calorie_intake` (kcal/day).
  Returns the date the target weight is reached.
- **calculate_calorie_intake** — also pass `target_date`
  (`YYYY-MM-DD` or RFC 3339). Returns the daily intake needed.

Pass `save_profile: true` with a `profile` name to store the inputs and result.

## Outcomes that are not a result

| outcome | meaning | what to tell the user |
|---------|---------|-----------------------|
| unreachable_goal | intake equals expenditure | weight will not change at this intake |
| diverging_goal | intake moves weight away from the target | lower the intake (loss) or raise it (gain) |
| invalid_horizon | target date is not in the future | pick a later date |
| infeasible_intake | required intake below the minimum or above the maximum | pick a later date or a closer target |
| invalid_input | a field is missing or malformed | the message names the field |

## Model

BMR (Mifflin-St Jeor) × activity multiplier = TDEE.
Days = (current − target) × 3500 / (TDEE − intake).
"#;

/// Service status
#[derive(Debug, Clone, Serialize)]
pub struct WeightcalcStatus {
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,
    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub profile_count: Option<i64>,
    pub min_daily_intake_kcal: f64,
    pub max_daily_intake_kcal: f64,
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Tracks service start time for uptime reporting
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
    limits: Limits,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf, limits: Limits) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
            limits,
        }
    }

    /// Get the current status
    pub fn get_status(&self, database: &Database) -> WeightcalcStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());
        let profile_count = database.with_conn(WeightLossProfile::count).ok();

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        WeightcalcStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            profile_count,
            min_daily_intake_kcal: self.limits.min_daily_intake_kcal,
            max_daily_intake_kcal: self.limits.max_daily_intake_kcal,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

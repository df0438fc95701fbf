//! Environment configuration
//!
//! Read once at startup and shared by every binary.

use std::path::PathBuf;

use crate::calculator::Limits;

/// Database path override
pub const DATABASE_PATH_VAR: &str = "WEIGHTCALC_DATABASE_PATH";
/// Minimum plausible daily intake override (kcal/day)
pub const MIN_DAILY_INTAKE_VAR: &str = "WEIGHTCALC_MIN_DAILY_INTAKE";
/// Maximum plausible daily intake override (kcal/day)
pub const MAX_DAILY_INTAKE_VAR: &str = "WEIGHTCALC_MAX_DAILY_INTAKE";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub limits: Limits,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_path: database_path(),
            limits: limits(),
        }
    }
}

/// Get the database path from environment or use default
fn database_path() -> PathBuf {
    std::env::var(DATABASE_PATH_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            // Go up from target/release or target/debug to project root
            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(parent) = path.parent() {
                    if let Some(grandparent) = parent.parent() {
                        path = grandparent.to_path_buf();
                    }
                }
            }

            path.push("data");
            path.push("weightcalc.db");
            path
        })
}

fn limits() -> Limits {
    limits_from(
        std::env::var(MIN_DAILY_INTAKE_VAR).ok(),
        std::env::var(MAX_DAILY_INTAKE_VAR).ok(),
    )
}

fn limits_from(min_daily_intake: Option<String>, max_daily_intake: Option<String>) -> Limits {
    let defaults = Limits::default();
    let limits = Limits {
        min_daily_intake_kcal: kcal_override(
            MIN_DAILY_INTAKE_VAR,
            min_daily_intake,
            defaults.min_daily_intake_kcal,
        ),
        max_daily_intake_kcal: kcal_override(
            MAX_DAILY_INTAKE_VAR,
            max_daily_intake,
            defaults.max_daily_intake_kcal,
        ),
    };

    if limits.min_daily_intake_kcal > limits.max_daily_intake_kcal {
        tracing::warn!(
            "Ignoring intake limits: minimum {} exceeds maximum {} kcal/day.",
            limits.min_daily_intake_kcal,
            limits.max_daily_intake_kcal
        );
        return defaults;
    }
    limits
}

fn kcal_override(var: &str, raw: Option<String>, default: f64) -> f64 {
    match raw {
        Some(raw) => match raw.trim().parse::<f64>() {
            Ok(kcal) if kcal.is_finite() => kcal,
            _ => {
                tracing::warn!(
                    "Ignoring {}={:?}: not a number. Using {} kcal/day.",
                    var,
                    raw,
                    default
                );
                default
            }
        },
        None => default,
    }
}

//! Projection outcomes that are not a date or an intake
//!
//! Every variant is an ordinary result for the caller to present, never a
//! panic or an infinity leaking out of the arithmetic.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Why a profile field was rejected during normalization
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum InputIssue {
    /// Field absent, null, or blank
    Missing,
    /// Not a finite number (or numeric string)
    NotNumeric { value: String },
    /// A whole number was required
    NotInteger { value: f64 },
    /// Numeric but outside the accepted bounds
    OutOfRange { value: f64, min: f64, max: Option<f64> },
    /// Not one of the recognized category values
    UnknownCategory { value: String, expected: &'static [&'static str] },
    /// Could not be read as a date or timestamp
    BadDate { value: String },
}

impl std::fmt::Display for InputIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputIssue::Missing => write!(f, "is required"),
            InputIssue::NotNumeric { value } => write!(f, "must be a number, got '{}'", value),
            InputIssue::NotInteger { value } => write!(f, "must be a whole number, got {}", value),
            InputIssue::OutOfRange { value, min, max: Some(max) } => {
                write!(f, "must be between {} and {}, got {}", min, max, value)
            }
            InputIssue::OutOfRange { value, min, max: None } => {
                write!(f, "must be at least {}, got {}", min, value)
            }
            InputIssue::UnknownCategory { value, expected } => {
                write!(f, "must be one of {}, got '{}'", expected.join(", "), value)
            }
            InputIssue::BadDate { value } => write!(f, "is not a valid date: '{}'", value),
        }
    }
}

/// The plausibility bound a required intake broke
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "bound", content = "kcal", rename_all = "snake_case")]
pub enum IntakeBound {
    Minimum(f64),
    Maximum(f64),
}

impl std::fmt::Display for IntakeBound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntakeBound::Minimum(kcal) => write!(f, "below the minimum of {:.0} kcal/day", kcal),
            IntakeBound::Maximum(kcal) => write!(f, "above the maximum of {:.0} kcal/day", kcal),
        }
    }
}

/// Distinguished non-success outcomes of a projection
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "outcome", content = "details", rename_all = "snake_case")]
pub enum ProjectionError {
    /// Intake exactly balances expenditure, so the weight never changes
    #[error("goal is unreachable: daily intake matches expenditure ({tdee_kcal:.0} kcal/day)")]
    UnreachableGoal { tdee_kcal: f64 },

    /// The chosen intake moves weight away from the target
    #[error("goal is diverging: at this intake weight moves away from the target ({net_daily_deficit_kcal:.0} kcal/day net)")]
    DivergingGoal {
        net_daily_deficit_kcal: f64,
        days_required: f64,
    },

    /// Target date is not strictly after the reference instant
    #[error("target date {target_date} is not in the future (now is {now})")]
    InvalidHorizon {
        target_date: DateTime<Utc>,
        now: DateTime<Utc>,
    },

    /// Required intake falls outside the plausible range
    #[error("required intake of {daily_calorie_intake_kcal:.0} kcal/day is {bound}")]
    InfeasibleIntake {
        daily_calorie_intake_kcal: f64,
        bound: IntakeBound,
    },

    /// A profile field failed normalization
    #[error("invalid {field}: {issue}")]
    InvalidInput {
        field: &'static str,
        issue: InputIssue,
    },
}

impl ProjectionError {
    pub(crate) fn invalid(field: &'static str, issue: InputIssue) -> Self {
        ProjectionError::InvalidInput { field, issue }
    }

    /// Short machine-readable name of the outcome
    pub fn kind(&self) -> &'static str {
        match self {
            ProjectionError::UnreachableGoal { .. } => "unreachable_goal",
            ProjectionError::DivergingGoal { .. } => "diverging_goal",
            ProjectionError::InvalidHorizon { .. } => "invalid_horizon",
            ProjectionError::InfeasibleIntake { .. } => "infeasible_intake",
            ProjectionError::InvalidInput { .. } => "invalid_input",
        }
    }
}

/// Result type for engine operations
pub type SolveResult<T> = Result<T, ProjectionError>;

//! Projection solver
//!
//! One energy-balance identity evaluated in two directions:
//!
//! ```text
//! days = (current_lbs − target_lbs) × 3500 / (TDEE − intake)
//! ```
//!
//! Direction A fixes the intake and solves for the date; direction B fixes
//! the date and solves for the intake. Both take `now` explicitly.

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use super::energy::EnergyProfile;
use super::error::{InputIssue, IntakeBound, ProjectionError, SolveResult};
use super::normalize::{ProfileInput, ProjectionRequest};

/// Energy content of one pound of body mass (kcal)
pub const KCAL_PER_LB: f64 = 3500.0;

/// Milliseconds per day
pub const MS_PER_DAY: f64 = 86_400_000.0;

/// Nanoseconds per day
const NS_PER_DAY: f64 = 86_400_000_000_000.0;

/// Default ceiling on a solved daily intake (kcal)
pub const DEFAULT_MAX_DAILY_INTAKE_KCAL: f64 = 10_000.0;

/// Net balances closer to zero than this are treated as exactly balanced
const BALANCE_EPSILON_KCAL: f64 = 1e-9;

/// Plausibility bounds applied to solved values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits {
    /// Lowest daily intake accepted as a valid answer
    pub min_daily_intake_kcal: f64,
    /// Highest daily intake accepted as a valid answer
    pub max_daily_intake_kcal: f64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            min_daily_intake_kcal: 0.0,
            max_daily_intake_kcal: DEFAULT_MAX_DAILY_INTAKE_KCAL,
        }
    }
}

/// Calories that must be dissipated to move from current to target weight.
/// Negative when the goal is weight gain.
pub fn calories_to_burn(current_weight_lbs: f64, target_weight_lbs: f64) -> f64 {
    (current_weight_lbs - target_weight_lbs) * KCAL_PER_LB
}

/// Direction A result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetDateProjection {
    pub target_date: DateTime<Utc>,
    pub days_required: f64,
    pub daily_calorie_intake_kcal: f64,
    pub net_daily_deficit_kcal: f64,
    pub calories_to_burn_kcal: f64,
    pub energy: EnergyProfile,
}

/// Direction B result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntakeProjection {
    pub daily_calorie_intake_kcal: f64,
    pub target_date: DateTime<Utc>,
    pub days_remaining: f64,
    pub net_daily_deficit_kcal: f64,
    pub calories_to_burn_kcal: f64,
    pub energy: EnergyProfile,
}

/// Successful projection in either direction
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "solved_for", rename_all = "snake_case")]
pub enum ProjectionResult {
    TargetDate(TargetDateProjection),
    DailyCalorieIntake(IntakeProjection),
}

/// Solve for the date the target weight is reached at a fixed daily intake
pub fn solve_target_date(
    profile: &ProfileInput,
    daily_calorie_intake: f64,
    now: DateTime<Utc>,
) -> SolveResult<TargetDateProjection> {
    if !daily_calorie_intake.is_finite() {
        return Err(ProjectionError::invalid(
            "daily_calorie_intake",
            InputIssue::NotNumeric {
                value: daily_calorie_intake.to_string(),
            },
        ));
    }

    let energy = EnergyProfile::estimate(profile);
    let net_daily_deficit_kcal = energy.tdee_kcal - daily_calorie_intake;
    let calories_to_burn_kcal =
        calories_to_burn(profile.current_weight_lbs, profile.target_weight_lbs);

    tracing::debug!(
        bmr = energy.bmr_kcal,
        tdee = energy.tdee_kcal,
        net_daily_deficit = net_daily_deficit_kcal,
        calories_to_burn = calories_to_burn_kcal,
        "solving for target date"
    );

    let projection = |target_date, days_required| TargetDateProjection {
        target_date,
        days_required,
        daily_calorie_intake_kcal: daily_calorie_intake,
        net_daily_deficit_kcal,
        calories_to_burn_kcal,
        energy,
    };

    // Already at the target: done now, whatever the balance
    if calories_to_burn_kcal == 0.0 {
        return Ok(projection(now, 0.0));
    }

    if net_daily_deficit_kcal.abs() < BALANCE_EPSILON_KCAL {
        return Err(ProjectionError::UnreachableGoal {
            tdee_kcal: energy.tdee_kcal,
        });
    }

    let days_required = calories_to_burn_kcal / net_daily_deficit_kcal;
    if days_required < 0.0 {
        return Err(ProjectionError::DivergingGoal {
            net_daily_deficit_kcal,
            days_required,
        });
    }

    let target_date = offset_by_days(now, days_required).ok_or(ProjectionError::UnreachableGoal {
        tdee_kcal: energy.tdee_kcal,
    })?;

    Ok(projection(target_date, days_required))
}

/// Solve for the daily intake that reaches the target weight on a fixed date
pub fn solve_required_intake(
    profile: &ProfileInput,
    target_date: DateTime<Utc>,
    now: DateTime<Utc>,
    limits: &Limits,
) -> SolveResult<IntakeProjection> {
    if target_date <= now {
        return Err(ProjectionError::InvalidHorizon { target_date, now });
    }
    let horizon = target_date - now;
    let days_remaining = match horizon.num_nanoseconds() {
        Some(nanos) => nanos as f64 / NS_PER_DAY,
        None => horizon.num_milliseconds() as f64 / MS_PER_DAY,
    };

    let energy = EnergyProfile::estimate(profile);
    let calories_to_burn_kcal =
        calories_to_burn(profile.current_weight_lbs, profile.target_weight_lbs);
    let net_daily_deficit_kcal = calories_to_burn_kcal / days_remaining;
    let daily_calorie_intake_kcal = energy.tdee_kcal - net_daily_deficit_kcal;

    tracing::debug!(
        bmr = energy.bmr_kcal,
        tdee = energy.tdee_kcal,
        days_remaining,
        calories_to_burn = calories_to_burn_kcal,
        daily_calorie_intake = daily_calorie_intake_kcal,
        "solving for required intake"
    );

    let broken = if !(daily_calorie_intake_kcal >= limits.min_daily_intake_kcal) {
        Some(IntakeBound::Minimum(limits.min_daily_intake_kcal))
    } else if daily_calorie_intake_kcal > limits.max_daily_intake_kcal {
        Some(IntakeBound::Maximum(limits.max_daily_intake_kcal))
    } else {
        None
    };
    if let Some(bound) = broken {
        return Err(ProjectionError::InfeasibleIntake {
            daily_calorie_intake_kcal,
            bound,
        });
    }

    Ok(IntakeProjection {
        daily_calorie_intake_kcal,
        target_date,
        days_remaining,
        net_daily_deficit_kcal,
        calories_to_burn_kcal,
        energy,
    })
}

/// Solve whichever direction the request names
pub fn solve(
    profile: &ProfileInput,
    request: &ProjectionRequest,
    now: DateTime<Utc>,
    limits: &Limits,
) -> SolveResult<ProjectionResult> {
    match *request {
        ProjectionRequest::TargetDate {
            daily_calorie_intake,
        } => solve_target_date(profile, daily_calorie_intake, now)
            .map(ProjectionResult::TargetDate),
        ProjectionRequest::RequiredIntake { target_date } => {
            solve_required_intake(profile, target_date, now, limits)
                .map(ProjectionResult::DailyCalorieIntake)
        }
    }
}

/// `now + days`, or None if the result is not a representable instant
fn offset_by_days(now: DateTime<Utc>, days: f64) -> Option<DateTime<Utc>> {
    let millis = (days * MS_PER_DAY).round();
    if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
        return None;
    }
    let delta = TimeDelta::try_milliseconds(millis as i64)?;
    now.checked_add_signed(delta)
}

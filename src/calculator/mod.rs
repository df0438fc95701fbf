//! Weight-loss projection engine
//!
//! Stateless and synchronous: normalize a profile, estimate energy
//! expenditure, then solve for either a target date or a daily intake.

pub mod energy;
pub mod error;
pub mod normalize;
pub mod solver;
pub mod units;

pub use energy::{compute_bmr, compute_tdee, ActivityLevel, EnergyProfile, Sex};
pub use error::{InputIssue, IntakeBound, ProjectionError, SolveResult};
pub use normalize::{
    normalize_intake, normalize_profile, normalize_request, normalize_target_date, Direction,
    ProfileInput, ProjectionRequest, RawProfile,
};
pub use solver::{
    calories_to_burn, solve, solve_required_intake, solve_target_date, IntakeProjection, Limits,
    ProjectionResult, TargetDateProjection, KCAL_PER_LB,
};
pub use units::{feet_inches_to_centimeters, kilograms_to_pounds, pounds_to_kilograms};

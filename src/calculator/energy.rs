//! Energy expenditure model
//!
//! Basal metabolic rate by the Mifflin-St Jeor equation, scaled by a fixed
//! activity multiplier to a total daily energy expenditure.

use serde::{Deserialize, Serialize};

use super::normalize::ProfileInput;
use super::units::{feet_inches_to_centimeters, pounds_to_kilograms};

/// Mifflin-St Jeor coefficients
mod mifflin_st_jeor {
    pub const WEIGHT_KG: f64 = 10.0;
    pub const HEIGHT_CM: f64 = 6.25;
    pub const AGE_YEARS: f64 = 5.0;
    pub const MALE_OFFSET: f64 = 5.0;
    pub const FEMALE_OFFSET: f64 = -161.0;
}

/// Sex category used by the BMR equation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub const ACCEPTED: &'static [&'static str] = &["male", "female"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" => Some(Sex::Male),
            "female" => Some(Sex::Female),
            _ => None,
        }
    }

    fn bmr_offset(&self) -> f64 {
        match self {
            Sex::Male => mifflin_st_jeor::MALE_OFFSET,
            Sex::Female => mifflin_st_jeor::FEMALE_OFFSET,
        }
    }
}

/// Habitual activity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Light exercise 1-3 days/week
    Light,
    /// Moderate exercise 3-5 days/week
    Moderate,
    /// Hard exercise 6-7 days/week
    Heavy,
    /// Physical job or training twice a day
    ExtraHeavy,
}

impl ActivityLevel {
    pub const ACCEPTED: &'static [&'static str] =
        &["sedentary", "light", "moderate", "heavy", "extra-heavy"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Heavy => "heavy",
            ActivityLevel::ExtraHeavy => "extra-heavy",
        }
    }

    /// Parse a level name. Unknown names are rejected, never defaulted.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['_', ' '], "-").as_str() {
            "sedentary" => Some(ActivityLevel::Sedentary),
            "light" => Some(ActivityLevel::Light),
            "moderate" => Some(ActivityLevel::Moderate),
            "heavy" => Some(ActivityLevel::Heavy),
            "extra-heavy" => Some(ActivityLevel::ExtraHeavy),
            _ => None,
        }
    }

    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Heavy => 1.725,
            ActivityLevel::ExtraHeavy => 1.9,
        }
    }
}

/// Basal metabolic rate in kcal/day
///
/// `base = 10 × kg + 6.25 × cm − 5 × years`, then +5 for males and −161 for females.
pub fn compute_bmr(sex: Sex, age_years: u32, height_cm: f64, weight_kg: f64) -> f64 {
    let base = mifflin_st_jeor::WEIGHT_KG * weight_kg + mifflin_st_jeor::HEIGHT_CM * height_cm
        - mifflin_st_jeor::AGE_YEARS * f64::from(age_years);
    base + sex.bmr_offset()
}

/// Total daily energy expenditure in kcal/day
pub fn compute_tdee(bmr: f64, level: ActivityLevel) -> f64 {
    bmr * level.multiplier()
}

/// Energy figures derived from a profile, recomputed per request
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnergyProfile {
    pub bmr_kcal: f64,
    pub tdee_kcal: f64,
}

impl EnergyProfile {
    /// Estimate from the current (not target) body weight
    pub fn estimate(profile: &ProfileInput) -> Self {
        let height_cm = feet_inches_to_centimeters(profile.height_feet, profile.height_inches);
        let weight_kg = pounds_to_kilograms(profile.current_weight_lbs);
        let bmr_kcal = compute_bmr(profile.sex, profile.age_years, height_cm, weight_kg);
        Self {
            bmr_kcal,
            tdee_kcal: compute_tdee(bmr_kcal, profile.activity_level),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bmr_male() {
        // 10 × 90.7184 + 6.25 × 177.8 − 5 × 30 + 5
        let bmr = compute_bmr(Sex::Male, 30, 177.8, 90.7184);
        assert!((bmr - 1873.434).abs() < 0.001);
    }

    #[test]
    fn test_bmr_female_offset() {
        let male = compute_bmr(Sex::Male, 45, 162.56, 68.0388);
        let female = compute_bmr(Sex::Female, 45, 162.56, 68.0388);
        assert!((male - female - 166.0).abs() < 1e-9);
        assert!((female - 1310.388).abs() < 0.001);
    }

    #[test]
    fn test_activity_multipliers() {
        assert_eq!(ActivityLevel::Sedentary.multiplier(), 1.2);
        assert_eq!(ActivityLevel::Light.multiplier(), 1.375);
        assert_eq!(ActivityLevel::Moderate.multiplier(), 1.55);
        assert_eq!(ActivityLevel::Heavy.multiplier(), 1.725);
        assert_eq!(ActivityLevel::ExtraHeavy.multiplier(), 1.9);
    }

    #[test]
    fn test_activity_level_parsing() {
        assert_eq!(ActivityLevel::from_str("moderate"), Some(ActivityLevel::Moderate));
        assert_eq!(ActivityLevel::from_str("Extra Heavy"), Some(ActivityLevel::ExtraHeavy));
        assert_eq!(ActivityLevel::from_str("extra_heavy"), Some(ActivityLevel::ExtraHeavy));
        assert_eq!(ActivityLevel::from_str("extra-heavy"), Some(ActivityLevel::ExtraHeavy));
        assert_eq!(ActivityLevel::from_str("couch"), None);
        assert_eq!(ActivityLevel::from_str(""), None);
    }

    #[test]
    fn test_sex_parsing() {
        assert_eq!(Sex::from_str(" Female "), Some(Sex::Female));
        assert_eq!(Sex::from_str("MALE"), Some(Sex::Male));
        assert_eq!(Sex::from_str("other"), None);
    }

    #[test]
    fn test_tdee() {
        assert!((compute_tdee(1873.434, ActivityLevel::Moderate) - 2903.8227).abs() < 0.0001);
    }
}

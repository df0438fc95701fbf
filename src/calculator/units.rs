//! Imperial/metric conversions
//!
//! The energy model works in kilograms and centimeters; profiles arrive in
//! pounds and feet/inches. Conversion happens once, at the model boundary.

/// Kilograms per pound
pub const KG_PER_LB: f64 = 0.453592;
/// Pounds per kilogram
pub const LB_PER_KG: f64 = 2.20462;
/// Centimeters per inch
pub const CM_PER_INCH: f64 = 2.54;
/// Inches per foot
pub const INCHES_PER_FOOT: u32 = 12;

pub fn pounds_to_kilograms(pounds: f64) -> f64 {
    pounds * KG_PER_LB
}

pub fn kilograms_to_pounds(kilograms: f64) -> f64 {
    kilograms * LB_PER_KG
}

/// Convert a feet + inches height to centimeters
pub fn feet_inches_to_centimeters(feet: u32, inches: u32) -> f64 {
    let total_inches = f64::from(feet) * f64::from(INCHES_PER_FOOT) + f64::from(inches);
    total_inches * CM_PER_INCH
}

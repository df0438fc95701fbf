//! Data models
//!
//! Rust structs representing database entities.

mod weight_loss_profile;

pub use weight_loss_profile::{WeightLossProfile, WeightLossProfileSave};

//! Tools module
//!
//! Tool implementations behind the MCP server.

pub mod calculator;
pub mod profiles;
pub mod status;

/// Trim a profile name, rejecting names that are empty once trimmed
pub(crate) fn validate_profile_name(name: &str) -> Result<&str, String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Profile name must not be empty".to_string());
    }
    Ok(trimmed)
}

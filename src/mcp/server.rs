//! Weightcalc MCP Server Implementation
//!
//! Implements the MCP server with all calculator tools.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::calculator::{Limits, RawProfile};
use crate::db::Database;
use crate::tools::status::StatusTracker;
use crate::tools::{calculator, profiles};

/// Weightcalc MCP Service
#[derive(Clone)]
pub struct WeightcalcService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    limits: Limits,
    tool_router: ToolRouter<WeightcalcService>,
}

impl WeightcalcService {
    pub fn new(database_path: PathBuf, database: Database, limits: Limits) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path, limits))),
            database,
            limits,
            tool_router: Self::tool_router(),
        }
    }
}

// ============================================================================
// Parameter Structs
// ============================================================================

/// Biometric fields shared by every projection. Numbers may be strings.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ProfileFields {
    /// Age in whole years (>= 1)
    pub age: Option<Value>,
    /// "male" or "female"
    pub sex: Option<Value>,
    /// Height, whole feet
    pub height_feet: Option<Value>,
    /// Height, remaining whole inches (0-11)
    pub height_inches: Option<Value>,
    /// Current weight in pounds
    pub current_weight_lbs: Option<Value>,
    /// Target weight in pounds
    pub target_weight_lbs: Option<Value>,
    /// sedentary, light, moderate, heavy, or extra-heavy
    pub activity_level: Option<Value>,
}

impl ProfileFields {
    fn into_raw(self, daily_calorie_intake: Option<Value>, target_date: Option<Value>) -> RawProfile {
        RawProfile {
            age: self.age,
            sex: self.sex,
            height_feet: self.height_feet,
            height_inches: self.height_inches,
            current_weight_lbs: self.current_weight_lbs,
            target_weight_lbs: self.target_weight_lbs,
            activity_level: self.activity_level,
            daily_calorie_intake,
            target_date,
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CalculateTargetDateParams {
    #[serde(flatten)]
    pub profile_fields: ProfileFields,
    /// Planned daily intake in kcal
    pub daily_calorie_intake: Option<Value>,
    /// Store inputs and result under `profile` (default false)
    #[serde(default)]
    pub save_profile: bool,
    /// Profile name to save under (default "default")
    #[serde(default = "default_profile_name")]
    pub profile: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CalculateCalorieIntakeParams {
    #[serde(flatten)]
    pub profile_fields: ProfileFields,
    /// Date to reach the target weight: YYYY-MM-DD or RFC 3339
    pub target_date: Option<Value>,
    /// Store inputs and result under `profile` (default false)
    #[serde(default)]
    pub save_profile: bool,
    /// Profile name to save under (default "default")
    #[serde(default = "default_profile_name")]
    pub profile: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateProfileParams {
    /// Existing profile name
    #[serde(default = "default_profile_name")]
    pub profile: String,
    #[serde(flatten)]
    pub profile_fields: ProfileFields,
    /// Daily intake in kcal used to recompute the target date
    pub daily_calorie_intake: Option<Value>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ProfileNameParams {
    /// Profile name (default "default")
    #[serde(default = "default_profile_name")]
    pub profile: String,
}

fn default_profile_name() -> String { "default".to_string() }

#[derive(Debug, Serialize)]
struct NotFoundResponse<'a> {
    error: &'static str,
    profile: &'a str,
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Tool Router
// ============================================================================

#[tool_router]
impl WeightcalcService {
    // --- Status ---

    #[tool(description = "Get the current status of the weightcalc service including build info, database status, and process information")]
    async fn weightcalc_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        json_result(&tracker.get_status(&self.database))
    }

    #[tool(description = "Get instructions for the weight-loss calculator: profile fields, the two calculation directions, and how to explain outcomes that are not a result.")]
    fn calculator_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::CALCULATOR_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(CALCULATOR_INSTRUCTIONS)]))
    }

    // --- Calculator ---

    #[tool(description = "Calculate the date the target weight is reached at a given daily calorie intake. Returns an explanatory outcome instead when the goal is unreachable or diverging.")]
    fn calculate_target_date(&self, Parameters(p): Parameters<CalculateTargetDateParams>) -> Result<CallToolResult, McpError> {
        let raw = p.profile_fields.into_raw(p.daily_calorie_intake, None);
        let save_as = p.save_profile.then_some(p.profile.as_str());
        let result = calculator::calculate_target_date(&self.database, &raw, save_as, Utc::now(), &self.limits)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Calculate the daily calorie intake needed to reach the target weight by a given date. Returns an explanatory outcome instead when the date is not in the future or the intake would be implausible.")]
    fn calculate_calorie_intake(&self, Parameters(p): Parameters<CalculateCalorieIntakeParams>) -> Result<CallToolResult, McpError> {
        let raw = p.profile_fields.into_raw(None, p.target_date);
        let save_as = p.save_profile.then_some(p.profile.as_str());
        let result = calculator::calculate_calorie_intake(&self.database, &raw, save_as, Utc::now(), &self.limits)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Profiles ---

    #[tool(description = "Create an empty weight-loss profile (no-op if it already exists)")]
    fn create_profile(&self, Parameters(p): Parameters<ProfileNameParams>) -> Result<CallToolResult, McpError> {
        let result = profiles::create_profile(&self.database, &p.profile)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get a stored weight-loss profile with its last calculated intake and target date")]
    fn get_profile(&self, Parameters(p): Parameters<ProfileNameParams>) -> Result<CallToolResult, McpError> {
        let result = profiles::get_profile(&self.database, &p.profile)
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(profile) => json_result(&profile),
            None => json_result(&NotFoundResponse { error: "Profile not found", profile: &p.profile }),
        }
    }

    #[tool(description = "List stored weight-loss profiles")]
    fn list_profiles(&self) -> Result<CallToolResult, McpError> {
        let result = profiles::list_profiles(&self.database)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Replace an existing profile's inputs and recompute its target date from the given daily intake. Values are saved only when a date results.")]
    fn update_profile(&self, Parameters(p): Parameters<UpdateProfileParams>) -> Result<CallToolResult, McpError> {
        let raw = p.profile_fields.into_raw(p.daily_calorie_intake, None);
        let result = profiles::update_profile(&self.database, &p.profile, &raw, Utc::now(), &self.limits)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Delete a stored weight-loss profile")]
    fn delete_profile(&self, Parameters(p): Parameters<ProfileNameParams>) -> Result<CallToolResult, McpError> {
        let result = profiles::delete_profile(&self.database, &p.profile)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for WeightcalcService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "weightcalc".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Weight-Loss Calculator".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Weight-loss calculator: projects a target date from a daily calorie intake, \
                 or the daily intake needed to reach a target weight by a date. \
                 Call calculator_instructions first. \
                 Calculations: calculate_target_date, calculate_calorie_intake (save_profile=true stores the result). \
                 Profiles: create/get/list/update/delete_profile. \
                 Status: weightcalc_status."
                    .into(),
            ),
        }
    }
}

//! Request and response bodies for the control surface.

use serde::{Deserialize, Serialize};

use crate::application::manage_targets::Mode;

#[derive(Debug, Deserialize)]
pub struct SetTargetRequest {
    pub target: String,
}

/// Body of `POST /preset/goto` and `POST /preset/save`.
///
/// `preset` is taken as a wide integer so out-of-range values reach
/// validation instead of failing deserialisation.
#[derive(Debug, Deserialize)]
pub struct PresetRequest {
    pub preset: i64,
    /// Defaults to the current target when absent.
    #[serde(default)]
    pub target: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ModeQuery {
    pub mode: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CurrentTargetResponse {
    pub current_target: String,
}

#[derive(Debug, Serialize)]
pub struct SetTargetResponse {
    pub status: &'static str,
    pub target: String,
}

#[derive(Debug, Serialize)]
pub struct PresetResponse {
    pub status: &'static str,
    pub action: &'static str,
    pub preset: i64,
    pub target: String,
    /// Cameras that could not be written during a broadcast save.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ModeResponse {
    pub mode: Mode,
}

#[derive(Debug, Serialize)]
pub struct SetModeResponse {
    pub status: &'static str,
    pub mode: Mode,
}

#[derive(Debug, Serialize)]
pub struct TargetsResponse {
    pub targets: Vec<String>,
    pub current_target: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

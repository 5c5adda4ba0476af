//! Control-surface handlers.
//!
//! Each handler validates its input at the boundary, then calls into the
//! route table or the forwarder.  Failures become [`ApiError`], which renders
//! as `400 {"error": ...}`.

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    Json,
};
use pelco_core::PresetAction;
use tracing::info;

use super::dto::{
    CurrentTargetResponse, HealthResponse, ModeQuery, ModeResponse, PresetRequest,
    PresetResponse, SetModeResponse, SetTargetRequest, SetTargetResponse, TargetsResponse,
};
use super::error::ApiError;
use super::AppState;
use crate::application::manage_targets::{TargetError, BROADCAST_TARGET};

/// GET /target/get
pub async fn get_target(State(state): State<AppState>) -> Json<CurrentTargetResponse> {
    Json(CurrentTargetResponse {
        current_target: state.forwarder.routes().current_target().await,
    })
}

/// POST /target/set
pub async fn set_target(
    State(state): State<AppState>,
    body: Result<Json<SetTargetRequest>, JsonRejection>,
) -> Result<Json<SetTargetResponse>, ApiError> {
    let Json(req) = body?;
    state
        .forwarder
        .routes()
        .set_current_target(&req.target)
        .await?;
    Ok(Json(SetTargetResponse {
        status: "ok",
        target: req.target,
    }))
}

/// POST /preset/goto
pub async fn preset_goto(
    State(state): State<AppState>,
    body: Result<Json<PresetRequest>, JsonRejection>,
) -> Result<Json<PresetResponse>, ApiError> {
    let Json(req) = body?;
    apply_preset(&state, PresetAction::Goto, req).await.map(Json)
}

/// POST /preset/save
pub async fn preset_save(
    State(state): State<AppState>,
    body: Result<Json<PresetRequest>, JsonRejection>,
) -> Result<Json<PresetResponse>, ApiError> {
    let Json(req) = body?;
    apply_preset(&state, PresetAction::Save, req).await.map(Json)
}

/// Encodes and sends a preset command.
///
/// A save addressed to `"both"` is written to every camera and succeeds if
/// at least one write does.  Any other target must be a configured camera.
async fn apply_preset(
    state: &AppState,
    action: PresetAction,
    req: PresetRequest,
) -> Result<PresetResponse, ApiError> {
    let routes = state.forwarder.routes();
    let target = match req.target {
        Some(target) => target,
        None => routes.current_target().await,
    };

    let broadcast = action == PresetAction::Save && target == BROADCAST_TARGET;
    if !broadcast && !routes.contains(&target) {
        return Err(TargetError::UnknownTarget(target).into());
    }

    let frame = action.frame(state.camera_address, req.preset)?;

    let failed = if broadcast {
        let mut report = state.forwarder.fan_out(&frame).await;
        if report.is_total_failure() && !report.failed.is_empty() {
            return Err(report.failed.remove(0).into());
        }
        report.failed_targets()
    } else {
        state.forwarder.forward(&frame, &target).await?;
        Vec::new()
    };

    info!(
        "preset {} {} -> {target} ({frame:?})",
        action.as_str(),
        req.preset
    );
    Ok(PresetResponse {
        status: "ok",
        action: action.as_str(),
        preset: req.preset,
        target,
        failed,
    })
}

/// GET /mode/get
pub async fn get_mode(State(state): State<AppState>) -> Json<ModeResponse> {
    Json(ModeResponse {
        mode: state.forwarder.routes().current_mode().await,
    })
}

/// POST /mode/set?mode=preview|program
pub async fn set_mode(
    State(state): State<AppState>,
    query: Result<Query<ModeQuery>, QueryRejection>,
) -> Result<Json<SetModeResponse>, ApiError> {
    let Query(query) = query?;
    let mode = state
        .forwarder
        .routes()
        .set_current_mode(query.mode.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(SetModeResponse { status: "ok", mode }))
}

/// GET /targets
pub async fn list_targets(State(state): State<AppState>) -> Json<TargetsResponse> {
    let routes = state.forwarder.routes();
    Json(TargetsResponse {
        targets: routes.targets().map(str::to_string).collect(),
        current_target: routes.current_target().await,
    })
}

/// GET /healthz
pub async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

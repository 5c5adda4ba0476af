//! HTTP control surface.
//!
//! | Method | Path           | Purpose                                 |
//! |--------|----------------|-----------------------------------------|
//! | GET    | `/target/get`  | current joystick target                 |
//! | POST   | `/target/set`  | switch joystick target                  |
//! | POST   | `/preset/goto` | recall a preset on one camera           |
//! | POST   | `/preset/save` | store a preset on one camera or `both`  |
//! | GET    | `/mode/get`    | current mode                            |
//! | POST   | `/mode/set`    | set mode (`?mode=preview\|program`)      |
//! | GET    | `/targets`     | configured cameras and current target   |
//! | GET    | `/healthz`     | liveness                                |
//!
//! All bodies are JSON.  All errors are `400 {"error": "..."}`.

pub mod dto;
pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

use crate::application::route_frames::Forwarder;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub forwarder: Arc<Forwarder>,
    /// Pelco-D address used when synthesizing preset frames.
    pub camera_address: u8,
}

impl AppState {
    pub fn new(forwarder: Arc<Forwarder>, camera_address: u8) -> Self {
        Self {
            forwarder,
            camera_address,
        }
    }
}

/// Builds the control-surface router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/target/get", get(handlers::get_target))
        .route("/target/set", post(handlers::set_target))
        .route("/preset/goto", post(handlers::preset_goto))
        .route("/preset/save", post(handlers::preset_save))
        .route("/mode/get", get(handlers::get_mode))
        .route("/mode/set", post(handlers::set_mode))
        .route("/targets", get(handlers::list_targets))
        .route("/healthz", get(handlers::healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

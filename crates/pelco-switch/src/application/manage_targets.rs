//! ManageTargetsUseCase: the route table and the current target/mode selectors.
//!
//! The [`RouteTable`] is the switch's single source of truth for routing.  It
//! holds:
//!
//! - One output endpoint per configured camera, keyed by target name.  The
//!   map is built once at startup and never changes.
//! - The *current target*: the camera that joystick frames are forwarded to.
//! - The *current mode*: `preview` or `program`, reported to the control
//!   plane.
//!
//! # Concurrency (for beginners)
//!
//! The joystick ingestion task reads the current target for every frame
//! while HTTP handlers may change it at any moment.  Both selectors live
//! behind a `tokio::sync::RwLock`: many readers can hold the lock at once,
//! a writer waits for them to finish, and a reader can never observe a
//! half-written `String`.
//!
//! The endpoint map itself needs no lock because it is immutable after
//! construction.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

use crate::application::route_frames::FrameSink;

/// Pseudo-target that fans a preset-save out to every camera.
///
/// It is never a key of the route table and cannot be selected as the
/// current target.
pub const BROADCAST_TARGET: &str = "both";

/// Errors raised by target and mode selection.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetError {
    /// The requested target name is not a configured camera.
    #[error("Invalid target: {0}")]
    UnknownTarget(String),

    /// The mode string is neither `preview` nor `program`.
    #[error("Invalid mode")]
    InvalidMode(String),

    /// A camera was configured under the reserved broadcast name.
    #[error("target name '{BROADCAST_TARGET}' is reserved")]
    ReservedName,
}

/// Operating mode reported to the control plane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Preview,
    Program,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Preview => "preview",
            Mode::Program => "program",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "preview" => Ok(Mode::Preview),
            "program" => Ok(Mode::Program),
            other => Err(TargetError::InvalidMode(other.to_string())),
        }
    }
}

/// Target name → output endpoint, plus the live routing selectors.
///
/// Shared as `Arc<RouteTable>` between the joystick task and the HTTP
/// handlers.
pub struct RouteTable {
    endpoints: BTreeMap<String, Arc<dyn FrameSink>>,
    current_target: RwLock<String>,
    current_mode: RwLock<Mode>,
}

impl RouteTable {
    /// Builds the table from the endpoints opened at startup.
    ///
    /// # Errors
    ///
    /// - [`TargetError::ReservedName`] if an endpoint is named `"both"`.
    /// - [`TargetError::UnknownTarget`] if `default_target` is not one of the
    ///   endpoints (this also covers an empty endpoint map).
    pub fn new(
        endpoints: BTreeMap<String, Arc<dyn FrameSink>>,
        default_target: &str,
        default_mode: Mode,
    ) -> Result<Self, TargetError> {
        if endpoints.contains_key(BROADCAST_TARGET) {
            return Err(TargetError::ReservedName);
        }
        if !endpoints.contains_key(default_target) {
            return Err(TargetError::UnknownTarget(default_target.to_string()));
        }
        Ok(Self {
            endpoints,
            current_target: RwLock::new(default_target.to_string()),
            current_mode: RwLock::new(default_mode),
        })
    }

    /// Returns the endpoint for `target`, if configured.
    pub fn endpoint(&self, target: &str) -> Option<Arc<dyn FrameSink>> {
        self.endpoints.get(target).cloned()
    }

    /// Returns `true` if `target` is a configured camera.
    pub fn contains(&self, target: &str) -> bool {
        self.endpoints.contains_key(target)
    }

    /// Configured target names in sorted order.
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.endpoints.keys().map(String::as_str)
    }

    /// Snapshot of the current target name.
    pub async fn current_target(&self) -> String {
        self.current_target.read().await.clone()
    }

    /// Switches joystick routing to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`TargetError::UnknownTarget`] and leaves the current target
    /// unchanged if `target` is not configured.
    pub async fn set_current_target(&self, target: &str) -> Result<(), TargetError> {
        if !self.contains(target) {
            return Err(TargetError::UnknownTarget(target.to_string()));
        }
        let mut current = self.current_target.write().await;
        if *current != target {
            info!("routing target changed: {} -> {}", *current, target);
            *current = target.to_string();
        }
        Ok(())
    }

    pub async fn current_mode(&self) -> Mode {
        *self.current_mode.read().await
    }

    /// Parses and stores a new mode.
    ///
    /// # Errors
    ///
    /// Returns [`TargetError::InvalidMode`] unless `mode` is `"preview"` or
    /// `"program"`.
    pub async fn set_current_mode(&self, mode: &str) -> Result<Mode, TargetError> {
        let mode: Mode = mode.parse()?;
        let mut current = self.current_mode.write().await;
        if *current != mode {
            info!("mode changed: {} -> {}", *current, mode);
        }
        *current = mode;
        Ok(mode)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

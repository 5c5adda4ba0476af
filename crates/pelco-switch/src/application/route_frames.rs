//! RouteFramesUseCase: writes frames to camera endpoints.
//!
//! The [`Forwarder`] is the only code path that touches camera outputs.  It
//! resolves a target name through the shared [`RouteTable`] and writes the
//! frame's seven bytes to that target's [`FrameSink`].
//!
//! # Architecture
//!
//! This module depends only on the [`FrameSink`] trait.  Serial ports are
//! injected by `main.rs`; tests inject `MockFrameSink` or in-memory recorders,
//! so every routing rule is unit-testable without hardware.

use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use pelco_core::Frame;
use thiserror::Error;
use tracing::{debug, warn};

use crate::application::manage_targets::RouteTable;

/// Errors raised while forwarding a frame.
#[derive(Debug, Error)]
pub enum RouteError {
    /// The target name has no endpoint in the route table.
    #[error("no route for target: {0}")]
    NoRouteForTarget(String),

    /// The endpoint rejected the write.
    #[error("Write to {target} failed: {source}")]
    TransportWrite {
        target: String,
        #[source]
        source: io::Error,
    },
}

/// An output that accepts whole Pelco-D frames.
///
/// Implementations must write all seven bytes or fail; a partial write must
/// never be reported as success.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FrameSink: Send + Sync {
    /// Writes one complete frame.
    async fn send_frame(&self, frame: &Frame) -> io::Result<()>;
}

/// Outcome of a fan-out to every configured target.
#[derive(Debug, Default)]
pub struct FanOutReport {
    /// Targets that accepted the frame, in route-table order.
    pub delivered: Vec<String>,
    /// Targets whose write failed, with the reason.
    pub failed: Vec<RouteError>,
}

impl FanOutReport {
    /// Names of the targets that failed.
    pub fn failed_targets(&self) -> Vec<String> {
        self.failed
            .iter()
            .map(|e| match e {
                RouteError::NoRouteForTarget(t) | RouteError::TransportWrite { target: t, .. } => {
                    t.clone()
                }
            })
            .collect()
    }

    /// `true` when no target accepted the frame.
    pub fn is_total_failure(&self) -> bool {
        self.delivered.is_empty()
    }
}

/// Forwards frames to named targets.
///
/// Cheap to clone; all clones share the same route table.
#[derive(Clone)]
pub struct Forwarder {
    routes: Arc<RouteTable>,
}

impl Forwarder {
    pub fn new(routes: Arc<RouteTable>) -> Self {
        Self { routes }
    }

    /// The route table this forwarder resolves targets against.
    pub fn routes(&self) -> &Arc<RouteTable> {
        &self.routes
    }

    /// Writes `frame` to the endpoint registered for `target`.
    ///
    /// # Errors
    ///
    /// - [`RouteError::NoRouteForTarget`] if `target` is not configured.
    /// - [`RouteError::TransportWrite`] if the endpoint write fails.
    pub async fn forward(&self, frame: &Frame, target: &str) -> Result<(), RouteError> {
        let sink = self
            .routes
            .endpoint(target)
            .ok_or_else(|| RouteError::NoRouteForTarget(target.to_string()))?;

        sink.send_frame(frame)
            .await
            .map_err(|source| RouteError::TransportWrite {
                target: target.to_string(),
                source,
            })?;

        debug!(camera = %target, "sent {frame:?}");
        Ok(())
    }

    /// Forwards `frame` to whichever target is current at the moment of the
    /// call and returns that target's name.
    ///
    /// The target is read once; a concurrent target switch affects the next
    /// frame, never a frame already in flight.
    pub async fn forward_to_current(&self, frame: &Frame) -> Result<String, RouteError> {
        let target = self.routes.current_target().await;
        self.forward(frame, &target).await?;
        Ok(target)
    }

    /// Writes `frame` to every configured target.
    ///
    /// Each write is attempted regardless of earlier failures.
    pub async fn fan_out(&self, frame: &Frame) -> FanOutReport {
        let mut report = FanOutReport::default();
        for target in self.routes.targets() {
            match self.forward(frame, target).await {
                Ok(()) => report.delivered.push(target.to_string()),
                Err(e) => {
                    warn!("fan-out: {e}");
                    report.failed.push(e);
                }
            }
        }
        report
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

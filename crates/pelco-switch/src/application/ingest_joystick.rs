//! IngestJoystickUseCase: reads the joystick stream and forwards every frame.
//!
//! The joystick port is an unframed byte stream.  Bytes are read in whatever
//! chunks the OS delivers, run through a [`FrameSynchronizer`], and every
//! frame that falls out is forwarded verbatim to the *current* target.
//!
//! A forwarding failure drops that single frame and is logged; ingestion
//! keeps going.  Only end-of-stream or a read error stops the loop.
//!
//! The reader is any `AsyncRead`, so tests drive the loop from an in-memory
//! script instead of a serial port.

use std::sync::Arc;

use pelco_core::FrameSynchronizer;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, error, info, trace, warn};

use crate::application::route_frames::Forwarder;

/// Size of a single read from the joystick port.
const READ_CHUNK: usize = 256;

/// Counters describing one ingestion run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestSummary {
    /// Frames written to a camera.
    pub frames_forwarded: u64,
    /// Frames extracted but not delivered (write failure).
    pub frames_dropped: u64,
    /// Bytes thrown away while waiting for a sync byte.
    pub bytes_discarded: u64,
    /// `true` if the run ended on a read error rather than end-of-stream.
    pub ended_by_error: bool,
}

/// Joystick ingestion state: one synchroniser and its running counters.
pub struct IngestJoystickUseCase {
    sync: FrameSynchronizer,
    forwarder: Arc<Forwarder>,
    summary: IngestSummary,
}

impl IngestJoystickUseCase {
    pub fn new(forwarder: Arc<Forwarder>) -> Self {
        Self {
            sync: FrameSynchronizer::new(),
            forwarder,
            summary: IngestSummary::default(),
        }
    }

    /// Counters accumulated so far.
    pub fn summary(&self) -> IngestSummary {
        IngestSummary {
            bytes_discarded: self.sync.discarded(),
            ..self.summary
        }
    }

    /// Processes one chunk read from the joystick.
    ///
    /// Frames are forwarded in arrival order; the current target is looked
    /// up separately for each frame.
    pub async fn handle_bytes(&mut self, bytes: &[u8]) {
        trace!("joystick rx {} bytes: {:02X?}", bytes.len(), bytes);

        for frame in self.sync.feed(bytes) {
            match self.forwarder.forward_to_current(&frame).await {
                Ok(target) => {
                    self.summary.frames_forwarded += 1;
                    debug!("joystick -> {target}: {frame}");
                }
                Err(e) => {
                    self.summary.frames_dropped += 1;
                    warn!("dropping joystick frame {frame:?}: {e}");
                }
            }
        }
    }

    /// Reads `reader` until end-of-stream or a read error.
    ///
    /// Never returns early on a forwarding failure.
    pub async fn run<R>(mut self, mut reader: R) -> IngestSummary
    where
        R: AsyncRead + Unpin,
    {
        let mut buf = [0u8; READ_CHUNK];
        loop {
            match reader.read(&mut buf).await {
                Ok(0) => {
                    info!("joystick stream closed");
                    break;
                }
                Ok(n) => self.handle_bytes(&buf[..n]).await,
                Err(e) => {
                    error!("joystick read failed: {e}");
                    self.summary.ended_by_error = true;
                    break;
                }
            }
        }

        let summary = self.summary();
        info!(
            forwarded = summary.frames_forwarded,
            dropped = summary.frames_dropped,
            discarded = summary.bytes_discarded,
            "joystick ingestion stopped"
        );
        summary
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

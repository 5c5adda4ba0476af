//! Serial-port adapters.
//!
//! Cameras are outputs: each one gets a [`StreamSink`] that implements
//! [`FrameSink`] over an async writer.  The joystick is an input: it is opened
//! as a plain [`SerialStream`] and handed to the ingestion use case as an
//! `AsyncRead`.
//!
//! # Why a Mutex around the port? (for beginners)
//!
//! Joystick frames and HTTP preset commands can target the same camera at the
//! same time.  Writing seven bytes takes more than one syscall in the worst
//! case, so two unsynchronised writers could interleave their bytes and the
//! camera would see garbage.  Holding a `tokio::sync::Mutex` for the whole
//! `write_all` + `flush` makes each frame land on the wire contiguously.

use std::collections::BTreeMap;
use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use pelco_core::Frame;
use thiserror::Error;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;
use tokio_serial::{SerialPortBuilderExt, SerialStream};
use tracing::info;

use crate::application::route_frames::FrameSink;
use crate::infrastructure::storage::config::CameraEntry;

/// Error raised while opening a serial device.
#[derive(Debug, Error)]
#[error("failed to open serial port {path}: {source}")]
pub struct OpenError {
    pub path: String,
    #[source]
    pub source: tokio_serial::Error,
}

/// A [`FrameSink`] over any async byte writer.
pub struct StreamSink<W> {
    port: Mutex<W>,
}

/// A camera output on a real serial port.
pub type SerialSink = StreamSink<SerialStream>;

impl<W> StreamSink<W> {
    pub fn new(port: W) -> Self {
        Self {
            port: Mutex::new(port),
        }
    }
}

#[async_trait]
impl<W> FrameSink for StreamSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn send_frame(&self, frame: &Frame) -> io::Result<()> {
        let mut port = self.port.lock().await;
        port.write_all(frame.as_bytes()).await?;
        port.flush().await
    }
}

/// Opens `path` as an 8N1 serial stream at `baud_rate`.
pub fn open_port(path: &str, baud_rate: u32) -> Result<SerialStream, OpenError> {
    tokio_serial::new(path, baud_rate)
        .open_native_async()
        .map_err(|source| OpenError {
            path: path.to_string(),
            source,
        })
}

/// Opens one output per configured camera, keyed by camera name.
///
/// Fails on the first port that cannot be opened.
pub fn open_camera_endpoints(
    cameras: &[CameraEntry],
    baud_rate: u32,
) -> Result<BTreeMap<String, Arc<dyn FrameSink>>, OpenError> {
    let mut endpoints: BTreeMap<String, Arc<dyn FrameSink>> = BTreeMap::new();
    for camera in cameras {
        let port = open_port(&camera.port, baud_rate)?;
        info!("camera {} on {} @ {baud_rate} baud", camera.name, camera.port);
        endpoints.insert(camera.name.clone(), Arc::new(SerialSink::new(port)));
    }
    Ok(endpoints)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use tokio::io::AsyncReadExt;

    use super::*;

    const PAN_LEFT: [u8; 7] = [0xFF, 0x01, 0x00, 0x04, 0x20, 0x00, 0x25];

    #[tokio::test]
    async fn test_stream_sink_writes_whole_frame() {
        // Arrange
        let (writer, mut reader) = tokio::io::duplex(64);
        let sink = StreamSink::new(writer);
        let frame = Frame::from_bytes(PAN_LEFT).unwrap();

        // Act
        sink.send_frame(&frame).await.unwrap();

        // Assert
        let mut received = [0u8; 7];
        reader.read_exact(&mut received).await.unwrap();
        assert_eq!(received, PAN_LEFT);
    }

    #[tokio::test]
    async fn test_concurrent_writers_never_interleave_frames() {
        // Arrange – a tiny pipe forces writes to be split across polls.
        let (writer, mut reader) = tokio::io::duplex(3);
        let sink = Arc::new(StreamSink::new(writer));
        let a = Frame::new(0x01, 0x00, 0x07, 0x00, 0x01);
        let b = Frame::new(0x02, 0x00, 0x03, 0x00, 0x02);

        // Act
        let mut tasks = Vec::new();
        for i in 0..20 {
            let sink = sink.clone();
            let frame = if i % 2 == 0 { a } else { b };
            tasks.push(tokio::spawn(async move { sink.send_frame(&frame).await }));
        }
        let mut received = vec![0u8; 20 * 7];
        reader.read_exact(&mut received).await.unwrap();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        // Assert – every 7-byte window is one of the two frames.
        for chunk in received.chunks(7) {
            assert!(chunk == a.as_bytes() || chunk == b.as_bytes(), "torn frame: {chunk:02X?}");
        }
    }

    #[tokio::test]
    async fn test_write_to_closed_pipe_fails() {
        let (writer, reader) = tokio::io::duplex(64);
        drop(reader);
        let sink = StreamSink::new(writer);

        let result = sink.send_frame(&Frame::from_bytes(PAN_LEFT).unwrap()).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_open_missing_device_reports_path() {
        let err = open_port("/dev/pelco-switch-does-not-exist", 2400)
            .err()
            .expect("opening a missing device must fail");
        assert_eq!(err.path, "/dev/pelco-switch-does-not-exist");
        assert!(err.to_string().contains("/dev/pelco-switch-does-not-exist"));
    }
}

//! The Pelco-D frame: a fixed 7-byte serial packet.
//!
//! Wire format:
//! ```text
//! [sync:1][address:1][cmd1:1][cmd2:1][data1:1][data2:1][checksum:1]
//! ```
//! The sync byte is always `0xFF`.  The checksum is the sum of bytes 1..=5
//! modulo 256; the sync byte is not included.
//!
//! # Why no length prefix? (for beginners)
//!
//! Pelco-D was designed for RS-485 links between a keyboard and a camera.
//! Every packet has the same length, so the receiver only needs to find the
//! sync byte and count seven bytes.  This makes the protocol trivial to
//! implement on a microcontroller, but it also means a receiver that starts
//! listening in the middle of a packet must *resynchronise* by skipping bytes
//! until it sees `0xFF` again.  See [`crate::protocol::synchronizer`].

use std::fmt;

use thiserror::Error;

/// The byte every Pelco-D frame starts with.
pub const SYNC_BYTE: u8 = 0xFF;

/// Total length of a Pelco-D frame in bytes, including sync and checksum.
pub const FRAME_LEN: usize = 7;

/// Errors raised while constructing Pelco-D frames.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// The first byte of a candidate frame is not [`SYNC_BYTE`].
    #[error("missing sync byte: expected 0xFF, got 0x{0:02X}")]
    MissingSync(u8),

    /// A preset number outside the range `1..=255` was requested.
    #[error("Invalid preset: {0} (must be 1-255)")]
    InvalidPreset(i64),
}

/// A single 7-byte Pelco-D frame.
///
/// The only invariant enforced by the type is the leading sync byte.  The
/// checksum is *not* verified on construction: frames read from the joystick
/// are forwarded verbatim, and a bad checksum is the camera's problem.  Use
/// [`Frame::has_valid_checksum`] when that matters.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Frame([u8; FRAME_LEN]);

impl Frame {
    /// Wraps raw bytes as a frame.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::MissingSync`] if `bytes[0]` is not `0xFF`.
    pub fn from_bytes(bytes: [u8; FRAME_LEN]) -> Result<Self, ProtocolError> {
        if bytes[0] != SYNC_BYTE {
            return Err(ProtocolError::MissingSync(bytes[0]));
        }
        Ok(Self(bytes))
    }

    /// Builds a frame from its five payload fields and appends the checksum.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pelco_core::Frame;
    ///
    /// let frame = Frame::new(0x01, 0x00, 0x07, 0x00, 0x05);
    /// assert_eq!(frame.as_bytes(), &[0xFF, 0x01, 0x00, 0x07, 0x00, 0x05, 0x0D]);
    /// assert!(frame.has_valid_checksum());
    /// ```
    pub fn new(address: u8, cmd1: u8, cmd2: u8, data1: u8, data2: u8) -> Self {
        let mut bytes = [SYNC_BYTE, address, cmd1, cmd2, data1, data2, 0x00];
        bytes[6] = compute_checksum(&bytes[1..6]);
        Self(bytes)
    }

    /// Camera address the frame is directed at.
    pub fn address(&self) -> u8 {
        self.0[1]
    }

    pub fn cmd1(&self) -> u8 {
        self.0[2]
    }

    pub fn cmd2(&self) -> u8 {
        self.0[3]
    }

    pub fn data1(&self) -> u8 {
        self.0[4]
    }

    pub fn data2(&self) -> u8 {
        self.0[5]
    }

    /// The checksum byte as it appears on the wire (not recomputed).
    pub fn checksum(&self) -> u8 {
        self.0[6]
    }

    /// Returns `true` when the trailing byte matches the sum of bytes 1..=5.
    pub fn has_valid_checksum(&self) -> bool {
        verify_checksum(&self.0)
    }

    /// Raw wire bytes, ready to be written to a serial port.
    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.0
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame(")?;
        for (i, b) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{b:02X}")?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "addr={:02X} cmd1={:02X} cmd2={:02X} data1={:02X} data2={:02X}",
            self.address(),
            self.cmd1(),
            self.cmd2(),
            self.data1(),
            self.data2()
        )
    }
}

/// Sums `payload` modulo 256.
///
/// Callers pass bytes 1..=5 of a frame (address through data2).
pub fn compute_checksum(payload: &[u8]) -> u8 {
    payload.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
}

/// Checks the trailing checksum byte of a complete frame.
pub fn verify_checksum(bytes: &[u8; FRAME_LEN]) -> bool {
    compute_checksum(&bytes[1..6]) == bytes[6]
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! # pelco-core
//!
//! Shared library for the Pelco-D joystick switch containing the frame type,
//! the byte-stream synchroniser, and the preset command encoder.
//!
//! It has no dependencies on serial ports, async runtimes, or HTTP.  The
//! `pelco-switch` binary crate wires these pieces to real devices.
//!
//! # Architecture overview (for beginners)
//!
//! A PTZ (pan/tilt/zoom) camera joystick speaks Pelco-D: a fixed 7-byte
//! serial packet that starts with `0xFF` and ends with a checksum.  The switch
//! sits between one joystick and several cameras and decides, frame by frame,
//! which camera receives the joystick's commands.
//!
//! - **`protocol::frame`** – The [`Frame`] type and checksum helpers.
//!
//! - **`protocol::synchronizer`** – [`FrameSynchronizer`] turns an unframed
//!   serial byte stream into frames, skipping line noise until it finds the
//!   next sync byte.
//!
//! - **`protocol::command`** – Builds the preset save/goto frames that the
//!   HTTP control plane sends on behalf of an operator.

pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `pelco_core::Frame` instead of `pelco_core::protocol::frame::Frame`.
pub use protocol::command::{build_preset, PresetAction};
pub use protocol::frame::{Frame, ProtocolError, FRAME_LEN, SYNC_BYTE};
pub use protocol::synchronizer::{FrameSynchronizer, SyncState};

//! Pelco-D protocol: the frame type, the stream synchroniser, and the preset
//! command encoder.

pub mod command;
pub mod frame;
pub mod synchronizer;

pub use command::{build_preset, PresetAction, CMD2_GOTO_PRESET, CMD2_SET_PRESET};
pub use frame::{compute_checksum, verify_checksum, Frame, ProtocolError, FRAME_LEN, SYNC_BYTE};
pub use synchronizer::{FrameSynchronizer, Frames, SyncState};

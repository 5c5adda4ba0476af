//! Synthetic Pelco-D command frames issued by the control plane.
//!
//! Only the two preset commands are encoded here.  Every other command the
//! cameras understand comes from the joystick and is forwarded untouched.
//!
//! ```text
//! [0xFF][address][0x00][cmd2][0x00][preset][checksum]
//! ```

use crate::protocol::frame::{Frame, ProtocolError};

/// `cmd2` value for "set preset" (store the current position).
pub const CMD2_SET_PRESET: u8 = 0x03;

/// `cmd2` value for "go to preset".
pub const CMD2_GOTO_PRESET: u8 = 0x07;

/// Lowest preset number accepted by [`build_preset`].
pub const MIN_PRESET: i64 = 1;

/// Highest preset number accepted by [`build_preset`].
pub const MAX_PRESET: i64 = 255;

/// The preset operations exposed by the control surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetAction {
    /// Store the camera's current position under a preset number.
    Save,
    /// Move the camera to a stored preset.
    Goto,
}

impl PresetAction {
    /// The `cmd2` byte for this action.
    pub fn cmd2(self) -> u8 {
        match self {
            PresetAction::Save => CMD2_SET_PRESET,
            PresetAction::Goto => CMD2_GOTO_PRESET,
        }
    }

    /// Name used in control-plane responses.
    pub fn as_str(self) -> &'static str {
        match self {
            PresetAction::Save => "save",
            PresetAction::Goto => "goto",
        }
    }

    /// Builds the frame for this action.
    ///
    /// # Errors
    ///
    /// See [`build_preset`].
    pub fn frame(self, address: u8, preset_id: i64) -> Result<Frame, ProtocolError> {
        build_preset(address, self.cmd2(), preset_id)
    }
}

/// Builds a preset command frame.
///
/// `cmd2` is passed through as-is; use [`CMD2_SET_PRESET`] or
/// [`CMD2_GOTO_PRESET`].
///
/// # Errors
///
/// Returns [`ProtocolError::InvalidPreset`] if `preset_id` is outside
/// `1..=255`.  Nothing is encoded in that case.
///
/// # Examples
///
/// ```rust
/// use pelco_core::protocol::command::{build_preset, CMD2_SET_PRESET};
///
/// let frame = build_preset(1, CMD2_SET_PRESET, 5).unwrap();
/// assert_eq!(frame.as_bytes(), &[0xFF, 0x01, 0x00, 0x03, 0x00, 0x05, 0x09]);
///
/// assert!(build_preset(1, CMD2_SET_PRESET, 0).is_err());
/// ```
pub fn build_preset(address: u8, cmd2: u8, preset_id: i64) -> Result<Frame, ProtocolError> {
    let preset = u8::try_from(preset_id)
        .ok()
        .filter(|p| i64::from(*p) >= MIN_PRESET)
        .ok_or(ProtocolError::InvalidPreset(preset_id))?;

    Ok(Frame::new(address, 0x00, cmd2, 0x00, preset))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

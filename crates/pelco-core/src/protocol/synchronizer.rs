//! Extracts Pelco-D frames from an unframed serial byte stream.
//!
//! # How resynchronisation works (for beginners)
//!
//! A serial port delivers bytes in whatever chunks the OS hands us.  A chunk
//! can hold half a frame, three frames, or line noise.  The synchroniser is a
//! two-state machine:
//!
//! ```text
//!            non-0xFF byte (dropped)
//!               ┌──────┐
//!               ▼      │
//!         ┌────────────┴┐  0xFF   ┌────────────┐
//!  ──────►│ AWAIT_SYNC  ├────────►│ COLLECTING │──┐ any byte
//!         └─────────────┘         └─────┬──────┘◄─┘ (until 7 held)
//!               ▲                       │
//!               └────── emit frame ─────┘
//! ```
//!
//! Bytes that arrive while waiting for a sync byte are discarded one at a
//! time, so after any corruption the stream realigns on the next `0xFF`.
//! Once a sync byte is seen, the following six bytes complete the frame no
//! matter what their values are; the checksum is not checked here.
//!
//! The assembly buffer is a fixed `[u8; 7]`: the synchroniser never holds more
//! than six bytes between calls and never allocates.

use tracing::trace;

use crate::protocol::frame::{Frame, FRAME_LEN, SYNC_BYTE};

/// Where the synchroniser is within the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Discarding bytes until the next `0xFF`.
    AwaitSync,
    /// A sync byte was seen; holding this many bytes of the frame (1..=6).
    Collecting(usize),
}

/// Stateful Pelco-D frame extractor.
///
/// # Examples
///
/// ```rust
/// use pelco_core::FrameSynchronizer;
///
/// let mut sync = FrameSynchronizer::new();
///
/// // Two junk bytes, then one complete frame.
/// let frames: Vec<_> = sync
///     .feed(&[0x01, 0x02, 0xFF, 0x01, 0x00, 0x04, 0x20, 0x00, 0x25])
///     .collect();
///
/// assert_eq!(frames.len(), 1);
/// assert_eq!(sync.discarded(), 2);
/// ```
#[derive(Debug)]
pub struct FrameSynchronizer {
    buf: [u8; FRAME_LEN],
    len: usize,
    discarded: u64,
}

impl FrameSynchronizer {
    /// Creates a synchroniser in the `AwaitSync` state.
    pub fn new() -> Self {
        Self {
            buf: [0u8; FRAME_LEN],
            len: 0,
            discarded: 0,
        }
    }

    /// Feeds a chunk of bytes and returns an iterator over the frames it
    /// completes.
    ///
    /// Bytes are processed lazily as the iterator advances.  If the iterator
    /// is dropped early, the remaining bytes are still run through the state
    /// machine so framing stays aligned with the stream, but frames completed
    /// that way are lost.  Always drain the iterator.
    pub fn feed<'a>(&'a mut self, bytes: &'a [u8]) -> Frames<'a> {
        Frames {
            sync: self,
            input: bytes,
        }
    }

    /// Current state of the frame assembly.
    pub fn state(&self) -> SyncState {
        match self.len {
            0 => SyncState::AwaitSync,
            n => SyncState::Collecting(n),
        }
    }

    /// Number of bytes held towards an incomplete frame.  Never exceeds 6.
    pub fn pending(&self) -> usize {
        self.len
    }

    /// Total number of bytes dropped while waiting for a sync byte.
    pub fn discarded(&self) -> u64 {
        self.discarded
    }

    /// Drops any partial frame and returns to `AwaitSync`.
    ///
    /// The `discarded` counter is kept.
    pub fn reset(&mut self) {
        self.len = 0;
    }

    fn push(&mut self, byte: u8) -> Option<Frame> {
        if self.len == 0 && byte != SYNC_BYTE {
            self.discarded += 1;
            trace!("desync: dropped byte 0x{byte:02X} while awaiting sync");
            return None;
        }

        self.buf[self.len] = byte;
        self.len += 1;

        if self.len < FRAME_LEN {
            return None;
        }

        self.len = 0;
        // buf[0] is always SYNC_BYTE here, so this cannot fail.
        Frame::from_bytes(self.buf).ok()
    }
}

impl Default for FrameSynchronizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator returned by [`FrameSynchronizer::feed`].
#[must_use = "frames are only extracted as the iterator is advanced"]
pub struct Frames<'a> {
    sync: &'a mut FrameSynchronizer,
    input: &'a [u8],
}

impl Iterator for Frames<'_> {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        while let Some((&byte, rest)) = self.input.split_first() {
            self.input = rest;
            if let Some(frame) = self.sync.push(byte) {
                return Some(frame);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some((self.sync.len + self.input.len()) / FRAME_LEN))
    }
}

impl Drop for Frames<'_> {
    fn drop(&mut self) {
        for byte in std::mem::take(&mut self.input) {
            let _ = self.sync.push(*byte);
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const PAN_RIGHT: [u8; 7] = [0xFF, 0x01, 0x00, 0x02, 0x20, 0x00, 0x23];
    const STOP: [u8; 7] = [0xFF, 0x01, 0x00, 0x00, 0x00, 0x00, 0x01];

    #[test]
    fn test_single_clean_frame_is_emitted() {
        // Arrange
        let mut sync = FrameSynchronizer::new();

        // Act
        let frames: Vec<Frame> = sync.feed(&PAN_RIGHT).collect();

        // Assert
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].as_bytes(), &PAN_RIGHT);
        assert_eq!(sync.state(), SyncState::AwaitSync);
        assert_eq!(sync.discarded(), 0);
    }

    #[test]
    fn test_leading_junk_is_discarded() {
        // Arrange
        let mut sync = FrameSynchronizer::new();
        let mut input = vec![0x01, 0x02];
        input.extend_from_slice(&PAN_RIGHT);

        // Act
        let frames: Vec<Frame> = sync.feed(&input).collect();

        // Assert
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].as_bytes(), &PAN_RIGHT);
        assert_eq!(sync.discarded(), 2);
    }

    #[test]
    fn test_frame_split_across_chunks_is_reassembled() {
        // Arrange
        let mut sync = FrameSynchronizer::new();

        // Act
        let first: Vec<Frame> = sync.feed(&PAN_RIGHT[..3]).collect();
        let state_between = sync.state();
        let second: Vec<Frame> = sync.feed(&PAN_RIGHT[3..]).collect();

        // Assert
        assert!(first.is_empty());
        assert_eq!(state_between, SyncState::Collecting(3));
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].as_bytes(), &PAN_RIGHT);
    }

    #[test]
    fn test_back_to_back_frames_in_one_chunk() {
        let mut sync = FrameSynchronizer::new();
        let mut input = PAN_RIGHT.to_vec();
        input.extend_from_slice(&STOP);

        let frames: Vec<Frame> = sync.feed(&input).collect();

        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].as_bytes(), &PAN_RIGHT);
        assert_eq!(frames[1].as_bytes(), &STOP);
    }

    #[test]
    fn test_sync_byte_inside_payload_does_not_restart_frame() {
        // A data byte of 0xFF is legal (e.g. max speed); it must not be
        // mistaken for the start of a new frame.
        let bytes = [0xFF, 0x01, 0x00, 0x04, 0xFF, 0x00, 0x04];
        let mut sync = FrameSynchronizer::new();

        let frames: Vec<Frame> = sync.feed(&bytes).collect();

        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].data1(), 0xFF);
    }

    #[test]
    fn test_continuous_noise_is_never_retained() {
        let mut sync = FrameSynchronizer::new();
        let noise = vec![0x55u8; 10_000];

        let frames: Vec<Frame> = sync.feed(&noise).collect();

        assert!(frames.is_empty());
        assert_eq!(sync.pending(), 0);
        assert_eq!(sync.discarded(), 10_000);
    }

    #[test]
    fn test_bad_checksum_frame_is_passed_through() {
        let corrupt = [0xFF, 0x01, 0x00, 0x02, 0x20, 0x00, 0x99];
        let mut sync = FrameSynchronizer::new();

        let frames: Vec<Frame> = sync.feed(&corrupt).collect();

        assert_eq!(frames.len(), 1);
        assert!(!frames[0].has_valid_checksum());
    }

    #[test]
    fn test_dropped_iterator_keeps_stream_aligned() {
        // Arrange – two frames in one chunk, only the first is pulled.
        let mut sync = FrameSynchronizer::new();
        let mut input = PAN_RIGHT.to_vec();
        input.extend_from_slice(&STOP[..4]);

        // Act
        let first = sync.feed(&input).next();
        let rest: Vec<Frame> = sync.feed(&STOP[4..]).collect();

        // Assert – the tail of STOP still completes the second frame.
        assert_eq!(first.map(|f| *f.as_bytes()), Some(PAN_RIGHT));
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].as_bytes(), &STOP);
    }

    #[test]
    fn test_reset_drops_partial_frame() {
        let mut sync = FrameSynchronizer::new();
        let _: Vec<Frame> = sync.feed(&PAN_RIGHT[..4]).collect();

        sync.reset();

        assert_eq!(sync.state(), SyncState::AwaitSync);
        assert_eq!(sync.pending(), 0);
    }

    #[test]
    fn test_default_starts_awaiting_sync() {
        let sync = FrameSynchronizer::default();
        assert_eq!(sync.state(), SyncState::AwaitSync);
    }
}

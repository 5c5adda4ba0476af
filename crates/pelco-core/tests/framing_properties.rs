//! Integration tests for the pelco-core public API.
//!
//! These tests exercise the synchroniser and the command encoder together
//! through the crate root re-exports, the same way `pelco-switch` uses them.

use pelco_core::protocol::command::{CMD2_GOTO_PRESET, CMD2_SET_PRESET};
use pelco_core::protocol::frame::verify_checksum;
use pelco_core::{build_preset, Frame, FrameSynchronizer, ProtocolError, FRAME_LEN, SYNC_BYTE};

/// Small deterministic xorshift generator so the stream tests are repeatable.
struct XorShift(u32);

impl XorShift {
    fn next_byte(&mut self) -> u8 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        (x >> 24) as u8
    }
}

fn random_bytes(seed: u32, len: usize) -> Vec<u8> {
    let mut rng = XorShift(seed);
    (0..len).map(|_| rng.next_byte()).collect()
}

// ── Synchroniser ──────────────────────────────────────────────────────────────

#[test]
fn test_every_emitted_frame_starts_with_sync_and_is_seven_bytes() {
    for seed in 1..=32u32 {
        // Arrange – random noise with a sprinkling of sync bytes
        let input = random_bytes(seed, 4096);
        let mut sync = FrameSynchronizer::new();

        // Act – feed in uneven chunk sizes
        let mut frames = Vec::new();
        for chunk in input.chunks((seed as usize % 13) + 1) {
            frames.extend(sync.feed(chunk));
        }

        // Assert
        for frame in &frames {
            assert_eq!(frame.as_bytes()[0], SYNC_BYTE);
            assert_eq!(frame.as_bytes().len(), FRAME_LEN);
        }
        assert!(sync.pending() < FRAME_LEN);
    }
}

#[test]
fn test_resync_after_two_junk_bytes_yields_exactly_one_frame() {
    // Arrange
    let (a, b, c, d, e) = (0x01, 0x00, 0x04, 0x20, 0x00);
    let checksum = pelco_core::protocol::compute_checksum(&[a, b, c, d, e]);
    let input = [0x01, 0x02, 0xFF, a, b, c, d, e, checksum];
    let mut sync = FrameSynchronizer::new();

    // Act
    let frames: Vec<Frame> = sync.feed(&input).collect();
    let later: Vec<Frame> = sync.feed(&[]).collect();

    // Assert
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].as_bytes(), &[0xFF, a, b, c, d, e, checksum]);
    assert_eq!(sync.discarded(), 2);
    assert!(later.is_empty(), "junk bytes must never be re-emitted");
}

#[test]
fn test_byte_at_a_time_matches_single_chunk() {
    let mut input = random_bytes(7, 64);
    input.extend_from_slice(build_preset(1, CMD2_GOTO_PRESET, 3).unwrap().as_bytes());
    input.extend_from_slice(&random_bytes(11, 64));

    let mut whole = FrameSynchronizer::new();
    let expected: Vec<Frame> = whole.feed(&input).collect();

    let mut trickle = FrameSynchronizer::new();
    let mut actual = Vec::new();
    for byte in &input {
        actual.extend(trickle.feed(std::slice::from_ref(byte)));
    }

    assert_eq!(actual, expected);
    assert_eq!(trickle.discarded(), whole.discarded());
}

// ── Command encoder ───────────────────────────────────────────────────────────

#[test]
fn test_build_preset_checksum_verifies_for_every_input() {
    for address in 0..=255u8 {
        for cmd2 in 0..=255u8 {
            for preset in 1..=255i64 {
                let frame = build_preset(address, cmd2, preset).unwrap();
                assert!(
                    verify_checksum(frame.as_bytes()),
                    "bad checksum for addr={address} cmd2={cmd2} preset={preset}"
                );
            }
        }
    }
}

#[test]
fn test_build_preset_rejects_out_of_range_ids() {
    assert_eq!(
        build_preset(1, CMD2_SET_PRESET, 0),
        Err(ProtocolError::InvalidPreset(0))
    );
    assert_eq!(
        build_preset(1, CMD2_SET_PRESET, 256),
        Err(ProtocolError::InvalidPreset(256))
    );
}

#[test]
fn test_synthesised_frame_survives_the_synchroniser() {
    // A frame built by the encoder and sent through the same path as joystick
    // traffic must come out byte-identical.
    let frame = build_preset(2, CMD2_SET_PRESET, 42).unwrap();
    let mut sync = FrameSynchronizer::new();

    let out: Vec<Frame> = sync.feed(frame.as_bytes()).collect();

    assert_eq!(out, vec![frame]);
}

//! Burst cursor unit tests.
//!
//! Verifies the validation order, the wrapping and incrementing beat
//! sequences, and the window-cycle law for wrapping bursts.

use ahbsim_core::fabric::BurstCursor;
use ahbsim_core::{BeatSize, BurstKind, TransferError};
use proptest::prelude::*;
use rstest::rstest;

fn sequence(mut cursor: BurstCursor) -> Vec<u32> {
    let mut seen = Vec::new();
    for _ in 0..cursor.total() {
        seen.push(cursor.addr());
        cursor.advance();
    }
    seen
}

// ══════════════════════════════════════════════════════════
// 1. Validation
// ══════════════════════════════════════════════════════════

#[rstest]
#[case::doubleword_on_word_path(BeatSize::Doubleword, 32)]
#[case::line_on_doubleword_path(BeatSize::Line4, 64)]
#[case::word_on_byte_path(BeatSize::Word, 8)]
fn rejects_beats_wider_than_the_data_path(#[case] size: BeatSize, #[case] width_bits: u32) {
    let result = BurstCursor::first(0x0, size, BurstKind::Single, 1, width_bits);
    assert!(matches!(result, Err(TransferError::SizeTooWide { .. })));
}

#[test]
fn width_check_runs_before_alignment() {
    // Misaligned as well, but the width failure wins.
    let result = BurstCursor::first(0x3, BeatSize::Doubleword, BurstKind::Single, 1, 32);
    assert!(matches!(result, Err(TransferError::SizeTooWide { .. })));
}

#[rstest]
#[case::word_off_by_two(0xF000_0002, BeatSize::Word)]
#[case::word_off_by_one(0xF000_0001, BeatSize::Word)]
#[case::halfword_odd(0x0000_1001, BeatSize::Halfword)]
fn rejects_misaligned_addresses(#[case] addr: u32, #[case] size: BeatSize) {
    let result = BurstCursor::first(addr, size, BurstKind::Incr, 4, 32);
    assert!(matches!(result, Err(TransferError::MisalignedAddress { .. })));
}

#[test]
fn alignment_check_runs_before_the_window_check() {
    // 0x301 is both unaligned and off its Incr4 window base.
    let result = BurstCursor::first(0x301, BeatSize::Word, BurstKind::Incr4, 4, 32);
    assert!(matches!(
        result,
        Err(TransferError::MisalignedAddress { .. })
    ));
}

#[test]
fn fixed_incrementing_bursts_must_start_at_their_window() {
    // Incr4 x word spans 16 bytes; 0x304 sits mid-window.
    let result = BurstCursor::first(0xF000_0304, BeatSize::Word, BurstKind::Incr4, 4, 32);
    assert!(matches!(result, Err(TransferError::MisalignedBurst { .. })));
}

#[test]
fn wrapping_bursts_may_start_anywhere_in_the_window() {
    let cursor = BurstCursor::first(0xF000_0304, BeatSize::Word, BurstKind::Wrap4, 4, 32);
    assert!(cursor.is_ok());
}

#[test]
fn bytes_are_never_misaligned() {
    let cursor = BurstCursor::first(0xFFFF_FFFF, BeatSize::Byte, BurstKind::Single, 1, 32);
    assert!(cursor.is_ok());
}

// ══════════════════════════════════════════════════════════
// 2. Beat sequences
// ══════════════════════════════════════════════════════════

#[test]
fn single_issues_one_beat() {
    let cursor = BurstCursor::first(0x80, BeatSize::Word, BurstKind::Single, 1, 32).unwrap();
    assert_eq!(cursor.total(), 1);
    assert_eq!(sequence(cursor), vec![0x80]);
}

#[test]
fn wrap4_halfword_wraps_back_to_the_window_base() {
    let cursor = BurstCursor::first(0x316, BeatSize::Halfword, BurstKind::Wrap4, 4, 32).unwrap();
    assert_eq!(sequence(cursor), vec![0x316, 0x310, 0x312, 0x314]);
}

#[test]
fn wrap8_word_from_the_penultimate_slot() {
    let cursor = BurstCursor::first(0x38, BeatSize::Word, BurstKind::Wrap8, 8, 32).unwrap();
    assert_eq!(
        sequence(cursor),
        vec![0x38, 0x3C, 0x20, 0x24, 0x28, 0x2C, 0x30, 0x34]
    );
}

#[test]
fn incr16_byte_walks_the_window_in_order() {
    let cursor = BurstCursor::first(0x100, BeatSize::Byte, BurstKind::Incr16, 16, 32).unwrap();
    let expect: Vec<u32> = (0x100..0x110).collect();
    assert_eq!(sequence(cursor), expect);
}

#[test]
fn open_incr_crosses_the_top_of_the_address_space() {
    let cursor = BurstCursor::first(0xFFFF_FFF8, BeatSize::Word, BurstKind::Incr, 3, 32).unwrap();
    assert_eq!(sequence(cursor), vec![0xFFFF_FFF8, 0xFFFF_FFFC, 0x0]);
}

#[test]
fn open_incr_length_is_clamped_to_one_beat() {
    let cursor = BurstCursor::first(0x0, BeatSize::Word, BurstKind::Incr, 0, 32).unwrap();
    assert_eq!(cursor.total(), 1);
}

#[test]
fn declared_length_is_ignored_for_fixed_kinds() {
    let cursor = BurstCursor::first(0x40, BeatSize::Word, BurstKind::Wrap4, 99, 32).unwrap();
    assert_eq!(cursor.total(), 4);
}

#[test]
fn accepted_tracks_advances() {
    let mut cursor = BurstCursor::first(0x40, BeatSize::Word, BurstKind::Incr4, 4, 32).unwrap();
    assert_eq!((cursor.accepted(), cursor.remaining()), (0, 4));
    cursor.advance();
    cursor.advance();
    assert_eq!((cursor.accepted(), cursor.remaining()), (2, 2));
    cursor.advance();
    cursor.advance();
    assert_eq!((cursor.accepted(), cursor.remaining()), (4, 0));
}

// ══════════════════════════════════════════════════════════
// 3. Window-cycle law
// ══════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn wrapping_bursts_cycle_their_window(
        size_enc in 0u8..3,
        kind_pick in 0usize..3,
        slot in 0u32..0x1000,
        lane in any::<u8>(),
    ) {
        let size = BeatSize::from_encoding(size_enc).unwrap();
        let kind = [BurstKind::Wrap4, BurstKind::Wrap8, BurstKind::Wrap16][kind_pick];
        let beats = kind.beats().unwrap();
        let step = size.bytes();
        let span = beats * step;
        // Spans top out at 64 bytes, so a 64-byte-aligned base is window-aligned.
        let start = slot * 0x40 + (u32::from(lane) % beats) * step;

        let mut cursor = BurstCursor::first(start, size, kind, 1, 32).unwrap();
        let mut seen = Vec::new();
        for _ in 0..beats {
            seen.push(cursor.addr());
            cursor.advance();
        }

        // A full pass returns the cursor to its start address.
        prop_assert_eq!(cursor.addr(), start);
        prop_assert_eq!(seen[0], start);

        // Every beat lands in the same aligned window, none repeats, and
        // consecutive beats differ by one step modulo the window.
        let window_base = start & !(span - 1);
        for &addr in &seen {
            prop_assert_eq!(addr & !(span - 1), window_base);
        }
        let mut dedup = seen.clone();
        dedup.sort_unstable();
        dedup.dedup();
        prop_assert_eq!(dedup.len() as u32, beats);
        for pair in seen.windows(2) {
            let next = window_base + ((pair[0] - window_base + step) & (span - 1));
            prop_assert_eq!(pair[1], next);
        }
    }
}

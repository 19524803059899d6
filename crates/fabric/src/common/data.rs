//! Wire-level transfer encodings.
//!
//! This module defines the value types that travel on the fabric's ports. It provides:
//! 1. **Transfer Phase:** The per-cycle phase indicator driven by each master.
//! 2. **Burst Kind:** Fixed-length, wrapping, and open-ended burst encodings.
//! 3. **Beat Size:** Power-of-two transfer widths from one byte to 128 bytes.
//! 4. **Response:** The okay/error response driven back to each master.
//!
//! Encodings are bit-exact with the bus protocol so port values can be compared
//! against waveform dumps.

use std::fmt;

/// Transfer phase presented on a master port each cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TransType {
    /// No transfer this cycle.
    #[default]
    Idle,
    /// Burst continuation with the master inserting a wait cycle.
    ///
    /// The fabric holds the burst but accepts no beat while this is driven.
    Busy,
    /// First beat of a burst (or a stand-alone transfer).
    NonSeq,
    /// Subsequent beat of a burst.
    Seq,
}

impl TransType {
    /// Returns the two-bit wire encoding of this phase.
    #[inline(always)]
    pub const fn encoding(self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Busy => 1,
            Self::NonSeq => 2,
            Self::Seq => 3,
        }
    }

    /// Decodes a two-bit wire value into a transfer phase.
    pub const fn from_encoding(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Idle),
            1 => Some(Self::Busy),
            2 => Some(Self::NonSeq),
            3 => Some(Self::Seq),
            _ => None,
        }
    }

    /// Returns whether this phase requests a beat from a slave.
    #[inline(always)]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::NonSeq | Self::Seq)
    }
}

impl fmt::Display for TransType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "IDLE",
            Self::Busy => "BUSY",
            Self::NonSeq => "NONSEQ",
            Self::Seq => "SEQ",
        };
        write!(f, "{name}")
    }
}

/// Response driven back to a master for each data phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum HResp {
    /// The transfer completed (or is completing) normally.
    #[default]
    Okay,
    /// The transfer failed; driven for the two-cycle error response window.
    Error,
}

impl HResp {
    /// Returns the one-bit wire encoding of this response.
    #[inline(always)]
    pub const fn encoding(self) -> u8 {
        match self {
            Self::Okay => 0,
            Self::Error => 1,
        }
    }

    /// Returns whether this is the error response.
    #[inline(always)]
    pub const fn is_error(self) -> bool {
        matches!(self, Self::Error)
    }
}

/// Width of a single burst beat.
///
/// The wire encoding is the base-two logarithm of the byte count, so a
/// `Word` beat (4 bytes) encodes as 2. Encodings above the configured data
/// path width exist on the wire but are rejected per transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum BeatSize {
    /// 8-bit beat.
    #[default]
    Byte,
    /// 16-bit beat.
    Halfword,
    /// 32-bit beat.
    Word,
    /// 64-bit beat.
    Doubleword,
    /// 128-bit beat (4-word line).
    Line4,
    /// 256-bit beat (8-word line).
    Line8,
    /// 512-bit beat.
    Line16,
    /// 1024-bit beat.
    Line32,
}

impl BeatSize {
    /// Returns the three-bit wire encoding (log2 of the byte count).
    #[inline(always)]
    pub const fn encoding(self) -> u8 {
        match self {
            Self::Byte => 0,
            Self::Halfword => 1,
            Self::Word => 2,
            Self::Doubleword => 3,
            Self::Line4 => 4,
            Self::Line8 => 5,
            Self::Line16 => 6,
            Self::Line32 => 7,
        }
    }

    /// Decodes a three-bit wire value into a beat size.
    pub const fn from_encoding(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Byte),
            1 => Some(Self::Halfword),
            2 => Some(Self::Word),
            3 => Some(Self::Doubleword),
            4 => Some(Self::Line4),
            5 => Some(Self::Line8),
            6 => Some(Self::Line16),
            7 => Some(Self::Line32),
            _ => None,
        }
    }

    /// Returns the beat width in bytes (1 to 128).
    #[inline(always)]
    pub const fn bytes(self) -> u32 {
        1 << self.encoding()
    }

    /// Returns the beat width in bits (8 to 1024).
    #[inline(always)]
    pub const fn bits(self) -> u32 {
        8 << self.encoding()
    }

    /// Returns the data mask covering this beat's bytes in lane position zero.
    ///
    /// Beats wider than 64 bits saturate to a full mask; such beats are only
    /// reachable on data paths this model rejects per transfer.
    #[inline(always)]
    pub const fn lane_mask(self) -> u64 {
        let bits = self.bits();
        if bits >= 64 {
            u64::MAX
        } else {
            (1u64 << bits) - 1
        }
    }
}

impl fmt::Display for BeatSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-byte", self.bytes())
    }
}

/// Burst kind presented alongside the first beat of a transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BurstKind {
    /// Stand-alone single beat.
    #[default]
    Single,
    /// Open-ended incrementing burst; the length is declared by the issuer.
    Incr,
    /// 4-beat burst wrapping inside its aligned window.
    Wrap4,
    /// 4-beat incrementing burst.
    Incr4,
    /// 8-beat burst wrapping inside its aligned window.
    Wrap8,
    /// 8-beat incrementing burst.
    Incr8,
    /// 16-beat burst wrapping inside its aligned window.
    Wrap16,
    /// 16-beat incrementing burst.
    Incr16,
}

impl BurstKind {
    /// Returns the three-bit wire encoding of this burst kind.
    #[inline(always)]
    pub const fn encoding(self) -> u8 {
        match self {
            Self::Single => 0,
            Self::Incr => 1,
            Self::Wrap4 => 2,
            Self::Incr4 => 3,
            Self::Wrap8 => 4,
            Self::Incr8 => 5,
            Self::Wrap16 => 6,
            Self::Incr16 => 7,
        }
    }

    /// Decodes a three-bit wire value into a burst kind.
    pub const fn from_encoding(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Single),
            1 => Some(Self::Incr),
            2 => Some(Self::Wrap4),
            3 => Some(Self::Incr4),
            4 => Some(Self::Wrap8),
            5 => Some(Self::Incr8),
            6 => Some(Self::Wrap16),
            7 => Some(Self::Incr16),
            _ => None,
        }
    }

    /// Returns the beat count for fixed-length kinds, `None` for `Incr`.
    pub const fn beats(self) -> Option<u32> {
        match self {
            Self::Single => Some(1),
            Self::Incr => None,
            Self::Wrap4 | Self::Incr4 => Some(4),
            Self::Wrap8 | Self::Incr8 => Some(8),
            Self::Wrap16 | Self::Incr16 => Some(16),
        }
    }

    /// Returns log2 of the beat count for 4/8/16-beat kinds.
    pub(crate) const fn len_log2(self) -> Option<u32> {
        match self {
            Self::Wrap4 | Self::Incr4 => Some(2),
            Self::Wrap8 | Self::Incr8 => Some(3),
            Self::Wrap16 | Self::Incr16 => Some(4),
            Self::Single | Self::Incr => None,
        }
    }

    /// Returns whether beat addresses wrap inside the aligned burst window.
    #[inline(always)]
    pub const fn is_wrapping(self) -> bool {
        matches!(self, Self::Wrap4 | Self::Wrap8 | Self::Wrap16)
    }
}

impl fmt::Display for BurstKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Single => "SINGLE",
            Self::Incr => "INCR",
            Self::Wrap4 => "WRAP4",
            Self::Incr4 => "INCR4",
            Self::Wrap8 => "WRAP8",
            Self::Incr8 => "INCR8",
            Self::Wrap16 => "WRAP16",
            Self::Incr16 => "INCR16",
        };
        write!(f, "{}", name)
    }
}

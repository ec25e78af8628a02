// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Codecs for the packed header fields: the LI/VN/Mode byte, the stratum byte and the
//! stratum-dependent reference identifier.
//!
//! Every function here is total. Bit patterns that do not name a variant fall back to the
//! zero variant of the field rather than failing.

use log::trace;

use super::{
    LeapIndicator, Mode, PrimarySource, ReferenceIdentifier, SecondaryReference, Stratum,
    VersionNumber,
};

const LEAP_MASK: u8 = 0b1100_0000;
const VERSION_MASK: u8 = 0b0011_1000;
const MODE_MASK: u8 = 0b0000_0111;

/// Pack the leap indicator, version number and mode into the first header byte.
///
/// ```text
///  0 1 2 3 4 5 6 7
/// +-+-+-+-+-+-+-+-+
/// |LI | VN  |Mode |
/// +-+-+-+-+-+-+-+-+
/// ```
pub fn encode_li_vn_mode(li: LeapIndicator, vn: VersionNumber, mode: Mode) -> u8 {
    let li_bits = match li {
        LeapIndicator::NoAdjustment => 0,
        LeapIndicator::LastMinuteHas61Seconds => 64,
        LeapIndicator::LastMinuteHas59Seconds => 128,
        LeapIndicator::ClockUnsynchronized => 192,
    };
    li_bits + ((vn.value() << 3) & VERSION_MASK) + mode as u8
}

/// Extract the leap indicator from the first header byte.
pub fn decode_leap_indicator(byte: u8) -> LeapIndicator {
    match byte & LEAP_MASK {
        64 => LeapIndicator::LastMinuteHas61Seconds,
        128 => LeapIndicator::LastMinuteHas59Seconds,
        192 => LeapIndicator::ClockUnsynchronized,
        _ => LeapIndicator::NoAdjustment,
    }
}

/// Extract the version number from the first header byte.
pub fn decode_version(byte: u8) -> VersionNumber {
    VersionNumber((byte & VERSION_MASK) >> 3)
}

/// Extract the association mode from the first header byte.
pub fn decode_mode(byte: u8) -> Mode {
    match byte & MODE_MASK {
        1 => Mode::SymmetricActive,
        2 => Mode::SymmetricPassive,
        3 => Mode::Client,
        4 => Mode::Server,
        5 => Mode::Broadcast,
        6 => Mode::NtpControlMessage,
        7 => Mode::ReservedPrivateUse,
        _ => Mode::Reserved,
    }
}

/// Encode a stratum category as its representative raw byte.
///
/// Lossy: every secondary server encodes as 15 and every reserved stratum as 255.
pub fn encode_stratum(stratum: Stratum) -> u8 {
    match stratum {
        Stratum::UnspecifiedOrInvalid => 0,
        Stratum::PrimaryServer => 1,
        Stratum::SecondaryServer => 15,
        Stratum::Unsynchronized => 16,
        Stratum::Reserved => 255,
    }
}

/// Bucket a raw stratum byte into its category.
pub fn decode_stratum(byte: u8) -> Stratum {
    match byte {
        0 => Stratum::UnspecifiedOrInvalid,
        1 => Stratum::PrimaryServer,
        2..=15 => Stratum::SecondaryServer,
        16 => Stratum::Unsynchronized,
        17..=u8::MAX => Stratum::Reserved,
    }
}

/// Interpret the four reference identifier octets according to the sender's stratum.
///
/// - Primary servers carry an ASCII code. NUL or space padding and letter case are ignored;
///   unknown codes give [`ReferenceIdentifier::Empty`].
/// - Secondary servers carry an upstream address or IPv6 hash prefix, see
///   [`SecondaryReference`].
/// - Every other stratum gives [`ReferenceIdentifier::Empty`].
pub fn decode_reference_identifier(stratum: Stratum, bytes: [u8; 4]) -> ReferenceIdentifier {
    match stratum {
        Stratum::PrimaryServer => match PrimarySource::try_from(bytes) {
            Ok(src) => ReferenceIdentifier::Primary(src),
            Err(()) => {
                trace!("unrecognized primary reference code {:02x?}", bytes);
                ReferenceIdentifier::Empty
            }
        },
        Stratum::SecondaryServer => ReferenceIdentifier::Secondary(SecondaryReference::new(bytes)),
        _ => ReferenceIdentifier::Empty,
    }
}

impl From<u8> for Stratum {
    fn from(byte: u8) -> Self {
        decode_stratum(byte)
    }
}

impl From<Stratum> for u8 {
    fn from(stratum: Stratum) -> Self {
        encode_stratum(stratum)
    }
}

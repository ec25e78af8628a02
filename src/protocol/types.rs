// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

use core::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use super::ConstPackedSizeBytes;
use super::md5;

/// **NTP Short Format** as carried in the root delay and root dispersion header fields.
///
/// A 32-bit signed fixed-point number of seconds with the fraction point between bits 15 and
/// 16, so the value in seconds is `raw / 65536`.
///
/// ### Layout
///
/// ```ignore
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |          Seconds              |           Fraction            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ShortFormat(pub i32);

impl ShortFormat {
    /// The value in seconds.
    pub fn as_seconds(&self) -> f64 {
        f64::from(self.0) / 65536.0
    }
}

/// **NTP Timestamp Format** - a 32-bit unsigned seconds field spanning 136 years and a 32-bit
/// fraction field resolving 232 picoseconds.
///
/// The prime epoch is 0 h 1 January 1900 UTC, when all bits are zero.
///
/// ### Layout
///
/// ```ignore
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                            Seconds                            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                            Fraction                           |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TimestampFormat {
    /// Seconds since 1900-01-01 00:00:00 UTC.
    pub seconds: u32,
    /// Fractional seconds, in units of 2^-32 s.
    pub fraction: u32,
}

/// A 2-bit integer warning of an impending leap second to be inserted or deleted in the last
/// minute of the current day, or signalling that the clock is unsynchronized.
///
/// Note that this field is packed into the top two bits of the first header byte.
#[derive(Copy, Clone, Debug, Default, Eq, Hash, PartialEq)]
pub enum LeapIndicator {
    /// No leap second adjustment.
    #[default]
    NoAdjustment,
    /// Last minute of the day has 61 seconds.
    LastMinuteHas61Seconds,
    /// Last minute of the day has 59 seconds.
    LastMinuteHas59Seconds,
    /// Clock unsynchronized.
    ClockUnsynchronized,
}

/// A 3-bit integer representing the NTP version number.
///
/// Note that while this struct is 8-bits, this field is packed to 3 in the actual header.
///
/// As the only constructors are [`VersionNumber::new`] and the associated constants, it should
/// be impossible to create a `VersionNumber` that does not fit in 3 bits. The default is 0,
/// the value carried by an all-zero header byte.
#[derive(Copy, Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct VersionNumber(pub(super) u8);

impl VersionNumber {
    /// NTP version 3 (RFC 1305).
    pub const V3: Self = VersionNumber(3);
    /// NTP version 4 (RFC 5905).
    pub const V4: Self = VersionNumber(4);
    /// The largest value the 3-bit field can hold.
    pub const MAX: Self = VersionNumber(7);

    /// Create a `VersionNumber` from a raw version number.
    ///
    /// Returns `None` if the value does not fit in the 3-bit header field (0-7).
    pub fn new(v: u8) -> Option<Self> {
        if v <= Self::MAX.0 {
            Some(VersionNumber(v))
        } else {
            None
        }
    }

    /// Returns the raw version number.
    pub fn value(&self) -> u8 {
        self.0
    }
}

/// A 3-bit integer representing the association mode.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, Eq, Hash, PartialEq)]
pub enum Mode {
    /// Reserved mode (value 0).
    #[default]
    Reserved = 0,
    /// Symmetric active mode (value 1).
    SymmetricActive = 1,
    /// Symmetric passive mode (value 2).
    SymmetricPassive = 2,
    /// Client mode (value 3).
    Client = 3,
    /// Server mode (value 4).
    Server = 4,
    /// Broadcast mode (value 5).
    Broadcast = 5,
    /// NTP control message mode (value 6).
    NtpControlMessage = 6,
    /// Reserved for private use (value 7).
    ReservedPrivateUse = 7,
}

/// The stratum of the sender, bucketed from the raw 8-bit header value.
///
/// ```ignore
/// +--------+-----------------------------------------------------+
/// | Value  | Meaning                                             |
/// +--------+-----------------------------------------------------+
/// | 0      | unspecified or invalid                              |
/// | 1      | primary server (e.g., equipped with a GPS receiver) |
/// | 2-15   | secondary server (via NTP)                          |
/// | 16     | unsynchronized                                      |
/// | 17-255 | reserved                                            |
/// +--------+-----------------------------------------------------+
/// ```
///
/// The mapping is lossy. A whole range of raw values collapses into one category, and
/// encoding writes a single representative byte per category (see
/// [`encode_stratum`](super::encode_stratum)).
#[derive(Copy, Clone, Debug, Default, Eq, Hash, PartialEq)]
pub enum Stratum {
    /// Raw value 0.
    #[default]
    UnspecifiedOrInvalid,
    /// Raw value 1.
    PrimaryServer,
    /// Raw values 2 through 15.
    SecondaryServer,
    /// Raw value 16.
    Unsynchronized,
    /// Raw values 17 through 255.
    Reserved,
}

/// A four-octet, left-justified, zero-padded ASCII code assigned to the reference clock of a
/// stratum 1 server.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PrimarySource {
    /// Uncalibrated local clock.
    Locl,
    /// Calibrated Cesium clock.
    Cesm,
    /// Calibrated Rubidium clock.
    Rbdm,
    /// Calibrated quartz clock or other pulse-per-second source.
    Pps,
    /// Inter-Range Instrumentation Group.
    Irig,
    /// NIST telephone modem service.
    Acts,
    /// USNO telephone modem service.
    Usno,
    /// PTB (Germany) telephone modem service.
    Ptb,
    /// Allouis (France) Radio 164 kHz.
    Tdf,
    /// Mainflingen (Germany) Radio 77.5 kHz.
    Dcf,
    /// Rugby (UK) Radio 60 kHz.
    Msf,
    /// Ft. Collins (US) Radio 2.5, 5, 10, 15, 20 MHz.
    Wwv,
    /// Boulder (US) Radio 60 kHz.
    Wwvb,
    /// Kauai Hawaii (US) Radio 2.5, 5, 10, 15 MHz.
    Wwvh,
    /// Ottawa (Canada) Radio 3330, 7335, 14670 kHz.
    Chu,
    /// LORAN-C radionavigation system.
    Lorc,
    /// OMEGA radionavigation system.
    Omeg,
    /// Global Positioning Service.
    Gps,
}

impl PrimarySource {
    /// Every code this crate recognizes, in declaration order.
    pub const ALL: [PrimarySource; 18] = [
        PrimarySource::Locl,
        PrimarySource::Cesm,
        PrimarySource::Rbdm,
        PrimarySource::Pps,
        PrimarySource::Irig,
        PrimarySource::Acts,
        PrimarySource::Usno,
        PrimarySource::Ptb,
        PrimarySource::Tdf,
        PrimarySource::Dcf,
        PrimarySource::Msf,
        PrimarySource::Wwv,
        PrimarySource::Wwvb,
        PrimarySource::Wwvh,
        PrimarySource::Chu,
        PrimarySource::Lorc,
        PrimarySource::Omeg,
        PrimarySource::Gps,
    ];

    /// The zero-padded wire representation of the code.
    pub fn bytes(&self) -> [u8; 4] {
        match self {
            PrimarySource::Locl => *b"LOCL",
            PrimarySource::Cesm => *b"CESM",
            PrimarySource::Rbdm => *b"RBDM",
            PrimarySource::Pps => *b"PPS\0",
            PrimarySource::Irig => *b"IRIG",
            PrimarySource::Acts => *b"ACTS",
            PrimarySource::Usno => *b"USNO",
            PrimarySource::Ptb => *b"PTB\0",
            PrimarySource::Tdf => *b"TDF\0",
            PrimarySource::Dcf => *b"DCF\0",
            PrimarySource::Msf => *b"MSF\0",
            PrimarySource::Wwv => *b"WWV\0",
            PrimarySource::Wwvb => *b"WWVB",
            PrimarySource::Wwvh => *b"WWVH",
            PrimarySource::Chu => *b"CHU\0",
            PrimarySource::Lorc => *b"LORC",
            PrimarySource::Omeg => *b"OMEG",
            PrimarySource::Gps => *b"GPS\0",
        }
    }
}

impl TryFrom<[u8; 4]> for PrimarySource {
    type Error = ();

    /// Padding with NULs or spaces is ignored and letters match in either case, so
    /// `b"GPS\0"`, `b"GPS "` and `b"gps\0"` all parse as [`PrimarySource::Gps`].
    fn try_from(value: [u8; 4]) -> Result<Self, Self::Error> {
        let code = trim_padding(&value);
        PrimarySource::ALL
            .into_iter()
            .find(|src| trim_padding(&src.bytes()).eq_ignore_ascii_case(code))
            .ok_or(())
    }
}

// Strip NUL and whitespace padding from both ends of a reference code.
fn trim_padding(bytes: &[u8]) -> &[u8] {
    let is_padding = |b: &u8| *b == 0 || b.is_ascii_whitespace();
    let start = bytes.iter().position(|b| !is_padding(b)).unwrap_or(bytes.len());
    let end = bytes.iter().rposition(|b| !is_padding(b)).map_or(start, |i| i + 1);
    &bytes[start..end]
}

/// The reference identifier of a secondary server.
///
/// The four octets are either the IPv4 address of the upstream server, or the first four
/// octets of the MD5 hash of its IPv6 address. The packet alone cannot tell which, so both
/// readings are kept: a dotted-quad [`Ipv4Addr`] and the base64 text of the same octets.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct SecondaryReference {
    address: Ipv4Addr,
    ipv6_digest_base64: String,
}

impl SecondaryReference {
    /// Interpret four reference identifier octets.
    pub fn new(octets: [u8; 4]) -> Self {
        SecondaryReference {
            address: Ipv4Addr::from(octets),
            ipv6_digest_base64: BASE64.encode(octets),
        }
    }

    /// The octets read as an IPv4 address.
    pub fn address(&self) -> Ipv4Addr {
        self.address
    }

    /// The octets as base64 text, for when they are the MD5 prefix of an IPv6 address.
    pub fn ipv6_digest_base64(&self) -> &str {
        &self.ipv6_digest_base64
    }

    /// The raw four octets.
    pub fn octets(&self) -> [u8; 4] {
        self.address.octets()
    }

    /// Whether the identifier names the given IPv4 upstream.
    ///
    /// Used for loop detection: if the upstream server's reference ID matches our own
    /// address, a timing loop exists.
    pub fn matches_ipv4(&self, addr: Ipv4Addr) -> bool {
        self.address == addr
    }

    /// Whether the identifier is the MD5 prefix of the given IPv6 upstream.
    ///
    /// A 4-byte hash may coincidentally match an IPv4 address, so a `true` here is a strong
    /// hint rather than proof.
    pub fn matches_ipv6(&self, addr: Ipv6Addr) -> bool {
        self.octets() == md5::md5_prefix(&addr.octets())
    }
}

/// A 32-bit code identifying the particular server or reference clock.
///
/// The interpretation depends on the value in the stratum field:
///
/// - For stratum 1 (reference clock), this is a four-octet, left-justified, zero-padded ASCII
///   string assigned to the reference clock.
/// - For stratum 2-15 it identifies the upstream server (see [`SecondaryReference`]).
/// - For any other stratum, and for stratum 1 codes this crate does not know, it is left empty.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub enum ReferenceIdentifier {
    /// No identifier could be interpreted.
    #[default]
    Empty,
    /// Primary reference source (stratum 1).
    Primary(PrimarySource),
    /// Upstream server of a secondary server (stratum 2-15).
    Secondary(SecondaryReference),
}

impl ReferenceIdentifier {
    /// Construct a reference identifier from an IPv4 upstream address (RFC 5905 Section 7.3).
    pub fn from_ipv4(addr: Ipv4Addr) -> Self {
        ReferenceIdentifier::Secondary(SecondaryReference::new(addr.octets()))
    }

    /// Construct a reference identifier from an IPv6 upstream address.
    ///
    /// Per RFC 5905, the reference identifier for IPv6 peers is the first 4 bytes of
    /// `MD5(IPv6_address)`.
    pub fn from_ipv6(addr: Ipv6Addr) -> Self {
        ReferenceIdentifier::Secondary(SecondaryReference::new(md5::md5_prefix(&addr.octets())))
    }

    /// Returns the raw 4-byte representation. [`ReferenceIdentifier::Empty`] is all zeros.
    pub fn as_bytes(&self) -> [u8; 4] {
        match self {
            ReferenceIdentifier::Empty => [0; 4],
            ReferenceIdentifier::Primary(src) => src.bytes(),
            ReferenceIdentifier::Secondary(secondary) => secondary.octets(),
        }
    }

    /// The reference clock, if this is a recognized stratum 1 identifier.
    pub fn primary_source(&self) -> Option<PrimarySource> {
        match self {
            ReferenceIdentifier::Primary(src) => Some(*src),
            _ => None,
        }
    }

    /// The upstream server, if this is a secondary server identifier.
    pub fn secondary(&self) -> Option<&SecondaryReference> {
        match self {
            ReferenceIdentifier::Secondary(secondary) => Some(secondary),
            _ => None,
        }
    }

    /// Returns true if no identifier could be interpreted.
    pub fn is_empty(&self) -> bool {
        matches!(self, ReferenceIdentifier::Empty)
    }
}

// Size implementations.

impl ConstPackedSizeBytes for ShortFormat {
    const PACKED_SIZE_BYTES: usize = 4;
}

impl ConstPackedSizeBytes for TimestampFormat {
    const PACKED_SIZE_BYTES: usize = 8;
}

impl ConstPackedSizeBytes for ReferenceIdentifier {
    const PACKED_SIZE_BYTES: usize = 4;
}

// Display implementations.

impl fmt::Display for PrimarySource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for &b in trim_padding(&self.bytes()) {
            write!(f, "{}", b as char)?;
        }
        Ok(())
    }
}

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_number_rejects_values_wider_than_three_bits() {
        assert_eq!(VersionNumber::new(0).map(|v| v.value()), Some(0));
        assert_eq!(VersionNumber::new(7), Some(VersionNumber::MAX));
        assert_eq!(VersionNumber::new(8), None);
        assert_eq!(VersionNumber::new(255), None);
    }

    #[test]
    fn primary_source_codes_are_zero_padded() {
        assert_eq!(PrimarySource::Gps.bytes(), *b"GPS\0");
        assert_eq!(PrimarySource::Wwvb.bytes(), *b"WWVB");
    }

    #[test]
    fn primary_source_parse_ignores_padding_and_case() {
        for code in [*b"GPS\0", *b"GPS ", *b"gps\0", *b"gps ", *b"Gps\0", *b" GPS"] {
            assert_eq!(PrimarySource::try_from(code), Ok(PrimarySource::Gps), "{:?}", code);
        }
        assert_eq!(PrimarySource::try_from(*b"locl"), Ok(PrimarySource::Locl));
        assert_eq!(PrimarySource::try_from(*b"WWV "), Ok(PrimarySource::Wwv));
        assert_eq!(PrimarySource::try_from(*b"wwvb"), Ok(PrimarySource::Wwvb));
    }

    #[test]
    fn primary_source_parse_rejects_unknown_codes() {
        for code in [*b"CDMA", *b"GPSX", *b"G PS", [0; 4], *b"    ", *b"GP\0S"] {
            assert_eq!(PrimarySource::try_from(code), Err(()), "{:?}", code);
        }
    }

    #[test]
    fn primary_source_codes_are_distinct() {
        for (i, a) in PrimarySource::ALL.iter().enumerate() {
            assert_eq!(PrimarySource::try_from(a.bytes()), Ok(*a));
            for b in &PrimarySource::ALL[i + 1..] {
                assert_ne!(a.bytes(), b.bytes());
            }
        }
    }

    #[test]
    fn primary_source_display_strips_padding() {
        assert_eq!(PrimarySource::Gps.to_string(), "GPS");
        assert_eq!(PrimarySource::Locl.to_string(), "LOCL");
    }

    #[test]
    fn short_format_as_seconds() {
        assert_eq!(ShortFormat(0).as_seconds(), 0.0);
        assert_eq!(ShortFormat(0x0001_8000).as_seconds(), 1.5);
        assert_eq!(ShortFormat(24).as_seconds(), 24.0 / 65536.0);
        assert_eq!(ShortFormat(-0x0001_0000).as_seconds(), -1.0);
    }

    #[test]
    fn secondary_reference_keeps_both_readings() {
        let secondary = SecondaryReference::new([192, 168, 1, 1]);
        assert_eq!(secondary.address(), Ipv4Addr::new(192, 168, 1, 1));
        assert_eq!(secondary.ipv6_digest_base64(), "wKgBAQ==");
        assert_eq!(secondary.octets(), [192, 168, 1, 1]);
    }

    #[test]
    fn reference_identifier_from_ipv4() {
        let addr = Ipv4Addr::new(10, 0, 0, 1);
        let refid = ReferenceIdentifier::from_ipv4(addr);
        assert_eq!(refid.as_bytes(), [10, 0, 0, 1]);
        assert!(refid.secondary().is_some_and(|s| s.matches_ipv4(addr)));
        assert!(!refid.secondary().is_some_and(|s| s.matches_ipv4(Ipv4Addr::new(10, 0, 0, 2))));
    }

    #[test]
    fn reference_identifier_from_ipv6_is_md5_prefix() {
        // MD5(2001:db8::1) = 39ab9b37...
        let addr: Ipv6Addr = "2001:db8::1".parse().unwrap();
        let refid = ReferenceIdentifier::from_ipv6(addr);
        assert_eq!(refid.as_bytes(), [0x39, 0xab, 0x9b, 0x37]);
        let secondary = refid.secondary().unwrap();
        assert!(secondary.matches_ipv6(addr));
        assert!(!secondary.matches_ipv6(Ipv6Addr::LOCALHOST));
    }

    #[test]
    fn empty_reference_identifier() {
        let refid = ReferenceIdentifier::default();
        assert!(refid.is_empty());
        assert_eq!(refid.as_bytes(), [0; 4]);
        assert_eq!(refid.primary_source(), None);
        assert_eq!(refid.secondary(), None);
    }
}

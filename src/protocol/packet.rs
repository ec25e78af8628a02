// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! The request and response packet model.
//!
//! ```ignore
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |LI | VN  |Mode |    Stratum     |     Poll      |  Precision   |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                         Root Delay                            |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                         Root Dispersion                       |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                          Reference ID                         |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                                                               |
//! +                     Reference Timestamp (64)                  +
//! |                                                               |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                                                               |
//! +                      Origin Timestamp (64)                    +
//! |                                                               |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                                                               |
//! +                      Receive Timestamp (64)                   +
//! |                                                               |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                                                               |
//! +                      Transmit Timestamp (64)                  +
//! |                                                               |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```

use chrono::{DateTime, Utc};
use log::debug;

use super::{
    ConstPackedSizeBytes, LeapIndicator, Mode, PACKET_SIZE, ReferenceIdentifier, ShortFormat,
    Stratum, VersionNumber, decode_leap_indicator, decode_mode, decode_reference_identifier,
    decode_stratum, decode_version, encode_li_vn_mode, encode_stratum,
};
use crate::error::ParseError;
use crate::timestamp::{decode_timestamp, encode_timestamp, ntp_epoch};

pub(crate) const LI_VN_MODE_OFFSET: usize = 0;
pub(crate) const STRATUM_OFFSET: usize = 1;
pub(crate) const POLL_OFFSET: usize = 2;
pub(crate) const PRECISION_OFFSET: usize = 3;
pub(crate) const ROOT_DELAY_OFFSET: usize = 4;
pub(crate) const ROOT_DISPERSION_OFFSET: usize = 8;
pub(crate) const REFERENCE_ID_OFFSET: usize = 12;
pub(crate) const REFERENCE_TIMESTAMP_OFFSET: usize = 16;
pub(crate) const ORIGINATE_TIMESTAMP_OFFSET: usize = 24;
pub(crate) const RECEIVE_TIMESTAMP_OFFSET: usize = 32;
pub(crate) const TRANSMIT_TIMESTAMP_OFFSET: usize = 40;

/// How the poll byte of an encoded request is chosen.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PollIntervalPolicy {
    /// Always write the given value, whatever the request carries.
    Constant(i8),
    /// Write [`Request::poll_interval`].
    FromRequest,
}

impl PollIntervalPolicy {
    /// The poll byte written by the default policy.
    pub const LEGACY_POLL: i8 = 16;

    /// The poll value to put on the wire for a request asking for `requested`.
    pub fn resolve(&self, requested: i8) -> i8 {
        match *self {
            PollIntervalPolicy::Constant(poll) => poll,
            PollIntervalPolicy::FromRequest => requested,
        }
    }
}

impl Default for PollIntervalPolicy {
    /// Defaults to `Constant(16)`, matching the bytes existing peers send.
    fn default() -> Self {
        PollIntervalPolicy::Constant(Self::LEGACY_POLL)
    }
}

/// Options controlling how a [`Request`] is encoded.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct EncodeOptions {
    /// Source of the poll interval byte.
    pub poll_interval: PollIntervalPolicy,
}

/// The fields a client sends in a request.
///
/// A [`Response`] carries the same fields, read back from the server's packet.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Request {
    /// Leap indicator warning of impending leap second.
    pub leap_indicator: LeapIndicator,
    /// NTP protocol version number.
    pub version: VersionNumber,
    /// Association mode (client, server, broadcast, etc.).
    pub mode: Mode,
    /// Stratum of the sender.
    pub stratum: Stratum,
    /// Maximum interval between successive messages, in log2 seconds.
    pub poll_interval: i8,
    /// Time at which the request departed the client.
    pub originate_timestamp: DateTime<Utc>,
}

impl Request {
    /// An NTPv4 client request with no leap warning, unspecified stratum and the given
    /// originate time.
    pub fn client(originate_timestamp: DateTime<Utc>) -> Self {
        Request {
            leap_indicator: LeapIndicator::NoAdjustment,
            version: VersionNumber::V4,
            mode: Mode::Client,
            stratum: Stratum::UnspecifiedOrInvalid,
            poll_interval: PollIntervalPolicy::LEGACY_POLL,
            originate_timestamp,
        }
    }

    /// Encode with the default [`EncodeOptions`].
    ///
    /// Only bytes 0-2 and 24-31 are populated; the rest of the packet is zero.
    pub fn to_bytes(&self) -> [u8; PACKET_SIZE] {
        self.to_bytes_with(&EncodeOptions::default())
    }

    /// Encode with the given options.
    pub fn to_bytes_with(&self, options: &EncodeOptions) -> [u8; PACKET_SIZE] {
        let mut buf = [0u8; PACKET_SIZE];
        buf[LI_VN_MODE_OFFSET] = encode_li_vn_mode(self.leap_indicator, self.version, self.mode);
        buf[STRATUM_OFFSET] = encode_stratum(self.stratum);
        buf[POLL_OFFSET] = options.poll_interval.resolve(self.poll_interval) as u8;
        buf[ORIGINATE_TIMESTAMP_OFFSET..ORIGINATE_TIMESTAMP_OFFSET + 8]
            .copy_from_slice(&encode_timestamp(self.originate_timestamp));
        buf
    }
}

impl Default for Request {
    /// Defaults to an NTPv4 client request originating at the NTP epoch.
    fn default() -> Self {
        Request::client(ntp_epoch())
    }
}

/// A decoded server response.
///
/// The header fields shared with a request live in [`Response::request`]. Byte 2 is read as
/// the poll interval and byte 3 as the precision, each at its RFC 5905 position.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Response {
    /// Leap indicator, version, mode, stratum, poll interval and originate timestamp.
    pub request: Request,
    /// Precision of the server clock, in log2 seconds. For instance, -18 is about one
    /// microsecond.
    pub precision: i8,
    /// Total round-trip delay to the reference clock.
    pub root_delay: ShortFormat,
    /// Maximum error relative to the reference clock.
    pub root_dispersion: ShortFormat,
    /// Reference identifier, interpreted according to the stratum.
    pub reference_identifier: ReferenceIdentifier,
    /// Time when the server clock was last set or corrected.
    pub reference_timestamp: DateTime<Utc>,
    /// Time at the server when the request arrived.
    pub receive_timestamp: DateTime<Utc>,
    /// Time at the server when the response left.
    pub transmit_timestamp: DateTime<Utc>,
}

impl Response {
    /// Decode a response packet.
    ///
    /// `buf` must be exactly [`PACKET_SIZE`] bytes. Anything else (including packets with
    /// extension fields or a MAC appended) fails with [`ParseError::MalformedPacket`].
    pub fn from_bytes(buf: &[u8]) -> Result<Self, ParseError> {
        let buf: &[u8; PACKET_SIZE] = buf.try_into().map_err(|_| {
            debug!("rejecting {} byte buffer as an NTP response", buf.len());
            ParseError::MalformedPacket {
                expected: PACKET_SIZE,
                actual: buf.len(),
            }
        })?;

        let li_vn_mode = buf[LI_VN_MODE_OFFSET];
        let stratum = decode_stratum(buf[STRATUM_OFFSET]);

        Ok(Response {
            request: Request {
                leap_indicator: decode_leap_indicator(li_vn_mode),
                version: decode_version(li_vn_mode),
                mode: decode_mode(li_vn_mode),
                stratum,
                poll_interval: buf[POLL_OFFSET] as i8,
                originate_timestamp: decode_timestamp(&field(buf, ORIGINATE_TIMESTAMP_OFFSET)),
            },
            precision: buf[PRECISION_OFFSET] as i8,
            root_delay: ShortFormat(i32::from_be_bytes(field(buf, ROOT_DELAY_OFFSET))),
            root_dispersion: ShortFormat(i32::from_be_bytes(field(buf, ROOT_DISPERSION_OFFSET))),
            reference_identifier: decode_reference_identifier(
                stratum,
                field(buf, REFERENCE_ID_OFFSET),
            ),
            reference_timestamp: decode_timestamp(&field(buf, REFERENCE_TIMESTAMP_OFFSET)),
            receive_timestamp: decode_timestamp(&field(buf, RECEIVE_TIMESTAMP_OFFSET)),
            transmit_timestamp: decode_timestamp(&field(buf, TRANSMIT_TIMESTAMP_OFFSET)),
        })
    }
}

// Copy `N` bytes starting at `offset` out of a whole packet.
fn field<const N: usize>(buf: &[u8; PACKET_SIZE], offset: usize) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&buf[offset..offset + N]);
    out
}

impl ConstPackedSizeBytes for Request {
    const PACKED_SIZE_BYTES: usize = PACKET_SIZE;
}

impl ConstPackedSizeBytes for Response {
    const PACKED_SIZE_BYTES: usize = PACKET_SIZE;
}

// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Conversion between calendar time ([`chrono::DateTime<Utc>`]) and the 64-bit NTP timestamp.
//!
//! The two directions use different sub-second arithmetic:
//!
//! - Encoding counts 100 ns ticks since the NTP epoch and scales the sub-second ticks by
//!   `100_000 / 232`. Both halves are truncated to 32 bits.
//! - Decoding scales the fraction to whole milliseconds with `fraction * 1000 / 2^32`.
//!
//! The encode scale overshoots the exact `2^32 / 10^7` per tick by about 0.36 %, so a round
//! trip returns a time up to 4 ms later than the input (truncated to milliseconds) for
//! sub-second parts below 0.99643 s. Above that the fraction no longer fits in 32 bits and
//! wraps around to a small value.

use chrono::{DateTime, TimeDelta, Utc};

use crate::protocol::TimestampFormat;

/// The number of seconds from 1st January 1900 UTC to the start of the Unix epoch.
pub const EPOCH_DELTA: i64 = 2_208_988_800;

// 100 ns ticks.
const TICKS_PER_SECOND: i128 = 10_000_000;
const NANOS_PER_TICK: u32 = 100;

/// The NTP prime epoch, 1900-01-01 00:00:00 UTC.
pub fn ntp_epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH - TimeDelta::seconds(EPOCH_DELTA)
}

/// Encode a calendar time as the 8 network-order bytes of an NTP timestamp.
///
/// Times outside era 0 (before 1900 or from 2036-02-07 onwards) wrap modulo 2^32 seconds.
pub fn encode_timestamp(time: DateTime<Utc>) -> [u8; 8] {
    let ts = TimestampFormat::from(time);
    let mut out = [0u8; 8];
    out[..4].copy_from_slice(&ts.seconds.to_be_bytes());
    out[4..].copy_from_slice(&ts.fraction.to_be_bytes());
    out
}

/// Decode the 8 network-order bytes of an NTP timestamp into a calendar time, with
/// millisecond resolution.
pub fn decode_timestamp(bytes: &[u8; 8]) -> DateTime<Utc> {
    let ts = TimestampFormat {
        seconds: u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
        fraction: u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
    };
    ts.into()
}

impl From<DateTime<Utc>> for TimestampFormat {
    fn from(time: DateTime<Utc>) -> Self {
        let ntp_secs = i128::from(time.timestamp()) + i128::from(EPOCH_DELTA);
        let ticks = ntp_secs * TICKS_PER_SECOND
            + i128::from(time.timestamp_subsec_nanos() / NANOS_PER_TICK);
        TimestampFormat {
            seconds: (ticks / TICKS_PER_SECOND) as u32,
            fraction: ((ticks % TICKS_PER_SECOND) * 100_000 / 232) as u32,
        }
    }
}

impl From<TimestampFormat> for DateTime<Utc> {
    fn from(ts: TimestampFormat) -> Self {
        let millis = u64::from(ts.seconds) * 1000 + ((u64::from(ts.fraction) * 1000) >> 32);
        ntp_epoch() + TimeDelta::milliseconds(millis as i64)
    }
}

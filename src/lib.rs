// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

/*!
Encoder and decoder for the fixed 48-byte NTP v3/v4 packet (RFC 1305 / RFC 5905).

The crate is a pure codec. It turns a [`Request`](protocol::Request) into the
exact bytes to hand to a UDP socket, and turns the 48 bytes received back from
a server into a [`Response`](protocol::Response). Sockets, name resolution,
timeouts and clock discipline are left to the caller.

# Example

```rust
use chrono::{TimeZone, Utc};
use ntp_packet::protocol::{
    LeapIndicator, Mode, Request, Response, Stratum, VersionNumber,
};

let request = Request {
    leap_indicator: LeapIndicator::NoAdjustment,
    version: VersionNumber::V3,
    mode: Mode::Client,
    stratum: Stratum::PrimaryServer,
    poll_interval: 6,
    originate_timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
};
let bytes = request.to_bytes();
assert_eq!(bytes[0], 0x1B);

// A server would normally fill in the rest of the packet.
let response = Response::from_bytes(&bytes).unwrap();
assert_eq!(response.request.mode, Mode::Client);
assert_eq!(response.request.originate_timestamp, request.originate_timestamp);
```
*/

#![warn(missing_docs)]

/// Error type returned when a buffer cannot be decoded or written.
pub mod error;

/// NTP packet types, field codecs and the request/response packet model.
pub mod protocol;

/// Conversion between calendar time and the 64-bit NTP timestamp format.
pub mod timestamp;

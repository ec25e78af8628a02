// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Error types for NTP packet decoding and buffer serialization.
//!
//! Encoding a [`Request`](crate::protocol::Request) never fails. The only
//! decode failure is a buffer that is not exactly one packet long.

use core::fmt;

/// Errors that can occur while decoding a packet or writing into a caller buffer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseError {
    /// The input was not exactly one NTP packet long.
    MalformedPacket {
        /// Number of bytes a packet occupies.
        expected: usize,
        /// Number of bytes supplied.
        actual: usize,
    },
    /// The destination buffer is too short for the value being written.
    BufferTooShort {
        /// Number of bytes needed.
        needed: usize,
        /// Number of bytes available.
        available: usize,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MalformedPacket { expected, actual } => {
                write!(
                    f,
                    "malformed packet: expected {} bytes, got {}",
                    expected, actual
                )
            }
            ParseError::BufferTooShort { needed, available } => {
                write!(
                    f,
                    "buffer too short: needed {} bytes, got {}",
                    needed, available
                )
            }
        }
    }
}

impl From<ParseError> for std::io::Error {
    fn from(err: ParseError) -> std::io::Error {
        let kind = match &err {
            ParseError::MalformedPacket { .. } => std::io::ErrorKind::InvalidData,
            ParseError::BufferTooShort { .. } => std::io::ErrorKind::UnexpectedEof,
        };
        std::io::Error::new(kind, err)
    }
}

impl std::error::Error for ParseError {}

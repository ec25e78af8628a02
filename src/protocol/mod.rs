// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Types and constants for the 48-byte NTP packet header.
//!
//! Provides the field codecs for the packed header bytes, the [`Request`] and
//! [`Response`] packet model, and `ReadBytes`/`WriteBytes` implementations which
//! extend the byteorder crate `ReadBytesExt`/`WriteBytesExt` traits with the
//! ability to read and write NTP types.
//!
//! Documentation is largely derived from IETF RFC 5905.

/// NTP port number.
pub const PORT: u16 = 123;

/// Size in bytes of an NTP packet header without extension fields or MAC.
pub const PACKET_SIZE: usize = 48;

mod bytes;
mod fields;
mod io;
pub(crate) mod md5;
mod packet;
mod types;

pub use self::fields::*;
pub use self::packet::*;
pub use self::types::*;

use byteorder::{ReadBytesExt, WriteBytesExt};
use std::io as stdio;

use crate::error::ParseError;

/// A trait for writing any of the NTP protocol types to network-endian bytes.
///
/// A blanket implementation is provided for all types that implement `byteorder::WriteBytesExt`.
pub trait WriteBytes {
    /// Writes an NTP protocol type to this writer in network byte order.
    fn write_bytes<P: WriteToBytes>(&mut self, protocol: P) -> stdio::Result<()>;
}

/// A trait for reading any of the NTP protocol types from network-endian bytes.
///
/// A blanket implementation is provided for all types that implement `byteorder::ReadBytesExt`.
pub trait ReadBytes {
    /// Reads an NTP protocol type from this reader in network byte order.
    fn read_bytes<P: ReadFromBytes>(&mut self) -> stdio::Result<P>;
}

/// NTP protocol types that may be written to network endian bytes.
pub trait WriteToBytes {
    /// Write the value to the given writer.
    fn write_to_bytes<W: WriteBytesExt>(&self, writer: W) -> stdio::Result<()>;
}

/// NTP protocol types that may be read from network endian bytes.
pub trait ReadFromBytes: Sized {
    /// Read the value from the given reader.
    fn read_from_bytes<R: ReadBytesExt>(reader: R) -> stdio::Result<Self>;
}

/// Types that have a constant size when written to or read from bytes.
pub trait ConstPackedSizeBytes {
    /// The constant size in bytes when this type is packed for network transmission.
    const PACKED_SIZE_BYTES: usize;
}

/// Parse a fixed-size header field from the front of a byte slice, returning the
/// parsed value and the number of bytes consumed.
///
/// Unlike [`ReadFromBytes`], this trait operates directly on `&[u8]` and does not
/// go through `std::io`.
pub trait FromBytes: Sized {
    /// Parse from the given byte slice. Returns the parsed value and the
    /// number of bytes consumed from the front of `buf`.
    fn from_bytes(buf: &[u8]) -> Result<(Self, usize), ParseError>;
}

/// Serialize a fixed-size header field into a byte slice, returning the number of
/// bytes written.
pub trait ToBytes {
    /// Write this value into the given byte slice. Returns the number of bytes
    /// written. Fails with [`ParseError::BufferTooShort`] if `buf` is too short.
    fn to_bytes(&self, buf: &mut [u8]) -> Result<usize, ParseError>;
}

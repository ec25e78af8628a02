// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

use crate::error::ParseError;

use super::{
    ConstPackedSizeBytes, FromBytes, ReferenceIdentifier, ShortFormat, TimestampFormat, ToBytes,
};

fn check_len(needed: usize, available: usize) -> Result<(), ParseError> {
    if available < needed {
        return Err(ParseError::BufferTooShort { needed, available });
    }
    Ok(())
}

impl FromBytes for ShortFormat {
    fn from_bytes(buf: &[u8]) -> Result<(Self, usize), ParseError> {
        check_len(Self::PACKED_SIZE_BYTES, buf.len())?;
        let raw = i32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]);
        Ok((ShortFormat(raw), Self::PACKED_SIZE_BYTES))
    }
}

impl FromBytes for TimestampFormat {
    fn from_bytes(buf: &[u8]) -> Result<(Self, usize), ParseError> {
        check_len(Self::PACKED_SIZE_BYTES, buf.len())?;
        let seconds = u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]);
        let fraction = u32::from_be_bytes([buf[4], buf[5], buf[6], buf[7]]);
        Ok((
            TimestampFormat { seconds, fraction },
            Self::PACKED_SIZE_BYTES,
        ))
    }
}

// Buffer-based writer implementations (io-independent).

impl ToBytes for ShortFormat {
    fn to_bytes(&self, buf: &mut [u8]) -> Result<usize, ParseError> {
        check_len(Self::PACKED_SIZE_BYTES, buf.len())?;
        buf[..4].copy_from_slice(&self.0.to_be_bytes());
        Ok(Self::PACKED_SIZE_BYTES)
    }
}

impl ToBytes for TimestampFormat {
    fn to_bytes(&self, buf: &mut [u8]) -> Result<usize, ParseError> {
        check_len(Self::PACKED_SIZE_BYTES, buf.len())?;
        buf[..4].copy_from_slice(&self.seconds.to_be_bytes());
        buf[4..8].copy_from_slice(&self.fraction.to_be_bytes());
        Ok(Self::PACKED_SIZE_BYTES)
    }
}

impl ToBytes for ReferenceIdentifier {
    fn to_bytes(&self, buf: &mut [u8]) -> Result<usize, ParseError> {
        check_len(Self::PACKED_SIZE_BYTES, buf.len())?;
        buf[..4].copy_from_slice(&self.as_bytes());
        Ok(Self::PACKED_SIZE_BYTES)
    }
}

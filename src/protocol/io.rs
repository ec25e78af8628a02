// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

use byteorder::{BE, ReadBytesExt, WriteBytesExt};
use chrono::{DateTime, Utc};
use std::io;

use super::{
    ReadBytes, ReadFromBytes, Request, Response, ShortFormat, TimestampFormat, WriteBytes,
    WriteToBytes, decode_leap_indicator, decode_mode, decode_reference_identifier, decode_stratum,
    decode_version,
};

// Writer implementations.

impl<W> WriteBytes for W
where
    W: WriteBytesExt,
{
    fn write_bytes<P: WriteToBytes>(&mut self, protocol: P) -> io::Result<()> {
        protocol.write_to_bytes(self)
    }
}

impl<P> WriteToBytes for &P
where
    P: WriteToBytes,
{
    fn write_to_bytes<W: WriteBytesExt>(&self, writer: W) -> io::Result<()> {
        (*self).write_to_bytes(writer)
    }
}

impl WriteToBytes for ShortFormat {
    fn write_to_bytes<W: WriteBytesExt>(&self, mut writer: W) -> io::Result<()> {
        writer.write_i32::<BE>(self.0)?;
        Ok(())
    }
}

impl WriteToBytes for TimestampFormat {
    fn write_to_bytes<W: WriteBytesExt>(&self, mut writer: W) -> io::Result<()> {
        writer.write_u32::<BE>(self.seconds)?;
        writer.write_u32::<BE>(self.fraction)?;
        Ok(())
    }
}

impl WriteToBytes for Request {
    /// Writes the bytes of [`Request::to_bytes`].
    fn write_to_bytes<W: WriteBytesExt>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(&self.to_bytes())?;
        Ok(())
    }
}

// Reader implementations.

impl<R> ReadBytes for R
where
    R: ReadBytesExt,
{
    fn read_bytes<P: ReadFromBytes>(&mut self) -> io::Result<P> {
        P::read_from_bytes(self)
    }
}

impl ReadFromBytes for ShortFormat {
    fn read_from_bytes<R: ReadBytesExt>(mut reader: R) -> io::Result<Self> {
        Ok(ShortFormat(reader.read_i32::<BE>()?))
    }
}

impl ReadFromBytes for TimestampFormat {
    fn read_from_bytes<R: ReadBytesExt>(mut reader: R) -> io::Result<Self> {
        let seconds = reader.read_u32::<BE>()?;
        let fraction = reader.read_u32::<BE>()?;
        Ok(TimestampFormat { seconds, fraction })
    }
}

impl ReadFromBytes for Response {
    /// Reads exactly one packet. A reader that runs dry first fails with
    /// [`io::ErrorKind::UnexpectedEof`].
    fn read_from_bytes<R: ReadBytesExt>(mut reader: R) -> io::Result<Self> {
        let li_vn_mode = reader.read_u8()?;
        let stratum = decode_stratum(reader.read_u8()?);
        let poll_interval = reader.read_i8()?;
        let precision = reader.read_i8()?;
        let root_delay = ShortFormat::read_from_bytes(&mut reader)?;
        let root_dispersion = ShortFormat::read_from_bytes(&mut reader)?;
        let mut reference_id = [0u8; 4];
        reader.read_exact(&mut reference_id)?;
        let reference_timestamp = read_time(&mut reader)?;
        let originate_timestamp = read_time(&mut reader)?;
        let receive_timestamp = read_time(&mut reader)?;
        let transmit_timestamp = read_time(&mut reader)?;

        Ok(Response {
            request: Request {
                leap_indicator: decode_leap_indicator(li_vn_mode),
                version: decode_version(li_vn_mode),
                mode: decode_mode(li_vn_mode),
                stratum,
                poll_interval,
                originate_timestamp,
            },
            precision,
            root_delay,
            root_dispersion,
            reference_identifier: decode_reference_identifier(stratum, reference_id),
            reference_timestamp,
            receive_timestamp,
            transmit_timestamp,
        })
    }
}

fn read_time<R: ReadBytesExt>(reader: R) -> io::Result<DateTime<Utc>> {
    Ok(TimestampFormat::read_from_bytes(reader)?.into())
}

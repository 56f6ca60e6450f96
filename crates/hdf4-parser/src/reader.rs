//! Bounds-checked big-endian byte reading.
//!
//! HDF4 is big-endian throughout; every multi-byte field in the container
//! goes through this cursor so truncation surfaces as a typed error instead
//! of a panic.

use crate::error::{Hdf4Error, Hdf4Result};

pub(crate) struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn at(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    pub fn take(&mut self, n: usize) -> Hdf4Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(Hdf4Error::Truncated {
                offset: self.pos,
                needed: n,
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Hdf4Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Hdf4Result<u16> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub fn read_i16(&mut self) -> Hdf4Result<i16> {
        let b = self.take(2)?;
        Ok(i16::from_be_bytes([b[0], b[1]]))
    }

    pub fn read_u32(&mut self) -> Hdf4Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Read a length-prefixed (u16) byte string, trimming trailing NULs.
    pub fn read_prefixed_string(&mut self) -> Hdf4Result<String> {
        let len = self.read_u16()? as usize;
        let bytes = self.take(len)?;
        Ok(latin1_trimmed(bytes))
    }
}

/// Decode bytes as Latin-1, dropping trailing NUL padding.
pub(crate) fn latin1_trimmed(bytes: &[u8]) -> String {
    let end = bytes
        .iter()
        .rposition(|&b| b != 0)
        .map(|p| p + 1)
        .unwrap_or(0);
    bytes[..end].iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_big_endian_reads() {
        let data = [0x01, 0x02, 0x00, 0x00, 0x01, 0x00, 0xff];
        let mut r = ByteReader::new(&data);
        assert_eq!(r.read_u16().unwrap(), 0x0102);
        assert_eq!(r.read_u32().unwrap(), 0x0100);
        assert_eq!(r.read_u8().unwrap(), 0xff);
        assert!(r.read_u8().is_err());
    }

    #[test]
    fn test_truncation_reports_offset() {
        let mut r = ByteReader::new(&[0x00]);
        match r.read_u32() {
            Err(Hdf4Error::Truncated { offset: 0, needed: 4 }) => {}
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_prefixed_string() {
        let data = [0x00, 0x05, b'L', b'1', b'B', 0x00, 0x00];
        let mut r = ByteReader::new(&data);
        assert_eq!(r.read_prefixed_string().unwrap(), "L1B");
    }
}

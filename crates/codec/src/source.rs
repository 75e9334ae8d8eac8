use primitive_types::U256;

use crate::Error;

/// Positional reader over the canonical wire form.
pub struct Source<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Source<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Source { buf, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn read_byte(&mut self) -> Result<u8, Error> {
        let b = *self.buf.get(self.pos).ok_or(Error::UnexpectedEndOfInput)?;
        self.pos += 1;
        Ok(b)
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], Error> {
        if self.remaining() < len {
            return Err(Error::UnexpectedEndOfInput);
        }
        let bytes = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    pub fn read_u16(&mut self) -> Result<u16, Error> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_le_bytes(bytes.try_into().expect("2 bytes")))
    }

    pub fn read_u32(&mut self) -> Result<u32, Error> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_le_bytes(bytes.try_into().expect("4 bytes")))
    }

    pub fn read_u64(&mut self) -> Result<u64, Error> {
        let bytes = self.read_bytes(8)?;
        Ok(u64::from_le_bytes(bytes.try_into().expect("8 bytes")))
    }

    pub fn read_var_uint(&mut self) -> Result<u64, Error> {
        match self.read_byte()? {
            0xFD => self.read_u16().map(u64::from),
            0xFE => self.read_u32().map(u64::from),
            0xFF => self.read_u64(),
            b => Ok(u64::from(b)),
        }
    }

    pub fn read_var_bytes(&mut self) -> Result<&'a [u8], Error> {
        let len = self.read_var_uint()?;
        let len = usize::try_from(len).map_err(|_| Error::UnexpectedEndOfInput)?;
        self.read_bytes(len)
    }

    /// Fixed 32-byte little-endian amount. Trailing zero padding is
    /// stripped down to the minimal big-int form; an encoding whose
    /// most significant non-zero byte carries the sign bit is a
    /// negative two's-complement value and is rejected.
    pub fn read_u256(&mut self) -> Result<U256, Error> {
        let le = self.read_bytes(32)?;
        let minimal = match le.iter().rposition(|b| *b != 0) {
            Some(last) => &le[..=last],
            None => return Ok(U256::zero()),
        };
        if minimal[minimal.len() - 1] & 0x80 != 0 {
            return Err(Error::NegativeValue);
        }
        Ok(U256::from_little_endian(minimal))
    }
}

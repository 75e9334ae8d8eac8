use primitive_types::U256;

use crate::Error;

/// Append-only byte writer producing the canonical wire form.
#[derive(Default)]
pub struct Sink {
    buf: Vec<u8>,
}

impl Sink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Sink {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn write_byte(&mut self, b: u8) {
        self.buf.push(b);
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    /// Bitcoin-style variable length integer: one byte below 0xFD,
    /// otherwise a width marker followed by little-endian payload.
    pub fn write_var_uint(&mut self, v: u64) {
        if v < 0xFD {
            self.write_byte(v as u8);
        } else if v <= 0xFFFF {
            self.write_byte(0xFD);
            self.write_u16(v as u16);
        } else if v <= 0xFFFF_FFFF {
            self.write_byte(0xFE);
            self.write_u32(v as u32);
        } else {
            self.write_byte(0xFF);
            self.write_u64(v);
        }
    }

    pub fn write_var_bytes(&mut self, bytes: &[u8]) {
        self.write_var_uint(bytes.len() as u64);
        self.write_bytes(bytes);
    }

    /// Fixed 32-byte little-endian amount. The most significant bit
    /// must stay clear; the target chain interprets the field as a
    /// signed big-int and a set sign bit would flip the value
    /// negative.
    pub fn write_u256(&mut self, v: U256) -> Result<(), Error> {
        if v.bit(255) {
            return Err(Error::ValueTooLarge);
        }
        let mut le = [0u8; 32];
        v.to_little_endian(&mut le);
        self.buf.extend_from_slice(&le);
        Ok(())
    }

    pub fn bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

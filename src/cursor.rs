//! A strictly ordered cursor over the input bytes.
//!
//! The format has no random access inside a section: every field is read in
//! writer order and the cursor only ever advances. All reads are bounds
//! checked and fail with offset context instead of panicking.

use crate::error::{DecodeError, Result};
use crate::version::Version;

/// Maximum length of a string-pool entry, terminator included.
pub const MAX_STRING_LEN: usize = 1024;

/// A forward-only reader over a byte slice.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor over `buf`, positioned at `pos`.
    pub fn at(buf: &'a [u8], pos: usize) -> Cursor<'a> {
        Cursor { buf, pos }
    }

    /// Current byte offset from the start of the underlying buffer.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Takes `n` bytes, advancing only on success.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let remaining = self.buf.len() - self.pos;
        if n > remaining {
            return Err(DecodeError::UnexpectedEnd {
                offset: self.pos,
                needed: n,
                remaining,
            });
        }
        let bytes = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Reads one byte without advancing.
    pub fn peek_u8(&self) -> Result<u8> {
        match self.buf.get(self.pos) {
            Some(&b) => Ok(b),
            None => Err(DecodeError::UnexpectedEnd {
                offset: self.pos,
                needed: 1,
                remaining: 0,
            }),
        }
    }

    /// Reads a `u8`.
    pub fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    /// Reads a little-endian `u16`.
    pub fn u16(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    /// Reads a little-endian `u32`.
    pub fn u32(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Reads a little-endian `u64`.
    pub fn u64(&mut self) -> Result<u64> {
        let b = self.take(8)?;
        Ok(u64::from_le_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    /// Reads a little-endian `i16`.
    pub fn i16(&mut self) -> Result<i16> {
        Ok(self.u16()? as i16)
    }

    /// Reads a little-endian `i32`.
    pub fn i32(&mut self) -> Result<i32> {
        Ok(self.u32()? as i32)
    }

    /// Reads a little-endian `f64`.
    pub fn f64(&mut self) -> Result<f64> {
        Ok(f64::from_bits(self.u64()?))
    }

    /// Reads a declaration/string index: 2 bytes before 3.4, 4 bytes after.
    pub fn var_index(&mut self, version: Version) -> Result<u32> {
        if version.wide_indices() {
            self.u32()
        } else {
            Ok(u32::from(self.u16()?))
        }
    }

    /// Reads the kernel input count: 1 byte before 3.5, 4 bytes after.
    pub fn input_count(&mut self, version: Version) -> Result<u32> {
        if version.wide_input_count() {
            self.u32()
        } else {
            Ok(u32::from(self.u8()?))
        }
    }

    /// Reads a routine name length: 1 byte before 3.7, 2 bytes after.
    pub fn name_length(&mut self, version: Version) -> Result<usize> {
        if version.wide_name_length() {
            Ok(usize::from(self.u16()?))
        } else {
            Ok(usize::from(self.u8()?))
        }
    }

    /// Reads a NUL-terminated string-pool entry of at most
    /// [`MAX_STRING_LEN`] bytes including the terminator.
    ///
    /// Non-UTF-8 bytes are replaced; the original writer emits ASCII names.
    pub fn cstr(&mut self, string_index: u32) -> Result<String> {
        let start = self.pos;
        loop {
            let len = self.pos - start;
            if len >= MAX_STRING_LEN {
                return Err(DecodeError::OversizedString {
                    index: string_index,
                    max: MAX_STRING_LEN,
                });
            }
            if self.u8()? == 0 {
                return Ok(String::from_utf8_lossy(&self.buf[start..start + len]).into_owned());
            }
        }
    }
}

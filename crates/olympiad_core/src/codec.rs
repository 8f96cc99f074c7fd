//! Little-endian byte cursor used by every record codec.

use thiserror::Error;

use crate::layout::padding_for;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Truncated data at offset {offset}: needed {needed} bytes, {available} available")]
    Truncated { offset: usize, needed: usize, available: usize },

    #[error("Name length {len} at offset {offset} exceeds remaining {remaining} bytes")]
    NameTooLong { offset: usize, len: usize, remaining: usize },

    #[error("Name at offset {offset} is not valid UTF-8")]
    InvalidUtf8 { offset: usize },

    #[error("Name of {len} bytes does not fit a u32 length prefix")]
    NameOverflow { len: usize },
}

/// Append-only little-endian writer.
///
/// Padding is always relative to `base`, the offset where the enclosing
/// record starts, because C aligns members within the struct.
pub struct ByteWriter<'a> {
    buf: &'a mut Vec<u8>,
    base: usize,
}

impl<'a> ByteWriter<'a> {
    pub fn new(buf: &'a mut Vec<u8>) -> Self {
        let base = buf.len();
        Self { buf, base }
    }

    /// Offset from the start of the current record.
    pub fn offset(&self) -> usize {
        self.buf.len() - self.base
    }

    pub fn put_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn put_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn put_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn put_u64(&mut self, value: u64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn put_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// u32 length prefix followed by the raw bytes, no terminator.
    pub fn put_str(&mut self, value: &str) -> Result<(), CodecError> {
        let len = u32::try_from(value.len())
            .map_err(|_| CodecError::NameOverflow { len: value.len() })?;
        self.put_u32(len);
        self.put_bytes(value.as_bytes());
        Ok(())
    }

    /// Zero-fill up to the next multiple of `align` within the record.
    pub fn pad_to(&mut self, align: usize) {
        let pad = padding_for(self.offset(), align);
        self.buf.resize(self.buf.len() + pad, 0);
    }
}

/// Bounds-checked little-endian reader.
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
    base: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0, base: 0 }
    }

    /// Absolute position in the underlying buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Start a new record at the current position; padding is measured
    /// from here.
    pub fn begin_record(&mut self) {
        self.base = self.pos;
    }

    pub fn offset(&self) -> usize {
        self.pos - self.base
    }

    pub fn take(&mut self, len: usize) -> Result<&'a [u8], CodecError> {
        if len > self.remaining() {
            return Err(CodecError::Truncated {
                offset: self.pos,
                needed: len,
                available: self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    pub fn take_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn get_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.take(1)?[0])
    }

    pub fn get_u16(&mut self) -> Result<u16, CodecError> {
        Ok(u16::from_le_bytes(self.take_array()?))
    }

    pub fn get_u32(&mut self) -> Result<u32, CodecError> {
        Ok(u32::from_le_bytes(self.take_array()?))
    }

    pub fn get_u64(&mut self) -> Result<u64, CodecError> {
        Ok(u64::from_le_bytes(self.take_array()?))
    }

    /// Counterpart of [`ByteWriter::put_str`]. A length that cannot fit in
    /// what is left of the buffer is corruption, not a short read.
    pub fn get_str(&mut self) -> Result<String, CodecError> {
        let len = self.get_u32()? as usize;
        let offset = self.pos;
        if len > self.remaining() {
            return Err(CodecError::NameTooLong { offset, len, remaining: self.remaining() });
        }
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| CodecError::InvalidUtf8 { offset })
    }

    /// Skip padding; its content is don't-care.
    pub fn skip_to(&mut self, align: usize) -> Result<(), CodecError> {
        let pad = padding_for(self.offset(), align);
        self.take(pad).map(|_| ())
    }
}

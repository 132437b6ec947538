//! Cursor over a borrowed input buffer.

use crate::{StreamError, StreamLimits};

/// Reads typed values from the front of a byte slice.
///
/// The reader borrows its input and never copies it except where a
/// value needs ownership (strings). Every read either consumes exactly
/// the bytes of one value or fails without advancing.
#[derive(Debug, Clone)]
pub struct PacketReader<'a> {
    data: &'a [u8],
    position: usize,
    limits: StreamLimits,
}

impl<'a> PacketReader<'a> {
    /// Creates a reader over `data` with default limits.
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_limits(data, StreamLimits::default())
    }

    /// Creates a reader over `data` that enforces `limits`.
    pub fn with_limits(data: &'a [u8], limits: StreamLimits) -> Self {
        Self {
            data,
            position: 0,
            limits,
        }
    }

    /// The limits this reader enforces.
    pub fn limits(&self) -> &StreamLimits {
        &self.limits
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Returns `true` once every byte has been consumed.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, needed: usize) -> Result<&'a [u8], StreamError> {
        let available = self.remaining();
        if needed > available {
            return Err(StreamError::UnexpectedEof { needed, available });
        }
        let bytes = &self.data[self.position..self.position + needed];
        self.position += needed;
        Ok(bytes)
    }

    /// Runs `read`, rewinding to the starting position if it fails.
    fn atomic<T>(
        &mut self,
        read: impl FnOnce(&mut Self) -> Result<T, StreamError>,
    ) -> Result<T, StreamError> {
        let start = self.position;
        let result = read(self);
        if result.is_err() {
            self.position = start;
        }
        result
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], StreamError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, StreamError> {
        Ok(self.take_array::<1>()?[0])
    }

    /// Reads a boolean. Only `0x00` and `0x01` are accepted.
    pub fn read_bool(&mut self) -> Result<bool, StreamError> {
        self.atomic(|r| match r.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(StreamError::InvalidBoolean(other)),
        })
    }

    pub fn read_i32(&mut self) -> Result<i32, StreamError> {
        self.take_array().map(i32::from_be_bytes)
    }

    pub fn read_i64(&mut self) -> Result<i64, StreamError> {
        self.take_array().map(i64::from_be_bytes)
    }

    pub fn read_f32(&mut self) -> Result<f32, StreamError> {
        self.take_array().map(f32::from_be_bytes)
    }

    pub fn read_f64(&mut self) -> Result<f64, StreamError> {
        self.take_array().map(f64::from_be_bytes)
    }

    /// Reads a VarInt written by
    /// [`PacketWriter::write_var_int`](crate::PacketWriter::write_var_int).
    pub fn read_var_int(&mut self) -> Result<i32, StreamError> {
        self.atomic(|r| {
            let mut value: u32 = 0;
            for i in 0..5 {
                let byte = r.read_u8()?;
                value |= u32::from(byte & 0x7F) << (7 * i);
                if byte & 0x80 == 0 {
                    return Ok(value as i32);
                }
            }
            Err(StreamError::VarIntTooLong)
        })
    }

    fn read_len(&mut self) -> Result<usize, StreamError> {
        let len = self.read_var_int()?;
        usize::try_from(len).map_err(|_| StreamError::NegativeLength(len))
    }

    /// Reads a list length prefix and checks it against the limits.
    pub fn read_list_len(&mut self) -> Result<usize, StreamError> {
        self.atomic(|r| {
            let len = r.read_len()?;
            let max = r.limits.max_list_len;
            if len > max {
                return Err(StreamError::ListTooLong { len, max });
            }
            Ok(len)
        })
    }

    /// Reads a VarInt-length-prefixed UTF-8 string.
    pub fn read_string(&mut self) -> Result<String, StreamError> {
        self.atomic(|r| {
            let max = r.limits.max_string_len;
            let byte_len = r.read_len()?;
            // A char is at most 4 UTF-8 bytes; reject before touching the data.
            let max_bytes = max.saturating_mul(4);
            if byte_len > max_bytes {
                return Err(StreamError::StringBytesTooLong {
                    len: byte_len,
                    max: max_bytes,
                });
            }
            let text = std::str::from_utf8(r.take(byte_len)?)?;
            let len = text.chars().count();
            if len > max {
                return Err(StreamError::StringTooLong { len, max });
            }
            Ok(text.to_owned())
        })
    }
}

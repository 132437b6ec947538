//! Growable output buffer.

use crate::{StreamError, StreamLimits};

/// An append-only byte buffer with typed write methods.
///
/// Multi-byte numbers are written big-endian (network byte order).
/// Writing into a `Vec<u8>` cannot fail on its own; the fallible
/// methods are the ones that check a [`StreamLimits`] bound.
#[derive(Debug, Clone, Default)]
pub struct PacketWriter {
    buf: Vec<u8>,
    limits: StreamLimits,
}

impl PacketWriter {
    /// Creates an empty writer with default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty writer that enforces `limits`.
    pub fn with_limits(limits: StreamLimits) -> Self {
        Self {
            buf: Vec::new(),
            limits,
        }
    }

    /// The limits this writer enforces.
    pub fn limits(&self) -> &StreamLimits {
        &self.limits
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Borrows the bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the writer and returns its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_bool(&mut self, value: bool) {
        self.buf.push(u8::from(value));
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_i64(&mut self, value: i64) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_f32(&mut self, value: f32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_f64(&mut self, value: f64) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    /// Writes a VarInt: seven bits per byte, low bits first, high bit
    /// set on every byte except the last. Negative values always take
    /// five bytes.
    pub fn write_var_int(&mut self, value: i32) {
        let mut rest = value as u32;
        loop {
            if rest & !0x7F == 0 {
                self.buf.push(rest as u8);
                return;
            }
            self.buf.push((rest & 0x7F) as u8 | 0x80);
            rest >>= 7;
        }
    }

    /// Writes a VarInt length prefix for a list of `len` elements.
    ///
    /// # Errors
    /// Returns `StreamError::ListTooLong` if `len` exceeds the limit.
    pub fn write_list_len(&mut self, len: usize) -> Result<(), StreamError> {
        let max = self.limits.max_list_len;
        if len > max {
            return Err(StreamError::ListTooLong { len, max });
        }
        // `max_list_len` is configurable, so clamp to the VarInt range.
        let prefix = i32::try_from(len)
            .map_err(|_| StreamError::ListTooLong { len, max: i32::MAX as usize })?;
        self.write_var_int(prefix);
        Ok(())
    }

    /// Writes a string as a VarInt byte length followed by UTF-8 bytes.
    ///
    /// # Errors
    /// Returns `StreamError::StringTooLong` if the string has more
    /// characters than the limit allows.
    pub fn write_string(&mut self, value: &str) -> Result<(), StreamError> {
        let max = self.limits.max_string_len;
        let len = value.chars().count();
        if len > max {
            return Err(StreamError::StringTooLong { len, max });
        }
        let bytes = value.as_bytes();
        let prefix = i32::try_from(bytes.len()).map_err(|_| StreamError::StringBytesTooLong {
            len: bytes.len(),
            max: i32::MAX as usize,
        })?;
        self.write_var_int(prefix);
        self.buf.extend_from_slice(bytes);
        Ok(())
    }
}

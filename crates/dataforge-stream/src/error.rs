//! Errors raised by the packet reader and writer.

/// Errors that can occur while reading or writing a packet buffer.
///
/// A stream error is fatal for the single read or write that produced
/// it. There is no resynchronization: the caller discards the partially
/// consumed buffer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StreamError {
    /// The buffer ended before a value was complete (truncated input).
    #[error("unexpected end of stream: needed {needed} bytes, {available} available")]
    UnexpectedEof { needed: usize, available: usize },

    /// A boolean byte was neither `0x00` nor `0x01`.
    #[error("invalid boolean byte 0x{0:02x}")]
    InvalidBoolean(u8),

    /// A VarInt ran past its five-byte maximum.
    #[error("VarInt is longer than 5 bytes")]
    VarIntTooLong,

    /// A length prefix decoded to a negative number.
    #[error("negative length prefix {0}")]
    NegativeLength(i32),

    /// A string had more characters than
    /// [`StreamLimits::max_string_len`](crate::StreamLimits) allows.
    #[error("string of {len} characters exceeds maximum of {max}")]
    StringTooLong { len: usize, max: usize },

    /// A string's byte length prefix was larger than any string within
    /// the character limit could need, or larger than a prefix can hold.
    #[error("string of {len} bytes exceeds maximum of {max} bytes")]
    StringBytesTooLong { len: usize, max: usize },

    /// A list exceeded [`StreamLimits::max_list_len`](crate::StreamLimits).
    #[error("list of length {len} exceeds maximum of {max}")]
    ListTooLong { len: usize, max: usize },

    /// String bytes were not valid UTF-8.
    #[error("invalid UTF-8 in string: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

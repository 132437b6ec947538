//! Size limits applied while encoding and decoding.

use serde::{Deserialize, Serialize};

/// Upper bounds on variable-length values.
///
/// Readers enforce these before allocating, so a hostile length prefix
/// cannot make the decoder reserve an arbitrary amount of memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamLimits {
    /// Maximum string length, in characters.
    pub max_string_len: usize,

    /// Maximum number of elements in a length-prefixed list.
    pub max_list_len: usize,
}

impl Default for StreamLimits {
    fn default() -> Self {
        Self {
            max_string_len: 32767,
            max_list_len: 65536,
        }
    }
}

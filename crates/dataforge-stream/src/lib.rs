//! Binary packet buffers for Dataforge.
//!
//! This is the byte layer underneath the schema codecs. It knows how to
//! put primitive values (booleans, fixed-width numbers, VarInts,
//! length-prefixed strings) into a buffer and take them back out. It
//! knows nothing about schemas or fields.
//!
//! - [`PacketWriter`]: append-only output buffer.
//! - [`PacketReader`]: cursor over a borrowed input slice.
//! - [`StreamLimits`]: bounds on variable-length values.
//! - [`StreamError`]: what can go wrong (truncation, bad bytes, limits).
//!
//! # Byte order
//!
//! Fixed-width numbers are big-endian. Lengths are VarInts: seven
//! payload bits per byte, least significant group first.
//!
//! ```text
//! 300  →  0xAC 0x02
//!          │    └─ 0000010  (bits 7..13)
//!          └────── 0101100 + continuation bit
//! ```

mod config;
mod error;
mod reader;
mod writer;

pub use config::StreamLimits;
pub use error::StreamError;
pub use reader::PacketReader;
pub use writer::PacketWriter;

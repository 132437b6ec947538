//! Positional binary codec.
//!
//! The wire format is the concatenation of each field's encoding in
//! declaration order. Nothing identifies a field on the wire: no tags,
//! no lengths. The single exception is a presence-optional field, which
//! is preceded by a one-byte flag:
//!
//! ```text
//! for each field:
//!     if presence-optional:  [flag: 0x00 | 0x01] [value if flag == 0x01]
//!     else:                  [value]
//! ```
//!
//! Sender and receiver must therefore hold identical schemas. A
//! difference in shape or order misparses silently from that field on.
//!
//! The binary path never resolves defaults: the sender is expected to
//! have resolved every field before writing (typically because the
//! instance came from the document codec).

use dataforge_stream::{PacketReader, PacketWriter};

use crate::{DataError, Instance, Schema};

impl Schema {
    /// Writes `instance` to `out` in declaration order.
    ///
    /// A presence-optional field with no entry is written as absent.
    /// Every other field must hold a value.
    ///
    /// # Errors
    /// - `Unresolved` if a field that is not presence-optional is unset
    ///   or empty. Bytes of earlier fields are already in `out`.
    /// - `Encode` if a field type rejects the stored value.
    /// - `Stream` if the writer rejects a value (e.g. length limits).
    pub fn write(&self, out: &mut PacketWriter, instance: &Instance<'_>) -> Result<(), DataError> {
        let start = out.len();
        for field in self.fields() {
            let value = instance.entry(field.name()).flatten();
            let value = if field.is_presence_optional() {
                out.write_bool(value.is_some());
                match value {
                    Some(value) => value,
                    None => continue,
                }
            } else {
                value.ok_or_else(|| DataError::Unresolved(field.name().to_owned()))?
            };
            field
                .ty()
                .encode_binary(out, value)
                .map_err(|e| DataError::encode(field.name(), e))?;
        }
        tracing::trace!(
            fields = self.len(),
            bytes = out.len() - start,
            "instance written"
        );
        Ok(())
    }

    /// Reads one instance from the front of `input`.
    ///
    /// # Errors
    /// - `Stream` for truncated or malformed input, unchanged.
    /// - `Decode` if a field type rejects what it read.
    pub fn read<'s>(&'s self, input: &mut PacketReader<'_>) -> Result<Instance<'s>, DataError> {
        let start = input.position();
        let mut instance = Instance::new(self);
        for field in self.fields() {
            let present = if field.is_presence_optional() {
                input.read_bool()?
            } else {
                true
            };
            let value = if present {
                let value = field
                    .ty()
                    .decode_binary(input)
                    .map_err(|e| DataError::decode(field.name(), e))?;
                Some(value)
            } else {
                None
            };
            instance.set_value(field.name(), value);
        }
        tracing::trace!(
            fields = self.len(),
            bytes = input.position() - start,
            "instance read"
        );
        Ok(instance)
    }

    /// Encodes `instance` into a fresh buffer.
    pub fn to_bytes(&self, instance: &Instance<'_>) -> Result<Vec<u8>, DataError> {
        let mut out = PacketWriter::new();
        self.write(&mut out, instance)?;
        Ok(out.into_bytes())
    }

    /// Decodes an instance that must span all of `data`.
    ///
    /// # Errors
    /// As [`read`](Self::read), plus `TrailingBytes` if input is left over.
    pub fn from_bytes<'s>(&'s self, data: &[u8]) -> Result<Instance<'s>, DataError> {
        let mut input = PacketReader::new(data);
        let instance = self.read(&mut input)?;
        if !input.is_empty() {
            return Err(DataError::TrailingBytes(input.remaining()));
        }
        Ok(instance)
    }
}

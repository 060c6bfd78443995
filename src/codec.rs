//! Payload codecs: typed values to bytes and back.
//!
//! A codec does two unrelated jobs for a benchmark body: it synthesizes the
//! value for a workload identifier ([`PayloadCodec::make_value`]), and it
//! converts that value to and from the byte form that byte-only engines
//! store.
//!
//! ## Key Components
//!
//! - [`RawCodec`]: opaque 100-byte payloads; conversions are identity moves.
//! - [`BinaryCodec`]: a [`Record`] encoded as a fixed 8-byte big-endian id.
//! - [`JsonCodec`]: the same [`Record`] in its textual JSON form.
//!
//! ## Example Usage
//!
//! ```
//! use cachebench::codec::{BinaryCodec, PayloadCodec, Record};
//!
//! let codec = BinaryCodec;
//! let bytes = codec.to_bytes(codec.make_value(42)).unwrap();
//! assert_eq!(bytes.len(), 8);
//! assert_eq!(codec.from_bytes(bytes).unwrap(), Record { id: 42 });
//! ```

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// Length of every [`RawCodec`] payload.
pub const RAW_VALUE_LEN: usize = 100;

/// Conversion contract between a typed value and its stored bytes.
///
/// Conversions take and return owned values so identity codecs move
/// buffers instead of copying them.
pub trait PayloadCodec: Default + Send + Sync {
    /// The typed value handed to map backends.
    type Value: Clone + Send + Sync;

    /// Synthesizes the value for workload identifier `id`.
    fn make_value(&self, id: usize) -> Self::Value;

    /// Serializes `value` into the form stored by byte-only engines.
    fn to_bytes(&self, value: Self::Value) -> Result<Bytes, CodecError>;

    /// Rebuilds a typed value from stored bytes.
    fn from_bytes(&self, data: Bytes) -> Result<Self::Value, CodecError>;
}

// ---------------------------------------------------------------------------
// RawCodec
// ---------------------------------------------------------------------------

/// Opaque byte payloads.
///
/// `make_value` ignores `id` and allocates a fresh zeroed buffer: only the
/// size and the allocation itself matter to byte-payload benchmarks.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawCodec;

impl PayloadCodec for RawCodec {
    type Value = Bytes;

    #[inline]
    fn make_value(&self, _id: usize) -> Bytes {
        Bytes::from(vec![0u8; RAW_VALUE_LEN])
    }

    #[inline]
    fn to_bytes(&self, value: Bytes) -> Result<Bytes, CodecError> {
        Ok(value)
    }

    #[inline]
    fn from_bytes(&self, data: Bytes) -> Result<Bytes, CodecError> {
        Ok(data)
    }
}

// ---------------------------------------------------------------------------
// Record codecs
// ---------------------------------------------------------------------------

/// Structured payload carrying its workload identifier.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    bincode::Encode,
    bincode::Decode,
)]
pub struct Record {
    pub id: u64,
}

impl Record {
    pub fn new(id: usize) -> Self {
        Self { id: id as u64 }
    }
}

#[inline]
fn binary_config() -> impl bincode::config::Config {
    bincode::config::standard()
        .with_big_endian()
        .with_fixed_int_encoding()
}

/// [`Record`] as an 8-byte big-endian integer.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryCodec;

impl PayloadCodec for BinaryCodec {
    type Value = Record;

    #[inline]
    fn make_value(&self, id: usize) -> Record {
        Record::new(id)
    }

    fn to_bytes(&self, value: Record) -> Result<Bytes, CodecError> {
        let encoded = bincode::encode_to_vec(value, binary_config())?;
        Ok(Bytes::from(encoded))
    }

    fn from_bytes(&self, data: Bytes) -> Result<Record, CodecError> {
        let (record, consumed) = bincode::decode_from_slice::<Record, _>(&data, binary_config())?;
        if consumed != data.len() {
            return Err(CodecError::TrailingBytes {
                consumed,
                len: data.len(),
            });
        }
        Ok(record)
    }
}

/// [`Record`] as JSON text.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl PayloadCodec for JsonCodec {
    type Value = Record;

    #[inline]
    fn make_value(&self, id: usize) -> Record {
        Record::new(id)
    }

    fn to_bytes(&self, value: Record) -> Result<Bytes, CodecError> {
        Ok(Bytes::from(serde_json::to_vec(&value)?))
    }

    fn from_bytes(&self, data: Bytes) -> Result<Record, CodecError> {
        Ok(serde_json::from_slice(&data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_values_are_fixed_size_and_identity() {
        let codec = RawCodec;
        let value = codec.make_value(7);
        assert_eq!(value.len(), RAW_VALUE_LEN);
        assert_eq!(codec.make_value(8), value);

        let bytes = codec.to_bytes(value.clone()).unwrap();
        assert_eq!(bytes.as_ptr(), value.as_ptr());
        assert_eq!(codec.from_bytes(bytes).unwrap(), value);
    }

    #[test]
    fn binary_layout_is_big_endian_u64() {
        let bytes = BinaryCodec.to_bytes(Record { id: 0x0102 }).unwrap();
        assert_eq!(&bytes[..], &[0, 0, 0, 0, 0, 0, 1, 2]);
    }

    #[test]
    fn binary_rejects_short_input() {
        let err = BinaryCodec
            .from_bytes(Bytes::from_static(&[0, 1, 2]))
            .unwrap_err();
        assert!(matches!(err, CodecError::Decode(_)));
    }

    #[test]
    fn binary_rejects_trailing_bytes() {
        let err = BinaryCodec
            .from_bytes(Bytes::from_static(&[0, 0, 0, 0, 0, 0, 0, 1, 9]))
            .unwrap_err();
        assert!(matches!(
            err,
            CodecError::TrailingBytes {
                consumed: 8,
                len: 9
            }
        ));
    }

    #[test]
    fn json_uses_field_name() {
        let bytes = JsonCodec.to_bytes(Record { id: 5 }).unwrap();
        assert_eq!(&bytes[..], br#"{"id":5}"#);
    }

    #[test]
    fn json_rejects_garbage() {
        let err = JsonCodec
            .from_bytes(Bytes::from_static(b"not json"))
            .unwrap_err();
        assert!(matches!(err, CodecError::Json(_)));
    }
}

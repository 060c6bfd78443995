// ==============================================
// CODEC ROUND-TRIP LAWS (property tests)
// ==============================================

use bytes::Bytes;
use proptest::prelude::*;

use cachebench::codec::{BinaryCodec, JsonCodec, PayloadCodec, RawCodec, Record};

proptest! {
    #[test]
    fn binary_round_trips(id in any::<u64>()) {
        let codec = BinaryCodec;
        let record = Record { id };
        let bytes = codec.to_bytes(record).unwrap();
        prop_assert_eq!(bytes.len(), 8);
        prop_assert_eq!(&bytes[..], &id.to_be_bytes()[..]);
        prop_assert_eq!(codec.from_bytes(bytes).unwrap(), record);
    }

    #[test]
    fn json_round_trips(id in any::<u64>()) {
        let codec = JsonCodec;
        let record = Record { id };
        let bytes = codec.to_bytes(record).unwrap();
        prop_assert_eq!(codec.from_bytes(bytes).unwrap(), record);
    }

    #[test]
    fn raw_is_identity(data in proptest::collection::vec(any::<u8>(), 0..256)) {
        let codec = RawCodec;
        let value = Bytes::from(data);
        let stored = codec.to_bytes(value.clone()).unwrap();
        prop_assert_eq!(codec.from_bytes(stored).unwrap(), value);
    }

    #[test]
    fn truncated_binary_is_rejected(id in any::<u64>(), cut in 0usize..8) {
        let codec = BinaryCodec;
        let bytes = codec.to_bytes(Record { id }).unwrap();
        prop_assert!(codec.from_bytes(bytes.slice(..cut)).is_err());
    }
}

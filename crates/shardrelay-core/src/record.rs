//! Batch and record types — the input to the consumer.

use serde::{Deserialize, Serialize};

/// One entry of a data-stream batch: an opaque payload plus stream
/// provenance. The payload is transported base64-encoded, the stream
/// wire form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamRecord {
    /// Stream-native sequence identifier (opaque string).
    pub sequence_token: String,
    /// Source identifier the stream type/name/region/account derive from.
    pub source_id: String,
    /// Raw, undecoded payload bytes.
    #[serde(with = "payload_encoding")]
    pub payload: Vec<u8>,
}

/// An ordered sequence of records pulled from one shard read.
/// Order is significant: resumption depends on it being reproducible.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordBatch {
    pub records: Vec<StreamRecord>,
}

impl RecordBatch {
    pub fn new(records: Vec<StreamRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Base64 payload codec matching how shard reads deliver record data.
mod payload_encoding {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(payload: &[u8], ser: S) -> Result<S::Ok, S::Error> {
        STANDARD.encode(payload).serialize(ser)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(de)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_round_trips_through_base64() {
        let record = StreamRecord {
            sequence_token: "49590338271490256608559692538361571095921575989136588898".into(),
            source_id: "arn:aws:kinesis:us-east-1:123456789012:stream/app-logs".into(),
            payload: b"line one\nline two\n".to_vec(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("bGluZSBvbmUKbGluZSB0d28K"));
        let back: StreamRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.payload, record.payload);
    }

    #[test]
    fn batch_deserializes_from_file_form() {
        let json = r#"{"records":[{"sequence_token":"1","source_id":"arn:aws:kinesis:us-east-1:1:stream/s","payload":"aGk="}]}"#;
        let batch: RecordBatch = serde_json::from_str(json).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.records[0].payload, b"hi");
    }
}

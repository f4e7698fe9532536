//! The continuation message wire form.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use shardrelay_core::{ContinuationError, OffsetCursor, StreamRecord, StreamSource};

/// Attribute keys, fixed by the continuation queue contract.
pub const ATTR_CONFIG: &str = "config";
pub const ATTR_STREAM_TYPE: &str = "originalStreamType";
pub const ATTR_STREAM_NAME: &str = "originalStreamName";
pub const ATTR_SEQUENCE_NUMBER: &str = "originalSequenceNumber";
pub const ATTR_SOURCE_ID: &str = "originalSourceId";
pub const ATTR_LAST_ENDING_OFFSET: &str = "originalLastEndingOffset";
pub const ATTR_LAST_EVENT_EXPANDED_OFFSET: &str = "originalLastEventExpandedOffset";

/// Transport data-type tag of a message attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeType {
    String,
    Number,
}

/// One message attribute. Numeric attributes carry their canonical
/// decimal string form to stay transport-agnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageAttribute {
    pub value: String,
    pub data_type: AttributeType,
}

impl MessageAttribute {
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            data_type: AttributeType::String,
        }
    }

    pub fn number(value: u64) -> Self {
        Self {
            value: value.to_string(),
            data_type: AttributeType::Number,
        }
    }
}

/// The wire form of an `OffsetCursor` plus enough context for a resumed
/// invocation to proceed independently of the original batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinuationMessage {
    /// The raw, undecoded payload of the interrupted record, UTF-8 text.
    pub body: String,
    /// Ordered attribute map; optional cursor attributes are present
    /// only when the cursor carries the corresponding field.
    pub attributes: IndexMap<String, MessageAttribute>,
}

impl ContinuationMessage {
    /// Build the message for one not-fully-consumed record.
    ///
    /// `config` is the opaque resumption config blob, forwarded
    /// unchanged so the resumed invocation knows how to decode.
    pub fn build(
        record: &StreamRecord,
        cursor: &OffsetCursor,
        config: &str,
    ) -> Result<Self, ContinuationError> {
        cursor.validate()?;
        let source = StreamSource::parse(&record.source_id)?;
        let body = String::from_utf8(record.payload.clone())?;

        let mut attributes = IndexMap::new();
        attributes.insert(ATTR_CONFIG.to_string(), MessageAttribute::string(config));
        attributes.insert(
            ATTR_STREAM_TYPE.to_string(),
            MessageAttribute::string(source.stream_type),
        );
        attributes.insert(
            ATTR_STREAM_NAME.to_string(),
            MessageAttribute::string(source.stream_name),
        );
        attributes.insert(
            ATTR_SEQUENCE_NUMBER.to_string(),
            MessageAttribute::string(&record.sequence_token),
        );
        attributes.insert(
            ATTR_SOURCE_ID.to_string(),
            MessageAttribute::string(&record.source_id),
        );
        if let Some(offset) = cursor.last_ending_offset {
            attributes.insert(
                ATTR_LAST_ENDING_OFFSET.to_string(),
                MessageAttribute::number(offset),
            );
        }
        if let Some(sub) = cursor.last_sub_event_index {
            attributes.insert(
                ATTR_LAST_EVENT_EXPANDED_OFFSET.to_string(),
                MessageAttribute::number(sub),
            );
        }

        Ok(Self { body, attributes })
    }

    fn require(&self, key: &str) -> Result<&str, ContinuationError> {
        self.attributes
            .get(key)
            .map(|a| a.value.as_str())
            .ok_or_else(|| ContinuationError::MissingAttribute {
                key: key.to_string(),
            })
    }

    fn optional_number(&self, key: &str) -> Result<Option<u64>, ContinuationError> {
        self.attributes
            .get(key)
            .map(|a| {
                a.value
                    .parse::<u64>()
                    .map_err(|_| ContinuationError::InvalidNumber {
                        key: key.to_string(),
                        value: a.value.clone(),
                    })
            })
            .transpose()
    }

    /// The resumption config blob, verbatim.
    pub fn config(&self) -> Result<&str, ContinuationError> {
        self.require(ATTR_CONFIG)
    }

    /// Reconstruct the cursor. The resumed invocation sees the record as
    /// the sole entry of its batch, so `record_index` is 0.
    pub fn cursor(&self) -> Result<OffsetCursor, ContinuationError> {
        let cursor = OffsetCursor {
            record_index: 0,
            sequence_token: self.require(ATTR_SEQUENCE_NUMBER)?.to_string(),
            last_ending_offset: self.optional_number(ATTR_LAST_ENDING_OFFSET)?,
            last_sub_event_index: self.optional_number(ATTR_LAST_EVENT_EXPANDED_OFFSET)?,
        };
        cursor.validate()?;
        Ok(cursor)
    }

    /// Reconstruct the record the resumed invocation will decode.
    pub fn record(&self) -> Result<StreamRecord, ContinuationError> {
        Ok(StreamRecord {
            sequence_token: self.require(ATTR_SEQUENCE_NUMBER)?.to_string(),
            source_id: self.require(ATTR_SOURCE_ID)?.to_string(),
            payload: self.body.clone().into_bytes(),
        })
    }
}

//! Stream source identity, derived from an ARN-shaped source identifier.

use crate::error::SourceError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The identity of the stream a record came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamSource {
    /// Resource type segment, e.g. "stream".
    pub stream_type: String,
    /// Stream name, e.g. "app-logs".
    pub stream_name: String,
    /// Region the stream lives in.
    pub region: String,
    /// Owning account id.
    pub account_id: String,
}

impl StreamSource {
    /// Parse an ARN-shaped identifier:
    /// `arn:<partition>:<service>:<region>:<account>:<type>/<name>`.
    pub fn parse(source_id: &str) -> Result<Self, SourceError> {
        let malformed = |reason: &str| SourceError::Malformed {
            id: source_id.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = source_id.splitn(6, ':').collect();
        if parts.len() != 6 || parts[0] != "arn" {
            return Err(malformed("expected 6 colon-separated segments starting with 'arn'"));
        }
        let (region, account_id, resource) = (parts[3], parts[4], parts[5]);
        if region.is_empty() || account_id.is_empty() {
            return Err(malformed("empty region or account segment"));
        }
        let (stream_type, stream_name) = resource
            .split_once('/')
            .ok_or_else(|| malformed("resource segment is not '<type>/<name>'"))?;
        if stream_type.is_empty() || stream_name.is_empty() {
            return Err(malformed("empty resource type or name"));
        }

        Ok(Self {
            stream_type: stream_type.to_string(),
            stream_name: stream_name.to_string(),
            region: region.to_string(),
            account_id: account_id.to_string(),
        })
    }
}

impl fmt::Display for StreamSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.stream_type, self.stream_name)
    }
}

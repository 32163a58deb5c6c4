//! Upload notification and the push-delivery envelope that carries it.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Notification that a file landed in the blob store. The payload is the filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadEvent {
    pub filename: String,
}

impl UploadEvent {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
        }
    }

    /// Message body as published: the UTF-8 bytes of the filename.
    pub fn payload(&self) -> &[u8] {
        self.filename.as_bytes()
    }

    /// Payload in the base64 form used on the wire by Pub/Sub.
    pub fn encoded_payload(&self) -> String {
        BASE64.encode(self.payload())
    }

    pub fn decode(data: &str) -> Result<Self, EventDecodeError> {
        let bytes = BASE64.decode(data.trim())?;
        let filename = String::from_utf8(bytes)?;
        if filename.is_empty() {
            return Err(EventDecodeError::EmptyFilename);
        }
        Ok(Self { filename })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EventDecodeError {
    #[error("message has no data field")]
    MissingData,

    #[error("data is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("data is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("decoded filename is empty")]
    EmptyFilename,
}

/// JSON wrapper POSTed by a push subscription.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushEnvelope {
    pub message: PushMessage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_time: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attributes: HashMap<String, String>,
}

impl PushEnvelope {
    /// Wrap an event the same way a push subscription would.
    pub fn for_event(event: &UploadEvent, message_id: impl Into<String>) -> Self {
        Self {
            message: PushMessage {
                data: Some(event.encoded_payload()),
                message_id: Some(message_id.into()),
                publish_time: Some(chrono::Utc::now().to_rfc3339()),
                attributes: HashMap::new(),
            },
            subscription: None,
        }
    }

    pub fn decode_event(&self) -> Result<UploadEvent, EventDecodeError> {
        let data = self
            .message
            .data
            .as_deref()
            .ok_or(EventDecodeError::MissingData)?;
        UploadEvent::decode(data)
    }
}

//! Wire-level message envelope carried over the bus.
//!
//! An envelope wraps an opaque payload with the correlation metadata both
//! sides need: the request id keys the reply topic, the correlation id is
//! echoed back for caller-side matching independent of topic.

use serde::{Deserialize, Serialize};

use crate::error::{DeviceError, Result};
use crate::types::AddDeviceRequest;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ContentType {
    #[serde(rename = "application/json")]
    Json,
    #[serde(rename = "text/plain")]
    Text,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Text => "text/plain",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MessageEnvelope {
    pub request_id: String,
    #[serde(default)]
    pub correlation_id: String,
    #[serde(default)]
    pub received_topic: String,
    #[serde(default)]
    pub payload: Vec<u8>,
    pub content_type: ContentType,
    /// 0 on success, 1 on failure.
    #[serde(default)]
    pub error_code: u32,
}

impl MessageEnvelope {
    /// Success response: empty JSON payload, correlation id echoed.
    pub fn new_success_response(request: &MessageEnvelope) -> Self {
        Self {
            request_id: request.request_id.clone(),
            correlation_id: request.correlation_id.clone(),
            received_topic: String::new(),
            payload: Vec::new(),
            content_type: ContentType::Json,
            error_code: 0,
        }
    }

    /// Error response: the failure text travels as the payload. The request
    /// id is echoed so the caller's reply topic still matches; the
    /// correlation id is not carried on the failure path.
    pub fn new_error_response(request_id: &str, message: &str) -> Self {
        Self {
            request_id: request_id.to_string(),
            correlation_id: String::new(),
            received_topic: String::new(),
            payload: message.as_bytes().to_vec(),
            content_type: ContentType::Text,
            error_code: 1,
        }
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| DeviceError::Decode(format!("failed to decode message envelope: {}", e)))
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self)
            .map_err(|e| DeviceError::Internal(format!("failed to encode message envelope: {}", e)))
    }
}

/// Decodes an envelope payload into an add-device request. A distinct,
/// fallible step: failure here is terminal for one message only.
pub fn decode_add_device_request(payload: &[u8]) -> Result<AddDeviceRequest> {
    serde_json::from_slice(payload).map_err(|e| {
        DeviceError::Decode(format!("failed to decode AddDeviceRequest payload: {}", e))
    })
}

//! Canonical topic construction shared with callers.
//!
//! The wire contract is fixed: request topic is
//! `{base}/{serviceName}/validatedevice`, response topic is
//! `{base}/response/{serviceName}/{requestId}`. Both sides derive the reply
//! topic from the request id alone, so these must stay bit-exact.

use crate::error::{DeviceError, Result};

pub const TOPIC_SEPARATOR: &str = "/";
pub const RESPONSE_TOPIC_SEGMENT: &str = "response";
pub const VALIDATE_DEVICE_SUBSCRIBE_TOPIC: &str = "validatedevice";

/// Joins topic segments with the bus separator.
pub fn build_topic(parts: &[&str]) -> String {
    parts.join(TOPIC_SEPARATOR)
}

/// Topic the responder subscribes to for validation requests.
pub fn build_request_topic(base: &str, service_name: &str) -> String {
    build_topic(&[base, service_name, VALIDATE_DEVICE_SUBSCRIBE_TOPIC])
}

/// Reply topic for a single request, keyed by its request id.
pub fn build_response_topic(base: &str, service_name: &str, request_id: &str) -> String {
    build_topic(&[base, RESPONSE_TOPIC_SEGMENT, service_name, request_id])
}

/// Rejects segments that would be split by the bus separator. Escaping is the
/// transport's business; this core only refuses to build ambiguous topics.
pub fn sanitize_segment(segment: &str) -> Result<&str> {
    if segment.is_empty() {
        return Err(DeviceError::Validation("empty topic segment".to_string()));
    }
    if segment.contains(TOPIC_SEPARATOR) {
        return Err(DeviceError::Validation(format!(
            "topic segment '{}' contains reserved separator '{}'",
            segment, TOPIC_SEPARATOR
        )));
    }
    Ok(segment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_topic_layout() {
        assert_eq!(
            build_request_topic("edgex", "device-test"),
            "edgex/device-test/validatedevice"
        );
    }

    #[test]
    fn test_response_topic_layout() {
        assert_eq!(
            build_response_topic("edgex", "device-test", "R1"),
            "edgex/response/device-test/R1"
        );
    }

    #[test]
    fn test_topic_derivation_is_deterministic() {
        let a = build_response_topic("edgex", "svc", "abc-123");
        let b = build_response_topic("edgex", "svc", "abc-123");
        assert_eq!(a, b);
        let c = build_response_topic("edgex", "svc", "abc-124");
        assert_ne!(a, c);
    }

    #[test]
    fn test_sanitize_rejects_separator() {
        assert!(sanitize_segment("device/1").is_err());
        assert!(sanitize_segment("").is_err());
        assert_eq!(sanitize_segment("device-1").unwrap(), "device-1");
    }
}

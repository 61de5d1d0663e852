use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Protocol-specific connection properties, keyed by property name.
pub type ProtocolProperties = HashMap<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum AdminState {
    Unlocked,
    Locked,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperatingState {
    Up,
    Down,
}

/// A candidate device as described by a caller, before any record exists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub name: String,
    pub admin_state: AdminState,
    pub operating_state: OperatingState,
    pub service_name: String,
    pub profile_name: String,
    pub protocols: HashMap<String, ProtocolProperties>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub labels: Vec<String>,
}

/// JSON request body wrapping a candidate device.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AddDeviceRequest {
    pub api_version: String,
    pub request_id: String,
    pub device: Device,
}

impl AddDeviceRequest {
    pub fn new(device: Device) -> Self {
        Self {
            api_version: crate::API_VERSION.to_string(),
            request_id: uuid::Uuid::new_v4().to_string(),
            device,
        }
    }
}

/// The owning service's record. Read here only to gate discovery.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceService {
    pub name: String,
    pub admin_state: AdminState,
}

impl DeviceService {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            admin_state: AdminState::Unlocked,
        }
    }
}

/// A device found by a driver's discovery run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredDevice {
    pub name: String,
    pub protocols: HashMap<String, ProtocolProperties>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub labels: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_state_wire_format() {
        assert_eq!(serde_json::to_string(&AdminState::Locked).unwrap(), "\"LOCKED\"");
        assert_eq!(serde_json::to_string(&OperatingState::Up).unwrap(), "\"UP\"");
    }

    #[test]
    fn test_add_device_request_round_trip() {
        let device = Device {
            name: "thermostat-01".to_string(),
            admin_state: AdminState::Unlocked,
            operating_state: OperatingState::Up,
            service_name: "device-test".to_string(),
            profile_name: "thermostat".to_string(),
            protocols: HashMap::from([(
                "modbus".to_string(),
                HashMap::from([("Address".to_string(), serde_json::json!("/dev/ttyS0"))]),
            )]),
            description: String::new(),
            labels: vec![],
        };
        let request = AddDeviceRequest::new(device.clone());
        let bytes = serde_json::to_vec(&request).unwrap();
        let decoded: AddDeviceRequest = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(decoded.device, device);
        assert_eq!(decoded.api_version, crate::API_VERSION);
    }
}

// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Permanent inventory records. Discovery only looks these up by address and
//! creates them on promotion; the rest of their lifecycle belongs elsewhere.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::device::DiscoveredDevice;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetStatus {
    #[default]
    Available,
    InUse,
    Maintenance,
    Retired,
}

impl AssetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetStatus::Available => "AVAILABLE",
            AssetStatus::InUse => "IN_USE",
            AssetStatus::Maintenance => "MAINTENANCE",
            AssetStatus::Retired => "RETIRED",
        }
    }
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AVAILABLE" => Ok(AssetStatus::Available),
            "IN_USE" => Ok(AssetStatus::InUse),
            "MAINTENANCE" => Ok(AssetStatus::Maintenance),
            "RETIRED" => Ok(AssetStatus::Retired),
            _ => Err(format!("Unknown asset status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: i64,
    pub name: String,
    pub tag: String,
    pub asset_type: String,
    pub status: AssetStatus,
    pub ip_address: Option<Ipv4Addr>,
    pub serial_number: Option<String>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub processor: Option<String>,
    pub ram: Option<String>,
    pub operating_system: Option<String>,
    pub storage: Option<String>,
    pub specifications: String,
    pub created_at: DateTime<Utc>,
}

/// Operator-supplied fields from the promotion form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetFields {
    pub name: String,
    pub tag: String,
    #[serde(rename = "type")]
    pub asset_type: String,
}

/// An asset that has not been written yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAsset {
    pub name: String,
    pub tag: String,
    pub asset_type: String,
    pub status: AssetStatus,
    pub ip_address: Option<Ipv4Addr>,
    pub serial_number: Option<String>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub processor: Option<String>,
    pub ram: Option<String>,
    pub operating_system: Option<String>,
    pub storage: Option<String>,
    pub specifications: String,
}

impl NewAsset {
    /// Maps a device's captured details onto inventory attributes. The full details
    /// document is kept in `specifications`.
    pub fn from_device(device: &DiscoveredDevice, fields: AssetFields) -> Self {
        let details = &device.details;

        Self {
            name: fields.name,
            tag: fields.tag,
            asset_type: fields.asset_type,
            status: AssetStatus::Available,
            ip_address: Some(device.ip_address),
            serial_number: details.serial.clone(),
            manufacturer: details.manufacturer.clone(),
            model: details.model.clone(),
            processor: details.processor.clone(),
            ram: details.ram_text(),
            operating_system: details.os.clone(),
            storage: details.storage_text(),
            specifications: details.to_value().to_string(),
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::device::{DeviceDetails, DeviceStatus};
    use serde_json::{Value, json};

    fn device_with(details: &str) -> DiscoveredDevice {
        DiscoveredDevice {
            id: 1,
            ip_address: Ipv4Addr::new(192, 168, 1, 50),
            hostname: Some("desk".to_string()),
            status: DeviceStatus::AgentConnected,
            last_seen: Utc::now(),
            details: DeviceDetails::parse(details),
        }
    }

    fn form() -> AssetFields {
        AssetFields {
            name: "Desk-01".to_string(),
            tag: "AST-001".to_string(),
            asset_type: "DESKTOP".to_string(),
        }
    }

    #[test]
    fn promotion_maps_identity_fields() {
        let device = device_with(r#"{"serial":"SN123","os":"Windows 11"}"#);
        let asset = NewAsset::from_device(&device, form());

        assert_eq!(asset.name, "Desk-01");
        assert_eq!(asset.serial_number.as_deref(), Some("SN123"));
        assert_eq!(asset.operating_system.as_deref(), Some("Windows 11"));
        assert_eq!(asset.status, AssetStatus::Available);
        assert_eq!(asset.ip_address, Some(Ipv4Addr::new(192, 168, 1, 50)));
        assert_eq!(asset.manufacturer, None);
    }

    #[test]
    fn specifications_keep_every_key() {
        let device = device_with(r#"{"port":22,"ram":32,"gpu":"rtx","disks":["C:"]}"#);
        let asset = NewAsset::from_device(&device, form());

        let specs: Value = serde_json::from_str(&asset.specifications).unwrap();
        assert_eq!(specs, json!({ "port": 22, "ram": 32, "gpu": "rtx", "disks": ["C:"] }));
        assert_eq!(asset.ram.as_deref(), Some("32"));
        assert_eq!(asset.storage.as_deref(), Some(r#"["C:"]"#));
    }

    #[test]
    fn form_accepts_type_key() {
        let fields: AssetFields =
            serde_json::from_str(r#"{"name":"Desk-01","tag":"AST-001","type":"DESKTOP"}"#).unwrap();
        assert_eq!(fields, form());
    }
}

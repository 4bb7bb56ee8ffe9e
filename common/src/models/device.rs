// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Discovered Device Model
//!
//! A [`DiscoveredDevice`] is the persistent record of a host seen alive, keyed by its
//! IPv4 address. Its [`DeviceDetails`] blob mixes two kinds of data:
//!
//! * **Network-observed** keys (`port`, `mac`, `match`) which every scan refreshes.
//! * **Agent-reported** keys (`serial`, `os`, `ram`, `disks`, ...) and anything else a
//!   previous writer stored. These must survive every later scan untouched.
//!
//! Unknown keys are kept in [`DeviceDetails::extra`] and written back verbatim, so a
//! newer agent can add fields without this crate losing them.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceStatus {
    New,
    AgentConnected,
    Added,
}

impl DeviceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceStatus::New => "NEW",
            DeviceStatus::AgentConnected => "AGENT_CONNECTED",
            DeviceStatus::Added => "ADDED",
        }
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NEW" => Ok(DeviceStatus::New),
            "AGENT_CONNECTED" => Ok(DeviceStatus::AgentConnected),
            "ADDED" => Ok(DeviceStatus::Added),
            _ => Err(format!("Unknown device status: {}", s)),
        }
    }
}

/// Structured view of the free-form details document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeviceDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    pub asset_match: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processor: Option<String>,
    /// Agents report this either as a number (GB) or as a string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ram: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disks: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DeviceDetails {
    /// Parses stored text. Anything that is not a JSON object yields an empty value.
    pub fn parse(text: &str) -> Self {
        match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) => Self::from_map(map),
            _ => Self::default(),
        }
    }

    /// Lifts known keys out of `map`. A known key holding an unexpected type stays in
    /// `extra` instead of being dropped.
    pub fn from_map(mut map: Map<String, Value>) -> Self {
        let port = take_with(&mut map, "port", |v| {
            v.as_u64().and_then(|n| u16::try_from(n).ok())
        });
        let mac = take_string(&mut map, "mac");
        let asset_match = take_string(&mut map, "match");
        let serial = take_string(&mut map, "serial");
        let manufacturer = take_string(&mut map, "manufacturer");
        let model = take_string(&mut map, "model");
        let processor = take_string(&mut map, "processor");
        let ram = take_with(&mut map, "ram", non_null);
        let os = take_string(&mut map, "os");
        let disks = take_with(&mut map, "disks", non_null);

        Self {
            port,
            mac,
            asset_match,
            serial,
            manufacturer,
            model,
            processor,
            ram,
            os,
            disks,
            extra: map,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Map::new()))
    }

    /// Refreshes the network-observed keys after a successful probe.
    ///
    /// `port` is always replaced. `mac` is only replaced when a new one was observed.
    /// `asset_match` is set when an asset owns this address. All other keys are left alone.
    pub fn apply_scan(&mut self, port: u16, mac: Option<&str>, asset_match: Option<String>) {
        self.extra.remove("port");
        self.port = Some(port);

        if let Some(mac) = mac {
            self.extra.remove("mac");
            self.mac = Some(mac.to_string());
        }

        if let Some(marker) = asset_match {
            self.extra.remove("match");
            self.asset_match = Some(marker);
        }
    }

    /// Folds an agent report in. Hardware keys in the report win; network keys other
    /// than an agent-supplied MAC are kept as observed.
    pub fn apply_agent_report(&mut self, report: DeviceDetails) {
        let DeviceDetails {
            port: _,
            mac,
            asset_match: _,
            serial,
            manufacturer,
            model,
            processor,
            ram,
            os,
            disks,
            extra,
        } = report;

        let extra_keys = &mut self.extra;
        overwrite(extra_keys, "mac", &mut self.mac, mac);
        overwrite(extra_keys, "serial", &mut self.serial, serial);
        overwrite(extra_keys, "manufacturer", &mut self.manufacturer, manufacturer);
        overwrite(extra_keys, "model", &mut self.model, model);
        overwrite(extra_keys, "processor", &mut self.processor, processor);
        overwrite(extra_keys, "ram", &mut self.ram, ram);
        overwrite(extra_keys, "os", &mut self.os, os);
        overwrite(extra_keys, "disks", &mut self.disks, disks);

        for (key, value) in extra {
            if is_network_key(&key) {
                continue;
            }
            // A raw value (null or mistyped) replaces the typed one of the same name.
            self.clear_hardware_field(&key);
            self.extra.insert(key, value);
        }
    }

    fn clear_hardware_field(&mut self, key: &str) {
        match key {
            "serial" => self.serial = None,
            "manufacturer" => self.manufacturer = None,
            "model" => self.model = None,
            "processor" => self.processor = None,
            "ram" => self.ram = None,
            "os" => self.os = None,
            "disks" => self.disks = None,
            _ => {}
        }
    }

    /// `ram` as the inventory stores it.
    pub fn ram_text(&self) -> Option<String> {
        self.ram.as_ref().map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    /// `disks` serialized for the inventory's free-text storage column.
    pub fn storage_text(&self) -> Option<String> {
        self.disks.as_ref().map(|v| v.to_string())
    }
}

impl<'de> Deserialize<'de> for DeviceDetails {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        Ok(Self::from_map(map))
    }
}

fn is_network_key(key: &str) -> bool {
    matches!(key, "port" | "mac" | "match")
}

/// Replaces `slot` when a value came in, dropping any raw `extra` entry under the same key.
fn overwrite<T>(
    extra: &mut Map<String, Value>,
    key: &str,
    slot: &mut Option<T>,
    incoming: Option<T>,
) {
    if incoming.is_some() {
        extra.remove(key);
        *slot = incoming;
    }
}

fn non_null(value: &Value) -> Option<Value> {
    (!value.is_null()).then(|| value.clone())
}

fn take_string(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    take_with(map, key, |v| v.as_str().map(str::to_string))
}

fn take_with<T>(
    map: &mut Map<String, Value>,
    key: &str,
    convert: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    let converted = map.get(key).and_then(&convert)?;
    map.remove(key);
    Some(converted)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveredDevice {
    pub id: i64,
    pub ip_address: Ipv4Addr,
    pub hostname: Option<String>,
    pub status: DeviceStatus,
    pub last_seen: DateTime<Utc>,
    pub details: DeviceDetails,
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

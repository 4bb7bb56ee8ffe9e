// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use chrono::{DateTime, Local, Utc};
use colored::*;
use roster_common::models::asset::{Asset, AssetStatus};
use roster_common::models::device::{DeviceStatus, DiscoveredDevice};
use roster_common::utils::redact;

use crate::terminal::colors;

pub type Detail = (String, ColoredString);

pub fn status_to_colored(status: DeviceStatus) -> ColoredString {
    let color = match status {
        DeviceStatus::New => colors::STATUS_NEW,
        DeviceStatus::AgentConnected => colors::STATUS_AGENT,
        DeviceStatus::Added => colors::STATUS_ADDED,
    };
    status.as_str().color(color).bold()
}

pub fn asset_status_to_colored(status: AssetStatus) -> ColoredString {
    let color = match status {
        AssetStatus::Available => colors::STATUS_ADDED,
        AssetStatus::InUse => colors::SECONDARY,
        AssetStatus::Maintenance => colors::PRIMARY,
        AssetStatus::Retired => colors::SEPARATOR,
    };
    status.as_str().color(color)
}

pub fn timestamp(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn hostname_to_detail(hostname: Option<&str>, redact: bool) -> Option<Detail> {
    hostname.map(|name| {
        let shown = if redact {
            redact::hostname(name)
        } else {
            name.to_string()
        };
        (String::from("Hostname"), shown.color(colors::HOSTNAME))
    })
}

pub fn mac_to_detail(mac: Option<&str>, redact: bool) -> Option<Detail> {
    mac.map(|mac| {
        let shown = if redact {
            redact::mac(mac)
        } else {
            mac.to_string()
        };
        (String::from("MAC"), shown.color(colors::MAC_ADDR))
    })
}

pub fn serial_to_detail(serial: Option<&str>, redact: bool) -> Option<Detail> {
    serial.map(|serial| {
        let shown = if redact {
            redact::serial(serial)
        } else {
            serial.to_string()
        };
        (String::from("Serial"), shown.color(colors::HARDWARE))
    })
}

fn text_detail(key: &str, value: Option<&str>) -> Option<Detail> {
    value.map(|v| (key.to_string(), v.color(colors::HARDWARE)))
}

/// Tree rows for a device, in display order.
pub fn device_details(device: &DiscoveredDevice, redact: bool) -> Vec<Detail> {
    let details = &device.details;
    let mut rows: Vec<Detail> = Vec::new();

    rows.extend(hostname_to_detail(device.hostname.as_deref(), redact));
    rows.extend(mac_to_detail(details.mac.as_deref(), redact));
    if let Some(port) = details.port {
        rows.push((String::from("Port"), port.to_string().color(colors::SECONDARY)));
    }
    rows.extend(text_detail("Asset", details.asset_match.as_deref()));
    rows.extend(text_detail("OS", details.os.as_deref()));
    rows.extend(text_detail("Model", details.model.as_deref()));
    rows.extend(serial_to_detail(details.serial.as_deref(), redact));
    rows.extend(text_detail("RAM", details.ram_text().as_deref()));
    rows.push((
        String::from("Seen"),
        timestamp(&device.last_seen).color(colors::TEXT_DEFAULT),
    ));

    rows
}

pub fn asset_details(asset: &Asset, redact: bool) -> Vec<Detail> {
    let mut rows: Vec<Detail> = vec![
        (String::from("Tag"), asset.tag.as_str().color(colors::ACCENT)),
        (String::from("Type"), asset.asset_type.as_str().color(colors::TEXT_DEFAULT)),
        (String::from("Status"), asset_status_to_colored(asset.status)),
    ];

    if let Some(ip) = asset.ip_address {
        rows.push((String::from("IPv4"), ip.to_string().color(colors::IPV4_ADDR)));
    }
    rows.extend(text_detail("OS", asset.operating_system.as_deref()));
    rows.extend(text_detail("Model", asset.model.as_deref()));
    rows.extend(serial_to_detail(asset.serial_number.as_deref(), redact));
    rows.extend(text_detail("CPU", asset.processor.as_deref()));
    rows.extend(text_detail("RAM", asset.ram.as_deref()));

    rows
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

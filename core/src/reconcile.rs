// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Reconciliation
//!
//! Merges what a scan (or an agent) just learned about an address with whatever
//! the store already knows about it.
//!
//! The merge itself ([`plan_upsert`], [`plan_agent_report`]) is pure. The
//! `reconcile*` functions wrap it with the lookups and the write, inside one
//! transaction per address.
//!
//! ## Rules
//! * Existing details keys are kept. A scan only writes `port`, `mac` and `match`.
//! * Hostname preference: freshly resolved, then previously stored, then the name
//!   of the asset owning the address.
//! * Status: `ADDED` when an asset owns the address, otherwise whatever was stored,
//!   otherwise `NEW`. A stored `ADDED` is never downgraded.

use std::net::Ipv4Addr;

use chrono::Utc;
use rusqlite::Connection;

use roster_common::debug;
use roster_common::models::asset::Asset;
use roster_common::models::device::{DeviceDetails, DeviceStatus, DiscoveredDevice};
use roster_common::models::host::Identity;
use roster_common::utils::mac;

use crate::error::DiscoveryError;
use crate::store::queries;

/// The row a reconciliation is about to write.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceUpsert {
    pub ip_address: Ipv4Addr,
    pub hostname: Option<String>,
    pub status: DeviceStatus,
    pub details: DeviceDetails,
}

/// Marker stored under `match` when an asset owns the address.
pub fn asset_marker(asset: &Asset) -> String {
    format!("asset:{}", asset.id)
}

/// Decides what to store for an alive address.
pub fn plan_upsert(
    ip: Ipv4Addr,
    port: u16,
    identity: &Identity,
    existing: Option<&DiscoveredDevice>,
    asset: Option<&Asset>,
) -> DeviceUpsert {
    let mut details = existing.map(|d| d.details.clone()).unwrap_or_default();
    details.apply_scan(port, identity.mac_address.as_deref(), asset.map(asset_marker));

    let hostname = identity
        .hostname
        .clone()
        .or_else(|| existing.and_then(|d| d.hostname.clone()))
        .or_else(|| asset.map(|a| a.name.clone()));

    let status = match (asset, existing) {
        (Some(_), _) => DeviceStatus::Added,
        (None, Some(device)) => device.status,
        (None, None) => DeviceStatus::New,
    };

    DeviceUpsert {
        ip_address: ip,
        hostname,
        status,
        details,
    }
}

/// Decides what to store after an agent reported in from `ip`.
pub fn plan_agent_report(
    ip: Ipv4Addr,
    mut report: DeviceDetails,
    existing: Option<&DiscoveredDevice>,
) -> DeviceUpsert {
    if let Some(raw) = report.mac.take() {
        report.mac = Some(mac::normalize(&raw).unwrap_or(raw));
    }

    let reported_name = report
        .extra
        .get("hostname")
        .and_then(|v| v.as_str())
        .map(str::to_string);

    let mut details = existing.map(|d| d.details.clone()).unwrap_or_default();
    details.apply_agent_report(report);

    let status = match existing.map(|d| d.status) {
        Some(DeviceStatus::Added) => DeviceStatus::Added,
        _ => DeviceStatus::AgentConnected,
    };

    DeviceUpsert {
        ip_address: ip,
        hostname: existing.and_then(|d| d.hostname.clone()).or(reported_name),
        status,
        details,
    }
}

/// Looks up, merges and writes one alive address.
pub fn reconcile(
    conn: &mut Connection,
    ip: Ipv4Addr,
    port: u16,
    identity: &Identity,
) -> Result<DiscoveredDevice, DiscoveryError> {
    let tx = conn.transaction()?;

    let asset = queries::find_asset_by_ip(&tx, ip)?;
    let existing = queries::find_device_by_ip(&tx, ip)?;
    let plan = plan_upsert(ip, port, identity, existing.as_ref(), asset.as_ref());
    let device = queries::upsert_device(&tx, &plan, Utc::now())?;

    tx.commit()?;

    debug!(
        verbosity = 2,
        "Reconciled {} ({}, port {})",
        device.ip_address,
        device.status,
        port
    );
    Ok(device)
}

pub fn reconcile_agent_report(
    conn: &mut Connection,
    ip: Ipv4Addr,
    report: DeviceDetails,
) -> Result<DiscoveredDevice, DiscoveryError> {
    let tx = conn.transaction()?;

    let existing = queries::find_device_by_ip(&tx, ip)?;
    let plan = plan_agent_report(ip, report, existing.as_ref());
    let device = queries::upsert_device(&tx, &plan, Utc::now())?;

    tx.commit()?;

    debug!(verbosity = 1, "Agent report stored for {}", device.ip_address);
    Ok(device)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

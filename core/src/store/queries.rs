// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Row-level reads and writes. Every function takes a plain `&Connection` so it can
//! run inside a transaction as well as on its own.

use std::net::Ipv4Addr;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};

use roster_common::models::asset::{Asset, AssetStatus, NewAsset};
use roster_common::models::device::{DeviceDetails, DeviceStatus, DiscoveredDevice};

use crate::error::DiscoveryError;
use crate::reconcile::DeviceUpsert;

const DEVICE_COLUMNS: &str = "id, ip_address, hostname, status, last_seen, details";

const ASSET_COLUMNS: &str = "id, name, tag, asset_type, status, ip_address, serial_number, \
    manufacturer, model, processor, ram, operating_system, storage, specifications, created_at";

/// Fixed-width UTC text so lexical order equals chronological order.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn find_device(conn: &Connection, id: i64) -> Result<Option<DiscoveredDevice>, DiscoveryError> {
    let sql = format!("SELECT {DEVICE_COLUMNS} FROM discovered_devices WHERE id = ?1");
    let device = conn
        .query_row(&sql, params![id], device_from_row)
        .optional()?;
    Ok(device)
}

pub fn find_device_by_ip(
    conn: &Connection,
    ip: Ipv4Addr,
) -> Result<Option<DiscoveredDevice>, DiscoveryError> {
    let sql = format!("SELECT {DEVICE_COLUMNS} FROM discovered_devices WHERE ip_address = ?1");
    let device = conn
        .query_row(&sql, params![ip.to_string()], device_from_row)
        .optional()?;
    Ok(device)
}

/// All devices, most recently seen first.
pub fn list_devices(conn: &Connection) -> Result<Vec<DiscoveredDevice>, DiscoveryError> {
    let sql = format!(
        "SELECT {DEVICE_COLUMNS} FROM discovered_devices ORDER BY last_seen DESC, id DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let devices = stmt
        .query_map([], device_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(devices)
}

/// Inserts or updates the row keyed by `ip_address` and returns it.
pub fn upsert_device(
    conn: &Connection,
    upsert: &DeviceUpsert,
    seen_at: DateTime<Utc>,
) -> Result<DiscoveredDevice, DiscoveryError> {
    let details = upsert.details.to_json()?;
    let sql = format!(
        r#"
        INSERT INTO discovered_devices (ip_address, hostname, status, last_seen, details)
        VALUES (?1, ?2, ?3, ?4, ?5)
        ON CONFLICT(ip_address) DO UPDATE SET
            hostname = excluded.hostname,
            status = excluded.status,
            last_seen = excluded.last_seen,
            details = excluded.details
        RETURNING {DEVICE_COLUMNS}
        "#
    );

    let device = conn.query_row(
        &sql,
        params![
            upsert.ip_address.to_string(),
            upsert.hostname,
            upsert.status.as_str(),
            format_timestamp(&seen_at),
            details,
        ],
        device_from_row,
    )?;
    Ok(device)
}

/// Returns the number of rows changed (0 when the id is unknown).
pub fn set_device_status(
    conn: &Connection,
    id: i64,
    status: DeviceStatus,
) -> Result<usize, DiscoveryError> {
    let changed = conn.execute(
        "UPDATE discovered_devices SET status = ?2 WHERE id = ?1",
        params![id, status.as_str()],
    )?;
    Ok(changed)
}

/// Oldest asset registered for `ip`, if any.
pub fn find_asset_by_ip(conn: &Connection, ip: Ipv4Addr) -> Result<Option<Asset>, DiscoveryError> {
    let sql = format!("SELECT {ASSET_COLUMNS} FROM assets WHERE ip_address = ?1 ORDER BY id LIMIT 1");
    let asset = conn
        .query_row(&sql, params![ip.to_string()], asset_from_row)
        .optional()?;
    Ok(asset)
}

pub fn list_assets(conn: &Connection) -> Result<Vec<Asset>, DiscoveryError> {
    let sql = format!("SELECT {ASSET_COLUMNS} FROM assets ORDER BY id");
    let mut stmt = conn.prepare(&sql)?;
    let assets = stmt
        .query_map([], asset_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(assets)
}

pub fn insert_asset(conn: &Connection, asset: &NewAsset) -> Result<Asset, DiscoveryError> {
    let sql = format!(
        r#"
        INSERT INTO assets (
            name, tag, asset_type, status, ip_address, serial_number, manufacturer,
            model, processor, ram, operating_system, storage, specifications, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
        RETURNING {ASSET_COLUMNS}
        "#
    );

    let created = conn.query_row(
        &sql,
        params![
            asset.name,
            asset.tag,
            asset.asset_type,
            asset.status.as_str(),
            asset.ip_address.map(|ip| ip.to_string()),
            asset.serial_number,
            asset.manufacturer,
            asset.model,
            asset.processor,
            asset.ram,
            asset.operating_system,
            asset.storage,
            asset.specifications,
            format_timestamp(&Utc::now()),
        ],
        asset_from_row,
    )?;
    Ok(created)
}

fn device_from_row(row: &Row<'_>) -> rusqlite::Result<DiscoveredDevice> {
    let details: Option<String> = row.get(5)?;

    Ok(DiscoveredDevice {
        id: row.get(0)?,
        ip_address: parse_column(row, 1)?,
        hostname: row.get(2)?,
        status: parse_column(row, 3)?,
        last_seen: parse_timestamp(row, 4)?,
        details: details
            .map(|text| DeviceDetails::parse(&text))
            .unwrap_or_default(),
    })
}

fn asset_from_row(row: &Row<'_>) -> rusqlite::Result<Asset> {
    let ip_address: Option<String> = row.get(5)?;
    let status: AssetStatus = parse_column(row, 4)?;

    Ok(Asset {
        id: row.get(0)?,
        name: row.get(1)?,
        tag: row.get(2)?,
        asset_type: row.get(3)?,
        status,
        // Addresses typed in by hand elsewhere may not parse; treat them as unset.
        ip_address: ip_address.and_then(|ip| Ipv4Addr::from_str(ip.trim()).ok()),
        serial_number: row.get(6)?,
        manufacturer: row.get(7)?,
        model: row.get(8)?,
        processor: row.get(9)?,
        ram: row.get(10)?,
        operating_system: row.get(11)?,
        storage: row.get(12)?,
        specifications: row.get(13)?,
        created_at: parse_timestamp(row, 14)?,
    })
}

fn parse_column<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: ToString,
{
    let text: String = row.get(idx)?;
    text.parse::<T>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, e.to_string().into())
    })
}

fn parse_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let text: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&text)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Turns a discovered device into a permanent asset.
//!
//! The asset insert and the device status change commit together or not at all.

use rusqlite::Connection;

use roster_common::models::asset::{Asset, AssetFields, NewAsset};
use roster_common::models::device::DeviceStatus;
use roster_common::success;

use crate::error::DiscoveryError;
use crate::store::queries;

pub fn promote(
    conn: &mut Connection,
    device_id: i64,
    fields: AssetFields,
) -> Result<Asset, DiscoveryError> {
    let tx = conn.transaction()?;

    let device = queries::find_device(&tx, device_id)?.ok_or(DiscoveryError::NotFound(device_id))?;
    let asset = queries::insert_asset(&tx, &NewAsset::from_device(&device, fields))?;

    if queries::set_device_status(&tx, device.id, DeviceStatus::Added)? == 0 {
        return Err(DiscoveryError::NotFound(device_id));
    }

    tx.commit()?;

    success!(
        "Promoted {} to asset #{} ({})",
        device.ip_address,
        asset.id,
        asset.name
    );
    Ok(asset)
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
    use crate::reconcile::DeviceUpsert;
    use crate::store::schema;
    use chrono::Utc;
    use roster_common::models::asset::AssetStatus;
    use roster_common::models::device::DeviceDetails;
    use std::net::Ipv4Addr;

    fn seeded(details: &str) -> (Connection, i64) {
        let conn = Connection::open_in_memory().unwrap();
        schema::create_tables(&conn).unwrap();
        let device = queries::upsert_device(
            &conn,
            &DeviceUpsert {
                ip_address: Ipv4Addr::new(192, 168, 1, 30),
                hostname: Some("desk".to_string()),
                status: DeviceStatus::AgentConnected,
                details: DeviceDetails::parse(details),
            },
            Utc::now(),
        )
        .unwrap();
        (conn, device.id)
    }

    fn form() -> AssetFields {
        AssetFields {
            name: "Desk-01".to_string(),
            tag: "AST-001".to_string(),
            asset_type: "DESKTOP".to_string(),
        }
    }

    #[test]
    fn promotion_creates_asset_and_marks_device() {
        let (mut conn, id) = seeded(r#"{"serial":"SN123","os":"Windows 11"}"#);
        let asset = promote(&mut conn, id, form()).unwrap();

        assert_eq!(asset.serial_number.as_deref(), Some("SN123"));
        assert_eq!(asset.operating_system.as_deref(), Some("Windows 11"));
        assert_eq!(asset.name, "Desk-01");
        assert_eq!(asset.status, AssetStatus::Available);
        assert_eq!(asset.ip_address, Some(Ipv4Addr::new(192, 168, 1, 30)));

        let device = queries::find_device(&conn, id).unwrap().unwrap();
        assert_eq!(device.status, DeviceStatus::Added);
    }

    #[test]
    fn unknown_device_is_not_found() {
        let (mut conn, _) = seeded("{}");
        let err = promote(&mut conn, 999, form()).unwrap_err();
        assert!(matches!(err, DiscoveryError::NotFound(999)));
        assert!(queries::list_assets(&conn).unwrap().is_empty());
    }

    #[test]
    fn failed_status_update_rolls_back_asset() {
        let (mut conn, id) = seeded(r#"{"serial":"SN123"}"#);
        conn.execute_batch(
            r#"
            CREATE TRIGGER block_added BEFORE UPDATE OF status ON discovered_devices
            WHEN NEW.status = 'ADDED'
            BEGIN
                SELECT RAISE(ABORT, 'status locked');
            END;
            "#,
        )
        .unwrap();

        let err = promote(&mut conn, id, form()).unwrap_err();
        assert!(matches!(err, DiscoveryError::Store(_)));
        assert!(queries::list_assets(&conn).unwrap().is_empty());

        let device = queries::find_device(&conn, id).unwrap().unwrap();
        assert_eq!(device.status, DeviceStatus::AgentConnected);
    }
}

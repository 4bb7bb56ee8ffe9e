// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

#![cfg(test)]
use std::net::Ipv4Addr;

use roster_common::models::asset::{AssetFields, AssetStatus};
use roster_common::models::device::{DeviceDetails, DeviceStatus};
use roster_core::error::DiscoveryError;

use crate::utils::{LoopbackHost, operator, service};

fn agent_report() -> DeviceDetails {
    serde_json::from_value(serde_json::json!({
        "serial": "SN123",
        "os": "Windows 11",
        "ram": 16,
        "manufacturer": "Dell",
        "bios": {"vendor": "Dell Inc.", "version": "1.4.2"}
    }))
    .unwrap()
}

fn desk_form() -> AssetFields {
    AssetFields {
        name: "Desk-01".to_string(),
        tag: "AST-0001".to_string(),
        asset_type: "DESKTOP".to_string(),
    }
}

#[tokio::test]
async fn test_agent_data_survives_a_scan() {
    let host = LoopbackHost::start().await.unwrap();
    let service = service(host.port).unwrap();

    let reported = service
        .record_agent_report(&operator(), Ipv4Addr::LOCALHOST, agent_report())
        .await
        .unwrap();
    assert_eq!(reported.status, DeviceStatus::AgentConnected);

    service
        .scan_range(&operator(), "127.0.0.1", "127.0.0.1")
        .await
        .unwrap();

    let devices = service.list_discovered_devices().await.unwrap();
    assert_eq!(devices.len(), 1);

    let device = &devices[0];
    assert_eq!(device.id, reported.id);
    assert_eq!(device.status, DeviceStatus::AgentConnected);
    assert_eq!(device.details.serial.as_deref(), Some("SN123"));
    assert_eq!(device.details.os.as_deref(), Some("Windows 11"));
    assert_eq!(device.details.port, Some(host.port));
    assert!(device.details.extra.contains_key("bios"));
}

#[tokio::test]
async fn test_promotion_copies_hardware_and_sticks() {
    let host = LoopbackHost::start().await.unwrap();
    let service = service(host.port).unwrap();

    let device = service
        .record_agent_report(&operator(), Ipv4Addr::LOCALHOST, agent_report())
        .await
        .unwrap();

    let asset = service
        .promote_to_asset(&operator(), device.id, desk_form())
        .await
        .unwrap();

    assert_eq!(asset.name, "Desk-01");
    assert_eq!(asset.status, AssetStatus::Available);
    assert_eq!(asset.serial_number.as_deref(), Some("SN123"));
    assert_eq!(asset.operating_system.as_deref(), Some("Windows 11"));
    assert_eq!(asset.ram.as_deref(), Some("16"));
    assert_eq!(asset.ip_address, Some(Ipv4Addr::LOCALHOST));

    // A later scan must not downgrade the promoted device.
    service
        .scan_range(&operator(), "127.0.0.1", "127.0.0.1")
        .await
        .unwrap();
    service
        .record_agent_report(&operator(), Ipv4Addr::LOCALHOST, agent_report())
        .await
        .unwrap();

    let devices = service.list_discovered_devices().await.unwrap();
    assert_eq!(devices[0].status, DeviceStatus::Added);
    assert_eq!(
        devices[0].details.asset_match.as_deref(),
        Some(format!("asset:{}", asset.id).as_str())
    );
    assert_eq!(service.list_assets().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_scanned_device_is_promoted() {
    let host = LoopbackHost::start().await.unwrap();
    let service = service(host.port).unwrap();

    service
        .scan_range(&operator(), "127.0.0.1", "127.0.0.2")
        .await
        .unwrap();
    let device = service.list_discovered_devices().await.unwrap().remove(0);

    let asset = service
        .promote_to_asset(&operator(), device.id, desk_form())
        .await
        .unwrap();

    assert_eq!(asset.serial_number, None);
    let stored: serde_json::Value = serde_json::from_str(&asset.specifications).unwrap();
    assert_eq!(stored["port"], serde_json::json!(host.port));
}

#[tokio::test]
async fn test_promoting_unknown_device_fails_cleanly() {
    let service = service(9).unwrap();

    let err = service
        .promote_to_asset(&operator(), 4242, desk_form())
        .await
        .unwrap_err();

    assert!(matches!(err, DiscoveryError::NotFound(4242)));
    assert!(service.list_assets().await.unwrap().is_empty());
}

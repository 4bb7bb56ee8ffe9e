// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

#![cfg(test)]
use std::net::Ipv4Addr;

use roster_common::models::device::DeviceStatus;
use roster_core::error::DiscoveryError;
use roster_core::session::Session;

use crate::utils::{LoopbackHost, operator, service};

#[tokio::test]
async fn test_single_live_host_is_recorded_as_new() {
    let host = LoopbackHost::start().await.unwrap();
    let service = service(host.port).unwrap();

    let summary = service
        .scan_range(&operator(), "127.0.0.1", "127.0.0.3")
        .await
        .unwrap();

    assert_eq!(summary.count, 1, "Unexpected live host count: {summary:?}");
    assert_eq!(summary.scanned, 3);

    let devices = service.list_discovered_devices().await.unwrap();
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].ip_address, Ipv4Addr::LOCALHOST);
    assert_eq!(devices[0].status, DeviceStatus::New);
    assert_eq!(devices[0].details.port, Some(host.port));
}

#[tokio::test]
async fn test_silent_range_records_nothing() {
    let host = LoopbackHost::start().await.unwrap();
    let service = service(host.port).unwrap();

    let summary = service
        .scan_range(&operator(), "127.0.0.2", "127.0.0.4")
        .await
        .unwrap();

    assert_eq!(summary.count, 0);
    assert!(service.list_discovered_devices().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_oversized_range_is_rejected_without_side_effects() {
    let host = LoopbackHost::start().await.unwrap();
    let service = service(host.port).unwrap();

    let err = service
        .scan_range(&operator(), "127.0.0.1", "127.0.1.10")
        .await
        .unwrap_err();

    assert!(matches!(err, DiscoveryError::InvalidRange(_)), "{err:?}");
    assert!(service.list_discovered_devices().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_and_reversed_ranges_are_rejected() {
    let service = service(9).unwrap();

    for (start, end) in [("127.0.0.9", "127.0.0.1"), ("localhost", "127.0.0.2"), ("127.0.0.1", "")] {
        let err = service.scan_range(&operator(), start, end).await.unwrap_err();
        assert!(
            matches!(err, DiscoveryError::InvalidRange(_)),
            "{start} - {end} gave {err:?}"
        );
    }
}

#[tokio::test]
async fn test_anonymous_scan_is_unauthorized() {
    let host = LoopbackHost::start().await.unwrap();
    let service = service(host.port).unwrap();

    let err = service
        .scan_range(&Session::anonymous(), "127.0.0.1", "127.0.0.1")
        .await
        .unwrap_err();

    assert!(matches!(err, DiscoveryError::Unauthorized));
    assert!(service.list_discovered_devices().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_rescan_updates_the_same_record() {
    let host = LoopbackHost::start().await.unwrap();
    let service = service(host.port).unwrap();

    service
        .scan_range(&operator(), "127.0.0.1", "127.0.0.1")
        .await
        .unwrap();
    let first = service.list_discovered_devices().await.unwrap();

    service
        .scan_range(&operator(), "127.0.0.1", "127.0.0.1")
        .await
        .unwrap();
    let second = service.list_discovered_devices().await.unwrap();

    assert_eq!(second.len(), 1);
    assert_eq!(first[0].id, second[0].id);
    assert!(second[0].last_seen >= first[0].last_seen);
    assert_eq!(second[0].status, DeviceStatus::New);
}

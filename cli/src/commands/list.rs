// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use roster_common::info;
use roster_core::service::DiscoveryService;

use crate::terminal::print::Print;

pub async fn devices(service: &DiscoveryService) -> anyhow::Result<()> {
    let devices = service.list_discovered_devices().await?;
    if devices.is_empty() {
        info!("No devices recorded in {}", service.store().path().display());
        return Ok(());
    }

    Print::header("Discovered Devices");
    Print::devices(&devices);
    Ok(())
}

pub async fn assets(service: &DiscoveryService) -> anyhow::Result<()> {
    let assets = service.list_assets().await?;
    if assets.is_empty() {
        info!("No assets recorded in {}", service.store().path().display());
        return Ok(());
    }

    Print::header("Asset Inventory");
    Print::assets(&assets);
    Ok(())
}

// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use anyhow::ensure;
use roster_common::models::asset::AssetFields;
use roster_core::service::DiscoveryService;
use roster_core::session::Session;

use crate::terminal::print::Print;

pub async fn promote(
    service: &DiscoveryService,
    session: &Session,
    device_id: i64,
    name: &str,
    tag: &str,
    asset_type: &str,
) -> anyhow::Result<()> {
    let fields = AssetFields {
        name: name.trim().to_string(),
        tag: tag.trim().to_string(),
        asset_type: asset_type.trim().to_string(),
    };
    ensure!(!fields.name.is_empty(), "asset name must not be empty");
    ensure!(!fields.tag.is_empty(), "asset tag must not be empty");

    let asset = service.promote_to_asset(session, device_id, fields).await?;
    Print::asset_created(&asset);
    Ok(())
}

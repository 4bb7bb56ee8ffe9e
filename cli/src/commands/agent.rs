// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use std::io::Read;
use std::net::Ipv4Addr;
use std::path::Path;

use anyhow::Context;
use roster_common::debug;
use roster_common::models::device::DeviceDetails;
use roster_core::service::DiscoveryService;
use roster_core::session::Session;

use crate::terminal::print::Print;

pub async fn agent(
    service: &DiscoveryService,
    session: &Session,
    ip: Ipv4Addr,
    report: Option<&str>,
) -> anyhow::Result<()> {
    let text = read_report(report)?;
    let details = parse_report(&text)?;

    debug!(verbosity = 1, "Agent report for {ip} carries {} extra keys", details.extra.len());

    let device = service.record_agent_report(session, ip, details).await?;
    Print::device_recorded(&device);
    Ok(())
}

/// Inline JSON, a file path, or stdin when nothing was given.
fn read_report(report: Option<&str>) -> anyhow::Result<String> {
    match report {
        Some(text) if text.trim_start().starts_with('{') => Ok(text.to_string()),
        Some(path) => std::fs::read_to_string(Path::new(path))
            .with_context(|| format!("failed to read agent report from {path}")),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read agent report from stdin")?;
            Ok(buf)
        }
    }
}

/// Unlike stored details, a pushed report must be a JSON object.
fn parse_report(text: &str) -> anyhow::Result<DeviceDetails> {
    serde_json::from_str::<DeviceDetails>(text).context("agent report is not a JSON object")
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

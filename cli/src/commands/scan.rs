// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use std::time::{Duration, Instant};

use colored::*;
use roster_common::models::range::expand_range;
use roster_core::scanner::ScanSummary;
use roster_core::service::DiscoveryService;
use roster_core::session::Session;
use tracing::info_span;

use crate::terminal::{colors, print::Print, spinner::SpinnerGuard};

pub async fn scan(
    service: &DiscoveryService,
    session: &Session,
    start: &str,
    end: &str,
) -> anyhow::Result<()> {
    Print::header("sweeping address range");

    let start_time: Instant = Instant::now();
    let summary: ScanSummary = {
        let _guard: SpinnerGuard = run_spinner(start, end, start_time);
        service.scan_range(session, start, end).await?
    };
    let total_time: Duration = start_time.elapsed();

    if summary.alive == 0 {
        Print::no_results();
        return Ok(());
    }

    let range = expand_range(start, end)?;
    let devices: Vec<_> = service
        .list_discovered_devices()
        .await?
        .into_iter()
        .filter(|device| range.contains(&device.ip_address))
        .collect();
    Print::header("Discovered Devices");
    Print::devices(&devices);
    Print::scan_summary(&summary, total_time);

    Ok(())
}

fn run_spinner(start: &str, end: &str, started: Instant) -> SpinnerGuard {
    let span = info_span!("scan", indicatif.pb_show = true);
    let _enter = span.enter();

    let range = format!("{start} - {end}");
    SpinnerGuard::with_status(span.clone(), move || {
        let secs = started.elapsed().as_secs().to_string().green().bold();
        format!("Sweeping {range} for {secs}s...")
            .color(colors::TEXT_DEFAULT)
            .italic()
    })
}

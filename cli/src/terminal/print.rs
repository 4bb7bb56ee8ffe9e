// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use std::{sync::OnceLock, time::Duration};

use anyhow::bail;
use colored::*;
use roster_common::models::asset::Asset;
use roster_common::models::device::DiscoveredDevice;
use roster_common::{config::Config, success};
use roster_core::scanner::ScanSummary;
use unicode_width::UnicodeWidthStr;

use crate::terminal::format::{self, Detail};
use crate::terminal::{banner, colors};

pub const TOTAL_WIDTH: usize = 64;

static PRINT: OnceLock<Print> = OnceLock::new();

#[macro_export]
macro_rules! rprint {
    () => {
        $crate::rprint!("");
    };
    ($($arg:tt)*) => {
        tracing::info!(
            target: "roster::print",
            raw_msg = %format_args!($($arg)*)
        );
    };
}

pub struct Print {
    no_banner: bool,
    q_level: u8,
    redact: bool,
}

impl Print {
    fn new(cfg: &Config) -> Self {
        Self {
            no_banner: cfg.no_banner,
            q_level: cfg.quiet,
            redact: cfg.redact,
        }
    }

    pub fn init(cfg: &Config) -> anyhow::Result<()> {
        let term = Self::new(cfg);
        if PRINT.set(term).is_err() {
            bail!("terminal has already been initialized")
        }
        Ok(())
    }

    fn get() -> &'static Self {
        PRINT.get_or_init(|| Self::new(&Config::default()))
    }

    pub fn banner() {
        let p = Self::get();
        if p.no_banner || p.q_level > 0 {
            return;
        }

        let title = format!("⟦ ROSTER v{} ⟧", env!("CARGO_PKG_VERSION"));
        rprint!("{}", rule('═', &title, |t| t.bright_green().bold()));
        banner::print();
    }

    pub fn header(msg: &str) {
        if Self::get().q_level > 0 {
            return;
        }
        let label = format!("⟦ {} ⟧", msg.to_uppercase());
        rprint!("{}", rule('─', &label, |t| t.bright_green()));
    }

    /// Device listing. `-qq` prints one tab-separated record per line.
    pub fn devices(devices: &[DiscoveredDevice]) {
        let p = Self::get();
        for (idx, device) in devices.iter().enumerate() {
            if p.q_level >= 2 {
                rprint!("{}", device_record(device));
                continue;
            }

            Self::device_head(device);
            as_tree(format::device_details(device, p.redact));
            if idx + 1 != devices.len() {
                rprint!();
            }
        }
    }

    /// `[id] ip` on the left, the lifecycle status flush right.
    fn device_head(device: &DiscoveredDevice) {
        let left_width = format!("[{}] {}", device.id, device.ip_address).width();
        let padding = TOTAL_WIDTH.saturating_sub(left_width + device.status.as_str().width());

        rprint!(
            "{}{}{} {}{:padding$}{}",
            "[".color(colors::SEPARATOR),
            device.id.to_string().color(colors::ACCENT),
            "]".color(colors::SEPARATOR),
            device.ip_address.to_string().color(colors::PRIMARY),
            "",
            format::status_to_colored(device.status),
            padding = padding
        );
    }

    pub fn assets(assets: &[Asset]) {
        let p = Self::get();
        for (idx, asset) in assets.iter().enumerate() {
            if p.q_level >= 2 {
                rprint!("{}", asset_record(asset));
                continue;
            }

            tree_head(asset.id, &asset.name);
            as_tree(format::asset_details(asset, p.redact));
            if idx + 1 != assets.len() {
                rprint!();
            }
        }
    }

    pub fn asset_created(asset: &Asset) {
        let p = Self::get();
        if p.q_level >= 2 {
            rprint!("{}", asset_record(asset));
            return;
        }
        Self::header("asset created");
        tree_head(asset.id, &asset.name);
        as_tree(format::asset_details(asset, p.redact));
    }

    pub fn device_recorded(device: &DiscoveredDevice) {
        let p = Self::get();
        if p.q_level >= 2 {
            rprint!("{}", device_record(device));
            return;
        }
        Self::header("agent report recorded");
        Self::device_head(device);
        as_tree(format::device_details(device, p.redact));
    }

    pub fn scan_summary(summary: &ScanSummary, total_time: Duration) {
        let p = Self::get();
        if p.q_level >= 2 {
            return;
        }

        let stored: ColoredString = format!("{} devices", summary.count).bold().green();
        let scanned: ColoredString = format!("{} addresses", summary.scanned).bold();
        let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
        let output: String =
            format!("Scan Complete: {stored} recorded from {scanned} in {total_time}");

        match p.q_level {
            0 => {
                divider();
                centerln(&output);
            }
            _ => success!("{output}"),
        }

        if summary.failures > 0 {
            roster_common::warn!(
                "{} alive hosts could not be stored, see the errors above",
                summary.failures
            );
        }
    }

    pub fn no_results() {
        let p = Self::get();
        if p.q_level == 0 && !p.no_banner {
            Self::header("ZERO HOSTS DETECTED");
            rprint!("{}", banner::NO_RESULTS_0.red().bold());
            return;
        }
        roster_common::error!("Scan completed: 0 devices responded.");
    }

    pub fn end_of_program() {
        let p = Self::get();
        if p.q_level > 0 {
            return;
        }
        rprint!("{}", "═".repeat(TOTAL_WIDTH).color(colors::SEPARATOR));
    }
}

fn device_record(device: &DiscoveredDevice) -> String {
    format!(
        "{}\t{}\t{}\t{}",
        device.id,
        device.ip_address,
        device.hostname.as_deref().unwrap_or("-"),
        device.status
    )
}

fn asset_record(asset: &Asset) -> String {
    let ip = asset
        .ip_address
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!("{}\t{}\t{}\t{}\t{}", asset.id, asset.tag, asset.name, ip, asset.status)
}

/// `fill` repeated across [`TOTAL_WIDTH`] with `label` centered in it.
fn rule(fill: char, label: &str, paint: fn(&str) -> ColoredString) -> String {
    let label_width = UnicodeWidthStr::width(label);
    let free = TOTAL_WIDTH.saturating_sub(label_width);
    let left = fill.to_string().repeat(free / 2);
    let right = fill.to_string().repeat(free - free / 2);
    format!("{}{}{}", left.bright_black(), paint(label), right.bright_black())
}

pub fn divider() {
    rprint!("{}", "═".repeat(TOTAL_WIDTH).bright_black());
}

pub fn tree_head(idx: i64, name: &str) {
    rprint!(
        "{}{}{} {}",
        "[".color(colors::SEPARATOR),
        idx.to_string().color(colors::ACCENT),
        "]".color(colors::SEPARATOR),
        name.color(colors::PRIMARY)
    );
}

/// Prints `details` as `├─ Key.....: value` rows, the last one closed with `└─`.
pub fn as_tree(details: Vec<Detail>) {
    let key_width = details
        .iter()
        .map(|(key, _)| key.len())
        .max()
        .unwrap_or(0)
        .max("Hostname".len());
    let last = details.len().saturating_sub(1);

    for (i, (key, value)) in details.into_iter().enumerate() {
        let branch = if i == last { "└─" } else { "├─" };
        let dots = ".".repeat(key_width - key.len());
        rprint!(
            " {} {}{}{} {}",
            branch.bright_black(),
            key.color(colors::TEXT_DEFAULT),
            dots.color(colors::SEPARATOR),
            ":".color(colors::SEPARATOR),
            value
        );
    }
}

pub fn centerln(msg: &str) {
    let pad = TOTAL_WIDTH.saturating_sub(console::measure_text_width(msg)) / 2;
    rprint!("{:pad$}{}", "", msg, pad = pad);
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
    use chrono::Utc;
    use roster_common::models::device::{DeviceDetails, DeviceStatus};
    use std::net::Ipv4Addr;

    #[test]
    fn raw_device_record_is_tab_separated() {
        let device = DiscoveredDevice {
            id: 7,
            ip_address: Ipv4Addr::new(192, 168, 1, 10),
            hostname: None,
            status: DeviceStatus::AgentConnected,
            last_seen: Utc::now(),
            details: DeviceDetails::default(),
        };
        assert_eq!(device_record(&device), "7\t192.168.1.10\t-\tAGENT_CONNECTED");
    }

    #[test]
    fn rules_span_the_full_width() {
        for label in ["[ ASSET CREATED ]", "[ X ]", ""] {
            let line = rule('─', label, |t| t.normal());
            assert_eq!(console::measure_text_width(&line), TOTAL_WIDTH, "{label:?}");
        }
    }
}

// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use std::time::Duration;

/// Ports tried by the liveness probe, in order of preference.
///
/// HTTP, SMB, MS-RPC and SSH cover most desktops, servers and printers on an office LAN.
pub const DEFAULT_PROBE_PORTS: [u16; 4] = [80, 445, 135, 22];

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(500);
pub const DEFAULT_DNS_TIMEOUT: Duration = Duration::from_millis(1500);
pub const DEFAULT_NETBIOS_TIMEOUT: Duration = Duration::from_millis(1000);

/// Addresses probed concurrently before the scheduler waits and persists.
pub const BATCH_SIZE: usize = 5;

pub const DEFAULT_DB_PATH: &str = "roster.db";

/// Global configuration options for discovery runs.
///
/// Controls probing behaviour, which identity strategies may generate traffic, where
/// results are stored and how the terminal output looks. It is typically built from
/// CLI arguments.
#[derive(Debug, Clone)]
pub struct Config {
    /// Location of the SQLite database holding devices and assets.
    pub db_path: PathBuf,

    /// TCP ports raced against each address. The first completed handshake wins.
    pub probe_ports: Vec<u16>,

    /// Per-port connect timeout.
    pub connect_timeout: Duration,

    /// Upper bound for a single reverse (PTR) lookup.
    pub dns_timeout: Duration,

    /// Upper bound for a NetBIOS node-status exchange.
    pub netbios_timeout: Duration,

    /// Number of addresses handled concurrently per batch. Values below 1 are treated as 1.
    pub batch_size: usize,

    /// Restricts the resolver from generating outbound DNS traffic.
    ///
    /// # Behavior
    /// * **True**: No PTR queries are sent. Hostnames can still come from NetBIOS.
    /// * **False** (Default): Reverse lookups run for every alive address.
    pub no_dns: bool,

    /// Skips the NetBIOS node-status fallback (UDP/137).
    pub no_netbios: bool,

    /// Masks hostnames, MAC addresses and serials in printed listings.
    ///
    /// Use this when sharing screenshots or logs publicly.
    pub redact: bool,

    /// Controls the visual density of the terminal output.
    ///
    /// # Levels
    /// * **0** (Default): Banner, spinner, colors and tables.
    /// * **1**: Reduced styling.
    /// * **2**: Raw mode. One record per line, suitable for piping.
    pub quiet: u8,

    /// Toggles the display of the startup ASCII banner.
    pub no_banner: bool,
}

impl Config {
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.max(1)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            probe_ports: DEFAULT_PROBE_PORTS.to_vec(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            dns_timeout: DEFAULT_DNS_TIMEOUT,
            netbios_timeout: DEFAULT_NETBIOS_TIMEOUT,
            batch_size: BATCH_SIZE,
            no_dns: false,
            no_netbios: false,
            redact: false,
            quiet: 0,
            no_banner: false,
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

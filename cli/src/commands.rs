// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Command Line Interface Definitions
//!
//! The argument schema lives here; each command's execution lives in its own
//! submodule.
//!
//! * [`CommandLine`]: global flags (store location, probing knobs, output density).
//! * [`Commands`]: the operation to run. Exactly one per invocation.
//!
//! `From<&CommandLine> for Config` keeps the core crates unaware of `clap`.

pub mod agent;
pub mod list;
pub mod promote;
pub mod scan;

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser, Subcommand};
use roster_common::config::{self, Config};
use roster_core::session::Session;

#[derive(Parser)]
#[command(name = "roster")]
#[command(about = "Network asset discovery and inventory reconciliation.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// SQLite database holding discovered devices and assets
    #[arg(long = "db", env = "ROSTER_DB", default_value = config::DEFAULT_DB_PATH, global = true)]
    pub db_path: PathBuf,

    /// Operator recorded for scans, promotions and agent reports
    #[arg(short = 'u', long = "user", env = "ROSTER_USER", global = true)]
    pub user: Option<String>,

    /// Keep logs and colors but hide the ASCII art
    #[arg(long = "no-banner", global = true)]
    pub no_banner: bool,

    /// Disables sending of DNS packets
    #[arg(short = 'n', long = "no-dns", global = true)]
    pub no_dns: bool,

    /// Skip the NetBIOS name query fallback
    #[arg(long = "no-netbios", global = true)]
    pub no_netbios: bool,

    /// Per-port connect timeout in milliseconds
    #[arg(long = "timeout-ms", global = true)]
    pub timeout_ms: Option<u64>,

    /// Addresses probed concurrently per batch
    #[arg(short = 'b', long = "batch-size", global = true)]
    pub batch_size: Option<usize>,

    /// Reduce UI visual density (-q: reduce styling, -qq: one record per line)
    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Redact sensitive info (hostnames, MAC addresses, serials)
    #[arg(long = "redact", global = true)]
    pub redact: bool,

    /// Increase logging detail (-v: debug logs, -vv: per-host strategy logs)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbosity: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sweep an IPv4 range and record every responding host
    #[command(alias = "s")]
    Scan {
        #[arg(value_name = "START")]
        start: String,
        #[arg(value_name = "END")]
        end: String,
    },

    /// Show discovered devices, newest first
    #[command(alias = "l")]
    List {
        /// Show the asset inventory instead
        #[arg(short = 'a', long = "assets")]
        assets: bool,
    },

    /// Turn a discovered device into an inventory asset
    #[command(alias = "p")]
    Promote {
        #[arg(value_name = "DEVICE_ID")]
        id: i64,
        #[arg(long = "name")]
        name: String,
        #[arg(long = "tag")]
        tag: String,
        #[arg(long = "type", value_name = "TYPE")]
        asset_type: String,
    },

    /// Record a hardware report pushed by an endpoint agent
    #[command(alias = "a")]
    Agent {
        #[arg(value_name = "IP")]
        ip: std::net::Ipv4Addr,
        /// JSON document, or a path to one; reads stdin when omitted
        #[arg(value_name = "REPORT")]
        report: Option<String>,
    },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The acting operator: `--user`, then the login name of the shell.
    pub fn session(&self) -> Session {
        self.user
            .clone()
            .or_else(|| std::env::var("USER").ok())
            .or_else(|| std::env::var("USERNAME").ok())
            .filter(|name| !name.trim().is_empty())
            .map(Session::authenticated)
            .unwrap_or_else(Session::anonymous)
    }
}

impl From<&CommandLine> for Config {
    fn from(cmd: &CommandLine) -> Self {
        let defaults = Config::default();
        Self {
            db_path: cmd.db_path.clone(),
            connect_timeout: cmd
                .timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.connect_timeout),
            batch_size: cmd.batch_size.unwrap_or(defaults.batch_size),
            no_dns: cmd.no_dns,
            no_netbios: cmd.no_netbios,
            redact: cmd.redact,
            quiet: cmd.quiet,
            no_banner: cmd.no_banner,
            ..defaults
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

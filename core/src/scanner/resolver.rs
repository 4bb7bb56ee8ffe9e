// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Identity Resolution
//!
//! Learns a hostname and MAC address for an alive host by trying strategies in order:
//!
//! 1. [`ReverseDns`]: PTR lookup through the system resolver.
//! 2. [`NetbiosNodeStatus`]: NBSTAT query to UDP/137, which Windows machines and Samba
//!    servers answer with their computer name and adapter MAC.
//!
//! Every strategy has its own timeout and swallows its own failures. A later strategy
//! only fills fields an earlier one left empty, and [`IdentityResolver`] stops as soon
//! as both fields are known.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use hickory_resolver::TokioResolver;
use hickory_resolver::config::ResolverConfig;
use hickory_resolver::name_server::TokioConnectionProvider;
use tokio::net::UdpSocket;
use tokio::time::timeout;

use roster_common::config::Config;
use roster_common::models::host::Identity;
use roster_common::utils::mac;
use roster_common::{debug, info, warn};
use roster_protocols::netbios::{self, NodeStatus};
use roster_protocols::utils::NETBIOS_NS_PORT;

use super::IdentitySource;

/// Runs strategies in order until hostname and MAC are both known.
#[derive(Default)]
pub struct IdentityResolver {
    strategies: Vec<Box<dyn IdentitySource>>,
}

impl IdentityResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategy(mut self, strategy: impl IdentitySource + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Builds the DNS then NetBIOS chain, honouring `--no-dns` and `--no-netbios`.
    pub fn from_config(cfg: &Config) -> Self {
        let mut resolver = Self::new();

        if cfg.no_dns {
            info!("DNS resolution skipped by user flag");
        } else {
            resolver = resolver.with_strategy(ReverseDns::from_system(cfg.dns_timeout));
        }

        if cfg.no_netbios {
            info!(verbosity = 1, "NetBIOS lookups skipped by user flag");
        } else {
            resolver = resolver.with_strategy(NetbiosNodeStatus::new(cfg.netbios_timeout));
        }

        if resolver.is_empty() {
            warn!("No identity lookups enabled, devices are recorded by address only");
        }

        resolver
    }
}

#[async_trait]
impl IdentitySource for IdentityResolver {
    async fn identify(&self, ip: Ipv4Addr) -> Identity {
        let mut identity = Identity::default();
        for strategy in &self.strategies {
            if identity.is_complete() {
                break;
            }
            identity.absorb(strategy.identify(ip).await);
        }
        identity
    }
}

/// PTR lookups through hickory's async resolver.
pub struct ReverseDns {
    resolver: TokioResolver,
    lookup_timeout: Duration,
}

impl ReverseDns {
    /// Uses the system's resolver configuration, falling back to Cloudflare when it
    /// cannot be read.
    pub fn from_system(lookup_timeout: Duration) -> Self {
        let mut builder = match TokioResolver::builder_tokio() {
            Ok(builder) => builder,
            Err(e) => {
                warn!("System DNS configuration unavailable ({e}), using 1.1.1.1");
                TokioResolver::builder_with_config(
                    ResolverConfig::cloudflare(),
                    TokioConnectionProvider::default(),
                )
            }
        };

        let opts = builder.options_mut();
        opts.timeout = lookup_timeout;
        opts.attempts = 1;

        Self {
            resolver: builder.build(),
            lookup_timeout,
        }
    }

    pub async fn lookup(&self, ip: Ipv4Addr) -> Option<String> {
        let query = self.resolver.reverse_lookup(IpAddr::V4(ip));
        let lookup = match timeout(self.lookup_timeout, query).await {
            Ok(Ok(lookup)) => lookup,
            Ok(Err(e)) => {
                debug!(verbosity = 2, "PTR lookup for {ip} failed: {e}");
                return None;
            }
            Err(_) => {
                debug!(verbosity = 2, "PTR lookup for {ip} timed out");
                return None;
            }
        };

        lookup
            .iter()
            .map(|ptr| clean_ptr_name(&ptr.to_string()))
            .find(|name| is_useful_name(name, ip))
    }
}

#[async_trait]
impl IdentitySource for ReverseDns {
    async fn identify(&self, ip: Ipv4Addr) -> Identity {
        Identity {
            hostname: self.lookup(ip).await,
            mac_address: None,
        }
    }
}

fn clean_ptr_name(name: &str) -> String {
    name.trim().trim_end_matches('.').to_string()
}

/// Rejects empty answers and answers that merely echo the address back.
fn is_useful_name(name: &str, ip: Ipv4Addr) -> bool {
    !name.is_empty() && name != ip.to_string()
}

/// NetBIOS node-status query over UDP.
#[derive(Debug, Clone)]
pub struct NetbiosNodeStatus {
    query_timeout: Duration,
    port: u16,
}

impl NetbiosNodeStatus {
    pub fn new(query_timeout: Duration) -> Self {
        Self {
            query_timeout,
            port: NETBIOS_NS_PORT,
        }
    }

    /// Targets a non-standard port. Only useful against local responders.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub async fn query(&self, ip: Ipv4Addr) -> anyhow::Result<NodeStatus> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))
            .await
            .context("binding NetBIOS socket")?;
        let target = SocketAddr::new(IpAddr::V4(ip), self.port);
        let id = netbios::random_transaction_id();

        socket
            .send_to(&netbios::create_nbstat_request(id), target)
            .await
            .context("sending NBSTAT request")?;

        timeout(self.query_timeout, async {
            let mut buf = [0u8; 1024];
            loop {
                let (len, from) = socket
                    .recv_from(&mut buf)
                    .await
                    .context("receiving NBSTAT response")?;
                if from.ip() != IpAddr::V4(ip) {
                    continue;
                }
                // Stray or malformed datagrams are ignored until the deadline.
                if let Ok(status) = netbios::parse_nbstat_response(&buf[..len], id) {
                    return Ok::<_, anyhow::Error>(status);
                }
            }
        })
        .await
        .context("NBSTAT query timed out")?
    }
}

#[async_trait]
impl IdentitySource for NetbiosNodeStatus {
    async fn identify(&self, ip: Ipv4Addr) -> Identity {
        match self.query(ip).await {
            Ok(status) => {
                if let Some(group) = status.group_name() {
                    debug!(verbosity = 2, "{ip} belongs to NetBIOS group {group}");
                }
                Identity {
                    hostname: status.computer_name().map(str::to_string),
                    mac_address: status.mac.as_ref().map(mac::to_display),
                }
            }
            Err(e) => {
                debug!(verbosity = 2, "NetBIOS lookup for {ip} failed: {e:#}");
                Identity::default()
            }
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

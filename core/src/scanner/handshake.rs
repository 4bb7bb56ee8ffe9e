// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio::task::JoinSet;
use tokio::time::timeout;

use roster_common::config::Config;
use roster_common::models::host::ProbeOutcome;

use super::Prober;

/// Unprivileged liveness check: a full TCP handshake on any of a few common ports.
#[derive(Debug, Clone)]
pub struct TcpProber {
    ports: Vec<u16>,
    connect_timeout: Duration,
}

impl TcpProber {
    pub fn new(ports: Vec<u16>, connect_timeout: Duration) -> Self {
        Self {
            ports,
            connect_timeout,
        }
    }
}

impl From<&Config> for TcpProber {
    fn from(cfg: &Config) -> Self {
        Self::new(cfg.probe_ports.clone(), cfg.connect_timeout)
    }
}

#[async_trait]
impl Prober for TcpProber {
    async fn probe(&self, ip: Ipv4Addr) -> ProbeOutcome {
        race_ports(ip, &self.ports, self.connect_timeout).await
    }
}

/// Connects to every port at once, each with its own timeout. The first completed
/// handshake wins and the remaining attempts are aborted.
pub async fn race_ports(ip: Ipv4Addr, ports: &[u16], per_port: Duration) -> ProbeOutcome {
    let mut attempts: JoinSet<Option<u16>> = JoinSet::new();

    for &port in ports {
        let socket_addr = SocketAddr::new(IpAddr::V4(ip), port);
        attempts.spawn(async move {
            match timeout(per_port, TcpStream::connect(socket_addr)).await {
                Ok(Ok(_stream)) => Some(port),
                Ok(Err(_)) | Err(_) => None,
            }
        });
    }

    let mut failure: Option<String> = None;
    while let Some(joined) = attempts.join_next().await {
        match joined {
            Ok(Some(port)) => {
                attempts.abort_all();
                return ProbeOutcome::Alive { port };
            }
            Ok(None) => {}
            Err(e) if e.is_panic() => failure = Some(e.to_string()),
            Err(_) => {}
        }
    }

    match failure {
        Some(cause) => ProbeOutcome::Error { cause },
        None => ProbeOutcome::Dead,
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

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    static LOCALHOST: Ipv4Addr = Ipv4Addr::LOCALHOST;

    async fn closed_port() -> u16 {
        let listener = TcpListener::bind((LOCALHOST, 0)).await.unwrap();
        listener.local_addr().unwrap().port()
    }

    #[tokio::test]
    async fn open_port_wins_over_closed_ones() {
        let listener = TcpListener::bind((LOCALHOST, 0)).await.unwrap();
        let open = listener.local_addr().unwrap().port();
        let closed = closed_port().await;

        let outcome = race_ports(LOCALHOST, &[closed, open], Duration::from_millis(500)).await;
        assert_eq!(outcome, ProbeOutcome::Alive { port: open });
    }

    #[tokio::test]
    async fn refused_everywhere_is_dead() {
        let closed = closed_port().await;
        let prober = TcpProber::new(vec![closed], Duration::from_millis(500));
        assert_eq!(prober.probe(LOCALHOST).await, ProbeOutcome::Dead);
    }

    #[tokio::test]
    async fn no_ports_is_dead() {
        let outcome = race_ports(LOCALHOST, &[], Duration::from_millis(50)).await;
        assert_eq!(outcome, ProbeOutcome::Dead);
    }

    #[tokio::test]
    #[ignore]
    async fn handshake_probe_should_find_known_open_port() {
        let prober = TcpProber::from(&Config::default());
        let outcome = prober.probe(Ipv4Addr::new(1, 1, 1, 1)).await;
        assert!(outcome.is_alive());
    }

    #[tokio::test]
    #[ignore]
    async fn handshake_probe_should_timeout_on_unreachable_ip() {
        let prober = TcpProber::from(&Config::default());
        let outcome = prober.probe(Ipv4Addr::new(203, 0, 113, 1)).await;
        assert_eq!(outcome, ProbeOutcome::Dead);
    }
}

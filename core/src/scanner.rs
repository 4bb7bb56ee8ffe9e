// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Batch orchestration for range sweeps.
//!
//! Addresses are processed in fixed-size batches. Within a batch every address is
//! probed (and, when alive, identified) concurrently; the scheduler waits for the
//! whole batch, hands each alive host to a [`ResultSink`] and only then starts the
//! next batch. This caps in-flight sockets at roughly
//! `batch_size × (probe ports + identity strategies)`.
//!
//! Nothing in here ever fails the sweep as a whole. A panicking probe becomes
//! [`ProbeOutcome::Error`] for that address, and a sink failure is logged and
//! counted in [`ScanSummary::failures`].

use std::net::Ipv4Addr;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinSet;

use roster_common::models::host::{HostReport, Identity, ProbeOutcome, ProbeResult};
use roster_common::models::range::Ipv4Range;
use roster_common::{debug, error, warn};

use crate::error::DiscoveryError;

pub mod handshake;
pub mod resolver;

/// Decides whether an address is alive.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, ip: Ipv4Addr) -> ProbeOutcome;
}

/// One way of learning a host's name and/or MAC. Failures yield an empty [`Identity`].
#[async_trait]
pub trait IdentitySource: Send + Sync {
    async fn identify(&self, ip: Ipv4Addr) -> Identity;
}

/// Receives every alive host once its batch has finished.
#[async_trait]
pub trait ResultSink: Send + Sync {
    async fn accept(&self, report: HostReport) -> Result<(), DiscoveryError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Alive addresses whose result was stored successfully.
    pub count: usize,
    /// Alive addresses, stored or not.
    pub alive: usize,
    pub scanned: usize,
    pub batches: usize,
    /// Alive addresses the sink rejected.
    pub failures: usize,
}

type BatchEntry = (Ipv4Addr, ProbeOutcome, Identity);

/// Sweeps `range` batch by batch. Results reach `sink` in ascending address order
/// within each batch.
pub async fn sweep(
    range: Ipv4Range,
    batch_size: usize,
    prober: Arc<dyn Prober>,
    identity: Arc<dyn IdentitySource>,
    sink: &dyn ResultSink,
) -> ScanSummary {
    let addresses: Vec<Ipv4Addr> = range.iter().collect();
    let mut summary = ScanSummary::default();

    for batch in addresses.chunks(batch_size.max(1)) {
        summary.batches += 1;
        summary.scanned += batch.len();

        let results = run_batch(batch, &prober, &identity).await;
        let reports: Vec<HostReport> = results
            .into_iter()
            .filter_map(|(ip, outcome, identity)| {
                if let ProbeOutcome::Error { cause } = &outcome {
                    warn!(verbosity = 1, "Probe of {ip} failed: {cause}");
                }
                let probe = ProbeResult::from_outcome(ip, &outcome);
                probe.alive.then_some(HostReport { probe, identity })
            })
            .collect();

        summary.alive += reports.len();

        for report in reports {
            let ip = report.probe.ip;
            match sink.accept(report).await {
                Ok(()) => summary.count += 1,
                Err(e) => {
                    summary.failures += 1;
                    error!("Failed to store {ip}: {e}");
                }
            }
        }

        debug!(
            verbosity = 1,
            "Batch {} done: {} alive so far",
            summary.batches,
            summary.alive
        );
    }

    summary
}

async fn run_batch(
    batch: &[Ipv4Addr],
    prober: &Arc<dyn Prober>,
    identity: &Arc<dyn IdentitySource>,
) -> Vec<BatchEntry> {
    let mut set: JoinSet<BatchEntry> = JoinSet::new();

    for &ip in batch {
        let prober = Arc::clone(prober);
        let identity = Arc::clone(identity);

        set.spawn(async move {
            // Inner task so a panic is attributed to this address.
            let work = tokio::spawn(async move {
                let outcome = prober.probe(ip).await;
                let found = if outcome.is_alive() {
                    identity.identify(ip).await
                } else {
                    Identity::default()
                };
                (outcome, found)
            });

            match work.await {
                Ok((outcome, found)) => (ip, outcome, found),
                Err(e) => (
                    ip,
                    ProbeOutcome::Error {
                        cause: e.to_string(),
                    },
                    Identity::default(),
                ),
            }
        });
    }

    let mut results = Vec::with_capacity(batch.len());
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok(entry) => results.push(entry),
            Err(e) => error!("Batch task failed: {e}"),
        }
    }

    results.sort_by_key(|(ip, _, _)| u32::from(*ip));
    results
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
    use std::collections::HashSet;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Alive on a fixed set of last octets, panics on others.
    struct ScriptedProber {
        alive: HashSet<u8>,
        panics: HashSet<u8>,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl ScriptedProber {
        fn new(alive: &[u8], panics: &[u8]) -> Self {
            Self {
                alive: alive.iter().copied().collect(),
                panics: panics.iter().copied().collect(),
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Prober for ScriptedProber {
        async fn probe(&self, ip: Ipv4Addr) -> ProbeOutcome {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            let last = ip.octets()[3];
            if self.panics.contains(&last) {
                panic!("probe exploded for {ip}");
            }
            if self.alive.contains(&last) {
                ProbeOutcome::Alive { port: 22 }
            } else {
                ProbeOutcome::Dead
            }
        }
    }

    struct NamedAfterOctet;

    #[async_trait]
    impl IdentitySource for NamedAfterOctet {
        async fn identify(&self, ip: Ipv4Addr) -> Identity {
            Identity {
                hostname: Some(format!("host-{}", ip.octets()[3])),
                mac_address: None,
            }
        }
    }

    #[derive(Default)]
    struct CollectingSink {
        seen: Mutex<Vec<HostReport>>,
        reject: HashSet<u8>,
    }

    #[async_trait]
    impl ResultSink for CollectingSink {
        async fn accept(&self, report: HostReport) -> Result<(), DiscoveryError> {
            if self.reject.contains(&report.probe.ip.octets()[3]) {
                return Err(DiscoveryError::Task("disk full".to_string()));
            }
            self.seen.lock().unwrap().push(report);
            Ok(())
        }
    }

    fn range(first: u8, last: u8) -> Ipv4Range {
        Ipv4Range::new(Ipv4Addr::new(10, 0, 0, first), Ipv4Addr::new(10, 0, 0, last)).unwrap()
    }

    #[tokio::test]
    async fn only_alive_hosts_reach_the_sink() {
        let prober = Arc::new(ScriptedProber::new(&[2, 7], &[]));
        let sink = CollectingSink::default();

        let summary = sweep(range(1, 10), 5, prober, Arc::new(NamedAfterOctet), &sink).await;

        assert_eq!(summary.count, 2);
        assert_eq!(summary.alive, 2);
        assert_eq!(summary.scanned, 10);
        assert_eq!(summary.batches, 2);

        let seen = sink.seen.lock().unwrap();
        let names: Vec<_> = seen.iter().map(|r| r.identity.hostname.clone().unwrap()).collect();
        assert_eq!(names, vec!["host-2", "host-7"]);
        assert_eq!(seen[0].probe.responding_port, Some(22));
    }

    #[tokio::test]
    async fn concurrency_never_exceeds_batch_size() {
        let prober = Arc::new(ScriptedProber::new(&[], &[]));
        let sink = CollectingSink::default();

        let summary = sweep(range(1, 23), 5, prober.clone(), Arc::new(NamedAfterOctet), &sink).await;

        assert_eq!(summary.batches, 5);
        assert!(prober.peak.load(Ordering::SeqCst) <= 5);
    }

    #[tokio::test]
    async fn panicking_probe_only_loses_its_own_address() {
        let prober = Arc::new(ScriptedProber::new(&[1, 3], &[2]));
        let sink = CollectingSink::default();

        let summary = sweep(range(1, 3), 5, prober, Arc::new(NamedAfterOctet), &sink).await;

        assert_eq!(summary.count, 2);
        assert_eq!(summary.scanned, 3);
    }

    #[tokio::test]
    async fn sink_failure_is_counted_not_fatal() {
        let prober = Arc::new(ScriptedProber::new(&[1, 2, 3, 8], &[]));
        let sink = CollectingSink {
            reject: [2].into_iter().collect(),
            ..Default::default()
        };

        let summary = sweep(range(1, 10), 5, prober, Arc::new(NamedAfterOctet), &sink).await;

        assert_eq!(summary.alive, 4);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.failures, 1);
        assert_eq!(sink.seen.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn zero_batch_size_still_makes_progress() {
        let prober = Arc::new(ScriptedProber::new(&[1], &[]));
        let sink = CollectingSink::default();

        let summary = sweep(range(1, 2), 0, prober, Arc::new(NamedAfterOctet), &sink).await;
        assert_eq!(summary.batches, 2);
        assert_eq!(summary.count, 1);
    }
}

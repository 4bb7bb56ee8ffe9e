// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Discovery Service
//!
//! The surface other parts of the application talk to. It owns the store, the
//! prober and the identity chain, and checks the caller's [`Session`] before any
//! mutating operation.
//!
//! ## Operations
//! * [`DiscoveryService::scan_range`]: sweep, reconcile, refresh.
//! * [`DiscoveryService::list_discovered_devices`]: newest first.
//! * [`DiscoveryService::promote_to_asset`]: device to asset, atomically.
//! * [`DiscoveryService::record_agent_report`]: merge hardware data pushed by an agent.
//!
//! Listing is not gated on a session. Callers exposing it remotely must check
//! access themselves.

use std::net::Ipv4Addr;
use std::sync::Arc;

use async_trait::async_trait;

use roster_common::config::Config;
use roster_common::info;
use roster_common::models::asset::{Asset, AssetFields};
use roster_common::models::device::{DeviceDetails, DiscoveredDevice};
use roster_common::models::host::HostReport;
use roster_common::models::range::expand_range;

use crate::error::DiscoveryError;
use crate::scanner::handshake::TcpProber;
use crate::scanner::resolver::IdentityResolver;
use crate::scanner::{self, IdentitySource, Prober, ResultSink, ScanSummary};
use crate::session::Session;
use crate::store::{Store, queries};
use crate::{promotion, reconcile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshReason {
    ScanCompleted,
    DevicePromoted,
    AgentReported,
}

/// Notified whenever stored devices changed, e.g. to drop a cached listing.
pub trait RefreshSignal: Send + Sync {
    fn refresh(&self, reason: RefreshReason);
}

/// Default signal for callers without a cache.
pub struct NoRefresh;

impl RefreshSignal for NoRefresh {
    fn refresh(&self, _reason: RefreshReason) {}
}

pub struct DiscoveryService {
    store: Store,
    prober: Arc<dyn Prober>,
    identity: Arc<dyn IdentitySource>,
    refresh: Arc<dyn RefreshSignal>,
    batch_size: usize,
}

impl DiscoveryService {
    /// Wires the TCP prober and the DNS/NetBIOS chain as configured.
    pub fn new(store: Store, cfg: &Config) -> Self {
        Self {
            store,
            prober: Arc::new(TcpProber::from(cfg)),
            identity: Arc::new(IdentityResolver::from_config(cfg)),
            refresh: Arc::new(NoRefresh),
            batch_size: cfg.effective_batch_size(),
        }
    }

    pub fn with_prober(mut self, prober: impl Prober + 'static) -> Self {
        self.prober = Arc::new(prober);
        self
    }

    pub fn with_identity_source(mut self, identity: impl IdentitySource + 'static) -> Self {
        self.identity = Arc::new(identity);
        self
    }

    pub fn with_refresh_signal(mut self, refresh: Arc<dyn RefreshSignal>) -> Self {
        self.refresh = refresh;
        self
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Probes every address in `start..=end` and stores the alive ones.
    ///
    /// Fails only before probing starts: [`DiscoveryError::Unauthorized`] for an
    /// anonymous session, [`DiscoveryError::InvalidRange`] for a bad range.
    pub async fn scan_range(
        &self,
        session: &Session,
        start: &str,
        end: &str,
    ) -> Result<ScanSummary, DiscoveryError> {
        let user = session.require_user()?;
        let range = expand_range(start, end)?;

        info!(
            "{user} started a scan of {} - {} ({} addresses)",
            range.start_addr,
            range.end_addr,
            range.address_count()
        );

        let sink = StoreSink {
            store: self.store.clone(),
        };
        let summary = scanner::sweep(
            range,
            self.batch_size,
            Arc::clone(&self.prober),
            Arc::clone(&self.identity),
            &sink,
        )
        .await;

        self.refresh.refresh(RefreshReason::ScanCompleted);
        Ok(summary)
    }

    pub async fn list_discovered_devices(&self) -> Result<Vec<DiscoveredDevice>, DiscoveryError> {
        self.store.call(|conn| queries::list_devices(conn)).await
    }

    pub async fn list_assets(&self) -> Result<Vec<Asset>, DiscoveryError> {
        self.store.call(|conn| queries::list_assets(conn)).await
    }

    pub async fn promote_to_asset(
        &self,
        session: &Session,
        device_id: i64,
        fields: AssetFields,
    ) -> Result<Asset, DiscoveryError> {
        session.require_user()?;

        let asset = self
            .store
            .call(move |conn| promotion::promote(conn, device_id, fields))
            .await?;

        self.refresh.refresh(RefreshReason::DevicePromoted);
        Ok(asset)
    }

    pub async fn record_agent_report(
        &self,
        session: &Session,
        ip: Ipv4Addr,
        report: DeviceDetails,
    ) -> Result<DiscoveredDevice, DiscoveryError> {
        session.require_user()?;

        let device = self
            .store
            .call(move |conn| reconcile::reconcile_agent_report(conn, ip, report))
            .await?;

        self.refresh.refresh(RefreshReason::AgentReported);
        Ok(device)
    }
}

struct StoreSink {
    store: Store,
}

#[async_trait]
impl ResultSink for StoreSink {
    async fn accept(&self, report: HostReport) -> Result<(), DiscoveryError> {
        let ip = report.probe.ip;
        let port = report
            .probe
            .responding_port
            .ok_or_else(|| DiscoveryError::Task(format!("{ip} is alive without a port")))?;

        self.store
            .call(move |conn| reconcile::reconcile(conn, ip, port, &report.identity))
            .await?;
        Ok(())
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
    use roster_common::models::host::{Identity, ProbeOutcome};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingProber {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Prober for CountingProber {
        async fn probe(&self, ip: Ipv4Addr) -> ProbeOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if ip.octets()[3] % 2 == 0 {
                ProbeOutcome::Alive { port: 80 }
            } else {
                ProbeOutcome::Dead
            }
        }
    }

    struct Anonymous;

    #[async_trait]
    impl IdentitySource for Anonymous {
        async fn identify(&self, _ip: Ipv4Addr) -> Identity {
            Identity::default()
        }
    }

    #[derive(Default)]
    struct RecordingRefresh {
        seen: Mutex<Vec<RefreshReason>>,
    }

    impl RefreshSignal for RecordingRefresh {
        fn refresh(&self, reason: RefreshReason) {
            self.seen.lock().unwrap().push(reason);
        }
    }

    fn service() -> (DiscoveryService, Arc<AtomicUsize>, Arc<RecordingRefresh>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let refresh = Arc::new(RecordingRefresh::default());
        let service = DiscoveryService::new(Store::in_memory().unwrap(), &Config::default())
            .with_prober(CountingProber {
                calls: Arc::clone(&calls),
            })
            .with_identity_source(Anonymous)
            .with_refresh_signal(refresh.clone());
        (service, calls, refresh)
    }

    #[tokio::test]
    async fn anonymous_scan_is_rejected_before_probing() {
        let (service, calls, refresh) = service();
        let err = service
            .scan_range(&Session::anonymous(), "10.0.0.1", "10.0.0.4")
            .await
            .unwrap_err();

        assert!(matches!(err, DiscoveryError::Unauthorized));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(refresh.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_range_is_rejected_before_probing() {
        let (service, calls, _) = service();
        let err = service
            .scan_range(&Session::authenticated("op"), "10.0.0.1", "10.0.2.1")
            .await
            .unwrap_err();

        assert!(matches!(err, DiscoveryError::InvalidRange(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(service.list_discovered_devices().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn scan_stores_alive_hosts_and_signals_refresh() {
        let (service, calls, refresh) = service();
        let summary = service
            .scan_range(&Session::authenticated("op"), "10.0.0.1", "10.0.0.6")
            .await
            .unwrap();

        assert_eq!(summary.count, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 6);
        assert_eq!(service.list_discovered_devices().await.unwrap().len(), 3);
        assert_eq!(*refresh.seen.lock().unwrap(), vec![RefreshReason::ScanCompleted]);
    }

    #[tokio::test]
    async fn promotion_requires_session() {
        let (service, _, _) = service();
        let fields = AssetFields {
            name: "x".to_string(),
            tag: "y".to_string(),
            asset_type: "z".to_string(),
        };
        let err = service
            .promote_to_asset(&Session::anonymous(), 1, fields)
            .await
            .unwrap_err();
        assert!(matches!(err, DiscoveryError::Unauthorized));
    }
}

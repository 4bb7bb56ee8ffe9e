// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

mod discovery;

pub mod utils {
    use std::net::Ipv4Addr;
    use std::time::Duration;

    use roster_common::config::Config;
    use roster_core::service::DiscoveryService;
    use roster_core::session::Session;
    use roster_core::store::Store;
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// A TCP listener on 127.0.0.1 that accepts and drops every connection.
    ///
    /// Every other 127.x address refuses the same port, which gives a range with
    /// exactly one live host.
    pub struct LoopbackHost {
        pub port: u16,
        handle: JoinHandle<()>,
    }

    impl LoopbackHost {
        pub async fn start() -> anyhow::Result<Self> {
            let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await?;
            let port = listener.local_addr()?.port();
            let handle = tokio::spawn(async move {
                while let Ok((stream, _)) = listener.accept().await {
                    drop(stream);
                }
            });
            Ok(Self { port, handle })
        }
    }

    impl Drop for LoopbackHost {
        fn drop(&mut self) {
            self.handle.abort();
        }
    }

    /// Probes only `port`, never sends DNS or NetBIOS traffic.
    pub fn offline_config(port: u16) -> Config {
        Config {
            probe_ports: vec![port],
            connect_timeout: Duration::from_millis(300),
            no_dns: true,
            no_netbios: true,
            no_banner: true,
            ..Config::default()
        }
    }

    pub fn service(port: u16) -> anyhow::Result<DiscoveryService> {
        let store = Store::in_memory()?;
        Ok(DiscoveryService::new(store, &offline_config(port)))
    }

    pub fn operator() -> Session {
        Session::authenticated("it-operator")
    }
}

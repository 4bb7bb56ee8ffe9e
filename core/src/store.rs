// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! SQLite persistence for discovered devices and assets.
//!
//! A single connection sits behind a mutex. Async callers go through
//! [`Store::call`], which moves the work onto tokio's blocking pool so a slow
//! disk never stalls the probing tasks.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, anyhow};
use rusqlite::Connection;

use roster_common::debug;

use crate::error::DiscoveryError;

pub mod queries;
pub mod schema;

#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
    path: PathBuf,
}

impl Store {
    /// Opens (or creates) the database file and applies the schema.
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).context("Failed to create database directory")?;
        }

        let conn = Connection::open(&path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
            path,
        };
        store.initialize()?;

        debug!(verbosity = 1, "Opened store at {}", store.path.display());
        Ok(store)
    }

    /// Private in-memory database, used by tests and dry runs.
    pub fn in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
            path: PathBuf::from(":memory:"),
        };
        store.initialize()?;

        Ok(store)
    }

    fn initialize(&self) -> anyhow::Result<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| anyhow!("Store connection lock poisoned during initialization"))?;
        schema::create_tables(&conn).context("Failed to create schema")?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Runs `work` with exclusive access to the connection on the blocking pool.
    pub async fn call<T, F>(&self, work: F) -> Result<T, DiscoveryError>
    where
        F: FnOnce(&mut Connection) -> Result<T, DiscoveryError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| DiscoveryError::Task("store connection lock poisoned".to_string()))?;
            work(&mut guard)
        })
        .await?
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

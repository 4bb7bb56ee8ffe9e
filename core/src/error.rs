// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use thiserror::Error;

use roster_common::models::range::RangeError;

/// Failures a caller of the discovery service can observe.
///
/// Per-host probe and resolution problems never show up here; they are folded into
/// the probe outcome and at most logged.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error(transparent)]
    InvalidRange(#[from] RangeError),

    #[error("an authenticated session is required")]
    Unauthorized,

    #[error("no discovered device with id {0}")]
    NotFound(i64),

    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("details could not be serialized: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("background task failed: {0}")]
    Task(String),
}

impl From<tokio::task::JoinError> for DiscoveryError {
    fn from(err: tokio::task::JoinError) -> Self {
        DiscoveryError::Task(err.to_string())
    }
}

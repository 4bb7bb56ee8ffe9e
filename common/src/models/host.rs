// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Host Model
//!
//! Transient, in-memory results produced while sweeping a range.
//!
//! ## Key Concepts
//! * **Outcome**: A probe ends in [`ProbeOutcome::Alive`], [`ProbeOutcome::Dead`] or
//!   [`ProbeOutcome::Error`]. Errors are kept distinct internally and only collapse to
//!   "not alive" when a batch is folded into [`ProbeResult`]s.
//! * **Identity**: Hostname and MAC are both optional. An alive host with neither is valid.
//! * **Lifetime**: Nothing here is persisted directly; reconciliation turns it into a
//!   stored device record.

use std::net::Ipv4Addr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// A TCP handshake completed on `port`.
    Alive { port: u16 },
    /// Every probe attempt timed out or was refused.
    Dead,
    /// Something unexpected went wrong while probing.
    Error { cause: String },
}

impl ProbeOutcome {
    pub fn is_alive(&self) -> bool {
        matches!(self, ProbeOutcome::Alive { .. })
    }

    pub fn responding_port(&self) -> Option<u16> {
        match self {
            ProbeOutcome::Alive { port } => Some(*port),
            _ => None,
        }
    }
}

/// Public, collapsed view of a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeResult {
    pub ip: Ipv4Addr,
    pub alive: bool,
    pub responding_port: Option<u16>,
}

impl ProbeResult {
    /// Folds an outcome into the public contract. `Error` becomes not-alive.
    pub fn from_outcome(ip: Ipv4Addr, outcome: &ProbeOutcome) -> Self {
        Self {
            ip,
            alive: outcome.is_alive(),
            responding_port: outcome.responding_port(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub hostname: Option<String>,
    pub mac_address: Option<String>,
}

impl Identity {
    pub fn is_complete(&self) -> bool {
        self.hostname.is_some() && self.mac_address.is_some()
    }

    /// Fills only the fields that are still unknown.
    pub fn absorb(&mut self, other: Identity) {
        if self.hostname.is_none() {
            self.hostname = other.hostname;
        }
        if self.mac_address.is_none() {
            self.mac_address = other.mac_address;
        }
    }
}

/// Everything learned about one alive address during a sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostReport {
    pub probe: ProbeResult,
    pub identity: Identity,
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

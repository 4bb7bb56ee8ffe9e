// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Address Range Expansion
//!
//! Turns a start/end pair of dotted-quad strings into a bounded, ordered
//! [`Ipv4Range`]. Ranges are validated up front so that nothing touches the
//! network for an inverted or oversized request.

use std::net::Ipv4Addr;
use std::str::FromStr;

use thiserror::Error;

use crate::debug;

/// Upper bound on the number of addresses a single scan may cover.
///
/// Bounds the worst-case number of probes per invocation.
pub const MAX_RANGE_ADDRESSES: u32 = 255;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("'{0}' is not a valid IPv4 address")]
    InvalidAddress(String),

    #[error("invalid range {start} - {end}: {reason}")]
    InvalidRange {
        start: Ipv4Addr,
        end: Ipv4Addr,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv4Range {
    pub start_addr: Ipv4Addr,
    pub end_addr: Ipv4Addr,
}

impl Ipv4Range {
    /// Builds a validated range. Inverted bounds and spans above
    /// [`MAX_RANGE_ADDRESSES`] are rejected.
    pub fn new(start: Ipv4Addr, end: Ipv4Addr) -> Result<Self, RangeError> {
        let s_u32 = u32::from(start);
        let e_u32 = u32::from(end);

        if e_u32 < s_u32 {
            return Err(RangeError::InvalidRange {
                start,
                end,
                reason: "end address precedes start address".to_string(),
            });
        }

        let span: u64 = u64::from(e_u32 - s_u32) + 1;
        if span > u64::from(MAX_RANGE_ADDRESSES) {
            return Err(RangeError::InvalidRange {
                start,
                end,
                reason: format!("{span} addresses exceeds the limit of {MAX_RANGE_ADDRESSES}"),
            });
        }

        Ok(Self {
            start_addr: start,
            end_addr: end,
        })
    }

    /// Ascending iterator over every address in the range, both ends included.
    /// Cheap to call repeatedly; each call starts from the beginning.
    pub fn iter(&self) -> impl Iterator<Item = Ipv4Addr> + use<> {
        let start: u32 = self.start_addr.into();
        let end: u32 = self.end_addr.into();
        (start..=end).map(Ipv4Addr::from)
    }

    pub fn contains(&self, ip: &Ipv4Addr) -> bool {
        let start: u32 = self.start_addr.into();
        let end: u32 = self.end_addr.into();
        let ip_u32: u32 = (*ip).into();
        ip_u32 >= start && ip_u32 <= end
    }

    pub fn address_count(&self) -> u32 {
        let s_u32: u32 = u32::from(self.start_addr);
        let e_u32: u32 = u32::from(self.end_addr);
        (e_u32 - s_u32) + 1
    }
}

/// Parses both ends and validates the span.
pub fn expand_range(start: &str, end: &str) -> Result<Ipv4Range, RangeError> {
    let start_addr = parse_ipv4(start)?;
    let end_addr = parse_ipv4(end)?;
    let range = Ipv4Range::new(start_addr, end_addr)?;

    debug!(
        verbosity = 1,
        "Expanded {} - {} into {} addresses",
        range.start_addr,
        range.end_addr,
        range.address_count()
    );

    Ok(range)
}

fn parse_ipv4(input: &str) -> Result<Ipv4Addr, RangeError> {
    let trimmed = input.trim();
    Ipv4Addr::from_str(trimmed).map_err(|_| RangeError::InvalidAddress(trimmed.to_string()))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Messages the spinner rotates through while a sweep runs.

use rand::Rng;
use rand::seq::SliceRandom;

const USAGE_TIPS: &[&str] = &[
    "Hosts answering on none of 80/445/135/22 are reported as down",
    "Agent-reported hardware data survives every rescan",
    "Promote a device with 'roster promote <id> --name ...'",
    "Promoted devices stay ADDED on later scans",
    "'--no-dns' keeps the sweep out of your DNS server's logs",
    "'--redact' masks hostnames, MACs and serials in listings",
    "A single sweep covers at most 255 addresses",
    "'roster list -qq' prints one tab-separated device per line",
];

const FLAVOR: &[&str] = &[
    "NetBIOS names are padded to 15 characters plus a type suffix",
    "PTR records live under in-addr.arpa, octets reversed",
    "Port 135 is the Windows RPC endpoint mapper",
    "A MAC address' first three octets name the vendor",
    "Every asset was once an unknown device",
    "If it is not in the inventory, it does not exist",
    "The printer is always the last device anyone promotes",
];

/// Usage tips interleaved with flavor text, each message exactly once.
///
/// Both pools are shuffled, then merged by picking the next message from a
/// random pool until one runs dry.
pub fn get_shuffled_insights() -> Vec<&'static str> {
    let mut rng = rand::rng();

    let mut tips = USAGE_TIPS.to_vec();
    let mut flavor = FLAVOR.to_vec();
    tips.shuffle(&mut rng);
    flavor.shuffle(&mut rng);

    let mut tips = tips.into_iter().peekable();
    let mut flavor = flavor.into_iter().peekable();
    let mut merged = Vec::with_capacity(USAGE_TIPS.len() + FLAVOR.len());

    while tips.peek().is_some() && flavor.peek().is_some() {
        let next = if rng.random_bool(0.5) {
            tips.next()
        } else {
            flavor.next()
        };
        merged.extend(next);
    }

    merged.extend(tips);
    merged.extend(flavor);
    merged
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

    #[test]
    fn every_message_appears_exactly_once() {
        let insights = get_shuffled_insights();
        assert_eq!(insights.len(), USAGE_TIPS.len() + FLAVOR.len());

        for msg in USAGE_TIPS.iter().chain(FLAVOR) {
            assert_eq!(insights.iter().filter(|m| *m == msg).count(), 1, "{msg}");
        }
    }
}

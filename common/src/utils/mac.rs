// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! **Medium Access Control (MAC)** address helpers.
//!
//! Addresses are stored as upper-case, colon separated text (`AA:BB:CC:DD:EE:FF`)
//! regardless of how the wire or an agent reported them.

use std::str::FromStr;

use pnet::util::MacAddr;

/// Builds a MAC from the six raw octets found on the wire.
///
/// Returns `None` for the all-zero address, which stacks report when they
/// do not know or will not share their hardware address.
pub fn from_octets(octets: [u8; 6]) -> Option<MacAddr> {
    let mac = MacAddr::new(
        octets[0], octets[1], octets[2], octets[3], octets[4], octets[5],
    );
    if mac == MacAddr::zero() { None } else { Some(mac) }
}

pub fn to_display(mac: &MacAddr) -> String {
    mac.to_string().to_uppercase()
}

/// Normalizes an agent-supplied MAC. Accepts `:` or `-` separators.
pub fn normalize(input: &str) -> Option<String> {
    let unified = input.trim().replace('-', ":");
    let mac = MacAddr::from_str(&unified).ok()?;
    if mac == MacAddr::zero() {
        return None;
    }
    Some(to_display(&mac))
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
    fn zero_mac_is_discarded() {
        assert_eq!(from_octets([0; 6]), None);
        assert_eq!(normalize("00:00:00:00:00:00"), None);
    }

    #[test]
    fn wire_octets_display_upper_case() {
        let mac = from_octets([0x2c, 0xcf, 0x67, 0xf2, 0x51, 0xe3]).unwrap();
        assert_eq!(to_display(&mac), "2C:CF:67:F2:51:E3");
    }

    #[test]
    fn windows_style_separators_are_accepted() {
        assert_eq!(
            normalize("2c-cf-67-f2-51-e3").as_deref(),
            Some("2C:CF:67:F2:51:E3")
        );
        assert_eq!(normalize("not a mac"), None);
    }
}

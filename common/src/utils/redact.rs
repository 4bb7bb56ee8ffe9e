// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Masks hostnames, MAC addresses and serial numbers in terminal output so device
//! listings can be shared without leaking hardware identity.

/// Keeps the first and last 2 characters. Names of 4 characters or fewer are fully masked.
///
/// # Examples
/// ```
/// use roster_common::utils::redact;
///
/// assert_eq!(redact::hostname("workstation"), "woXXXXXon");
/// assert_eq!(redact::hostname("pc"), "XXXXX");
/// ```
pub fn hostname(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= 4 {
        return "XXXXX".to_string();
    }

    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}XXXXX{}", head, tail)
}

/// Keeps the vendor (OUI) half of a stored `AA:BB:CC:DD:EE:FF` address.
///
/// # Examples
/// ```
/// use roster_common::utils::redact;
///
/// assert_eq!(redact::mac("2C:CF:67:F2:51:E3"), "2C:CF:67:XX:XX:XX");
/// ```
pub fn mac(mac: &str) -> String {
    let octets: Vec<&str> = mac.split(':').collect();
    if octets.len() != 6 {
        return "XX:XX:XX:XX:XX:XX".to_string();
    }
    format!("{}:{}:{}:XX:XX:XX", octets[0], octets[1], octets[2])
}

pub fn serial(serial: &str) -> String {
    let visible: String = serial.chars().take(2).collect();
    format!("{}XXXX", visible)
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
    fn hostname_masks_middle() {
        assert_eq!(hostname("kabelbox.local"), "kaXXXXXal");
        assert_eq!(hostname("abcd"), "XXXXX");
    }

    #[test]
    fn hostname_handles_multibyte() {
        assert_eq!(hostname("büro-pc-01"), "büXXXXX01");
    }

    #[test]
    fn malformed_mac_is_fully_masked() {
        assert_eq!(mac("garbage"), "XX:XX:XX:XX:XX:XX");
    }

    #[test]
    fn serial_keeps_prefix() {
        assert_eq!(serial("SN123"), "SNXXXX");
    }
}

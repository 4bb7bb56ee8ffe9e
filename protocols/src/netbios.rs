// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! NetBIOS node-status (NBSTAT) codec.
//!
//! A node-status request asks a host for its whole name table by querying the
//! wildcard name `*`. The response lists every registered name together with a
//! suffix byte and flags, followed by the adapter's MAC address.

use anyhow::{Result, anyhow, bail};
use pnet::util::MacAddr;

use roster_common::utils::mac;

use crate::utils::{
    MAC_LEN, NBNS_HDR_LEN, NBSTAT_NAME_ENTRY_LEN, NBSTAT_QUESTION_LEN, NETBIOS_NAME_LEN,
};

const QTYPE_NBSTAT: u16 = 0x0021;
const QCLASS_IN: u16 = 0x0001;
const FLAG_RESPONSE: u16 = 0x8000;
const FLAG_AUTHORITATIVE_RESPONSE: u16 = 0x8400;
const NBSTAT_STATISTICS_LEN: usize = 46;

/// `*` padded with NULs, which asks for the full name table.
const WILDCARD_NAME: [u8; 16] = *b"*\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0";
const NAME_FLAG_GROUP: u16 = 0x8000;

/// Suffix of the name a machine registers for its workstation service.
pub const SUFFIX_WORKSTATION: u8 = 0x00;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameEntry {
    pub name: String,
    pub suffix: u8,
    pub group: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeStatus {
    pub names: Vec<NameEntry>,
    pub mac: Option<MacAddr>,
}

impl NodeStatus {
    /// First unique (non-group) workstation name, i.e. the computer name.
    pub fn computer_name(&self) -> Option<&str> {
        self.names
            .iter()
            .find(|entry| entry.suffix == SUFFIX_WORKSTATION && !entry.group)
            .map(|entry| entry.name.as_str())
    }

    /// Workgroup or domain the machine belongs to.
    pub fn group_name(&self) -> Option<&str> {
        self.names
            .iter()
            .find(|entry| entry.suffix == SUFFIX_WORKSTATION && entry.group)
            .map(|entry| entry.name.as_str())
    }
}

/// Builds a node-status request for the wildcard name.
pub fn create_nbstat_request(transaction_id: u16) -> Vec<u8> {
    let mut packet = Vec::with_capacity(NBNS_HDR_LEN + NBSTAT_QUESTION_LEN);

    packet.extend_from_slice(&transaction_id.to_be_bytes());
    packet.extend_from_slice(&0u16.to_be_bytes()); // flags: query
    packet.extend_from_slice(&1u16.to_be_bytes()); // qdcount
    packet.extend_from_slice(&[0u8; 6]); // an/ns/ar counts

    packet.push(32);
    packet.extend_from_slice(&encode_name(&WILDCARD_NAME));
    packet.push(0);

    packet.extend_from_slice(&QTYPE_NBSTAT.to_be_bytes());
    packet.extend_from_slice(&QCLASS_IN.to_be_bytes());

    packet
}

/// Builds the answer a host sends back for a node-status request.
///
/// Used by responders and test doubles. Statistics are zeroed.
pub fn create_nbstat_response(transaction_id: u16, status: &NodeStatus) -> Vec<u8> {
    let mut rdata = Vec::with_capacity(1 + status.names.len() * NBSTAT_NAME_ENTRY_LEN + 46);
    rdata.push(status.names.len().min(u8::MAX as usize) as u8);
    for entry in status.names.iter().take(u8::MAX as usize) {
        let mut name = [b' '; NETBIOS_NAME_LEN];
        let len = entry.name.len().min(NETBIOS_NAME_LEN);
        name[..len].copy_from_slice(&entry.name.as_bytes()[..len]);
        rdata.extend_from_slice(&name);
        rdata.push(entry.suffix);
        let flags: u16 = if entry.group { NAME_FLAG_GROUP } else { 0 };
        rdata.extend_from_slice(&flags.to_be_bytes());
    }
    let mac = status.mac.unwrap_or_else(MacAddr::zero);
    rdata.extend_from_slice(&[mac.0, mac.1, mac.2, mac.3, mac.4, mac.5]);
    rdata.extend_from_slice(&[0u8; NBSTAT_STATISTICS_LEN - MAC_LEN]);

    let mut packet = Vec::with_capacity(NBNS_HDR_LEN + 34 + 10 + rdata.len());
    packet.extend_from_slice(&transaction_id.to_be_bytes());
    packet.extend_from_slice(&FLAG_AUTHORITATIVE_RESPONSE.to_be_bytes());
    packet.extend_from_slice(&0u16.to_be_bytes()); // qdcount
    packet.extend_from_slice(&1u16.to_be_bytes()); // ancount
    packet.extend_from_slice(&[0u8; 4]);

    packet.push(32);
    packet.extend_from_slice(&encode_name(&WILDCARD_NAME));
    packet.push(0);
    packet.extend_from_slice(&QTYPE_NBSTAT.to_be_bytes());
    packet.extend_from_slice(&QCLASS_IN.to_be_bytes());
    packet.extend_from_slice(&0u32.to_be_bytes()); // ttl
    packet.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
    packet.extend_from_slice(&rdata);

    packet
}

/// First-level encoding: every nibble of the 16 byte name is mapped onto `'A'..='P'`.
fn encode_name(name: &[u8; 16]) -> [u8; 32] {
    let mut encoded = [0u8; 32];
    for (i, byte) in name.iter().enumerate() {
        encoded[i * 2] = b'A' + (byte >> 4);
        encoded[i * 2 + 1] = b'A' + (byte & 0x0F);
    }
    encoded
}

/// Parses a node-status response. Fails when the packet is not a response to
/// `transaction_id` or is truncated.
pub fn parse_nbstat_response(payload: &[u8], transaction_id: u16) -> Result<NodeStatus> {
    if payload.len() < NBNS_HDR_LEN {
        bail!("NBNS packet too short: {} bytes", payload.len());
    }

    let id = read_u16(payload, 0)?;
    if id != transaction_id {
        bail!("Transaction id mismatch: expected {transaction_id:#06x}, got {id:#06x}");
    }

    let flags = read_u16(payload, 2)?;
    if flags & FLAG_RESPONSE == 0 {
        bail!("Packet is a query, not a response");
    }

    let qdcount = read_u16(payload, 4)?;
    let ancount = read_u16(payload, 6)?;
    if ancount == 0 {
        bail!("Response carries no answer");
    }

    let mut pos = NBNS_HDR_LEN;
    for _ in 0..qdcount {
        pos = skip_name(payload, pos)? + 4;
    }

    pos = skip_name(payload, pos)?;
    let rtype = read_u16(payload, pos)?;
    if rtype != QTYPE_NBSTAT {
        bail!("Unexpected record type {rtype:#06x}");
    }
    // type, class, ttl
    pos += 8;

    let rdlength = read_u16(payload, pos)? as usize;
    pos += 2;
    let rdata = payload
        .get(pos..pos + rdlength)
        .ok_or_else(|| anyhow!("RDATA truncated"))?;

    parse_name_table(rdata)
}

fn parse_name_table(rdata: &[u8]) -> Result<NodeStatus> {
    let count = *rdata.first().ok_or_else(|| anyhow!("Empty name table"))? as usize;
    let mut pos = 1;
    let mut names = Vec::with_capacity(count);

    for _ in 0..count {
        let entry = rdata
            .get(pos..pos + NBSTAT_NAME_ENTRY_LEN)
            .ok_or_else(|| anyhow!("Name table truncated"))?;

        let name = String::from_utf8_lossy(&entry[..NETBIOS_NAME_LEN])
            .trim_end_matches([' ', '\0'])
            .to_string();
        let suffix = entry[NETBIOS_NAME_LEN];
        let name_flags = u16::from_be_bytes([entry[16], entry[17]]);

        if !name.is_empty() {
            names.push(NameEntry {
                name,
                suffix,
                group: name_flags & NAME_FLAG_GROUP != 0,
            });
        }

        pos += NBSTAT_NAME_ENTRY_LEN;
    }

    let mac = rdata
        .get(pos..pos + MAC_LEN)
        .and_then(|bytes| <[u8; MAC_LEN]>::try_from(bytes).ok())
        .and_then(mac::from_octets);

    Ok(NodeStatus { names, mac })
}

/// Returns the offset just past an encoded or compressed name.
fn skip_name(payload: &[u8], mut pos: usize) -> Result<usize> {
    loop {
        let len = *payload
            .get(pos)
            .ok_or_else(|| anyhow!("Name runs past end of packet"))?;
        if len & 0xC0 == 0xC0 {
            return Ok(pos + 2);
        }
        pos += 1;
        if len == 0 {
            return Ok(pos);
        }
        pos += len as usize;
    }
}

fn read_u16(payload: &[u8], pos: usize) -> Result<u16> {
    payload
        .get(pos..pos + 2)
        .map(|b| u16::from_be_bytes([b[0], b[1]]))
        .ok_or_else(|| anyhow!("Read past end of packet at offset {pos}"))
}

pub fn random_transaction_id() -> u16 {
    rand::random()
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

    fn unique(name: &str, suffix: u8) -> NameEntry {
        NameEntry {
            name: name.to_string(),
            suffix,
            group: false,
        }
    }

    fn group(name: &str) -> NameEntry {
        NameEntry {
            name: name.to_string(),
            suffix: SUFFIX_WORKSTATION,
            group: true,
        }
    }

    #[test]
    fn request_has_wildcard_question() {
        let packet = create_nbstat_request(0xBEEF);
        assert_eq!(packet.len(), NBNS_HDR_LEN + NBSTAT_QUESTION_LEN);
        assert_eq!(&packet[0..2], &[0xBE, 0xEF]);
        assert_eq!(packet[12], 32);
        assert_eq!(&packet[13..15], b"CK");
        assert_eq!(&packet[15..17], b"AA");
        assert_eq!(&packet[46..50], &[0x00, 0x21, 0x00, 0x01]);
    }

    #[test]
    fn computer_name_skips_group_entries() {
        let status = NodeStatus {
            names: vec![group("WORKGROUP"), unique("DESK-01", 0x20), unique("DESK-01", 0x00)],
            mac: Some(MacAddr::new(0x2c, 0xcf, 0x67, 0xf2, 0x51, 0xe3)),
        };
        let packet = create_nbstat_response(7, &status);
        let parsed = parse_nbstat_response(&packet, 7).unwrap();

        assert_eq!(parsed, status);
        assert_eq!(parsed.computer_name(), Some("DESK-01"));
        assert_eq!(parsed.group_name(), Some("WORKGROUP"));
    }

    #[test]
    fn zero_mac_is_reported_as_unknown() {
        let status = NodeStatus {
            names: vec![unique("NAS", 0x00)],
            mac: None,
        };
        let parsed = parse_nbstat_response(&create_nbstat_response(1, &status), 1).unwrap();
        assert_eq!(parsed.computer_name(), Some("NAS"));
        assert_eq!(parsed.mac, None);
    }

    #[test]
    fn group_only_table_has_no_computer_name() {
        let status = NodeStatus {
            names: vec![group("WORKGROUP")],
            mac: None,
        };
        let parsed = parse_nbstat_response(&create_nbstat_response(9, &status), 9).unwrap();
        assert_eq!(parsed.computer_name(), None);
    }

    #[test]
    fn mismatched_transaction_is_rejected() {
        let status = NodeStatus {
            names: vec![unique("NAS", 0x00)],
            mac: None,
        };
        let packet = create_nbstat_response(1, &status);
        assert!(parse_nbstat_response(&packet, 2).is_err());
    }

    #[test]
    fn request_is_not_mistaken_for_response() {
        let packet = create_nbstat_request(5);
        assert!(parse_nbstat_response(&packet, 5).is_err());
    }

    #[test]
    fn truncated_packet_is_rejected() {
        let status = NodeStatus {
            names: vec![unique("NAS", 0x00)],
            mac: None,
        };
        let packet = create_nbstat_response(1, &status);
        assert!(parse_nbstat_response(&packet[..60], 1).is_err());
        assert!(parse_nbstat_response(&[0u8; 4], 1).is_err());
    }

    #[test]
    fn compressed_answer_name_is_followed() {
        let status = NodeStatus {
            names: vec![unique("PRINTER", 0x00)],
            mac: Some(MacAddr::new(1, 2, 3, 4, 5, 6)),
        };
        let full = create_nbstat_response(3, &status);
        // Swap the 34 byte answer name for a pointer to offset 12.
        let mut packet = full[..NBNS_HDR_LEN].to_vec();
        packet.extend_from_slice(&[0xC0, 0x0C]);
        packet.extend_from_slice(&full[NBNS_HDR_LEN + 34..]);

        let parsed = parse_nbstat_response(&packet, 3).unwrap();
        assert_eq!(parsed.computer_name(), Some("PRINTER"));
    }
}

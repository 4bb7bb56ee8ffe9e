// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use colored::Color;

const fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::TrueColor { r, g, b }
}

// Chrome
pub const TEXT_DEFAULT: Color = rgb(212, 212, 212);
pub const SEPARATOR: Color = Color::BrightBlack;
pub const PRIMARY: Color = rgb(255, 204, 102); // amber, record headings
pub const SECONDARY: Color = rgb(102, 204, 255);
pub const ACCENT: Color = rgb(170, 170, 0);

// Identifiers
pub const HOSTNAME: Color = rgb(102, 255, 204);
pub const MAC_ADDR: Color = rgb(255, 165, 0);
pub const IPV4_ADDR: Color = rgb(170, 255, 170);
pub const HARDWARE: Color = rgb(190, 170, 255);

// Device lifecycle
pub const STATUS_NEW: Color = rgb(255, 102, 178);
pub const STATUS_AGENT: Color = rgb(102, 178, 255);
pub const STATUS_ADDED: Color = rgb(120, 220, 120);

// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

// NetBIOS Name Service (RFC 1002)
pub const NETBIOS_NS_PORT: u16 = 137;
pub const NBNS_HDR_LEN: usize = 12;
pub const NBSTAT_QUESTION_LEN: usize = 38;
pub const NBSTAT_NAME_ENTRY_LEN: usize = 18;
pub const NETBIOS_NAME_LEN: usize = 15;
pub const MAC_LEN: usize = 6;

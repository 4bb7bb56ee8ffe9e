// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

pub mod error;
pub mod promotion;
pub mod reconcile;
pub mod scanner;
pub mod service;
pub mod session;
pub mod store;

// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Logging facade over `tracing`.
//!
//! Every event carries a `status` field (one of [`status`]) which the CLI
//! formatter turns into a glyph. An optional `verbosity = N` field hides the
//! event unless the user passed `-v` at least N times:
//!
//! ```
//! roster_common::debug!(verbosity = 2, "PTR lookup for {} timed out", "10.0.0.7");
//! ```
//!
//! Crates using these macros do not need their own `tracing` dependency.

/// Values of the `status` field.
pub mod status {
    pub const INFO: &str = "info";
    pub const SUCCESS: &str = "success";
    pub const DEBUG: &str = "debug";
    pub const WARN: &str = "warn";
    pub const ERROR: &str = "error";
}

#[doc(hidden)]
#[macro_export]
macro_rules! __event {
    ($level:ident, $status:ident, $($arg:tt)+) => {
        $crate::__private::tracing::$level!(
            status = $crate::logging::status::$status,
            $($arg)+
        )
    };
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)+) => { $crate::__event!(info, INFO, $($arg)+) };
}

/// Like [`info!`] but rendered as a completed step.
#[macro_export]
macro_rules! success {
    ($($arg:tt)+) => { $crate::__event!(info, SUCCESS, $($arg)+) };
}

#[macro_export]
macro_rules! debug {
    ($($arg:tt)+) => { $crate::__event!(debug, DEBUG, $($arg)+) };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)+) => { $crate::__event!(warn, WARN, $($arg)+) };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)+) => { $crate::__event!(error, ERROR, $($arg)+) };
}

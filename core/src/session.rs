// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Caller context handed to every mutating service operation.
//!
//! Verifying credentials happens before a [`Session`] is built; this crate only
//! distinguishes authenticated callers from anonymous ones.

use crate::error::DiscoveryError;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    user: Option<String>,
}

impl Session {
    pub fn authenticated(user: impl Into<String>) -> Self {
        Self {
            user: Some(user.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self { user: None }
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Returns the user name or [`DiscoveryError::Unauthorized`].
    pub fn require_user(&self) -> Result<&str, DiscoveryError> {
        self.user().ok_or(DiscoveryError::Unauthorized)
    }
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
    fn anonymous_session_is_rejected() {
        let err = Session::anonymous().require_user().unwrap_err();
        assert!(matches!(err, DiscoveryError::Unauthorized));
    }

    #[test]
    fn authenticated_session_exposes_user() {
        let session = Session::authenticated("operator");
        assert_eq!(session.require_user().unwrap(), "operator");
    }
}

// Switchboard - An accessibility-first Mastodon client
// Copyright (C) 2025 Switchboard Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Typed errors for the presentation core

use thiserror::Error;

use crate::models::error_codes;

/// Errors raised by row state, consolidation and intent dispatch
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    /// The server sent a notification type outside the closed set
    #[error("unknown notification type {0:?}")]
    UnknownNotificationType(String),

    /// A notification row broke its invariants (no actors, malformed mention)
    #[error("invalid notification {id:?}: {reason}")]
    InvalidNotification { id: String, reason: String },

    #[error("app account {0:?} not found")]
    AccountNotFound(String),

    #[error("notification {0:?} not found")]
    NotificationNotFound(String),

    /// The login has no access token to call the API with
    #[error("app account {0:?} is not authenticated")]
    NotAuthenticated(String),

    /// Retry is only accepted once a fetch has failed
    #[error("profile of {0:?} is not in a failed state")]
    RetryNotAllowed(String),
}

impl CoreError {
    /// IPC error code reported to the UI
    pub fn ipc_code(&self) -> i32 {
        match self {
            CoreError::UnknownNotificationType(_) | CoreError::InvalidNotification { .. } => {
                error_codes::INVALID_PARAMS
            }
            CoreError::AccountNotFound(_) | CoreError::NotificationNotFound(_) => {
                error_codes::NOT_FOUND
            }
            CoreError::NotAuthenticated(_) => error_codes::NOT_AUTHENTICATED,
            CoreError::RetryNotAllowed(_) => error_codes::INVALID_STATE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_value() {
        let e = CoreError::UnknownNotificationType("quote".to_string());
        assert_eq!(e.to_string(), "unknown notification type \"quote\"");
        assert_eq!(e.ipc_code(), error_codes::INVALID_PARAMS);

        let e = CoreError::RetryNotAllowed("acc-1".to_string());
        assert_eq!(e.ipc_code(), error_codes::INVALID_STATE);
    }
}

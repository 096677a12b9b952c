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

//! IPC message models for communication between the core and the UI

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Type of IPC message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Request,
    Response,
    Event,
}

/// An IPC message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpcMessage {
    /// Unique message ID (UUID)
    pub id: String,

    /// Message type
    #[serde(rename = "type")]
    pub message_type: MessageType,

    /// Method name for requests
    pub method: Option<String>,

    /// Parameters for requests
    pub params: Option<Value>,

    /// Result for responses
    pub result: Option<Value>,

    /// Error for failed responses
    pub error: Option<IpcError>,
}

impl IpcMessage {
    /// Create a new request message
    pub fn request(method: &str, params: Option<Value>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            message_type: MessageType::Request,
            method: Some(method.to_string()),
            params,
            result: None,
            error: None,
        }
    }

    /// Create a success response
    pub fn response_ok(id: &str, result: Value) -> Self {
        Self {
            id: id.to_string(),
            message_type: MessageType::Response,
            method: None,
            params: None,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response
    pub fn response_err(id: &str, error: IpcError) -> Self {
        Self {
            id: id.to_string(),
            message_type: MessageType::Response,
            method: None,
            params: None,
            result: None,
            error: Some(error),
        }
    }

    /// Create an event message
    pub fn event(method: &str, params: Value) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            message_type: MessageType::Event,
            method: Some(method.to_string()),
            params: Some(params),
            result: None,
            error: None,
        }
    }
}

/// Error in an IPC response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpcError {
    /// Error code
    pub code: i32,
    /// Error message
    pub message: String,
    /// Additional error data
    pub data: Option<Value>,
}

impl IpcError {
    /// Create a new error
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Add data to the error
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Standard error codes
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;

    // Application-specific errors
    pub const NOT_AUTHENTICATED: i32 = -1001;
    pub const API_ERROR: i32 = -1004;
    pub const NOT_FOUND: i32 = -1006;
    pub const INVALID_STATE: i32 = -1007;
}

/// IPC method names
pub mod methods {
    // Accounts
    pub const ACCOUNTS_LIST: &str = "accounts.list";
    pub const ACCOUNTS_ADD: &str = "accounts.add";
    pub const ACCOUNTS_CURRENT: &str = "accounts.current";

    // Account switcher rows
    pub const ACCOUNT_ROW_APPEAR: &str = "account_row.appear";
    pub const ACCOUNT_ROW_RENDER: &str = "account_row.render";
    pub const ACCOUNT_ROW_ACTIVATE: &str = "account_row.activate";
    pub const ACCOUNT_ROW_RETRY: &str = "account_row.retry";

    // Unread counts
    pub const UNREAD_SET: &str = "unread.set";

    // Follow requests
    pub const FOLLOW_REQUESTS_SET: &str = "follow_requests.set";
    pub const FOLLOW_REQUESTS_ACCEPT: &str = "follow_requests.accept";
    pub const FOLLOW_REQUESTS_REJECT: &str = "follow_requests.reject";

    // Notifications
    pub const NOTIFICATIONS_GET: &str = "notifications.get";
    pub const NOTIFICATION_ROW_RENDER: &str = "notification_row.render";

    // Intents coming back from tap targets
    pub const INTENT_DISPATCH: &str = "intent.dispatch";

    // System
    pub const PING: &str = "ping";
    pub const SHUTDOWN: &str = "shutdown";
}

/// Event names pushed to connected clients
pub mod events {
    pub const ACCOUNT_ROW_UPDATED: &str = "event.account_row_updated";
    pub const CURRENT_ACCOUNT_CHANGED: &str = "event.current_account_changed";
    pub const NAVIGATE: &str = "event.navigate";
    pub const OPEN_URL: &str = "event.open_url";
    pub const HAPTIC: &str = "event.haptic";
    pub const ERROR: &str = "event.error";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn responses_keep_the_request_id() {
        let request = IpcMessage::request(methods::PING, None);
        let ok = IpcMessage::response_ok(&request.id, serde_json::json!({ "pong": true }));
        assert_eq!(ok.id, request.id);
        assert_eq!(ok.message_type, MessageType::Response);
        assert!(ok.error.is_none());

        let err = IpcMessage::response_err(
            &request.id,
            IpcError::new(error_codes::NOT_FOUND, "missing").with_data(serde_json::json!(1)),
        );
        assert_eq!(err.error.as_ref().map(|e| e.code), Some(error_codes::NOT_FOUND));
    }

    #[test]
    fn message_type_serializes_as_type_field() {
        let event = IpcMessage::event(events::HAPTIC, serde_json::json!({ "haptic": "success" }));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "event");
        assert_eq!(json["method"], events::HAPTIC);
    }
}

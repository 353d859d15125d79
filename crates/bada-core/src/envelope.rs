//! Request envelope and normalized result.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Payload carried in the `data` field of an envelope.
pub type Payload = Map<String, Value>;

/// Error code a backend may attach to a failure to mark an expired session.
pub const SESSION_EXPIRED_CODE: &str = "SESSION_EXPIRED";

/// Request sent to the backend for every call.
///
/// Serialized as `{"action": ..., "data": {...}, "token": ...}`. The token is
/// serialized as `null` when no session exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Dot-namespaced action name, e.g. `auth.login`.
    pub action: String,
    /// Action arguments.
    #[serde(default)]
    pub data: Payload,
    /// Session token, if logged in.
    pub token: Option<String>,
}

impl Envelope {
    /// Build an envelope for one call.
    #[must_use]
    pub fn new(action: impl Into<String>, data: Payload, token: Option<String>) -> Self {
        Self {
            action: action.into(),
            data,
            token,
        }
    }
}

/// Outcome of a backend call, independent of the wire field names used.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResult {
    /// The backend accepted the call.
    Ok {
        /// Response data (`null` when the backend sent none).
        data: Value,
    },
    /// The backend rejected the call.
    Fail {
        /// Human-readable failure message.
        message: String,
        /// Structured error code, when the backend provides one.
        error_code: Option<String>,
    },
}

impl ApiResult {
    /// Successful result carrying `data`.
    #[must_use]
    pub const fn ok(data: Value) -> Self {
        Self::Ok { data }
    }

    /// Failed result carrying `message` and no error code.
    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self::Fail {
            message: message.into(),
            error_code: None,
        }
    }

    /// Normalize a decoded response body.
    ///
    /// The discriminant is read from a boolean `success`, falling back to a
    /// boolean `ok`; a body with neither counts as a failure. Failure messages come from `message`,
    /// falling back to `error`.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut body) = value else {
            return Self::fail("Unexpected response format");
        };

        let success = body
            .get("success")
            .and_then(Value::as_bool)
            .or_else(|| body.get("ok").and_then(Value::as_bool))
            .unwrap_or(false);

        if success {
            return Self::Ok {
                data: body.remove("data").unwrap_or(Value::Null),
            };
        }

        let message = ["message", "error"]
            .iter()
            .find_map(|key| body.get(*key).and_then(Value::as_str))
            .unwrap_or_default()
            .to_string();
        let error_code = body
            .get("errorCode")
            .and_then(Value::as_str)
            .map(ToString::to_string);

        Self::Fail {
            message,
            error_code,
        }
    }

    /// Whether the backend accepted the call.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }

    /// Response data for successful results.
    #[must_use]
    pub const fn data(&self) -> Option<&Value> {
        match self {
            Self::Ok { data } => Some(data),
            Self::Fail { .. } => None,
        }
    }

    /// Failure message for failed results.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Ok { .. } => None,
            Self::Fail { message, .. } => Some(message),
        }
    }
}

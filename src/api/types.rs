//! Bridge types shared by the registry, the host protocol and the page.
//!
//! These types provide a stable API surface for the page,
//! hiding how the host transport and event plumbing work.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use specta::Type;

/// Native payload exchanged with the host (whatever `callHandler` resolved with)
pub type Payload = serde_json::Value;

/// Unique identifier for a single host call (UUID v4 string), used in logs
pub type CallId = String;

/// Logical channel that callbacks are registered under.
///
/// The set is closed: every channel the host can feed has a variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
pub enum OperationKey {
    /// Auth code sync (`my.syncAuthCode`, push event `SyncAuthCode`)
    #[serde(rename = "syncAuthCodeData")]
    SyncAuthCodeData,
    /// Trade pay sync (`my.syncTradePay`, push event `SyncTradePay`)
    #[serde(rename = "syncTradePayData")]
    SyncTradePayData,
    /// User consent sync (`my.syncUserConsent`, push event `SyncUserConsent`)
    #[serde(rename = "syncUserConsentData")]
    SyncUserConsentData,
}

impl OperationKey {
    pub const ALL: [OperationKey; 3] = [
        OperationKey::SyncAuthCodeData,
        OperationKey::SyncTradePayData,
        OperationKey::SyncUserConsentData,
    ];

    /// The wire name of the key, as the page knows it.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKey::SyncAuthCodeData => "syncAuthCodeData",
            OperationKey::SyncTradePayData => "syncTradePayData",
            OperationKey::SyncUserConsentData => "syncUserConsentData",
        }
    }
}

impl fmt::Display for OperationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKey {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OperationKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| BridgeError::InvalidInput {
                message: format!("Unknown operation key: {s}"),
            })
    }
}

/// Which half of a callback pair a dispatch targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "camelCase")]
pub enum CallbackKind {
    Success,
    Fail,
}

impl fmt::Display for CallbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallbackKind::Success => f.write_str("success"),
            CallbackKind::Fail => f.write_str("fail"),
        }
    }
}

/// Result routed to a callback pair: the success value or the failure.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(Payload),
    Fail(BridgeError),
}

impl Outcome {
    /// The callback half this outcome is delivered to.
    pub fn kind(&self) -> CallbackKind {
        match self {
            Outcome::Success(_) => CallbackKind::Success,
            Outcome::Fail(_) => CallbackKind::Fail,
        }
    }
}

/// Bridge errors.
///
/// Every variant is reported by logging; the ones that come out of a host
/// call are also delivered to the `fail` half of the matching callbacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Type)]
#[serde(tag = "type")]
pub enum BridgeError {
    /// Registration was missing one of its two callbacks
    InvalidCallbackShape { key: String, missing: String },
    /// Dispatch found no callbacks for the key
    NoCallbacksRegistered { key: String },
    /// A callback returned an error or panicked
    CallbackExecution {
        key: String,
        kind: CallbackKind,
        message: String,
    },
    /// Host resolved with null
    EmptyResponse { handler: String },
    /// Host resolved, but without a field the operation needs
    MissingRequiredField { handler: String, field: String },
    /// Host call was rejected
    TransportRejection {
        handler: String,
        message: String,
        detail: Option<Payload>,
    },
    /// The operation is switched off in the bridge configuration
    HandlerDisabled { handler: String },
    /// Invalid input parameter or configuration
    InvalidInput { message: String },
    /// JSON encode/decode failure
    Serialization { message: String },
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::InvalidCallbackShape { key, missing } => {
                write!(f, "Callback for '{key}' does not have the expected structure (missing {missing})")
            }
            BridgeError::NoCallbacksRegistered { key } => {
                write!(f, "Callbacks for '{key}' not registered")
            }
            BridgeError::CallbackExecution { key, kind, message } => {
                write!(f, "Error executing {kind} callback for '{key}': {message}")
            }
            BridgeError::EmptyResponse { handler } => {
                write!(f, "No response received from host handler {handler}")
            }
            BridgeError::MissingRequiredField { handler, field } => {
                write!(f, "Response from {handler} is missing required field '{field}'")
            }
            BridgeError::TransportRejection {
                handler, message, ..
            } => write!(f, "Host handler {handler} rejected: {message}"),
            BridgeError::HandlerDisabled { handler } => {
                write!(f, "Host handler {handler} is disabled")
            }
            BridgeError::InvalidInput { message } => write!(f, "Invalid input: {message}"),
            BridgeError::Serialization { message } => write!(f, "Serialization error: {message}"),
        }
    }
}

impl std::error::Error for BridgeError {}

impl From<serde_json::Error> for BridgeError {
    fn from(e: serde_json::Error) -> Self {
        BridgeError::Serialization {
            message: e.to_string(),
        }
    }
}

//! Bridge configuration - handler names, push event names and toggles.
//!
//! The embedding application may hand the page a JSON blob to override any of
//! these; every field has a default matching the stock host.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::api::types::BridgeError;
use crate::protocols::events::{EVENT_SYNC_AUTH_CODE, EVENT_SYNC_TRADE_PAY, EVENT_SYNC_USER_CONSENT};
use crate::protocols::host::{
    HANDLER_GET_AUTH_CODE, HANDLER_GET_TRADE_PAY, HANDLER_GET_USER_CONSENT,
    HANDLER_SYNC_AUTH_CODE, HANDLER_SYNC_TRADE_PAY, HANDLER_SYNC_USER_CONSENT,
};

/// Names of the host handlers each operation calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HandlerNames {
    pub get_auth_code: String,
    pub sync_auth_code: String,
    pub get_trade_pay: String,
    pub sync_trade_pay: String,
    pub get_user_consent: String,
    pub sync_user_consent: String,
}

impl Default for HandlerNames {
    fn default() -> Self {
        Self {
            get_auth_code: HANDLER_GET_AUTH_CODE.to_string(),
            sync_auth_code: HANDLER_SYNC_AUTH_CODE.to_string(),
            get_trade_pay: HANDLER_GET_TRADE_PAY.to_string(),
            sync_trade_pay: HANDLER_SYNC_TRADE_PAY.to_string(),
            get_user_consent: HANDLER_GET_USER_CONSENT.to_string(),
            sync_user_consent: HANDLER_SYNC_USER_CONSENT.to_string(),
        }
    }
}

impl HandlerNames {
    fn iter(&self) -> impl Iterator<Item = &String> {
        [
            &self.get_auth_code,
            &self.sync_auth_code,
            &self.get_trade_pay,
            &self.sync_trade_pay,
            &self.get_user_consent,
            &self.sync_user_consent,
        ]
        .into_iter()
    }
}

/// Names of the push events the host dispatches on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PushEventNames {
    pub sync_auth_code: String,
    pub sync_trade_pay: String,
    pub sync_user_consent: String,
}

impl Default for PushEventNames {
    fn default() -> Self {
        Self {
            sync_auth_code: EVENT_SYNC_AUTH_CODE.to_string(),
            sync_trade_pay: EVENT_SYNC_TRADE_PAY.to_string(),
            sync_user_consent: EVENT_SYNC_USER_CONSENT.to_string(),
        }
    }
}

/// Bridge configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BridgeConfig {
    /// Host handler names
    pub handlers: HandlerNames,
    /// Push event names
    pub push_events: PushEventNames,
    /// Whether the user consent handlers may be called
    pub user_consent_enabled: bool,
    /// Whether `Bridge::attach` installs the result re-publishers
    pub republish: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            handlers: HandlerNames::default(),
            push_events: PushEventNames::default(),
            user_consent_enabled: false,
            republish: true,
        }
    }
}

fn handler_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$")
            .unwrap_or_else(|e| unreachable!("handler name pattern is valid: {e}"))
    })
}

impl BridgeConfig {
    /// Parse and validate a JSON configuration. Missing fields take defaults.
    ///
    /// # Errors
    /// * `BridgeError::Serialization` - If the text is not valid JSON for this shape
    /// * `BridgeError::InvalidInput` - If a name fails validation
    pub fn from_json_str(json: &str) -> Result<Self, BridgeError> {
        let config: BridgeConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate handler and event names.
    ///
    /// Handler names must be dotted identifiers (`my.syncTradePay`);
    /// event names must be non-blank.
    pub fn validate(&self) -> Result<(), BridgeError> {
        for name in self.handlers.iter() {
            if !handler_name_pattern().is_match(name) {
                return Err(BridgeError::InvalidInput {
                    message: format!("Invalid host handler name: '{name}'"),
                });
            }
        }

        for name in [
            &self.push_events.sync_auth_code,
            &self.push_events.sync_trade_pay,
            &self.push_events.sync_user_consent,
        ] {
            if name.trim().is_empty() {
                return Err(BridgeError::InvalidInput {
                    message: "Push event name cannot be empty".to_string(),
                });
            }
        }

        Ok(())
    }
}

//! User consent operations.
//!
//! Both operations are off unless `userConsentEnabled` is set; while off they
//! never reach the host and report `HandlerDisabled` to the fail path.

use crate::api::types::{BridgeError, OperationKey, Outcome, Payload};
use crate::runtime::bridge::Bridge;
use crate::runtime::registry::CallbackPair;

impl Bridge {
    /// Ask the host for user consent.
    ///
    /// # Arguments
    /// * `data` - Consent request forwarded to `my.getUserConsent`
    /// * `callbacks` - Receives the host's response or the failure
    pub async fn get_user_consent(&self, data: Payload, callbacks: CallbackPair) -> Outcome {
        let handler = self.config().handlers.get_user_consent.clone();
        if !self.config().user_consent_enabled {
            log::warn!("get_user_consent called while disabled: handler={handler}");
            let outcome = Outcome::Fail(BridgeError::HandlerDisabled { handler: handler.clone() });
            if let Err(e) = callbacks.invoke(&handler, outcome.clone()) {
                log::error!("{e}");
            }
            return outcome;
        }

        log::info!("get_user_consent: handler={handler}");
        self.request_then_invoke(&handler, Some(data), callbacks)
            .await
    }

    /// Pull the latest consent result and dispatch it to `syncUserConsentData`.
    pub async fn sync_user_consent(&self) -> Outcome {
        let handler = self.config().handlers.sync_user_consent.clone();
        if !self.config().user_consent_enabled {
            log::warn!("sync_user_consent called while disabled: handler={handler}");
            let outcome = Outcome::Fail(BridgeError::HandlerDisabled { handler });
            self.dispatch(OperationKey::SyncUserConsentData, outcome.clone());
            return outcome;
        }

        log::info!("sync_user_consent: handler={handler}");
        self.request_then_dispatch(&handler, OperationKey::SyncUserConsentData, None, None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::json;

    use crate::config::BridgeConfig;
    use crate::protocols::host::mock::ScriptedHost;
    use crate::runtime::registry::CallbackSpec;

    use super::*;

    fn enabled_config() -> BridgeConfig {
        BridgeConfig {
            user_consent_enabled: true,
            ..BridgeConfig::default()
        }
    }

    #[tokio::test]
    async fn test_sync_user_consent_disabled_skips_host() {
        let host = Arc::new(ScriptedHost::new().respond("my.syncUserConsent", Ok(json!({"ok": 1}))));
        let bridge = Bridge::with_defaults(host.clone());

        let failures = Arc::new(Mutex::new(Vec::new()));
        let sink = failures.clone();
        bridge
            .register_callback(
                OperationKey::SyncUserConsentData,
                CallbackSpec::new().on_success(|_| Ok(())).on_fail(move |error| {
                    sink.lock().unwrap().push(error);
                    Ok(())
                }),
            )
            .unwrap();

        bridge.sync_user_consent().await;

        assert!(host.calls().is_empty());
        assert_eq!(
            *failures.lock().unwrap(),
            vec![BridgeError::HandlerDisabled {
                handler: "my.syncUserConsent".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_sync_user_consent_enabled_needs_no_field() {
        let host = Arc::new(
            ScriptedHost::new().respond("my.syncUserConsent", Ok(json!({"granted": false}))),
        );
        let bridge = Bridge::new(host.clone(), enabled_config()).unwrap();

        let outcome = bridge.sync_user_consent().await;

        assert_eq!(outcome, Outcome::Success(json!({"granted": false})));
        assert_eq!(host.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_get_user_consent_disabled_reports_to_one_shot_pair() {
        let host = Arc::new(ScriptedHost::new());
        let bridge = Bridge::with_defaults(host.clone());

        let failures = Arc::new(Mutex::new(Vec::new()));
        let sink = failures.clone();
        let callbacks = CallbackPair::new(
            |_| Ok(()),
            move |error| {
                sink.lock().unwrap().push(error);
                Ok(())
            },
        );

        let outcome = bridge.get_user_consent(json!({"scope": "profile"}), callbacks).await;

        assert!(matches!(outcome, Outcome::Fail(BridgeError::HandlerDisabled { .. })));
        assert_eq!(failures.lock().unwrap().len(), 1);
        assert!(host.calls().is_empty());
    }

    #[tokio::test]
    async fn test_get_user_consent_enabled_calls_host() {
        let host = Arc::new(
            ScriptedHost::new().respond("my.getUserConsent", Ok(json!({"granted": true}))),
        );
        let bridge = Bridge::new(host.clone(), enabled_config()).unwrap();

        let outcome = bridge
            .get_user_consent(json!({"scope": "profile"}), CallbackPair::new(|_| Ok(()), |_| Ok(())))
            .await;

        assert_eq!(outcome, Outcome::Success(json!({"granted": true})));
        assert_eq!(
            host.calls(),
            vec![("my.getUserConsent".to_string(), Some(json!({"scope": "profile"})))]
        );
    }
}

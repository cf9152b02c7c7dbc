//! Callback registry - success/fail callback pairs keyed by operation.
//!
//! This module provides:
//! - `CallbackSpec`: the shape a page hands in (either half may be missing)
//! - `CallbackPair`: a validated pair, only constructible with both halves
//! - `CallbackRegistry`: ordered, multi-subscriber storage plus dispatch
//!
//! Storage is an ordered list per key: every pair registered under a key
//! receives every dispatch for that key, in registration order.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, PoisonError, RwLock};

use crate::api::types::{BridgeError, OperationKey, Outcome, Payload};

/// Error a callback may return instead of panicking.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

/// Result of running one callback.
pub type CallbackResult = Result<(), CallbackError>;

/// Success half of a callback pair.
pub type SuccessFn = Arc<dyn Fn(Payload) -> CallbackResult + Send + Sync>;

/// Fail half of a callback pair.
pub type FailFn = Arc<dyn Fn(BridgeError) -> CallbackResult + Send + Sync>;

/// Callback pair as supplied by the page, before validation.
#[derive(Clone, Default)]
pub struct CallbackSpec {
    success: Option<SuccessFn>,
    fail: Option<FailFn>,
}

impl CallbackSpec {
    /// Create an empty spec.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the success callback.
    pub fn on_success<F>(mut self, f: F) -> Self
    where
        F: Fn(Payload) -> CallbackResult + Send + Sync + 'static,
    {
        self.success = Some(Arc::new(f));
        self
    }

    /// Set the fail callback.
    pub fn on_fail<F>(mut self, f: F) -> Self
    where
        F: Fn(BridgeError) -> CallbackResult + Send + Sync + 'static,
    {
        self.fail = Some(Arc::new(f));
        self
    }
}

/// A validated success/fail pair.
#[derive(Clone)]
pub struct CallbackPair {
    success: SuccessFn,
    fail: FailFn,
}

impl CallbackPair {
    /// Build a pair from two closures.
    pub fn new<S, F>(success: S, fail: F) -> Self
    where
        S: Fn(Payload) -> CallbackResult + Send + Sync + 'static,
        F: Fn(BridgeError) -> CallbackResult + Send + Sync + 'static,
    {
        Self {
            success: Arc::new(success),
            fail: Arc::new(fail),
        }
    }

    /// Validate a spec registered under `key`.
    ///
    /// # Errors
    /// * `BridgeError::InvalidCallbackShape` - if either half is missing
    pub fn from_spec(key: OperationKey, spec: CallbackSpec) -> Result<Self, BridgeError> {
        match (spec.success, spec.fail) {
            (Some(success), Some(fail)) => Ok(Self { success, fail }),
            (success, fail) => {
                let missing = match (success.is_some(), fail.is_some()) {
                    (false, false) => "success, fail",
                    (false, true) => "success",
                    _ => "fail",
                };
                Err(BridgeError::InvalidCallbackShape {
                    key: key.to_string(),
                    missing: missing.to_string(),
                })
            }
        }
    }

    /// Deliver an outcome to the matching half, isolating errors and panics.
    ///
    /// `label` names the channel in the returned error (an operation key or
    /// a handler name for one-shot pairs).
    pub fn invoke(&self, label: &str, outcome: Outcome) -> Result<(), BridgeError> {
        let kind = outcome.kind();
        let result = catch_unwind(AssertUnwindSafe(|| match outcome {
            Outcome::Success(data) => (*self.success)(data),
            Outcome::Fail(error) => (*self.fail)(error),
        }));

        let message = match result {
            Ok(Ok(())) => return Ok(()),
            Ok(Err(e)) => e.to_string(),
            Err(panic) => panic_message(panic.as_ref()),
        };

        Err(BridgeError::CallbackExecution {
            key: label.to_string(),
            kind,
            message,
        })
    }
}

impl std::fmt::Debug for CallbackPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackPair").finish_non_exhaustive()
    }
}

pub(crate) fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "callback panicked".to_string()
    }
}

/// Registry of callback pairs for a single bridge.
///
/// Thread-safe: Uses std::sync::RwLock so it can be driven from synchronous
/// event listeners as well as async host calls. The lock is never held while
/// callbacks run.
pub struct CallbackRegistry {
    /// Map of operation key to pairs, in registration order
    callbacks: RwLock<HashMap<OperationKey, Vec<CallbackPair>>>,
}

impl CallbackRegistry {
    /// Creates a new empty CallbackRegistry.
    pub fn new() -> Self {
        Self {
            callbacks: RwLock::new(HashMap::new()),
        }
    }

    /// Validate and register a callback spec under `key`.
    ///
    /// A rejected spec is logged and leaves the registry unchanged.
    ///
    /// # Returns
    /// * `Ok(())` - The pair was appended to the key's list
    /// * `Err(BridgeError::InvalidCallbackShape)` - A half was missing
    pub fn register_callback(
        &self,
        key: OperationKey,
        spec: CallbackSpec,
    ) -> Result<(), BridgeError> {
        let pair = match CallbackPair::from_spec(key, spec) {
            Ok(pair) => pair,
            Err(e) => {
                log::error!("{e}");
                return Err(e);
            }
        };
        self.register_pair(key, pair);
        Ok(())
    }

    /// Append an already validated pair under `key`.
    pub fn register_pair(&self, key: OperationKey, pair: CallbackPair) {
        let mut callbacks = self
            .callbacks
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let pairs = callbacks.entry(key).or_default();
        pairs.push(pair);
        log::debug!("Callback registered: key={key}, total_for_key={}", pairs.len());
    }

    /// Register every entry; invalid entries are logged and skipped.
    ///
    /// # Returns
    /// The number of pairs accepted.
    pub fn initiate<I>(&self, config: I) -> usize
    where
        I: IntoIterator<Item = (OperationKey, CallbackSpec)>,
    {
        config
            .into_iter()
            .filter(|(key, spec)| self.register_callback(*key, spec.clone()).is_ok())
            .count()
    }

    /// Deliver an outcome to every pair registered under `key`.
    ///
    /// Each callback is isolated: an error or panic from one is logged and
    /// the rest still run. A key with no registrations is logged and skipped.
    ///
    /// # Returns
    /// The number of callbacks that completed without error.
    pub fn dispatch(&self, key: OperationKey, outcome: Outcome) -> usize {
        let pairs = {
            let callbacks = self
                .callbacks
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            match callbacks.get(&key) {
                Some(pairs) if !pairs.is_empty() => pairs.clone(),
                _ => Vec::new(),
            }
        };

        if pairs.is_empty() {
            log::error!(
                "{}",
                BridgeError::NoCallbacksRegistered {
                    key: key.to_string()
                }
            );
            return 0;
        }

        let kind = outcome.kind();
        log::trace!("Dispatching: key={key}, kind={kind}, callbacks={}", pairs.len());

        let mut completed = 0;
        for pair in &pairs {
            match pair.invoke(key.as_str(), outcome.clone()) {
                Ok(()) => completed += 1,
                Err(e) => log::error!("{e}"),
            }
        }
        completed
    }

    /// Shorthand for dispatching a success value.
    pub fn dispatch_success(&self, key: OperationKey, data: Payload) -> usize {
        self.dispatch(key, Outcome::Success(data))
    }

    /// Shorthand for dispatching a failure.
    pub fn dispatch_fail(&self, key: OperationKey, error: BridgeError) -> usize {
        self.dispatch(key, Outcome::Fail(error))
    }

    /// Number of pairs registered under `key`.
    pub fn len_for(&self, key: OperationKey) -> usize {
        self.callbacks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .map_or(0, Vec::len)
    }

    /// Check whether any pair is registered under `key`.
    pub fn is_registered(&self, key: OperationKey) -> bool {
        self.len_for(key) > 0
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::CallbackKind;
    use serde_json::json;
    use std::sync::Mutex;

    /// Records what each half of a pair received.
    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn spec(recorder: &Arc<Self>, name: &'static str) -> CallbackSpec {
            let on_success = recorder.clone();
            let on_fail = recorder.clone();
            CallbackSpec::new()
                .on_success(move |data| {
                    on_success
                        .events
                        .lock()
                        .unwrap()
                        .push(format!("{name}:success:{data}"));
                    Ok(())
                })
                .on_fail(move |error| {
                    on_fail
                        .events
                        .lock()
                        .unwrap()
                        .push(format!("{name}:fail:{error}"));
                    Ok(())
                })
        }

        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    #[test]
    fn test_register_then_dispatch_success() {
        let registry = CallbackRegistry::new();
        let recorder = Arc::new(Recorder::default());

        registry
            .register_callback(OperationKey::SyncTradePayData, Recorder::spec(&recorder, "a"))
            .unwrap();

        let completed = registry.dispatch_success(OperationKey::SyncTradePayData, json!("X"));

        assert_eq!(completed, 1);
        assert_eq!(recorder.events(), vec!["a:success:\"X\"".to_string()]);
    }

    #[test]
    fn test_register_missing_fail_is_rejected() {
        let registry = CallbackRegistry::new();
        let recorder = Arc::new(Recorder::default());
        let seen = recorder.clone();

        let spec = CallbackSpec::new().on_success(move |data| {
            seen.events.lock().unwrap().push(format!("success:{data}"));
            Ok(())
        });

        let result = registry.register_callback(OperationKey::SyncAuthCodeData, spec);

        assert!(matches!(
            result,
            Err(BridgeError::InvalidCallbackShape { ref missing, .. }) if missing == "fail"
        ));
        assert_eq!(registry.len_for(OperationKey::SyncAuthCodeData), 0);

        let completed = registry.dispatch_success(OperationKey::SyncAuthCodeData, json!(1));
        assert_eq!(completed, 0);
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn test_register_empty_spec_reports_both_missing() {
        let registry = CallbackRegistry::new();

        let result = registry.register_callback(OperationKey::SyncTradePayData, CallbackSpec::new());

        assert!(matches!(
            result,
            Err(BridgeError::InvalidCallbackShape { ref missing, .. }) if missing == "success, fail"
        ));
    }

    #[test]
    fn test_multiple_pairs_receive_in_registration_order() {
        let registry = CallbackRegistry::new();
        let recorder = Arc::new(Recorder::default());

        registry
            .register_callback(OperationKey::SyncTradePayData, Recorder::spec(&recorder, "first"))
            .unwrap();
        registry
            .register_callback(OperationKey::SyncTradePayData, Recorder::spec(&recorder, "second"))
            .unwrap();

        registry.dispatch_success(OperationKey::SyncTradePayData, json!(7));

        assert_eq!(
            recorder.events(),
            vec!["first:success:7".to_string(), "second:success:7".to_string()]
        );
    }

    #[test]
    fn test_failing_callback_does_not_stop_siblings() {
        let registry = CallbackRegistry::new();
        let recorder = Arc::new(Recorder::default());

        registry.register_pair(
            OperationKey::SyncTradePayData,
            CallbackPair::new(|_| Err("boom".into()), |_| Ok(())),
        );
        registry.register_pair(
            OperationKey::SyncTradePayData,
            CallbackPair::new(|_| panic!("callback exploded"), |_| Ok(())),
        );
        registry
            .register_callback(OperationKey::SyncTradePayData, Recorder::spec(&recorder, "last"))
            .unwrap();

        let completed = registry.dispatch_success(OperationKey::SyncTradePayData, json!("v"));

        assert_eq!(completed, 1);
        assert_eq!(recorder.events(), vec!["last:success:\"v\"".to_string()]);
    }

    #[test]
    fn test_dispatch_fail_only_invokes_fail() {
        let registry = CallbackRegistry::new();
        let recorder = Arc::new(Recorder::default());

        registry
            .register_callback(OperationKey::SyncAuthCodeData, Recorder::spec(&recorder, "a"))
            .unwrap();

        registry.dispatch_fail(
            OperationKey::SyncAuthCodeData,
            BridgeError::EmptyResponse {
                handler: "my.syncAuthCode".to_string(),
            },
        );

        let events = recorder.events();
        assert_eq!(events.len(), 1);
        assert!(events[0].starts_with("a:fail:"));
    }

    #[test]
    fn test_dispatch_unregistered_key_is_noop() {
        let registry = CallbackRegistry::new();
        let recorder = Arc::new(Recorder::default());

        registry
            .register_callback(OperationKey::SyncAuthCodeData, Recorder::spec(&recorder, "a"))
            .unwrap();

        let completed = registry.dispatch_success(OperationKey::SyncUserConsentData, json!({}));

        assert_eq!(completed, 0);
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn test_initiate_allows_partial_success() {
        let registry = CallbackRegistry::new();
        let recorder = Arc::new(Recorder::default());

        let accepted = registry.initiate(vec![
            (OperationKey::SyncTradePayData, Recorder::spec(&recorder, "trade")),
            (
                OperationKey::SyncAuthCodeData,
                CallbackSpec::new().on_fail(|_| Ok(())),
            ),
            (OperationKey::SyncUserConsentData, Recorder::spec(&recorder, "consent")),
        ]);

        assert_eq!(accepted, 2);
        assert!(registry.is_registered(OperationKey::SyncTradePayData));
        assert!(!registry.is_registered(OperationKey::SyncAuthCodeData));
        assert!(registry.is_registered(OperationKey::SyncUserConsentData));
    }

    #[test]
    fn test_callback_may_register_during_dispatch() {
        let registry = Arc::new(CallbackRegistry::new());
        let inner = registry.clone();

        registry.register_pair(
            OperationKey::SyncTradePayData,
            CallbackPair::new(
                move |_| {
                    inner.register_pair(
                        OperationKey::SyncTradePayData,
                        CallbackPair::new(|_| Ok(()), |_| Ok(())),
                    );
                    Ok(())
                },
                |_| Ok(()),
            ),
        );

        assert_eq!(registry.dispatch_success(OperationKey::SyncTradePayData, json!(1)), 1);
        assert_eq!(registry.len_for(OperationKey::SyncTradePayData), 2);
    }

    #[test]
    fn test_invoke_reports_panic_message() {
        let pair = CallbackPair::new(|_| panic!("bad payload"), |_| Ok(()));

        let result = pair.invoke("syncTradePayData", Outcome::Success(json!(null)));

        match result {
            Err(BridgeError::CallbackExecution { kind, message, .. }) => {
                assert_eq!(kind, CallbackKind::Success);
                assert_eq!(message, "bad payload");
            }
            other => panic!("Expected CallbackExecution, got {other:?}"),
        }
    }
}

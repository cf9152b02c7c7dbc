//! Bridge - owns the callback registry and the host transport.
//!
//! This is the entry point for the page: it registers callbacks, calls the
//! host and routes results, and wires host push events into the registry.
//!
//! # Flow
//!
//! 1. Page registers callback pairs via `initiate()` / `register_callback()`
//! 2. Page (or the host, via a push event) triggers a sync
//! 3. `request_then_dispatch()` awaits the host and classifies the result
//! 4. The registry delivers the outcome to every pair under the key

use std::sync::Arc;

use uuid::Uuid;

use crate::api::types::{BridgeError, CallId, OperationKey, Outcome, Payload};
use crate::config::BridgeConfig;
use crate::protocols::events::PageEvents;
use crate::protocols::host::HostTransport;
use crate::runtime::registry::{CallbackPair, CallbackRegistry, CallbackSpec};
use crate::runtime::republish::install_republishers;

/// Page-side bridge to the native host.
///
/// Cheap to clone: clones share the same registry and transport, so a clone
/// can be moved into spawned tasks and event listeners.
#[derive(Clone)]
pub struct Bridge {
    /// Callback pairs keyed by operation
    registry: Arc<CallbackRegistry>,
    /// Host named-handler RPC
    transport: Arc<dyn HostTransport>,
    /// Handler/event names and toggles
    config: Arc<BridgeConfig>,
}

impl Bridge {
    /// Create a new Bridge.
    ///
    /// # Arguments
    /// * `transport` - The host's named-handler RPC
    /// * `config` - Handler/event names and toggles (validated here)
    ///
    /// # Errors
    /// * `BridgeError::InvalidInput` - If the configuration fails validation
    pub fn new(
        transport: Arc<dyn HostTransport>,
        config: BridgeConfig,
    ) -> Result<Self, BridgeError> {
        config.validate()?;
        log::debug!("Initializing Bridge");
        Ok(Self {
            registry: Arc::new(CallbackRegistry::new()),
            transport,
            config: Arc::new(config),
        })
    }

    /// Create a Bridge with the default configuration.
    pub fn with_defaults(transport: Arc<dyn HostTransport>) -> Self {
        Self {
            registry: Arc::new(CallbackRegistry::new()),
            transport,
            config: Arc::new(BridgeConfig::default()),
        }
    }

    /// The callback registry backing this bridge.
    pub fn registry(&self) -> &CallbackRegistry {
        &self.registry
    }

    /// The active configuration.
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Validate and register one callback spec. See `CallbackRegistry::register_callback`.
    pub fn register_callback(
        &self,
        key: OperationKey,
        spec: CallbackSpec,
    ) -> Result<(), BridgeError> {
        self.registry.register_callback(key, spec)
    }

    /// Register a batch of callback specs; invalid ones are logged and skipped.
    ///
    /// # Returns
    /// The number of pairs accepted.
    pub fn initiate<I>(&self, config: I) -> usize
    where
        I: IntoIterator<Item = (OperationKey, CallbackSpec)>,
    {
        self.registry.initiate(config)
    }

    /// Deliver an outcome to every pair under `key`.
    pub fn dispatch(&self, key: OperationKey, outcome: Outcome) -> usize {
        self.registry.dispatch(key, outcome)
    }

    /// Call a host handler and classify what came back.
    ///
    /// # Arguments
    /// * `handler` - Host handler name
    /// * `payload` - Optional argument for the handler
    /// * `required_field` - Field the resolved object must carry (truthy)
    ///
    /// # Returns
    /// * `Ok(Payload)` - The host's native value
    /// * `Err(BridgeError::EmptyResponse)` - Host resolved with null
    /// * `Err(BridgeError::MissingRequiredField)` - Required field absent or falsy
    /// * `Err(_)` - The host's rejection, unchanged
    pub async fn call_host(
        &self,
        handler: &str,
        payload: Option<Payload>,
        required_field: Option<&str>,
    ) -> Result<Payload, BridgeError> {
        let call_id: CallId = Uuid::new_v4().to_string();
        log::debug!("Calling host handler: call_id={call_id}, handler={handler}");

        let result = match self.transport.call_handler(handler, payload).await {
            Ok(result) => result,
            Err(e) => {
                log::error!("Host handler failed: call_id={call_id}, handler={handler}, error={e}");
                return Err(e);
            }
        };

        if result.is_null() {
            log::warn!("No response received from host: call_id={call_id}, handler={handler}");
            return Err(BridgeError::EmptyResponse {
                handler: handler.to_string(),
            });
        }

        if let Some(field) = required_field {
            if !result.get(field).is_some_and(is_truthy) {
                log::warn!(
                    "Host response missing required field: call_id={call_id}, handler={handler}, field={field}"
                );
                return Err(BridgeError::MissingRequiredField {
                    handler: handler.to_string(),
                    field: field.to_string(),
                });
            }
        }

        log::debug!("Host handler resolved: call_id={call_id}, handler={handler}");
        Ok(result)
    }

    /// Call a host handler and route the result to the callbacks under `key`.
    ///
    /// Success callbacks receive the host's native value. Null responses,
    /// missing required fields and rejections go to the fail callbacks.
    ///
    /// # Returns
    /// The outcome that was dispatched.
    pub async fn request_then_dispatch(
        &self,
        handler: &str,
        key: OperationKey,
        payload: Option<Payload>,
        required_field: Option<&str>,
    ) -> Outcome {
        let outcome = match self.call_host(handler, payload, required_field).await {
            Ok(result) => Outcome::Success(result),
            Err(e) => Outcome::Fail(e),
        };
        self.registry.dispatch(key, outcome.clone());
        outcome
    }

    /// Call a host handler and route the result to a one-shot pair only.
    ///
    /// Used by the `get_*` operations, whose callbacks are supplied per call
    /// rather than registered.
    pub async fn request_then_invoke(
        &self,
        handler: &str,
        payload: Option<Payload>,
        pair: CallbackPair,
    ) -> Outcome {
        let outcome = match self.call_host(handler, payload, None).await {
            Ok(result) => Outcome::Success(result),
            Err(e) => Outcome::Fail(e),
        };
        if let Err(e) = pair.invoke(handler, outcome.clone()) {
            log::error!("{e}");
        }
        outcome
    }

    /// Subscribe to the host's push events.
    ///
    /// Each event's detail goes straight to the success callbacks of its key.
    /// Push events have no fail path and skip the required-field checks that
    /// host call responses get.
    pub fn setup_event_listeners(&self, events: &dyn PageEvents) {
        let routes = [
            (
                &self.config.push_events.sync_auth_code,
                OperationKey::SyncAuthCodeData,
            ),
            (
                &self.config.push_events.sync_trade_pay,
                OperationKey::SyncTradePayData,
            ),
            (
                &self.config.push_events.sync_user_consent,
                OperationKey::SyncUserConsentData,
            ),
        ];

        for (event, key) in routes {
            let registry = self.registry.clone();
            let event_name = event.clone();
            events.add_event_listener(
                event,
                Box::new(move |detail| {
                    log::debug!("Received push event: event={event_name}, key={key}");
                    registry.dispatch_success(key, detail);
                }),
            );
        }

        log::info!("Push event listeners installed");
    }

    /// Wire the bridge into the page: push listeners, plus the result
    /// re-publishers when `republish` is enabled.
    pub fn attach(&self, events: Arc<dyn PageEvents>) {
        self.setup_event_listeners(events.as_ref());
        if self.config.republish {
            install_republishers(&self.registry, events);
        }
    }
}

/// JavaScript truthiness of a JSON value.
fn is_truthy(value: &Payload) -> bool {
    match value {
        Payload::Null => false,
        Payload::Bool(b) => *b,
        Payload::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Payload::String(s) => !s.is_empty(),
        Payload::Array(_) | Payload::Object(_) => true,
    }
}

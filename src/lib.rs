//! Page-side bridge between a WebView page and its native host.
//!
//! The host exposes named handlers (`callHandler(name, payload)`) and pushes
//! notifications as page events. This crate keeps a registry of success/fail
//! callback pairs per operation, calls the host and routes each result to the
//! matching callbacks, and feeds host push events into the same registry.
//!
//! ```ignore
//! let bridge = Bridge::new(transport, BridgeConfig::default())?;
//! bridge.initiate([(
//!     OperationKey::SyncTradePayData,
//!     CallbackSpec::new()
//!         .on_success(|data| { log::info!("trade pay: {data}"); Ok(()) })
//!         .on_fail(|error| { log::error!("trade pay failed: {error}"); Ok(()) }),
//! )]);
//! bridge.attach(events);
//! bridge.spawn_sync(SyncOperation::TradePay);
//! ```

pub mod api;
pub mod commands;
pub mod config;
pub mod protocols;
pub mod runtime;

pub use api::types::{BridgeError, CallbackKind, OperationKey, Outcome, Payload};
pub use commands::SyncOperation;
pub use config::BridgeConfig;
pub use protocols::{EventListener, HostTransport, PageEvents};
pub use runtime::bridge::Bridge;
pub use runtime::event_target::LocalEventTarget;
pub use runtime::registry::{CallbackPair, CallbackRegistry, CallbackSpec};

//! HostTransport trait: page → native host call boundary.
//!
//! This trait defines how the bridge reaches the native handlers the WebView
//! host exposes (`callHandler(name, payload)` on the page side).
//!
//! Key design principle: The transport knows nothing about operation keys or
//! callbacks. It resolves one named call and hands the raw result back; the
//! bridge decides which callbacks see it.

use async_trait::async_trait;

use crate::api::types::{BridgeError, Payload};

/// Handler name: fetch an auth code for the supplied client data
pub const HANDLER_GET_AUTH_CODE: &str = "my.getAuthCode";

/// Handler name: pull the latest auth code result
pub const HANDLER_SYNC_AUTH_CODE: &str = "my.syncAuthCode";

/// Handler name: start a trade payment
pub const HANDLER_GET_TRADE_PAY: &str = "my.getTradePay";

/// Handler name: pull the latest trade payment result
pub const HANDLER_SYNC_TRADE_PAY: &str = "my.syncTradePay";

/// Handler name: request user consent (disabled unless configured)
pub const HANDLER_GET_USER_CONSENT: &str = "my.getUserConsent";

/// Handler name: pull the latest user consent result (disabled unless configured)
pub const HANDLER_SYNC_USER_CONSENT: &str = "my.syncUserConsent";

/// Abstract interface for the WebView host's named-handler RPC.
///
/// Implemented by whatever embeds the page (a wasm binding over
/// `window.flutter_inappwebview.callHandler`, a desktop shell, a test double).
///
/// # Contract
/// * `Ok(Payload::Null)` - the host resolved with null
/// * `Ok(value)` - the host resolved with a value
/// * `Err(BridgeError)` - the host rejected; implementations should use
///   `BridgeError::TransportRejection` so the bridge can forward it untouched
#[async_trait]
pub trait HostTransport: Send + Sync {
    /// Invoke the named host handler and await its result.
    ///
    /// # Arguments
    /// * `name` - Handler name (e.g., `my.syncTradePay`)
    /// * `payload` - Optional argument; `None` for handlers that take nothing
    async fn call_handler(&self, name: &str, payload: Option<Payload>)
        -> Result<Payload, BridgeError>;
}

//! PageEvents trait: host → page push notifications and page-level events.
//!
//! The host pushes data to the page by dispatching named custom events on the
//! document; the bridge both listens to those and re-emits its own results
//! as events for the rest of the page.

use crate::api::types::Payload;

/// Push event: the host has a fresh auth code result
pub const EVENT_SYNC_AUTH_CODE: &str = "SyncAuthCode";

/// Push event: the host has a fresh trade payment result
pub const EVENT_SYNC_TRADE_PAY: &str = "SyncTradePay";

/// Push event: the host has a fresh user consent result
pub const EVENT_SYNC_USER_CONSENT: &str = "SyncUserConsent";

/// Re-emitted event: trade pay sync succeeded (detail is JSON text)
pub const EVENT_SYNC_TRADE_PAY_DATA_SUCCESS: &str = "syncTradePayDataSuccess";

/// Re-emitted event: trade pay sync failed (detail is the serialized error)
pub const EVENT_SYNC_TRADE_PAY_DATA_FAIL: &str = "syncTradePayDataFail";

/// Re-emitted event: auth code sync succeeded (detail is JSON text)
pub const EVENT_SYNC_AUTH_CODE_DATA_SUCCESS: &str = "syncAuthCodeDataSuccess";

/// Re-emitted event: auth code sync failed (detail is the serialized error)
pub const EVENT_SYNC_AUTH_CODE_DATA_FAIL: &str = "syncAuthCodeDataFail";

/// Listener invoked with an event's detail payload.
pub type EventListener = Box<dyn Fn(Payload) + Send + Sync>;

/// Abstract interface for the page's event mechanism.
///
/// Implemented by a DOM binding in the page, or by `LocalEventTarget`
/// for in-process use.
pub trait PageEvents: Send + Sync {
    /// Subscribe to a named event. Listeners run in subscription order.
    fn add_event_listener(&self, event: &str, listener: EventListener);

    /// Dispatch a named event with the given detail to every listener.
    fn dispatch_event(&self, event: &str, detail: Payload);
}

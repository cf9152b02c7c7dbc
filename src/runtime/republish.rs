//! Result re-publication - sync results re-emitted as page events.
//!
//! Other scripts on the page listen for `syncTradePayDataSuccess` and friends
//! instead of registering callbacks. The detail of a success event is always
//! JSON text; this is the only place the bridge serializes a payload.

use std::sync::Arc;

use crate::api::types::{BridgeError, OperationKey, Payload};
use crate::protocols::events::{
    PageEvents, EVENT_SYNC_AUTH_CODE_DATA_FAIL, EVENT_SYNC_AUTH_CODE_DATA_SUCCESS,
    EVENT_SYNC_TRADE_PAY_DATA_FAIL, EVENT_SYNC_TRADE_PAY_DATA_SUCCESS,
};
use crate::runtime::registry::{CallbackPair, CallbackRegistry};

/// Keys that get re-published, with their success and fail event names.
const REPUBLISHED: [(OperationKey, &str, &str); 2] = [
    (
        OperationKey::SyncTradePayData,
        EVENT_SYNC_TRADE_PAY_DATA_SUCCESS,
        EVENT_SYNC_TRADE_PAY_DATA_FAIL,
    ),
    (
        OperationKey::SyncAuthCodeData,
        EVENT_SYNC_AUTH_CODE_DATA_SUCCESS,
        EVENT_SYNC_AUTH_CODE_DATA_FAIL,
    ),
];

/// Serialize a result for re-publication.
///
/// A string holding JSON is parsed first so it is not double-encoded; a
/// string that does not parse is used as-is.
pub fn serialize_detail(data: &Payload) -> Result<String, BridgeError> {
    let parsed = match data {
        Payload::String(text) => match serde_json::from_str::<Payload>(text) {
            Ok(parsed) => parsed,
            Err(e) => {
                log::debug!("Detail is not JSON text, using raw value: {e}");
                data.clone()
            }
        },
        other => other.clone(),
    };
    Ok(serde_json::to_string(&parsed)?)
}

/// Register a pair on each re-published key that emits its result as a page event.
pub fn install_republishers(registry: &CallbackRegistry, events: Arc<dyn PageEvents>) {
    for (key, success_event, fail_event) in REPUBLISHED {
        let on_success = events.clone();
        let on_fail = events.clone();
        registry.register_pair(
            key,
            CallbackPair::new(
                move |data| {
                    let detail = serialize_detail(&data)?;
                    log::debug!("Re-publishing result: event={success_event}, key={key}");
                    on_success.dispatch_event(success_event, Payload::String(detail));
                    Ok(())
                },
                move |error| {
                    log::error!("Failed to sync {key}: {error}");
                    let detail = serde_json::to_value(&error)
                        .unwrap_or_else(|_| Payload::String(error.to_string()));
                    on_fail.dispatch_event(fail_event, detail);
                    Ok(())
                },
            ),
        );
    }
    log::info!("Result re-publishers installed");
}

//! LocalEventTarget - in-process implementation of `PageEvents`.
//!
//! Stands in for the document when the bridge runs outside a page (native
//! shells, tests). Listeners run synchronously, in subscription order.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, PoisonError, RwLock};

use crate::api::types::Payload;
use crate::protocols::events::{EventListener, PageEvents};
use crate::runtime::registry::panic_message;

/// Listener map keyed by event name.
#[derive(Default)]
pub struct LocalEventTarget {
    listeners: RwLock<HashMap<String, Vec<Arc<EventListener>>>>,
}

impl LocalEventTarget {
    /// Creates a target with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of listeners subscribed to `event`.
    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(event)
            .map_or(0, Vec::len)
    }
}

impl PageEvents for LocalEventTarget {
    fn add_event_listener(&self, event: &str, listener: EventListener) {
        let mut listeners = self
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        listeners
            .entry(event.to_string())
            .or_default()
            .push(Arc::new(listener));
        log::debug!("Event listener added: event={event}");
    }

    fn dispatch_event(&self, event: &str, detail: Payload) {
        let listeners = {
            let listeners = self
                .listeners
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            listeners.get(event).cloned().unwrap_or_default()
        };

        if listeners.is_empty() {
            log::trace!("Event dropped, no listeners: event={event}");
            return;
        }

        for listener in listeners {
            let detail = detail.clone();
            if let Err(panic) = catch_unwind(AssertUnwindSafe(|| (**listener)(detail))) {
                log::error!(
                    "Event listener panicked: event={event}, error={}",
                    panic_message(panic.as_ref())
                );
            }
        }
    }
}

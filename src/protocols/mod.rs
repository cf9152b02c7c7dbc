//! Protocol layer - abstractions for talking to the WebView host.
//!
//! This module provides:
//! - `HostTransport` trait: page → host named-handler calls
//! - `PageEvents` trait: host → page push events and page-level re-emission
//!
//! Key design principle: The protocol layer does NOT hold callbacks or
//! operation keys. Routing results to callbacks is the runtime's job.

pub mod events;
pub mod host;

pub use events::{EventListener, PageEvents};
pub use host::HostTransport;

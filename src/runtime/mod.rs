//! Runtime modules for callback routing.
//!
//! The runtime domain owns the product-level concepts: the callback
//! registry, the bridge that feeds it, and the page-side event plumbing.

pub mod bridge;
pub mod event_target;
pub mod registry;
pub mod republish;

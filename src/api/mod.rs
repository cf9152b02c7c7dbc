//! API layer - types shared between the page, the registry and the host.
//!
//! Keeps the page-facing surface free of transport details.

pub mod types;

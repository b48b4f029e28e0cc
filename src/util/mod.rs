//! Utility helpers shared across the client.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser/environment concerns (storage, console
//! logging) so the store and request client stay testable natively.

pub mod logging;
pub mod storage;

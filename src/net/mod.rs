//! Networking modules for the REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` builds requests and normalizes the response envelope, `transport`
//! performs the HTTP exchange, and `types` defines the wire schema.

pub mod api;
pub mod transport;
pub mod types;

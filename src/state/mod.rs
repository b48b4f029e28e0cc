//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! State is split by domain so consumers depend on small focused models.
//! `auth` is currently the only domain.

pub mod auth;

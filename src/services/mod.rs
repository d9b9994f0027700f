//! Domain services used by HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own validation and business rules so route handlers can
//! stay focused on request decoding and status mapping.

pub mod chat;
pub mod completion;
pub mod users;

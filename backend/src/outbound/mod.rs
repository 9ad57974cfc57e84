//! Outbound adapters implementing domain ports.
//!
//! Adapters are thin translators between domain types and their backing
//! storage. They contain no business logic.

pub mod memory;

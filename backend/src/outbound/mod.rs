//! Outbound adapters implementing domain ports.
//!
//! - **memory**: in-process storage backing every scheduling port, used by
//!   tests and embedders that bring no database of their own.
//!
//! Adapters are thin translators between domain types and their storage
//! representation. They contain no business logic.

pub mod memory;

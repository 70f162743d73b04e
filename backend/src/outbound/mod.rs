//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **kv_store**: the partitioned key-value store interface and its
//!   in-memory implementation.
//! - **persistence**: session repository and history ledger adapters over
//!   any key-value store.
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod kv_store;
pub mod persistence;

//! Persistence adapters over the key-value store interface.
//!
//! Adapters are thin translators between domain values and stored records.
//! Records (`records.rs`) are internal; the domain only ever sees
//! aggregates, ledger entries, and port errors.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use booking::outbound::kv_store::InMemoryKeyValueStore;
//! use booking::outbound::persistence::{KvHistoryLedger, KvSessionRepository};
//!
//! let store = Arc::new(InMemoryKeyValueStore::new());
//! let sessions = KvSessionRepository::new(Arc::clone(&store), "sessions");
//! let history = KvHistoryLedger::new(store, "session-history");
//! # let _ = (sessions, history);
//! ```

mod kv_history_ledger;
mod kv_session_repository;
mod records;

pub use kv_history_ledger::KvHistoryLedger;
pub use kv_session_repository::KvSessionRepository;

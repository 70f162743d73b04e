//! Session booking engine.
//!
//! Members reserve seats in capacity-limited sessions and cancel them later.
//! Seat counts stay within capacity under any amount of concurrency because
//! every roster change is a single conditional write against the store.
//! Each committed change is mirrored into a per-member history ledger that
//! can be browsed with opaque cursors.

pub mod config;
pub mod domain;
pub mod outbound;

pub use config::BookingSettings;

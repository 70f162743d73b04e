//! Domain ports defining the edges of the hexagon.
//!
//! Driven ports (`SessionRepository`, `HistoryLedger`) are implemented by
//! outbound adapters. Driving ports (`BookingCommand`, `ScheduleQuery`,
//! `SessionAdminCommand`) are implemented by domain services.

mod macros;
pub(crate) use macros::define_port_error;

mod booking_command;
mod history_ledger;
mod schedule_query;
mod session_admin_command;
mod session_repository;

pub use booking_command::{
    BookingCommand, CancelRequest, CancelResponse, HistorySync, ReserveRequest, ReserveResponse,
};
#[cfg(test)]
pub use history_ledger::MockHistoryLedger;
pub use history_ledger::{FixtureHistoryLedger, HistoryLedger, HistoryLedgerError};
pub use schedule_query::{ListHistoryRequest, ListHistoryResponse, ScheduleQuery, WeekSchedule};
pub use session_admin_command::SessionAdminCommand;
#[cfg(test)]
pub use session_repository::MockSessionRepository;
pub use session_repository::{
    FixtureSessionRepository, SessionRepository, SessionRepositoryError,
};

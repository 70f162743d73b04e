//! Booking configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `BOOKING_*` environment variables, and
//! configuration files, in OrthoConfig's usual precedence.

use ortho_config::OrthoConfig;
use pagination::{PageLimit, PageLimitError};
use serde::Deserialize;

const DEFAULT_SESSIONS_TABLE: &str = "sessions";
const DEFAULT_HISTORY_TABLE: &str = "session-history";

/// Configuration for the booking stores and history listings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BOOKING")]
pub struct BookingSettings {
    /// Table holding sessions.
    pub sessions_table: Option<String>,
    /// Table holding booking history entries.
    pub history_table: Option<String>,
    /// Page size used when a history request does not name one.
    pub history_page_size: Option<u32>,
}

impl BookingSettings {
    /// Return the sessions table, falling back to the default.
    pub fn sessions_table(&self) -> &str {
        self.sessions_table
            .as_deref()
            .unwrap_or(DEFAULT_SESSIONS_TABLE)
    }

    /// Return the history table, falling back to the default.
    pub fn history_table(&self) -> &str {
        self.history_table
            .as_deref()
            .unwrap_or(DEFAULT_HISTORY_TABLE)
    }

    /// Return the default history page size.
    ///
    /// # Errors
    ///
    /// Returns [`PageLimitError`] when the configured size is zero or above
    /// [`PageLimit::MAX`].
    pub fn history_page_size(&self) -> Result<PageLimit, PageLimitError> {
        PageLimit::resolve(self.history_page_size, PageLimit::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for booking configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    fn load_from_empty_args() -> BookingSettings {
        BookingSettings::load_from_iter([OsString::from("booking")])
            .expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env([
            ("BOOKING_SESSIONS_TABLE", None::<String>),
            ("BOOKING_HISTORY_TABLE", None::<String>),
            ("BOOKING_HISTORY_PAGE_SIZE", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.sessions_table(), DEFAULT_SESSIONS_TABLE);
        assert_eq!(settings.history_table(), DEFAULT_HISTORY_TABLE);
        assert_eq!(settings.history_page_size(), Ok(PageLimit::DEFAULT));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("BOOKING_SESSIONS_TABLE", Some("gym-sessions".to_owned())),
            ("BOOKING_HISTORY_TABLE", Some("gym-history".to_owned())),
            ("BOOKING_HISTORY_PAGE_SIZE", Some("25".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.sessions_table(), "gym-sessions");
        assert_eq!(settings.history_table(), "gym-history");
        assert_eq!(settings.history_page_size().map(PageLimit::get), Ok(25));
    }

    #[rstest]
    fn out_of_range_page_sizes_are_reported() {
        let _guard = lock_env([
            ("BOOKING_SESSIONS_TABLE", None::<String>),
            ("BOOKING_HISTORY_TABLE", None::<String>),
            ("BOOKING_HISTORY_PAGE_SIZE", Some("0".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.history_page_size(), Err(PageLimitError::Zero));
    }
}

//! # Raise-My-Hand Notification Library (rmh-notify)
//!
//! Store-facing half of the raise-hand / safety-signal core. Persists the
//! nested settings records in the session's sqlite key-value settings table,
//! migrates flat legacy settings into the nested schema exactly once per
//! era, and dispatches hand / X-Card events to connected participants over
//! the shared [`rmh_common::SignalBus`].
//!
//! The library is embedded by a host session; it exposes no transport or UI
//! of its own. Hosts construct a [`HandNotifier`] with a database pool and a
//! bus, run [`migrate_settings_if_needed`] once at startup, and feed input
//! events in as they arrive.

pub mod db;
pub mod error;
pub mod legacy;
pub mod migrate;
pub mod notifier;
pub mod stream;

pub use error::{Error, Result};
pub use migrate::{migrate_settings_if_needed, MigrationOutcome, CURRENT_SETTINGS_ERA};
pub use notifier::HandNotifier;

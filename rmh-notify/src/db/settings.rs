//! Settings store access
//!
//! Read/write the module's settings in the session's key-value settings
//! table. All keys live under the `raise-my-hand.` namespace so the table
//! can be shared with the host and other modules.
//!
//! Typed getters re-normalize on every read: a record written around the
//! library (or corrupted in place) is cleaned to a valid shape before any
//! caller sees it, and a missing record reads as the built-in defaults.
//! Nothing is written at registration time — the store stays empty until an
//! explicit update or a migration runs.

use rmh_common::{HandSettings, XCardSettings};
use serde_json::Value;
use sqlx::{Pool, Sqlite};
use tracing::warn;

use crate::error::Result;

/// Namespace prefix for every key this library owns.
pub const SETTINGS_NAMESPACE: &str = "raise-my-hand";

/// Era marker written by the migration orchestrator.
pub(crate) const ERA_KEY: &str = "settings-era";

/// Era assumed when no marker is stored: the first release predates the era
/// system.
pub(crate) const IMPLICIT_FIRST_ERA: &str = "1";

pub(crate) fn scoped_key(key: &str) -> String {
    format!("{SETTINGS_NAMESPACE}.{key}")
}

/// Raw getter for a namespaced key. Returns None if the key is absent.
pub async fn get_raw_setting(pool: &Pool<Sqlite>, key: &str) -> Result<Option<String>> {
    let value: Option<String> = sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
        .bind(scoped_key(key))
        .fetch_optional(pool)
        .await?;
    Ok(value)
}

/// Raw setter for a namespaced key (upsert).
pub async fn set_raw_setting(pool: &Pool<Sqlite>, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO settings (key, value)
        VALUES (?, ?)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value
        "#,
    )
    .bind(scoped_key(key))
    .bind(value)
    .execute(pool)
    .await?;

    Ok(())
}

/// JSON getter. An unparsable stored value reads as absent — the caller
/// falls back to defaults rather than failing.
pub async fn get_json_setting(pool: &Pool<Sqlite>, key: &str) -> Result<Option<Value>> {
    match get_raw_setting(pool, key).await? {
        None => Ok(None),
        Some(text) => match serde_json::from_str(&text) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key, error = %e, "stored setting is not valid JSON, treating as absent");
                Ok(None)
            }
        },
    }
}

/// Load the hand settings record, normalized.
pub async fn get_hand_settings(pool: &Pool<Sqlite>) -> Result<HandSettings> {
    match get_json_setting(pool, "handSettings").await? {
        Some(candidate) => Ok(HandSettings::normalize(&candidate)),
        None => Ok(HandSettings::default()),
    }
}

/// Persist a validated hand settings record.
pub async fn save_hand_settings(pool: &Pool<Sqlite>, settings: &HandSettings) -> Result<()> {
    set_raw_setting(pool, "handSettings", &serde_json::to_string(settings)?).await
}

/// Load the X-Card settings record, normalized.
pub async fn get_xcard_settings(pool: &Pool<Sqlite>) -> Result<XCardSettings> {
    match get_json_setting(pool, "xCardSettings").await? {
        Some(candidate) => Ok(XCardSettings::normalize(&candidate)),
        None => Ok(XCardSettings::default()),
    }
}

/// Persist a validated X-Card settings record.
pub async fn save_xcard_settings(pool: &Pool<Sqlite>, settings: &XCardSettings) -> Result<()> {
    set_raw_setting(pool, "xCardSettings", &serde_json::to_string(settings)?).await
}

/// Stored settings era, defaulting to the implicit first era when absent.
pub async fn get_settings_era(pool: &Pool<Sqlite>) -> Result<String> {
    Ok(get_raw_setting(pool, ERA_KEY)
        .await?
        .unwrap_or_else(|| IMPLICIT_FIRST_ERA.to_string()))
}

pub async fn set_settings_era(pool: &Pool<Sqlite>, era: &str) -> Result<()> {
    set_raw_setting(pool, ERA_KEY, era).await
}

/// Notification timeout in seconds, clamped to [0, 60]. Default: 10.
pub async fn get_notification_timeout(pool: &Pool<Sqlite>) -> Result<u32> {
    match get_json_setting(pool, "notificationTimeout").await? {
        Some(value) => match value.as_i64() {
            Some(secs) => Ok(secs.clamp(0, 60) as u32),
            None => {
                warn!(value = %value, "notificationTimeout is not an integer, using default");
                Ok(10)
            }
        },
        None => Ok(10),
    }
}

pub async fn set_notification_timeout(pool: &Pool<Sqlite>, seconds: u32) -> Result<()> {
    let clamped = seconds.min(60);
    set_raw_setting(pool, "notificationTimeout", &clamped.to_string()).await
}

//! Database initialization

use crate::error::Result;
use sqlx::{Pool, Sqlite};
use tracing::debug;

/// Create the settings table if the session store does not have one yet.
///
/// The table is shared with the host; keys written by this library are
/// namespaced, so creation here is safe on an existing store.
pub async fn ensure_settings_table(pool: &Pool<Sqlite>) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    debug!("settings table ready");
    Ok(())
}

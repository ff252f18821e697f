//! Hand / X-Card event handling service
//!
//! Glue between the settings store, the decision logic, and the broadcast
//! bus. The store and bus handles are constructor arguments — nothing here
//! reads process-wide state — and settings are re-read from the store on
//! every event, so a configuration change is picked up by the very next
//! raise without coordination.

use rmh_common::dispatch::{hand_broadcast, xcard_broadcast};
use rmh_common::{HandEvent, HandSettings, SignalBus, SignalEvent, XCardSettings};
use serde_json::Value;
use sqlx::{Pool, Sqlite};
use tracing::debug;
use uuid::Uuid;

use crate::db::settings::{
    get_hand_settings, get_xcard_settings, save_hand_settings, save_xcard_settings,
};
use crate::error::Result;

/// Dispatches session events to connected participants.
pub struct HandNotifier {
    pool: Pool<Sqlite>,
    bus: SignalBus,
}

impl HandNotifier {
    pub fn new(pool: Pool<Sqlite>, bus: SignalBus) -> Self {
        Self { pool, bus }
    }

    /// The broadcast bus participants subscribe to.
    pub fn bus(&self) -> &SignalBus {
        &self.bus
    }

    /// Handle a raise/lower event: load the persisted settings, resolve the
    /// active channels, and broadcast the payload. Fire-and-forget — a
    /// session with no listeners is not an error.
    pub async fn handle_hand_event(&self, event: HandEvent) -> Result<()> {
        let settings = get_hand_settings(&self.pool).await?;
        self.bus.emit_lossy(hand_broadcast(&settings, event));
        Ok(())
    }

    /// Handle an X-Card trigger. Dropped silently while the feature is
    /// disabled; when the warning is anonymous the payload carries no
    /// identity at all.
    pub async fn handle_xcard(&self, triggered_by: Uuid) -> Result<()> {
        let settings = get_xcard_settings(&self.pool).await?;
        match xcard_broadcast(&settings, triggered_by) {
            Some(payload) => self.bus.emit_lossy(payload),
            None => debug!("x-card triggered while disabled, dropping"),
        }
        Ok(())
    }

    /// Normalize and persist a hand settings candidate.
    ///
    /// Returns the record as persisted. When the new mode is no longer a
    /// toggle, every participant is told to clear their player-list icons
    /// so nobody is left with a stuck hand.
    pub async fn update_hand_settings(&self, candidate: &Value) -> Result<HandSettings> {
        let settings = HandSettings::normalize(candidate);
        save_hand_settings(&self.pool, &settings).await?;

        if !settings.general.is_toggle {
            self.bus.emit_lossy(SignalEvent::PlayerListCleared {
                timestamp: chrono::Utc::now(),
            });
        }

        Ok(settings)
    }

    /// Normalize and persist an X-Card settings candidate.
    pub async fn update_xcard_settings(&self, candidate: &Value) -> Result<XCardSettings> {
        let settings = XCardSettings::normalize(candidate);
        save_xcard_settings(&self.pool, &settings).await?;
        Ok(settings)
    }
}

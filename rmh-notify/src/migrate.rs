//! One-time settings migration
//!
//! Earlier releases stored every option as its own flat key; the current
//! era stores two nested records plus an era marker. Migration runs once
//! per store: extract whatever flat keys remain, map them into candidate
//! records, normalize, persist, and stamp the era. The era check makes
//! concurrent or repeated runs converge on the same final state.

use rmh_common::era::is_newer_version;
use rmh_common::{HandSettings, XCardSettings};
use serde_json::{json, Value};
use sqlx::{Pool, Sqlite};
use tracing::{debug, info};

use crate::db::settings::{
    get_settings_era, save_hand_settings, save_xcard_settings, set_settings_era,
    SETTINGS_NAMESPACE,
};
use crate::error::Result;
use crate::legacy::{extract_legacy_settings, LegacyFlatSettings};

/// Era written by this release. Bump when the persisted shape changes.
pub const CURRENT_SETTINGS_ERA: &str = "2";

/// Built-in bell sound path from the flat-settings era. A stored sound path
/// equal to this sentinel means "never customized".
const DEFAULT_BELL_SOUND: &str = "modules/raise-my-hand/assets/bell01.ogg";

/// Built-in hand image path from the flat-settings era.
const DEFAULT_HAND_IMAGE: &str = "modules/raise-my-hand/assets/hand.svg";

/// How a migration run concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// Stored era is current; nothing was touched.
    UpToDate,
    /// No legacy keys existed; only the era marker was written.
    FreshInstall,
    /// Legacy keys were mapped and both records persisted.
    Migrated {
        /// Number of flat keys found in the legacy store.
        legacy_keys: usize,
    },
}

/// Map flat legacy settings into candidate values for both nested records.
///
/// Pure and total: any mapping, including an empty one, produces a
/// candidate pair. Candidates are *not* yet valid — range and enumeration
/// enforcement belongs to `normalize`, which the orchestrator applies
/// before persisting.
pub fn map_legacy_settings(legacy: &LegacyFlatSettings) -> (Value, Value) {
    // Channel set: each legacy display flag contributes one mode.
    let mut modes: Vec<&str> = Vec::new();
    if legacy.flag_or("showEmojiIndicator", true) {
        modes.push("playerList");
    }
    if legacy.truthy("showDialogMessage") {
        modes.push("popout");
    }
    if legacy.flag_or("playSound", true) {
        modes.push("aural");
    }
    if legacy.truthy("showUiNotification") {
        modes.push("ui");
    }
    if legacy.truthy("showUiChatMessage") {
        modes.push("chat");
    }

    // A sound path counts as custom only when it is present, non-empty, and
    // not the built-in default. A user who deliberately re-enters the
    // default path is indistinguishable from one who never changed it.
    let warning_path = legacy.string_opt("warningsoundpath");
    let custom_sound = warning_path.is_some_and(|p| !p.is_empty() && p != DEFAULT_BELL_SOUND);

    let image_in_chat = legacy.truthy("showImageChatMessage");
    let user_art = legacy.truthy("chatMessageImageUserArt");

    let chat_path = legacy.string_opt("chatimagepath");
    let custom_chat_path = chat_path.is_some_and(|p| !p.is_empty() && p != DEFAULT_HAND_IMAGE);

    let hand = json!({
        "general": {
            "isToggle": legacy.flag_or("handToogleBehavior", true),
            "notificationModes": modes,
        },
        // Both fields are new in this era; no legacy equivalent exists.
        "playerList": {
            "scope": "all-players",
            "holdTime": 10,
        },
        "aural": {
            "scope": if legacy.truthy("playSoundGMOnly") { "gm-only" } else { "all-players" },
            "source": if custom_sound { "custom" } else { "default" },
            "overridePath": if custom_sound { warning_path.unwrap_or("") } else { "" },
            "soundVolume": volume_percentage(legacy.number_or("warningsoundvolume", 0.65)),
        },
        "popout": {
            "scope": "all-players",
            "source": if !image_in_chat {
                "default"
            } else if user_art {
                "avatar"
            } else {
                "custom"
            },
            "overridePath": chat_path.unwrap_or(""),
        },
        "ui": {
            "scope": if legacy.truthy("showUiNotificationOnlyToGM") { "gm-only" } else { "all-players" },
            "permanent": legacy.flag_or("makeUiNotificationPermanent", false),
        },
        "chat": {
            "scope": if legacy.truthy("showUiChatMessageOnlyForGM") { "gm-only" } else { "all-players" },
            "source": if !image_in_chat {
                "none"
            } else if user_art {
                "avatar"
            } else {
                "custom"
            },
            "overridePath": if custom_chat_path { chat_path.unwrap_or("") } else { "" },
            // Validator owns the [20, 100] range; pass the raw value through.
            "widthPercentage": legacy.value_or("chatimagewidth", json!(85)),
        },
    });

    let xcard = json!({
        "isEnabled": legacy.flag_or("xcard", false),
        "scope": if legacy.truthy("xcardgmonly") { "gm-only" } else { "all-players" },
        "anonymousWarning": legacy.flag_or("xcardAnonymousMode", false),
        "source": if legacy.flag_or("xcardsound", true) { "default" } else { "none" },
        "soundVolume": volume_percentage(legacy.number_or("xcardsoundvolume", 0.55)),
    });

    (hand, xcard)
}

/// Convert a legacy fractional volume to an integer percentage, floored at
/// 1 so a migrated channel is never completely muted.
fn volume_percentage(volume: f64) -> i64 {
    ((volume * 100.0).round() as i64).max(1)
}

/// Run the settings migration if the stored era is older than
/// [`CURRENT_SETTINGS_ERA`].
///
/// Sequence: era check → extract → map → normalize → persist. The two data
/// records are written concurrently; the era marker is written last, only
/// after both succeed, so a partial failure leaves the marker old and a
/// later run picks the migration up again instead of skipping stale data.
///
/// Safe to re-run and safe to race: a second invocation either observes the
/// updated marker and becomes a no-op, or reproduces the identical final
/// state from the same legacy keys.
pub async fn migrate_settings_if_needed(pool: &Pool<Sqlite>) -> Result<MigrationOutcome> {
    let stored_era = get_settings_era(pool).await?;
    if !is_newer_version(CURRENT_SETTINGS_ERA, &stored_era) {
        debug!(era = %stored_era, "settings already at current era");
        return Ok(MigrationOutcome::UpToDate);
    }

    info!(from = %stored_era, to = CURRENT_SETTINGS_ERA, "migrating settings");

    let legacy = extract_legacy_settings(pool, SETTINGS_NAMESPACE).await?;
    if legacy.is_empty() {
        set_settings_era(pool, CURRENT_SETTINGS_ERA).await?;
        info!("no settings to migrate");
        return Ok(MigrationOutcome::FreshInstall);
    }

    info!(count = legacy.len(), "migrating legacy settings");

    let (hand_candidate, xcard_candidate) = map_legacy_settings(&legacy);
    let hand = HandSettings::normalize(&hand_candidate);
    let xcard = XCardSettings::normalize(&xcard_candidate);

    tokio::try_join!(
        save_hand_settings(pool, &hand),
        save_xcard_settings(pool, &xcard),
    )?;
    set_settings_era(pool, CURRENT_SETTINGS_ERA).await?;

    info!("settings migration complete");
    Ok(MigrationOutcome::Migrated {
        legacy_keys: legacy.len(),
    })
}

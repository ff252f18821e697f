//! Hand notification settings record

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::value::{bool_field, clamped_int_field, enum_field, section, string_field};
use super::{NotificationMode, Scope};

/// Sound source for the aural channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuralSource {
    /// Built-in bell sound.
    Default,
    /// User-provided sound file, resolved via `override_path`.
    Custom,
}

impl Default for AuralSource {
    fn default() -> Self {
        AuralSource::Default
    }
}

/// Image source for the popup channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PopoutSource {
    /// Built-in hand image.
    Default,
    /// The raising user's avatar.
    Avatar,
    /// User-provided image, resolved via `override_path`.
    Custom,
}

impl Default for PopoutSource {
    fn default() -> Self {
        PopoutSource::Default
    }
}

/// Image source for the chat-message channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatSource {
    /// Text-only chat message, no image.
    None,
    /// The raising user's avatar.
    Avatar,
    /// User-provided image, resolved via `override_path`.
    Custom,
}

impl Default for ChatSource {
    fn default() -> Self {
        ChatSource::None
    }
}

/// Behavior shared by all channels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralSettings {
    /// Whether the hand control is a raise/lower toggle or a one-shot button.
    pub is_toggle: bool,
    /// Which presentation channels fire on a hand event. Canonical set:
    /// deduplicated, order-independent.
    pub notification_modes: BTreeSet<NotificationMode>,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            is_toggle: true,
            notification_modes: BTreeSet::from([
                NotificationMode::PlayerList,
                NotificationMode::Aural,
            ]),
        }
    }
}

/// Player-list icon channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerListSettings {
    pub scope: Scope,
    /// Seconds the icon stays visible after a one-shot raise.
    pub hold_time: u32,
}

impl Default for PlayerListSettings {
    fn default() -> Self {
        Self {
            scope: Scope::AllPlayers,
            hold_time: 10,
        }
    }
}

/// Sound channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuralSettings {
    pub scope: Scope,
    pub source: AuralSource,
    /// Path to the custom sound. Non-empty exactly when `source` is custom.
    pub override_path: String,
    /// Playback volume percentage in [1, 100].
    pub sound_volume: u8,
}

impl Default for AuralSettings {
    fn default() -> Self {
        Self {
            scope: Scope::AllPlayers,
            source: AuralSource::Default,
            override_path: String::new(),
            sound_volume: 65,
        }
    }
}

/// Popup dialog channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopoutSettings {
    pub scope: Scope,
    pub source: PopoutSource,
    /// Image path, meaningful when `source` is custom.
    pub override_path: String,
}

impl Default for PopoutSettings {
    fn default() -> Self {
        Self {
            scope: Scope::AllPlayers,
            source: PopoutSource::Default,
            override_path: String::new(),
        }
    }
}

/// UI banner channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiSettings {
    pub scope: Scope,
    /// Keep the banner until dismissed instead of auto-expiring.
    pub permanent: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            scope: Scope::AllPlayers,
            permanent: false,
        }
    }
}

/// Chat-message channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSettings {
    pub scope: Scope,
    pub source: ChatSource,
    /// Image path, meaningful when `source` is custom.
    pub override_path: String,
    /// Image width as a percentage of the chat column, in [20, 100].
    pub width_percentage: u8,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            scope: Scope::AllPlayers,
            source: ChatSource::None,
            override_path: String::new(),
            width_percentage: 85,
        }
    }
}

/// Validated hand notification settings.
///
/// Construct with [`HandSettings::normalize`] (or `Default`). The record is
/// an immutable value; mutation goes back through `normalize` so the store
/// can never hold an invalid shape that survives a read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandSettings {
    pub general: GeneralSettings,
    pub player_list: PlayerListSettings,
    pub aural: AuralSettings,
    pub popout: PopoutSettings,
    pub ui: UiSettings,
    pub chat: ChatSettings,
}

impl HandSettings {
    /// Build a valid record from an untrusted candidate value.
    ///
    /// Total and infallible: every absent, mistyped, or out-of-range field
    /// is replaced by its documented default; integer fields are clamped
    /// into their closed interval; unrecognized enumeration values fall back
    /// to the field default. The aural record additionally enforces that a
    /// custom source carries a non-empty path (and only a custom source
    /// carries one at all).
    pub fn normalize(candidate: &Value) -> Self {
        let general = section(candidate, "general");
        let player_list = section(candidate, "playerList");
        let aural = section(candidate, "aural");
        let popout = section(candidate, "popout");
        let ui = section(candidate, "ui");
        let chat = section(candidate, "chat");

        let mut aural = AuralSettings {
            scope: enum_field(aural, "scope", Scope::AllPlayers),
            source: enum_field(aural, "source", AuralSource::Default),
            override_path: string_field(aural, "overridePath"),
            sound_volume: clamped_int_field(aural, "soundVolume", 1, 100, 65) as u8,
        };
        // Path required iff custom: a pathless custom source degrades to the
        // built-in sound, and a non-custom source holds no path.
        if aural.override_path.is_empty() {
            aural.source = AuralSource::Default;
        }
        if aural.source == AuralSource::Default {
            aural.override_path.clear();
        }

        Self {
            general: GeneralSettings {
                is_toggle: bool_field(general, "isToggle", true),
                notification_modes: mode_set_field(general, "notificationModes"),
            },
            player_list: PlayerListSettings {
                scope: enum_field(player_list, "scope", Scope::AllPlayers),
                hold_time: clamped_int_field(player_list, "holdTime", 0, u32::MAX as i64, 10)
                    as u32,
            },
            aural,
            popout: PopoutSettings {
                scope: enum_field(popout, "scope", Scope::AllPlayers),
                source: enum_field(popout, "source", PopoutSource::Default),
                override_path: string_field(popout, "overridePath"),
            },
            ui: UiSettings {
                scope: enum_field(ui, "scope", Scope::AllPlayers),
                permanent: bool_field(ui, "permanent", false),
            },
            chat: ChatSettings {
                scope: enum_field(chat, "scope", Scope::AllPlayers),
                source: enum_field(chat, "source", ChatSource::None),
                override_path: string_field(chat, "overridePath"),
                width_percentage: clamped_int_field(chat, "widthPercentage", 20, 100, 85) as u8,
            },
        }
    }
}

/// Clean a candidate notification-mode list into the canonical set.
///
/// Accepts any JSON array; null/false placeholders and unrecognized entries
/// are dropped. Anything that is not an array yields the default set.
fn mode_set_field(section: Option<&Value>, key: &str) -> BTreeSet<NotificationMode> {
    let default = GeneralSettings::default().notification_modes;
    match section.and_then(|s| s.get(key)) {
        None | Some(Value::Null) => default,
        Some(Value::Array(entries)) => entries
            .iter()
            .filter(|e| !matches!(e, Value::Null | Value::Bool(false)))
            .filter_map(|e| match serde_json::from_value::<NotificationMode>(e.clone()) {
                Ok(mode) => Some(mode),
                Err(_) => {
                    warn!(entry = %e, "unrecognized notification mode, dropping");
                    None
                }
            })
            .collect(),
        Some(other) => {
            warn!(field = key, value = %other, "expected array, using default modes");
            default
        }
    }
}

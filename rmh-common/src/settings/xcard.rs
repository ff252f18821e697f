//! X-Card safety interrupt settings record

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::value::{bool_field, clamped_int_field, enum_field};
use super::Scope;

/// Sound source for the X-Card broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum XCardSource {
    /// Built-in warning sound.
    Default,
    /// Silent interrupt.
    None,
}

impl Default for XCardSource {
    fn default() -> Self {
        XCardSource::Default
    }
}

/// Validated X-Card settings.
///
/// The X-Card is a single high-priority channel: enabled or not, visible to
/// everyone or the session owner only. `anonymous_warning` controls whether
/// the triggering identity is attached to the broadcast payload at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XCardSettings {
    pub is_enabled: bool,
    pub scope: Scope,
    pub anonymous_warning: bool,
    pub source: XCardSource,
    /// Playback volume percentage in [1, 100].
    pub sound_volume: u8,
}

impl Default for XCardSettings {
    fn default() -> Self {
        Self {
            is_enabled: false,
            scope: Scope::AllPlayers,
            anonymous_warning: false,
            source: XCardSource::Default,
            sound_volume: 55,
        }
    }
}

impl XCardSettings {
    /// Build a valid record from an untrusted candidate value.
    ///
    /// Same cleaning policy as [`crate::settings::HandSettings::normalize`]:
    /// absent or invalid fields take their documented defaults, integers are
    /// clamped, unknown enumeration values fall back.
    pub fn normalize(candidate: &Value) -> Self {
        // The record is flat; reuse the section helpers against the root.
        let root = candidate.is_object().then_some(candidate);

        Self {
            is_enabled: bool_field(root, "isEnabled", false),
            scope: enum_field(root, "scope", Scope::AllPlayers),
            anonymous_warning: bool_field(root, "anonymousWarning", false),
            source: enum_field(root, "source", XCardSource::Default),
            sound_volume: clamped_int_field(root, "soundVolume", 1, 100, 55) as u8,
        }
    }
}

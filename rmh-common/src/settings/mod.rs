//! Nested settings schema with permissive normalization
//!
//! The persisted configuration consists of two records: [`HandSettings`]
//! (raise/lower hand presentation) and [`XCardSettings`] (anonymous safety
//! interrupt). Both round-trip through the settings store as plain JSON and
//! are reconstructed through `normalize`, which substitutes documented
//! defaults for anything absent, mistyped, or out of range. Invalid data is
//! cleaned, never rejected — a bad store value can degrade presentation but
//! must not take the session down.

mod hand;
mod value;
mod xcard;

pub use hand::{
    AuralSettings, AuralSource, ChatSettings, ChatSource, GeneralSettings, HandSettings,
    PlayerListSettings, PopoutSettings, PopoutSource, UiSettings,
};
pub use xcard::{XCardSettings, XCardSource};

use serde::{Deserialize, Serialize};

/// Visibility policy for a notification channel.
///
/// Every channel carries its own scope; there is no global visibility switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scope {
    /// All connected participants see the notification.
    AllPlayers,
    /// Only the session owner (GM) sees the notification.
    GmOnly,
}

impl Default for Scope {
    fn default() -> Self {
        Scope::AllPlayers
    }
}

/// One presentation mode for a hand event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NotificationMode {
    /// Icon next to the user in the player list.
    PlayerList,
    /// Popup dialog shown to recipients.
    Popout,
    /// Sound played on recipients' clients.
    Aural,
    /// Transient (or permanent) UI banner.
    Ui,
    /// Message posted to the chat log.
    Chat,
}

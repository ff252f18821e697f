//! Channel-decision logic
//!
//! Pure functions over validated settings. Given a hand or X-Card event,
//! decide which presentation channels fire and at what visibility scope.
//! Stateless by design: the caller reads the persisted settings per event
//! and passes them in, so a settings change takes effect on the next event
//! without any cache invalidation here.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::events::{HandEvent, SignalEvent};
use crate::settings::{
    AuralSource, ChatSource, HandSettings, NotificationMode, PopoutSource, Scope, XCardSettings,
    XCardSource,
};

/// One active presentation channel with its visibility scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelDecision {
    pub channel: NotificationMode,
    pub scope: Scope,
}

/// Resolve the active channel set for a hand event.
///
/// The configured notification modes intersected with per-channel
/// usability; an unusable channel (custom source without a resolvable path)
/// is excluded silently rather than failing the broadcast. Scopes are read
/// per channel from the owning sub-record — there is no global scope.
pub fn active_channels(settings: &HandSettings) -> Vec<ChannelDecision> {
    settings
        .general
        .notification_modes
        .iter()
        .copied()
        .filter(|&mode| channel_usable(settings, mode))
        .map(|mode| ChannelDecision {
            channel: mode,
            scope: channel_scope(settings, mode),
        })
        .collect()
}

fn channel_usable(settings: &HandSettings, mode: NotificationMode) -> bool {
    match mode {
        NotificationMode::PlayerList | NotificationMode::Ui => true,
        NotificationMode::Aural => {
            settings.aural.source != AuralSource::Custom
                || !settings.aural.override_path.is_empty()
        }
        NotificationMode::Popout => {
            settings.popout.source != PopoutSource::Custom
                || !settings.popout.override_path.is_empty()
        }
        NotificationMode::Chat => {
            settings.chat.source != ChatSource::Custom || !settings.chat.override_path.is_empty()
        }
    }
}

fn channel_scope(settings: &HandSettings, mode: NotificationMode) -> Scope {
    match mode {
        NotificationMode::PlayerList => settings.player_list.scope,
        NotificationMode::Popout => settings.popout.scope,
        NotificationMode::Aural => settings.aural.scope,
        NotificationMode::Ui => settings.ui.scope,
        NotificationMode::Chat => settings.chat.scope,
    }
}

/// Build the broadcast payload for a raise/lower event.
pub fn hand_broadcast(settings: &HandSettings, event: HandEvent) -> SignalEvent {
    let channels = active_channels(settings);
    match event {
        HandEvent::Raised { user_id } => SignalEvent::HandRaised {
            user_id,
            channels,
            hold_time: settings.player_list.hold_time,
            timestamp: Utc::now(),
        },
        HandEvent::Lowered { user_id } => SignalEvent::HandLowered {
            user_id,
            channels,
            timestamp: Utc::now(),
        },
    }
}

/// Build the broadcast payload for an X-Card trigger.
///
/// Returns `None` while the feature is disabled. When the warning is
/// anonymous the triggering identity is left out of the payload entirely —
/// omitted, not blanked — so no receiver can recover it.
pub fn xcard_broadcast(settings: &XCardSettings, triggered_by: Uuid) -> Option<SignalEvent> {
    if !settings.is_enabled {
        return None;
    }

    Some(SignalEvent::XCardTriggered {
        triggered_by: (!settings.anonymous_warning).then_some(triggered_by),
        scope: settings.scope,
        play_sound: settings.source == XCardSource::Default,
        sound_volume: settings.sound_volume,
        timestamp: Utc::now(),
    })
}

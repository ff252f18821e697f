//! Event types and broadcast bus
//!
//! Input events arrive from the host session (keybinding, toolbar button,
//! context menu) as [`HandEvent`] values plus the X-Card trigger. Resolved
//! broadcast payloads go out to every connected participant as
//! [`SignalEvent`] values over the [`SignalBus`], a tokio broadcast wrapper.
//! Delivery is best effort: at most once per emit, unordered across
//! receivers, nothing buffered for participants who connect later.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::dispatch::ChannelDecision;
use crate::settings::Scope;

/// A discrete hand input event with its actor identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandEvent {
    /// The user raised their hand.
    Raised { user_id: Uuid },
    /// The user lowered their hand.
    Lowered { user_id: Uuid },
}

impl HandEvent {
    pub fn user_id(&self) -> Uuid {
        match self {
            HandEvent::Raised { user_id } | HandEvent::Lowered { user_id } => *user_id,
        }
    }
}

/// Broadcast payloads delivered to all connected participants.
///
/// Serialized with a `type` tag for host-side dispatch. Each hand payload
/// carries the resolved channel decisions so receiving clients render
/// without re-reading the settings store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SignalEvent {
    /// A hand was raised.
    HandRaised {
        user_id: Uuid,
        /// Active presentation channels, each with its own visibility scope.
        channels: Vec<ChannelDecision>,
        /// Seconds the player-list icon stays up after a one-shot raise.
        hold_time: u32,
        timestamp: DateTime<Utc>,
    },

    /// A previously raised hand was lowered.
    HandLowered {
        user_id: Uuid,
        channels: Vec<ChannelDecision>,
        timestamp: DateTime<Utc>,
    },

    /// The X-Card safety interrupt was triggered.
    ///
    /// `triggered_by` is omitted from the payload entirely when the warning
    /// is anonymous; receivers cannot recover the identity downstream.
    XCardTriggered {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        triggered_by: Option<Uuid>,
        scope: Scope,
        play_sound: bool,
        sound_volume: u8,
        timestamp: DateTime<Utc>,
    },

    /// All player-list hand icons should be cleared.
    ///
    /// Emitted when the hand control switches from toggle to one-shot mode,
    /// so no participant is left with a stuck icon.
    PlayerListCleared { timestamp: DateTime<Utc> },
}

/// Broadcast handle shared between the notifier and host subscribers.
///
/// Wraps `tokio::sync::broadcast`. Handed to collaborators as an explicit
/// constructor argument; there is no process-wide bus.
#[derive(Clone)]
pub struct SignalBus {
    tx: broadcast::Sender<SignalEvent>,
    capacity: usize,
}

impl SignalBus {
    /// Create a bus buffering up to `capacity` events per lagging receiver.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events. Events emitted before subscription
    /// are not replayed.
    pub fn subscribe(&self) -> broadcast::Receiver<SignalEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers.
    ///
    /// Returns `Ok(receiver_count)`, or `Err` when nobody is listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: SignalEvent,
    ) -> Result<usize, broadcast::error::SendError<SignalEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring the no-subscriber case.
    ///
    /// Notification dispatch is fire-and-forget; a session with no connected
    /// listeners is not an error.
    pub fn emit_lossy(&self, event: SignalEvent) {
        let _ = self.tx.send(event);
    }

    /// Current number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

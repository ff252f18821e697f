//! # Raise-My-Hand Common Library
//!
//! Shared code for the raise-hand / safety-signal notification core:
//! - Nested settings schema (HandSettings, XCardSettings) with permissive
//!   normalization of untrusted candidate data
//! - Settings-era comparison for one-time migration gating
//! - Broadcast event payload types and the SignalBus
//! - Pure channel-decision logic over validated settings

pub mod dispatch;
pub mod era;
pub mod events;
pub mod settings;

pub use dispatch::{active_channels, hand_broadcast, xcard_broadcast, ChannelDecision};
pub use events::{HandEvent, SignalBus, SignalEvent};
pub use settings::{HandSettings, NotificationMode, Scope, XCardSettings};

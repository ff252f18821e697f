//! Broadcast stream adapter
//!
//! Hosts that forward signals to connected clients over an SSE-style
//! transport want a `Stream`, not a raw broadcast receiver. The adapter
//! drops lag errors (a receiver that fell behind simply misses those
//! events, matching the best-effort delivery contract) and continues.

use futures::stream::{Stream, StreamExt};
use rmh_common::{SignalBus, SignalEvent};
use tokio_stream::wrappers::BroadcastStream;
use tracing::warn;

/// Subscribe to the bus as a stream of events.
pub fn subscribe_stream(bus: &SignalBus) -> impl Stream<Item = SignalEvent> {
    BroadcastStream::new(bus.subscribe()).filter_map(|result| async move {
        match result {
            Ok(event) => Some(event),
            Err(e) => {
                warn!(error = %e, "signal subscriber lagged, skipping missed events");
                None
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn stream_yields_emitted_events() {
        let bus = SignalBus::new(8);
        let mut stream = Box::pin(subscribe_stream(&bus));

        bus.emit_lossy(SignalEvent::PlayerListCleared {
            timestamp: Utc::now(),
        });

        match stream.next().await {
            Some(SignalEvent::PlayerListCleared { .. }) => {}
            other => panic!("unexpected stream item: {:?}", other),
        }
    }
}

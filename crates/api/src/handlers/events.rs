//! Server-Sent Events stream of registry events.

use std::convert::Infallible;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::state::AppState;

/// GET /api/v1/events
///
/// Streams every event published after the client connects. Each SSE frame
/// carries the bus sequence as `id`, the event name as `event`, and the
/// serialized [`PublishedEvent`](paycode_events::PublishedEvent) as `data`.
/// Clients that fall behind the bus buffer silently skip the lost events and
/// can detect the gap from the `id` sequence. The stream ends when the server
/// begins graceful shutdown.
pub async fn stream_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.event_bus.subscribe();
    let shutdown = state.shutdown.clone().cancelled_owned();

    let stream = futures::StreamExt::take_until(BroadcastStream::new(receiver), shutdown)
        .filter_map(|item| match item {
            Ok(published) => match Event::default()
                .id(published.sequence.to_string())
                .event(published.event.name())
                .json_data(&published)
            {
                Ok(frame) => Some(Ok::<_, Infallible>(frame)),
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        sequence = published.sequence,
                        "Failed to encode SSE frame"
                    );
                    None
                }
            },
            Err(BroadcastStreamRecvError::Lagged(n)) => {
                tracing::warn!(skipped = n, "SSE client lagged");
                None
            }
        });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

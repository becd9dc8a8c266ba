//! Subscription adapter.
//!
//! Turns a bus subscription plus a cancellation token into a lazy stream of
//! derived values.

use feed_core::{EventKind, FeedEvent};
use futures::stream::{self, BoxStream, StreamExt};
use tokio_util::sync::CancellationToken;

use super::bus::EventBus;
use super::subscription::Subscription;
use crate::error::TransformError;

/// Stream of values produced by [`attach`]
pub type Subscribed<R> = BoxStream<'static, R>;

/// Attach to `kind` on `bus` and map every event through `transform`
///
/// The subscription is registered immediately, so events published after
/// this call are seen even before the stream is first polled. `transform`
/// decides per event:
/// - `Ok(Some(value))` yields `value`
/// - `Ok(None)` skips the event
/// - `Err(_)` logs a warning and skips the event
///
/// Cancelling `cancel` releases the bus slot right away, whether or not the
/// stream is being polled, and ends the stream; cancellation wins over events
/// that are already queued. The stream is fused, so polling after the end
/// keeps returning `None`. Dropping the stream unsubscribes too.
pub fn attach<R, F>(
    bus: &EventBus,
    kind: EventKind,
    cancel: CancellationToken,
    transform: F,
) -> Subscribed<R>
where
    R: Send + 'static,
    F: FnMut(FeedEvent) -> Result<Option<R>, TransformError> + Send + 'static,
{
    let subscription = bus.subscribe_until(kind, cancel.clone());
    let id = subscription.id();

    tracing::debug!(subscription_id = id, kind = %kind, "Subscription stream attached");

    stream::unfold(
        (subscription, cancel, transform),
        |(mut subscription, cancel, mut transform)| async move {
            loop {
                let next = tokio::select! {
                    biased;
                    () = cancel.cancelled() => None,
                    event = subscription.recv() => event,
                };

                let Some(event) = next else {
                    finish(&mut subscription);
                    return None;
                };

                match transform(event) {
                    Ok(Some(value)) => return Some((value, (subscription, cancel, transform))),
                    Ok(None) => {}
                    Err(e) => {
                        tracing::warn!(
                            subscription_id = subscription.id(),
                            kind = %subscription.kind(),
                            error = %e,
                            "Dropping event that failed to transform"
                        );
                    }
                }
            }
        },
    )
    .fuse()
    .boxed()
}

fn finish(subscription: &mut Subscription) {
    subscription.unsubscribe();
    tracing::debug!(
        subscription_id = subscription.id(),
        kind = %subscription.kind(),
        "Subscription stream ended"
    );
}

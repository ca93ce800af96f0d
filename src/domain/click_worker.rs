//! Background worker that persists click counts.

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::LinkRepository;

/// Consumes click events until every sender is dropped.
///
/// Each event increments the link's `click_count` once. Failures are logged
/// and counted but never retried: click accounting is best-effort.
///
/// # Metrics
///
/// - `clicks_recorded_total` - increments persisted
/// - `clicks_failed_total` - increments that failed
pub async fn run_click_worker<L>(mut rx: mpsc::Receiver<ClickEvent>, links: Arc<L>)
where
    L: LinkRepository + ?Sized,
{
    while let Some(event) = rx.recv().await {
        match links.increment_clicks(event.link_id).await {
            Ok(()) => {
                metrics::counter!("clicks_recorded_total").increment(1);
                debug!(link_id = event.link_id, slug = %event.slug, "Click recorded");
            }
            Err(e) => {
                metrics::counter!("clicks_failed_total").increment(1);
                warn!(
                    link_id = event.link_id,
                    slug = %event.slug,
                    error = %e,
                    "Failed to record click"
                );
            }
        }
    }

    info!("Click worker stopped");
}

/// Queues a click without waiting.
///
/// Returns `false` when the event was dropped because the queue is full or
/// the worker is gone.
pub fn enqueue_click(sender: &mpsc::Sender<ClickEvent>, event: ClickEvent) -> bool {
    match sender.try_send(event) {
        Ok(()) => true,
        Err(e) => {
            metrics::counter!("clicks_dropped_total").increment(1);
            debug!(error = %e, "Click event dropped");
            false
        }
    }
}

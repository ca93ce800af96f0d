//! Click event model for asynchronous click accounting.

/// A successful redirect waiting to be counted.
///
/// Sent from the redirect handler to the background worker through a bounded
/// channel, so the redirect response never waits on the database write.
///
/// # Usage Flow
///
/// 1. Created in the redirect handler once the redirect response is built
/// 2. Sent to the channel with `try_send` (dropped if the queue is full)
/// 3. Processed by [`crate::domain::click_worker::run_click_worker`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub link_id: i64,
    pub slug: String,
}

impl ClickEvent {
    pub fn new(link_id: i64, slug: impl Into<String>) -> Self {
        Self {
            link_id,
            slug: slug.into(),
        }
    }
}

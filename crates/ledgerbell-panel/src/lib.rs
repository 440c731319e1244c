#[macro_use]
extern crate tracing;

pub mod error;
pub mod feed;
pub mod surface;
pub mod view;

use self::{
    error::Result,
    feed::FeedClient,
    surface::PanelSurface,
    view::{Badge, ListView, PanelView},
};
use iso8601_timestamp::Timestamp;
use ledgerbell_type::NotificationFeed;
use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex,
    },
    time::Duration,
};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use typed_builder::TypedBuilder;

pub use self::error::Error;

/// How often the feed is re-fetched unless configured otherwise
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// How many dropdown rows are shown unless configured otherwise
pub const DEFAULT_MAX_ROWS: usize = 5;

/// Keeps a badge + dropdown surface eventually consistent with the server's
/// notification feed
///
/// Every outgoing fetch carries a sequence number; a response is only applied
/// if nothing newer has been applied yet, so overlapping refreshes cannot
/// regress the rendered state.
#[derive(TypedBuilder)]
pub struct NotificationPanel<S> {
    feed_client: FeedClient,
    surface: S,
    #[builder(default = DEFAULT_POLL_INTERVAL)]
    poll_interval: Duration,
    #[builder(default = DEFAULT_MAX_ROWS)]
    max_rows: usize,
    #[builder(default, setter(skip))]
    fetch_sequence: AtomicU64,
    #[builder(default, setter(skip))]
    applied_sequence: Mutex<u64>,
}

impl<S> NotificationPanel<S>
where
    S: PanelSurface,
{
    /// Drive the panel until `shutdown` fires
    ///
    /// Refreshes immediately, then once per poll interval. If the surface has
    /// no badge element (nobody is logged in), the panel stays permanently
    /// inert: no timer is armed and no request is ever issued.
    pub async fn run(&self, shutdown: CancellationToken) {
        if !self.surface.badge_present() {
            debug!("surface has no badge element, leaving the panel inert");
            return;
        }

        let mut interval = tokio::time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                () = shutdown.cancelled() => break,
                _ = interval.tick() => {
                    if let Err(error) = self.refresh().await {
                        warn!(?error, "failed to refresh the notification feed");
                    }
                }
            }
        }
    }

    /// Fetch the feed once and apply it to the surface
    ///
    /// On failure the list degrades to the "Failed to load" placeholder while
    /// the badge keeps its last applied value; recovery waits for the next
    /// scheduled refresh.
    pub async fn refresh(&self) -> Result<()> {
        let sequence = self.fetch_sequence.fetch_add(1, Ordering::Relaxed) + 1;

        match self.feed_client.fetch().await {
            Ok(feed) => {
                self.apply_feed(sequence, &feed);
                Ok(())
            }
            Err(error) => {
                self.apply_failure(sequence);
                Err(error)
            }
        }
    }

    /// Hide the badge immediately, then ask the server to mark everything read
    ///
    /// A successful POST is followed by a reconciling [`refresh`](Self::refresh).
    /// On failure no retry is attempted and the optimistically hidden badge
    /// persists until the next scheduled refresh restores the server's state.
    pub async fn mark_all_read(&self) -> Result<()> {
        self.surface.apply_badge(&Badge::Hidden);

        self.feed_client.mark_all_read().await?;
        self.refresh().await
    }

    fn apply_feed(&self, sequence: u64, feed: &NotificationFeed) {
        let view = PanelView::of_feed(feed, Timestamp::now_utc(), self.max_rows);

        let mut applied = self.applied_sequence.lock().unwrap();
        if sequence <= *applied {
            debug!(sequence, applied = *applied, "discarding stale feed response");
            return;
        }
        *applied = sequence;

        self.surface.apply_badge(&view.badge);
        self.surface.apply_list(&view::render_list(&view.list));
    }

    fn apply_failure(&self, sequence: u64) {
        let mut applied = self.applied_sequence.lock().unwrap();
        if sequence <= *applied {
            return;
        }
        *applied = sequence;

        // Only the list degrades; the badge keeps its last applied value
        self.surface.apply_list(&view::render_list(&ListView::Failed));
    }
}

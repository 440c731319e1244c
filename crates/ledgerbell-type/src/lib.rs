use iso8601_timestamp::Timestamp;
use serde::{Deserialize, Serialize};

/// One entry of the notification feed, as the server sends it
///
/// Immutable from the client's perspective. `is_read` only ever changes by
/// re-fetching the feed after a successful mark-all-read.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Notification {
    pub id: u64,
    pub title: String,
    pub link: String,
    pub created_at: Timestamp,
    pub is_read: bool,
}

/// Wire shape of `GET /api/notifications`
///
/// Recomputed wholesale on every fetch; there is no client-side merging.
/// The order of `notifications` is the server's (newest first).
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct NotificationFeed {
    pub unread_count: u64,
    pub notifications: Vec<Notification>,
}

use iso8601_timestamp::Timestamp;
use ledgerbell_type::{Notification, NotificationFeed};
use minijinja::{context, Environment};
use serde::Serialize;
use std::sync::OnceLock;
use time::{format_description::BorrowedFormatItem, macros::format_description};

/// Badge text once the unread count no longer fits a single digit
pub const BADGE_OVERFLOW: &str = "9+";

/// List content when the feed has no notifications at all
pub const EMPTY_PLACEHOLDER: &str = "No notifications";

/// List content when the last fetch failed
pub const FAILED_PLACEHOLDER: &str = "Failed to load";

const ABSOLUTE_DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[month repr:short] [day padding:none], [year]");

/// State of the badge element
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Badge {
    Hidden,
    Count(u64),
    Overflow,
}

impl Badge {
    #[must_use]
    pub fn from_unread_count(unread_count: u64) -> Self {
        match unread_count {
            0 => Self::Hidden,
            1..=9 => Self::Count(unread_count),
            _ => Self::Overflow,
        }
    }

    /// Badge element text, `None` when the badge is hidden
    #[must_use]
    pub fn text(&self) -> Option<String> {
        match self {
            Self::Hidden => None,
            Self::Count(count) => Some(count.to_string()),
            Self::Overflow => Some(BADGE_OVERFLOW.to_owned()),
        }
    }
}

/// One rendered dropdown row
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Row {
    pub title: String,
    pub link: String,
    pub time_ago: String,
    pub unread: bool,
}

impl Row {
    fn of_notification(notification: &Notification, now: Timestamp) -> Self {
        Self {
            title: notification.title.clone(),
            link: notification.link.clone(),
            time_ago: time_ago(now, notification.created_at),
            unread: !notification.is_read,
        }
    }
}

/// What the list container shows
#[derive(Clone, Debug, PartialEq)]
pub enum ListView {
    Empty,
    Failed,
    Rows(Vec<Row>),
}

/// Full view model of the panel, derived from one feed snapshot
#[derive(Clone, Debug, PartialEq)]
pub struct PanelView {
    pub badge: Badge,
    pub list: ListView,
}

impl PanelView {
    /// Build the view for a successfully fetched feed
    ///
    /// At most `max_rows` rows are rendered, in the order the server sent
    /// them. An empty feed shows the placeholder no matter what
    /// `unread_count` claims.
    #[must_use]
    pub fn of_feed(feed: &NotificationFeed, now: Timestamp, max_rows: usize) -> Self {
        let badge = Badge::from_unread_count(feed.unread_count);
        let list = if feed.notifications.is_empty() {
            ListView::Empty
        } else {
            ListView::Rows(
                feed.notifications
                    .iter()
                    .take(max_rows)
                    .map(|notification| Row::of_notification(notification, now))
                    .collect(),
            )
        };

        Self { badge, list }
    }
}

/// Relative age label for a notification
///
/// Thresholds are floor-divided whole seconds; timestamps in the future of
/// `now` clamp to "Just now".
#[must_use]
pub fn time_ago(now: Timestamp, then: Timestamp) -> String {
    let elapsed = (*now - *then).whole_seconds().max(0);

    if elapsed < 60 {
        "Just now".to_owned()
    } else if elapsed < 60 * 60 {
        format!("{}m ago", elapsed / 60)
    } else if elapsed < 24 * 60 * 60 {
        format!("{}h ago", elapsed / (60 * 60))
    } else if elapsed < 7 * 24 * 60 * 60 {
        format!("{}d ago", elapsed / (24 * 60 * 60))
    } else {
        absolute_date(then)
    }
}

fn absolute_date(timestamp: Timestamp) -> String {
    let date = timestamp.date();
    date.format(ABSOLUTE_DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

const LIST_TEMPLATE: &str = r#"{% if placeholder %}<div class="notification-placeholder">{{ placeholder }}</div>{% else %}<ul class="notification-list">
{%- for row in rows %}
<li class="notification-row{% if row.unread %} is-unread{% endif %}"><a href="{{ row.link }}"><span class="notification-title">{{ row.title }}</span><span class="notification-time">{{ row.time_ago }}</span></a></li>
{%- endfor %}
</ul>{% endif %}"#;

fn environment() -> &'static Environment<'static> {
    static ENVIRONMENT: OnceLock<Environment<'static>> = OnceLock::new();

    ENVIRONMENT.get_or_init(|| {
        let mut environment = Environment::new();
        environment
            .add_template("list.html", LIST_TEMPLATE)
            .expect("list template is statically known to parse");

        environment
    })
}

/// Render the list container's HTML fragment
///
/// Titles and links pass through minijinja's HTML auto-escaping, so
/// markup-significant characters always end up as literal text.
#[allow(clippy::missing_panics_doc)]
#[must_use]
pub fn render_list(list: &ListView) -> String {
    let (placeholder, rows) = match list {
        ListView::Empty => (Some(EMPTY_PLACEHOLDER), &[][..]),
        ListView::Failed => (Some(FAILED_PLACEHOLDER), &[][..]),
        ListView::Rows(rows) => (None, rows.as_slice()),
    };

    environment()
        .get_template("list.html")
        .expect("list template was added at initialisation")
        .render(context! { placeholder => placeholder, rows => rows })
        .expect("rendering the list template never fails over plain rows")
}

#[cfg(test)]
mod tests {
    use super::{time_ago, Badge, ListView, PanelView, Row};
    use iso8601_timestamp::Timestamp;
    use ledgerbell_type::{Notification, NotificationFeed};
    use pretty_assertions::assert_eq;

    fn ts(raw: &str) -> Timestamp {
        Timestamp::parse(raw).unwrap()
    }

    fn notification(id: u64, title: &str, is_read: bool) -> Notification {
        Notification {
            id,
            title: title.to_owned(),
            link: format!("/invoices/{id}"),
            created_at: ts("2026-08-05T10:00:00Z"),
            is_read,
        }
    }

    #[test]
    fn badge_shows_exact_single_digit_counts() {
        assert_eq!(Badge::from_unread_count(0), Badge::Hidden);

        for count in 1..=9 {
            let badge = Badge::from_unread_count(count);
            assert_eq!(badge, Badge::Count(count));
            assert_eq!(badge.text().unwrap(), count.to_string());
        }
    }

    #[test]
    fn badge_overflows_at_ten() {
        for count in [10, 11, 573] {
            let badge = Badge::from_unread_count(count);
            assert_eq!(badge, Badge::Overflow);
            assert_eq!(badge.text().as_deref(), Some("9+"));
        }
    }

    #[test]
    fn time_ago_thresholds() {
        let now = ts("2026-08-05T12:00:00Z");

        assert_eq!(time_ago(now, ts("2026-08-05T11:59:30Z")), "Just now");
        assert_eq!(time_ago(now, ts("2026-08-05T11:58:30Z")), "1m ago");
        assert_eq!(time_ago(now, ts("2026-08-05T11:00:01Z")), "59m ago");
        assert_eq!(time_ago(now, ts("2026-08-05T10:58:20Z")), "1h ago");
        assert_eq!(time_ago(now, ts("2026-08-04T11:00:00Z")), "1d ago");
        assert_eq!(time_ago(now, ts("2026-07-29T13:00:00Z")), "6d ago");
    }

    #[test]
    fn time_ago_switches_to_an_absolute_date_after_a_week() {
        let now = ts("2026-08-05T12:00:00Z");

        assert_eq!(time_ago(now, ts("2026-07-29T12:00:00Z")), "Jul 29, 2026");
        assert_eq!(time_ago(now, ts("2026-07-28T12:00:00Z")), "Jul 28, 2026");
    }

    #[test]
    fn time_ago_clamps_future_timestamps() {
        let now = ts("2026-08-05T12:00:00Z");

        assert_eq!(time_ago(now, ts("2026-08-05T12:05:00Z")), "Just now");
    }

    #[test]
    fn view_truncates_to_max_rows_preserving_server_order() {
        let feed = NotificationFeed {
            unread_count: 7,
            notifications: (1..=7)
                .map(|id| notification(id, &format!("n{id}"), false))
                .collect(),
        };

        let view = PanelView::of_feed(&feed, ts("2026-08-05T12:00:00Z"), 5);

        let ListView::Rows(rows) = view.list else {
            panic!("expected rows, got {:?}", view.list);
        };
        let titles: Vec<_> = rows.iter().map(|row| row.title.as_str()).collect();
        assert_eq!(titles, ["n1", "n2", "n3", "n4", "n5"]);
    }

    #[test]
    fn empty_feed_shows_placeholder_regardless_of_unread_count() {
        let feed = NotificationFeed {
            unread_count: 4,
            notifications: Vec::new(),
        };

        let view = PanelView::of_feed(&feed, ts("2026-08-05T12:00:00Z"), 5);

        assert_eq!(view.badge, Badge::Count(4));
        assert_eq!(view.list, ListView::Empty);
    }

    #[test]
    fn renders_placeholders_as_literal_text() {
        let empty = super::render_list(&ListView::Empty);
        assert!(empty.contains("No notifications"), "html = {empty}");
        assert!(!empty.contains("<li"), "html = {empty}");

        let failed = super::render_list(&ListView::Failed);
        assert!(failed.contains("Failed to load"), "html = {failed}");
        assert!(!failed.contains("<li"), "html = {failed}");
    }

    #[test]
    fn escapes_markup_in_titles_and_links() {
        let rows = ListView::Rows(vec![Row {
            title: "<b>x</b>".to_owned(),
            link: "/invoices/1?a=1&b=2".to_owned(),
            time_ago: "Just now".to_owned(),
            unread: true,
        }]);

        let html = super::render_list(&rows);

        assert!(html.contains("&lt;b&gt;x&lt;/b&gt;"), "html = {html}");
        assert!(!html.contains("<b>x</b>"), "html = {html}");
        assert!(html.contains("a=1&amp;b=2"), "html = {html}");
    }

    #[test]
    fn tints_unread_rows_only() {
        let read = Row {
            title: "paid".to_owned(),
            link: "/invoices/1".to_owned(),
            time_ago: "2h ago".to_owned(),
            unread: false,
        };
        let unread = Row {
            title: "overdue".to_owned(),
            link: "/invoices/2".to_owned(),
            time_ago: "Just now".to_owned(),
            unread: true,
        };

        let html = super::render_list(&ListView::Rows(vec![read]));
        assert!(!html.contains("is-unread"), "html = {html}");

        let html = super::render_list(&ListView::Rows(vec![unread]));
        assert!(html.contains("is-unread"), "html = {html}");
    }
}

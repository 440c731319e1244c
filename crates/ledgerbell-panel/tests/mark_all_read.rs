use bytes::Bytes;
use http::{Method, Request, Response, StatusCode};
use http_body_util::Full;
use iso8601_timestamp::Timestamp;
use ledgerbell_http_client::Client;
use ledgerbell_panel::{
    feed::FeedClient, surface::PanelSurface, view::Badge, view::EMPTY_PLACEHOLDER,
    NotificationPanel,
};
use ledgerbell_type::{Notification, NotificationFeed};
use pretty_assertions::assert_eq;
use std::{
    convert::Infallible,
    sync::{Arc, Mutex},
};
use tower::service_fn;

#[derive(Default)]
struct RecordingSurface {
    badges: Mutex<Vec<Badge>>,
    lists: Mutex<Vec<String>>,
}

impl PanelSurface for RecordingSurface {
    fn badge_present(&self) -> bool {
        true
    }

    fn apply_badge(&self, badge: &Badge) {
        self.badges.lock().unwrap().push(badge.clone());
    }

    fn apply_list(&self, html: &str) {
        self.lists.lock().unwrap().push(html.to_owned());
    }
}

fn reconciled_feed() -> NotificationFeed {
    NotificationFeed {
        unread_count: 0,
        notifications: vec![Notification {
            id: 1,
            title: "Invoice #12 was paid".to_owned(),
            link: "/invoices/12".to_owned(),
            created_at: Timestamp::parse("2026-08-05T10:00:00Z").unwrap(),
            is_read: true,
        }],
    }
}

#[tokio::test]
async fn hides_the_badge_before_the_post_resolves_and_reconciles_after() {
    let surface = Arc::new(RecordingSurface::default());

    let surface_probe = Arc::clone(&surface);
    let feed_body = sonic_rs::to_string(&reconciled_feed()).unwrap();
    let client = service_fn(move |req: Request<_>| {
        let surface = Arc::clone(&surface_probe);
        let feed_body = feed_body.clone();
        async move {
            match (req.method(), req.uri().path()) {
                (&Method::POST, "/api/notifications/mark-all-read") => {
                    // The optimistic hide must already be visible when the
                    // request reaches the server
                    assert_eq!(surface.badges.lock().unwrap().as_slice(), [Badge::Hidden]);

                    Ok::<_, Infallible>(Response::new(Full::<Bytes>::default()))
                }
                (&Method::GET, "/api/notifications") => {
                    Ok(Response::new(Full::new(Bytes::from(feed_body))))
                }
                route => panic!("unexpected route: {route:?}"),
            }
        }
    });
    let client = Client::builder().service(client);

    let panel = NotificationPanel::builder()
        .feed_client(FeedClient::new(client, "https://invoice.example"))
        .surface(Arc::clone(&surface))
        .build();

    panel.mark_all_read().await.expect("mark-all-read failed");

    // Optimistic hide, then the reconciling refresh applied a hidden badge again
    assert_eq!(
        surface.badges.lock().unwrap().as_slice(),
        [Badge::Hidden, Badge::Hidden]
    );

    let lists = surface.lists.lock().unwrap();
    assert_eq!(lists.len(), 1);
    assert!(lists[0].contains("Invoice #12 was paid"), "html = {}", lists[0]);
    assert!(!lists[0].contains("is-unread"), "html = {}", lists[0]);
}

#[tokio::test]
async fn a_204_still_counts_as_success() {
    let surface = Arc::new(RecordingSurface::default());

    let feed_body = sonic_rs::to_string(&NotificationFeed::default()).unwrap();
    let client = service_fn(move |req: Request<_>| {
        let feed_body = feed_body.clone();
        async move {
            let response = match req.method() {
                &Method::POST => Response::builder()
                    .status(StatusCode::NO_CONTENT)
                    .body(Full::<Bytes>::default())
                    .unwrap(),
                _ => Response::new(Full::new(Bytes::from(feed_body))),
            };

            Ok::<_, Infallible>(response)
        }
    });
    let client = Client::builder().service(client);

    let panel = NotificationPanel::builder()
        .feed_client(FeedClient::new(client, "https://invoice.example"))
        .surface(Arc::clone(&surface))
        .build();

    panel.mark_all_read().await.expect("mark-all-read failed");

    let lists = surface.lists.lock().unwrap();
    assert_eq!(lists.len(), 1);
    assert!(lists[0].contains(EMPTY_PLACEHOLDER), "html = {}", lists[0]);
}

#[tokio::test]
async fn a_failed_post_leaves_the_badge_hidden_and_skips_the_refresh() {
    let surface = Arc::new(RecordingSurface::default());

    let client = service_fn(|req: Request<_>| async move {
        assert_eq!(req.method(), Method::POST, "no refresh must follow a failed POST");

        Ok::<_, Infallible>(
            Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .body(Full::<Bytes>::default())
                .unwrap(),
        )
    });
    let client = Client::builder().service(client);

    let panel = NotificationPanel::builder()
        .feed_client(FeedClient::new(client, "https://invoice.example"))
        .surface(Arc::clone(&surface))
        .build();

    panel
        .mark_all_read()
        .await
        .expect_err("the failed POST should surface");

    // The optimistically hidden badge persists; nothing else was applied
    assert_eq!(surface.badges.lock().unwrap().as_slice(), [Badge::Hidden]);
    assert!(surface.lists.lock().unwrap().is_empty());
}

use crate::error::{Error, Result};
use ledgerbell_http_client::Client;
use ledgerbell_type::NotificationFeed;

/// Path of the feed endpoint, relative to the configured base URL
pub const NOTIFICATIONS_PATH: &str = "/api/notifications";

/// Path of the mark-all-read endpoint, relative to the configured base URL
pub const MARK_ALL_READ_PATH: &str = "/api/notifications/mark-all-read";

/// Typed client for the two notification endpoints
#[derive(Clone)]
pub struct FeedClient {
    base_url: String,
    client: Client,
}

impl FeedClient {
    #[must_use]
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            client,
        }
    }

    /// Fetch the current feed
    ///
    /// Anything other than a 2xx status with a well-formed JSON body is an
    /// error; the caller decides how to degrade.
    #[instrument(skip(self))]
    pub async fn fetch(&self) -> Result<NotificationFeed> {
        let response = self
            .client
            .get(format!("{}{NOTIFICATIONS_PATH}", self.base_url))
            .await?;

        if !response.status().is_success() {
            return Err(Error::UnexpectedStatus(response.status()));
        }

        Ok(response.json().await?)
    }

    /// Ask the server to mark every notification as read
    ///
    /// Any 2xx response counts as success; the response body is ignored.
    #[instrument(skip(self))]
    pub async fn mark_all_read(&self) -> Result<()> {
        let response = self
            .client
            .post(format!("{}{MARK_ALL_READ_PATH}", self.base_url))
            .await?;

        if !response.status().is_success() {
            return Err(Error::UnexpectedStatus(response.status()));
        }

        Ok(())
    }
}

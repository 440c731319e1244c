#[macro_use]
extern crate tracing;

use clap::{Parser, Subcommand};
use color_eyre::eyre;
use ledgerbell_config::Configuration;
use ledgerbell_http_client::Client;
use ledgerbell_panel::{feed::FeedClient, NotificationPanel};
use std::{path::PathBuf, time::Duration};

mod logging;
mod signal;
mod surface;

/// Notification panel companion for the invoicing app
#[derive(Parser)]
#[command(about, author, version)]
struct Args {
    /// Path to the configuration
    #[arg(long, short)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Poll the notification feed and keep the terminal panel fresh until interrupted
    Watch,
    /// Mark every notification as read, then print the reconciled unread count
    MarkAllRead,
}

fn http_client(config: &ledgerbell_config::api::Configuration) -> eyre::Result<Client> {
    let mut builder = Client::builder().timeout(Duration::from_secs(config.request_timeout_secs));
    if let Some(ref token) = config.access_token {
        builder = builder.default_header("authorization", format!("Bearer {token}"))?;
    }

    Ok(builder.build())
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    logging::initialise()?;

    let config = Configuration::load(&args.config).await?;
    let client = http_client(&config.api)?;
    let feed_client = FeedClient::new(client, &config.api.base_url);

    match args.command {
        Command::Watch => {
            let panel = NotificationPanel::builder()
                .feed_client(feed_client)
                .surface(surface::TerminalSurface)
                .poll_interval(Duration::from_secs(config.panel.poll_interval_secs))
                .max_rows(config.panel.max_rows)
                .build();

            info!(
                poll_interval_secs = config.panel.poll_interval_secs,
                "watching the notification feed"
            );
            panel.run(signal::shutdown()).await;
        }
        Command::MarkAllRead => {
            feed_client.mark_all_read().await?;
            let feed = feed_client.fetch().await?;
            println!("{} unread notifications remaining", feed.unread_count);
        }
    }

    Ok(())
}

//! One stock-refresh cycle: count a target phrase on a checkout page and
//! alert when the count deviates from the expected value.

use chrono::Utc;
use clap::Args;
use mvcwatch_core::AppConfig;
use mvcwatch_notify::{
    mailer, render_stock_alert, stock_subject, DedupGate, FileStatusLog, Status,
};
use mvcwatch_scraper::WizardClient;

use crate::split_csv;

/// Marker the storefront serves when the polled item no longer exists.
const SORRY_MARKER: &str = "Sorry, we couldn't find that item";

#[derive(Debug, Args)]
pub struct StockArgs {
    /// Checkout or product page to poll.
    #[arg(long)]
    url: String,

    /// Phrase whose occurrence count signals "no slots".
    #[arg(long, default_value = "Not available")]
    target: String,

    /// Expected occurrence count when nothing is available.
    #[arg(long, default_value_t = 3)]
    expect: usize,

    /// Comma-separated recipients; empty prints the message instead of
    /// mailing it.
    #[arg(long, default_value = "")]
    emails: String,
}

pub async fn run(config: &AppConfig, args: StockArgs) -> anyhow::Result<()> {
    let recipients = split_csv(&args.emails);

    let mut gate = DedupGate::new(FileStatusLog::new(config.state_log_path.clone()));
    if !gate.should_act(Utc::now())? {
        tracing::info!(url = %args.url, "inside cooldown window; skipping this cycle");
        return Ok(());
    }

    let client = WizardClient::new(
        config.request_timeout_secs,
        &config.user_agent,
        config.max_retries,
        config.retry_backoff_base_secs,
    )?;
    let body = client.fetch_page(&args.url).await?;

    let status = classify_stock_page(&body, &args.target, args.expect);
    match status {
        Status::Unavailable => {
            tracing::info!(
                target = %args.target,
                expected = args.expect,
                "occurrence count matches; no availability"
            );
        }
        Status::SorryInvalidItem => {
            tracing::warn!(url = %args.url, "polled item page is no longer valid");
        }
        Status::Found => {
            tracing::info!(url = %args.url, "availability detected");
            let subject = stock_subject();
            let message = render_stock_alert(&args.url);
            if recipients.is_empty() {
                println!("{message}");
            } else if let Err(e) = mailer::send(&subject, &message, &recipients).await {
                tracing::error!(error = %e, "failed to send notification");
            }
        }
    }
    gate.record_status(status, Utc::now())?;
    Ok(())
}

/// Classify a fetched page body.
///
/// The sorry marker wins outright; otherwise the occurrence count of
/// `target` equal to `expected` means nothing opened up, and any deviation
/// means a slot appeared.
fn classify_stock_page(body: &str, target: &str, expected: usize) -> Status {
    if body.contains(SORRY_MARKER) {
        return Status::SorryInvalidItem;
    }
    if body.matches(target).count() == expected {
        Status::Unavailable
    } else {
        Status::Found
    }
}

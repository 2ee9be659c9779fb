//! One appointment-watch cycle: gate, fetch, extract, join, filter, alert,
//! record.

use chrono::Utc;
use clap::Args;
use mvcwatch_core::{AppConfig, PolicyConfig};
use mvcwatch_notify::{
    availability_subject, mailer, render_availability, DedupGate, FileStatusLog, Status,
};
use mvcwatch_scraper::{
    extract_tables, filter_availability, join_slots, AvailabilityResult, BlockOutcome, Service,
    WizardClient,
};

use crate::split_csv;

#[derive(Debug, Args)]
pub struct AppointmentsArgs {
    /// Appointment service to poll: initial | nondriverid.
    #[arg(long, default_value = "initial")]
    service: String,

    /// Only alert when an office name contains one of these comma-separated
    /// keywords.
    #[arg(long, default_value = "")]
    only: String,

    /// Only alert when the earliest slot is at most this many days out.
    #[arg(long)]
    within_days: Option<i64>,

    /// Comma-separated recipients; empty prints the message instead of
    /// mailing it.
    #[arg(long, default_value = "")]
    emails: String,
}

pub async fn run(config: &AppConfig, args: AppointmentsArgs) -> anyhow::Result<()> {
    let service: Service = args
        .service
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    let policy = PolicyConfig::new(split_csv(&args.only), args.within_days);
    let recipients = split_csv(&args.emails);

    let mut gate = DedupGate::new(FileStatusLog::new(config.state_log_path.clone()));
    if !gate.should_act(Utc::now())? {
        tracing::info!(service = %service, "inside cooldown window; skipping this cycle");
        return Ok(());
    }

    let client = WizardClient::new(
        config.request_timeout_secs,
        &config.user_agent,
        config.max_retries,
        config.retry_backoff_base_secs,
    )?;
    let page = client.fetch_wizard_page(service).await?;

    let tables = extract_tables(&page)?;
    let locations = match tables.locations {
        BlockOutcome::Found(t) => t,
        BlockOutcome::Absent => {
            tracing::warn!(service = %service, "location data not loaded");
            vec![]
        }
    };
    let time_slots = match tables.time_slots {
        BlockOutcome::Found(t) => t,
        BlockOutcome::Absent => {
            tracing::warn!(service = %service, "time data not loaded");
            vec![]
        }
    };

    let enriched = join_slots(time_slots, &locations);
    let results: Vec<AvailabilityResult> =
        filter_availability(&enriched, &policy, Utc::now().date_naive()).collect();

    if results.is_empty() {
        tracing::info!(service = %service, "no availability this cycle");
        gate.record_status(Status::Unavailable, Utc::now())?;
        return Ok(());
    }

    tracing::info!(service = %service, count = results.len(), "availability found");
    let subject = availability_subject(service.slug());
    let body = render_availability(&results, service.slug(), &client.wizard_url(service));
    if recipients.is_empty() {
        println!("{body}");
    } else if let Err(e) = mailer::send(&subject, &body, &recipients).await {
        // Fire-and-forget: an attempted alert still counts as an alert.
        tracing::error!(error = %e, "failed to send notification");
    }
    gate.record_status(Status::Found, Utc::now())?;
    Ok(())
}

mod appointments;
mod stock;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "mvcwatch")]
#[command(about = "Availability watchers: poll a page, filter, alert once per cooldown")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Poll the NJ MVC appointment wizard for open slots.
    Appointments(appointments::AppointmentsArgs),
    /// Poll a checkout/product page for delivery-slot availability.
    Stock(stock::StockArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = mvcwatch_core::load_app_config_from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Appointments(args) => appointments::run(&config, args).await,
        Commands::Stock(args) => stock::run(&config, args).await,
    }
}

/// Split a comma-separated CLI value, dropping blanks.
pub(crate) fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::split_csv;

    #[test]
    fn splits_and_trims_comma_separated_values() {
        assert_eq!(split_csv("a, b ,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn empty_and_blank_inputs_yield_no_entries() {
        assert!(split_csv("").is_empty());
        assert!(split_csv(" , ,").is_empty());
    }
}

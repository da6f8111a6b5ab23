use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::{error, info};

use vet_console::domain::{BookingOrchestrator, BookingScope, StatusFilter};
use vet_console::{logging, ApiClient, ConsoleConfig};

#[derive(Parser, Debug)]
#[command(name = "vet-console")]
#[command(about = "List clinic vaccination bookings for a month, or all of them")]
struct Cli {
    /// Show every booking instead of one month
    #[arg(long)]
    all: bool,
    /// Month to list, 1 for January (defaults to the current month)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,
    /// Year to list (defaults to the current year)
    #[arg(long)]
    year: Option<i32>,
    /// Match against customer name, phone, animal name or booking number
    #[arg(long)]
    search: Option<String>,
    /// all, pending, confirmed, completed or cancelled
    #[arg(long, value_parser = parse_status)]
    status: Option<StatusFilter>,
}

fn parse_status(raw: &str) -> std::result::Result<StatusFilter, String> {
    StatusFilter::parse(raw).ok_or_else(|| format!("unknown status {}", raw))
}

impl Cli {
    /// Scope to fetch; `--month` is one-based, scopes are zero-based
    fn scope(&self) -> Result<BookingScope> {
        let current = BookingScope::current();
        let scope = match (self.month, self.year) {
            (None, None) => current,
            (month, year) => BookingScope::for_month(
                month.map(|m| m - 1).unwrap_or(current.month()),
                year.unwrap_or(current.year()),
            )?,
        };
        Ok(scope.with_show_all(self.all))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let cli = Cli::parse();
    let config = ConsoleConfig::load().context("loading console configuration")?;
    info!("Starting vet console against {}", config.api_base_url);

    let client = Arc::new(ApiClient::from_config(&config)?);
    let mut orchestrator = BookingOrchestrator::new(client, cli.scope()?);

    if let Some(term) = cli.search.as_deref() {
        orchestrator.query_mut().set_search_term(term);
    }
    if let Some(status) = cli.status {
        orchestrator.query_mut().set_status_filter(status);
    }

    if let Err(e) = orchestrator.refresh().await {
        error!("Could not load bookings: {}", e);
        for line in e.user_messages() {
            eprintln!("{}", line);
        }
        return Err(anyhow!(e).context("loading bookings"));
    }

    let query = orchestrator.query();
    let visible = query.visible();
    println!("Bookings for {} ({} shown of {})", query.scope(), visible.len(), query.bookings().len());
    for booking in visible {
        println!(
            "{:<14} {} {}  {:<10} {:<22} {:<12} {:<8} {:<20} {:>8.2}",
            booking.booking_number,
            booking.appointment_date.format("%Y-%m-%d"),
            booking.appointment_time,
            booking.status,
            booking.customer.name,
            booking.animal.name,
            booking.animal.species,
            booking.vaccination.name.en,
            booking.price,
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::BookingStatus;

    fn cli(args: &[&str]) -> std::result::Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("vet-console").chain(args.iter().copied()))
    }

    #[test]
    fn test_month_flag_is_one_based() {
        let parsed = cli(&["--month", "10", "--year", "2025", "--status", "pending"]).unwrap();
        assert_eq!(parsed.month, Some(10));
        assert_eq!(parsed.status, Some(StatusFilter::Only(BookingStatus::Pending)));

        let scope = parsed.scope().unwrap();
        assert_eq!(scope.month(), 9);
        assert_eq!(scope.year(), 2025);
        assert!(!scope.show_all());
    }

    #[test]
    fn test_all_flag_keeps_selected_month() {
        let scope = cli(&["--all", "--month", "1", "--year", "2026"])
            .unwrap()
            .scope()
            .unwrap();
        assert!(scope.show_all());
        assert_eq!(scope.month(), 0);
    }

    #[test]
    fn test_bad_arguments_are_rejected() {
        assert!(cli(&["--month", "13"]).is_err());
        assert!(cli(&["--month", "0"]).is_err());
        assert!(cli(&["--status", "archived"]).is_err());
        assert!(cli(&["--search"]).is_err());
        assert!(cli(&["--verbose"]).is_err());
    }
}

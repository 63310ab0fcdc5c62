use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use twse_cli::cli::Cli;
use twse_cli::date::today_gregorian;
use twse_cli::menu::Menu;
use twse_cli::quote::{ClientOptions, QuoteClient};

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.insecure {
        log::warn!("TLS certificate verification is disabled");
    }

    let client = QuoteClient::new(ClientOptions {
        danger_insecure_tls: cli.insecure,
        ..ClientOptions::default()
    })
    .context("Failed to build HTTP client")?;

    // Positional arguments run one query non-interactively.
    if let Some(code) = &cli.stock_code {
        let date = cli.date.clone().unwrap_or_else(today_gregorian);
        println!("\nQuerying stock {code} ...");
        if !client.query_and_display(code, &date) {
            std::process::exit(1);
        }
        return Ok(());
    }

    let menu = Menu::new(&client, &cli.watchlist, Duration::from_millis(cli.delay_ms));
    menu.run().context("Interactive session failed")?;
    Ok(())
}

use clap::Parser;

use crate::batch::DEFAULT_DELAY_MS;

#[derive(Parser)]
#[command(name = "twse-cli")]
#[command(about = "Query TWSE daily trading data for one or more stocks")]
#[command(version)]
pub struct Cli {
    /// Stock code to query directly (e.g. 2330); omit to open the menu
    pub stock_code: Option<String>,

    /// Trading date as YYYYMMDD; defaults to today
    pub date: Option<String>,

    /// Watch-list file used for batch queries
    #[arg(short, long, default_value = "stocks.json")]
    pub watchlist: String,

    /// Pause between batch requests, in milliseconds
    #[arg(long, default_value_t = DEFAULT_DELAY_MS)]
    pub delay_ms: u64,

    /// Skip TLS certificate verification (dangerous, off by default)
    #[arg(long)]
    pub insecure: bool,
}

use std::borrow::Cow;

use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;

use crate::date::roc_date;
use crate::error::{AppError, Result};
use crate::table;

pub const TWSE_STOCK_DAY_URL: &str = "https://www.twse.com.tw/exchangeReport/STOCK_DAY";

/// One day of trading data for a single security.
///
/// Every field is kept as the exchange's locale-formatted text (volumes
/// carry thousands separators); no numeric parsing happens anywhere in
/// this crate. Records live only for the duration of one query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayQuote {
    pub code: String,
    /// Display name, merged in from the watch list by the batch runner.
    pub name: Option<String>,
    /// Trading date in ROC form, as the exchange returned it.
    pub date: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: String,
    pub amount: String,
}

/// A single cell of the exchange's data table. The upstream feed is not
/// contractually typed, so anything that is not a JSON string is kept as
/// a raw value and normalized on access.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Other(Value),
}

impl Cell {
    /// Text content for record extraction; non-string cells read as empty.
    pub fn as_text(&self) -> &str {
        match self {
            Cell::Text(text) => text,
            Cell::Other(_) => "",
        }
    }

    /// Rendering for table display: strings as-is, anything else in its
    /// JSON form.
    pub fn display_text(&self) -> Cow<'_, str> {
        match self {
            Cell::Text(text) => Cow::Borrowed(text),
            Cell::Other(value) => Cow::Owned(value.to_string()),
        }
    }
}

/// Decoded STOCK_DAY payload. `stat` is the in-band status indicator,
/// independent of the HTTP status line.
#[derive(Debug, Default, Deserialize)]
pub struct ExchangeResponse {
    pub stat: Option<String>,
    pub message: Option<String>,
    pub title: Option<String>,
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default)]
    pub data: Vec<Vec<Cell>>,
}

impl ExchangeResponse {
    /// The API signals failure in-band with `stat != "OK"`. A missing
    /// `stat` counts as success, matching the endpoint's observed
    /// behavior.
    pub fn check_status(&self) -> Result<()> {
        match self.stat.as_deref() {
            Some(stat) if stat != "OK" => Err(AppError::ApiStatus {
                stat: stat.to_string(),
                message: self.message.clone(),
            }),
            _ => Ok(()),
        }
    }

    /// First row whose date cell equals `roc`. First match wins; the feed
    /// is normally chronological but ordering is never assumed.
    pub fn find_row(&self, roc: &str) -> Option<&[Cell]> {
        self.data
            .iter()
            .map(Vec::as_slice)
            .find(|row| row.first().map(Cell::as_text) == Some(roc))
    }
}

#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    /// Disables TLS certificate verification for the exchange endpoint.
    /// Off by default; only enable when the certificate chain cannot be
    /// validated locally.
    pub danger_insecure_tls: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: TWSE_STOCK_DAY_URL.to_string(),
            danger_insecure_tls: false,
        }
    }
}

/// Blocking client for the STOCK_DAY endpoint. Construct once and pass
/// to each call site; it owns the connection configuration.
pub struct QuoteClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl QuoteClient {
    pub fn new(options: ClientOptions) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .danger_accept_invalid_certs(options.danger_insecure_tls)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self {
            client,
            base_url: options.base_url,
        })
    }

    /// One GET against the endpoint, decoded into the wire model. No
    /// retry on any failure kind.
    fn fetch_day(&self, stock_no: &str, date: &str) -> Result<ExchangeResponse> {
        let url = format!(
            "{}?response=json&date={}&stockNo={}",
            self.base_url, date, stock_no
        );
        debug!("GET {}", url);

        let body = self.client.get(&url).send()?.text()?;

        match serde_json::from_str(&body) {
            Ok(response) => Ok(response),
            Err(err) => {
                let excerpt: String = body.chars().take(500).collect();
                warn!("undecodable response body: {}", excerpt);
                Err(err.into())
            }
        }
    }

    /// Fetch and print the daily table for one security, filtered down to
    /// the requested date. Diagnostics go to stderr; the return value only
    /// distinguishes "rendered something" from "failed".
    pub fn query_and_display(&self, stock_no: &str, date: &str) -> bool {
        let response = match self.fetch_day(stock_no, date) {
            Ok(response) => response,
            Err(err) => {
                eprintln!("request failed: {err}");
                return false;
            }
        };

        if let Some(stat) = response.stat.as_deref() {
            if stat != "OK" {
                eprintln!("API error: {stat}");
                if let Some(message) = &response.message {
                    eprintln!("message: {message}");
                }
                return false;
            }
        }

        display_response(&response, stock_no, date);
        true
    }

    /// Fetch one security's row for the given date as a structured
    /// record. All failure detail collapses into the error; batch callers
    /// only care about success or failure.
    pub fn fetch_one(&self, stock_no: &str, date: &str) -> Result<DayQuote> {
        let response = self.fetch_day(stock_no, date)?;
        response.check_status()?;

        let roc = roc_date(date).ok_or_else(|| AppError::InvalidDate(date.to_string()))?;
        extract_quote(&response, stock_no, &roc)
    }
}

/// Pull the row matching `roc` out of a decoded payload using the fixed
/// STOCK_DAY column order: date, volume, amount, open, high, low, close.
/// A matching row with fewer than seven cells fails extraction rather
/// than yielding a partially filled record.
pub fn extract_quote(response: &ExchangeResponse, stock_no: &str, roc: &str) -> Result<DayQuote> {
    let row = response.find_row(roc).ok_or_else(|| AppError::NotFound {
        roc_date: roc.to_string(),
    })?;

    if row.len() < 7 {
        return Err(AppError::message(format!(
            "row for {roc} has {} cells, expected at least 7",
            row.len()
        )));
    }

    Ok(DayQuote {
        code: stock_no.to_string(),
        name: None,
        date: row[0].as_text().to_string(),
        volume: row[1].as_text().to_string(),
        amount: row[2].as_text().to_string(),
        open: row[3].as_text().to_string(),
        high: row[4].as_text().to_string(),
        low: row[5].as_text().to_string(),
        close: row[6].as_text().to_string(),
    })
}

fn display_response(response: &ExchangeResponse, stock_no: &str, date: &str) {
    println!("\n{}", "=".repeat(40));
    println!("Stock code: {stock_no}");

    let roc = roc_date(date);
    match roc.as_deref() {
        Some(roc) => println!("Query date: {date} ({roc})"),
        None => println!("Query date: {date}"),
    }

    if let Some(title) = &response.title {
        println!("Title: {title}");
    }

    println!("\nTrading data:");
    match roc.as_deref() {
        Some(roc) => match response.find_row(roc) {
            Some(row) => table::render(&response.fields, &[row]),
            None => {
                println!("no trading data found for {date} ({roc})");
                println!("hint: the date may be a non-trading day, or data is not yet published");
            }
        },
        None => {
            // Unconvertible query date: show the most recent rows instead.
            let start = response.data.len().saturating_sub(10);
            let rows: Vec<&[Cell]> = response.data[start..].iter().map(Vec::as_slice).collect();
            table::render(&response.fields, &rows);
        }
    }

    println!("{}", "=".repeat(40));
}

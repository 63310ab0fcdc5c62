use std::thread;
use std::time::Duration;

use log::warn;

use crate::error::Result;
use crate::quote::{DayQuote, QuoteClient};
use crate::table;
use crate::watchlist::WatchEntry;

/// Default pause between consecutive exchange requests. A courtesy
/// measure toward the endpoint, not adaptive backpressure.
pub const DEFAULT_DELAY_MS: u64 = 200;

/// Anything that can produce a day quote for a code/date pair. The seam
/// that lets the runner be driven by a stub in tests.
pub trait QuoteSource {
    fn fetch_one(&self, stock_no: &str, date: &str) -> Result<DayQuote>;
}

impl QuoteSource for QuoteClient {
    fn fetch_one(&self, stock_no: &str, date: &str) -> Result<DayQuote> {
        QuoteClient::fetch_one(self, stock_no, date)
    }
}

#[derive(Debug)]
pub enum BatchOutcome {
    Quote(DayQuote),
    Failed { code: String, name: String },
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<BatchOutcome>,
    pub succeeded: usize,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }
}

/// Query every watch-list entry in order, printing each result row as it
/// arrives and pausing `delay` after each request. A failed entry is
/// shown with a failure marker and never aborts the run.
pub fn run(
    source: &impl QuoteSource,
    entries: &[WatchEntry],
    date: &str,
    delay: Duration,
) -> BatchReport {
    println!("{}", table::batch_rule());
    println!("{}", table::batch_header());
    println!("{}", table::batch_rule());

    let mut report = BatchReport::default();
    for entry in entries {
        match source.fetch_one(&entry.code, date) {
            Ok(mut quote) => {
                quote.name = Some(entry.name.clone());
                println!("{}", table::batch_quote_row(&quote));
                report.succeeded += 1;
                report.outcomes.push(BatchOutcome::Quote(quote));
            }
            Err(err) => {
                warn!("query for {} failed: {}", entry.code, err);
                println!("{}", table::batch_failed_row(&entry.code, &entry.name));
                report.outcomes.push(BatchOutcome::Failed {
                    code: entry.code.clone(),
                    name: entry.name.clone(),
                });
            }
        }

        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }

    println!("{}", table::batch_rule());
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    struct StubSource {
        failing_code: &'static str,
    }

    impl QuoteSource for StubSource {
        fn fetch_one(&self, stock_no: &str, date: &str) -> Result<DayQuote> {
            if stock_no == self.failing_code {
                return Err(AppError::message("connection reset"));
            }
            Ok(DayQuote {
                code: stock_no.to_string(),
                date: format!("{}/01/15", date),
                close: "100.00".to_string(),
                ..Default::default()
            })
        }
    }

    fn entries() -> Vec<WatchEntry> {
        [("2330", "台積電"), ("2317", "鴻海"), ("2454", "聯發科")]
            .into_iter()
            .map(|(code, name)| WatchEntry {
                code: code.to_string(),
                name: name.to_string(),
            })
            .collect()
    }

    #[test]
    fn one_failure_out_of_three_still_completes() {
        let source = StubSource {
            failing_code: "2317",
        };

        let report = run(&source, &entries(), "113", Duration::ZERO);

        assert_eq!(report.total(), 3);
        assert_eq!(report.succeeded, 2);
        match &report.outcomes[1] {
            BatchOutcome::Failed { code, name } => {
                assert_eq!(code, "2317");
                assert_eq!(name, "鴻海");
            }
            other => panic!("expected failure outcome, got {other:?}"),
        }
    }

    #[test]
    fn entries_run_in_list_order() {
        let source = StubSource { failing_code: "" };

        let report = run(&source, &entries(), "113", Duration::ZERO);

        let codes: Vec<&str> = report
            .outcomes
            .iter()
            .map(|outcome| match outcome {
                BatchOutcome::Quote(quote) => quote.code.as_str(),
                BatchOutcome::Failed { code, .. } => code.as_str(),
            })
            .collect();
        assert_eq!(codes, ["2330", "2317", "2454"]);
    }

    #[test]
    fn success_merges_watch_list_name() {
        let source = StubSource { failing_code: "" };

        let report = run(&source, &entries()[..1], "113", Duration::ZERO);

        match &report.outcomes[0] {
            BatchOutcome::Quote(quote) => assert_eq!(quote.name.as_deref(), Some("台積電")),
            other => panic!("expected quote outcome, got {other:?}"),
        }
    }
}

use unicode_width::UnicodeWidthStr;

use crate::quote::{Cell, DayQuote};

/// Render column headers plus data rows as a bordered table, with column
/// widths derived from the widest cell. Widths are display columns, not
/// byte or char counts, so CJK headers line up.
pub fn render(headers: &[String], rows: &[&[Cell]]) {
    let mut all_rows: Vec<Vec<String>> = Vec::with_capacity(rows.len() + 1);
    all_rows.push(headers.to_vec());
    for row in rows {
        all_rows.push(row.iter().map(|cell| cell.display_text().into_owned()).collect());
    }

    let col_count = all_rows.iter().map(Vec::len).max().unwrap_or(0);
    if col_count == 0 {
        return;
    }

    let mut col_widths = vec![0usize; col_count];
    for row in &all_rows {
        for (i, cell) in row.iter().enumerate() {
            col_widths[i] = col_widths[i].max(cell.width());
        }
    }

    let border = format!(
        "+{}+",
        col_widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("+")
    );

    println!("{}", border);
    for (row_idx, row) in all_rows.iter().enumerate() {
        let formatted = col_widths
            .iter()
            .enumerate()
            .map(|(i, width)| {
                let cell = row.get(i).map(String::as_str).unwrap_or("");
                format!(" {} ", pad_right(cell, *width))
            })
            .collect::<Vec<_>>()
            .join("|");
        println!("|{}|", formatted);

        if row_idx == 0 {
            println!("{}", border);
        }
    }
    println!("{}", border);
}

// Fixed batch column widths so rows can stream out one query at a time.
const CODE_W: usize = 6;
const NAME_W: usize = 10;
const DATE_W: usize = 12;
const PRICE_W: usize = 12;
const VOLUME_W: usize = 15;

pub const BATCH_FAILED_MARKER: &str = "query failed";

pub fn batch_rule() -> String {
    "=".repeat(CODE_W + NAME_W + DATE_W + PRICE_W * 4 + VOLUME_W * 2)
}

pub fn batch_header() -> String {
    format!(
        "{}{}{}{}{}{}{}{}{}",
        pad_left("Code", CODE_W),
        pad_left("Name", NAME_W),
        pad_left("Date", DATE_W),
        pad_right("Open", PRICE_W),
        pad_right("High", PRICE_W),
        pad_right("Low", PRICE_W),
        pad_right("Close", PRICE_W),
        pad_right("Volume", VOLUME_W),
        pad_right("Amount", VOLUME_W),
    )
}

pub fn batch_quote_row(quote: &DayQuote) -> String {
    format!(
        "{}{}{}{}{}{}{}{}{}",
        pad_left(&quote.code, CODE_W),
        pad_left(quote.name.as_deref().unwrap_or(""), NAME_W),
        pad_left(&quote.date, DATE_W),
        pad_right(&quote.open, PRICE_W),
        pad_right(&quote.high, PRICE_W),
        pad_right(&quote.low, PRICE_W),
        pad_right(&quote.close, PRICE_W),
        pad_right(&quote.volume, VOLUME_W),
        pad_right(&quote.amount, VOLUME_W),
    )
}

pub fn batch_failed_row(code: &str, name: &str) -> String {
    format!(
        "{}{}{}",
        pad_left(code, CODE_W),
        pad_left(name, NAME_W),
        pad_left(BATCH_FAILED_MARKER, DATE_W),
    )
}

/// Left-align `text` in `width` display columns.
fn pad_left(text: &str, width: usize) -> String {
    let padding = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(padding))
}

/// Right-align `text` in `width` display columns.
fn pad_right(text: &str, width: usize) -> String {
    let padding = width.saturating_sub(text.width());
    format!("{}{}", " ".repeat(padding), text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_row_carries_marker_after_code_and_name() {
        let row = batch_failed_row("2330", "台積電");
        assert!(row.starts_with("2330"));
        assert!(row.contains("台積電"));
        assert!(row.contains(BATCH_FAILED_MARKER));
    }

    #[test]
    fn quote_row_aligns_on_display_width() {
        let quote = DayQuote {
            code: "2330".to_string(),
            name: Some("台積電".to_string()),
            date: "113/01/15".to_string(),
            open: "612.00".to_string(),
            high: "615.00".to_string(),
            low: "608.00".to_string(),
            close: "610.00".to_string(),
            volume: "31,264,378".to_string(),
            amount: "19,061,871,332".to_string(),
        };

        let row = batch_quote_row(&quote);

        // "台積電" takes 6 display columns, so 4 spaces complete the
        // 10-column name field.
        assert!(row.contains("台積電    113/01/15"));
        assert!(row.ends_with("19,061,871,332"));
    }

    #[test]
    fn header_and_rule_share_total_width() {
        assert_eq!(batch_header().width(), batch_rule().len());
    }
}

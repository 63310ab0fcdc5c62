use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Context, Result};

/// One watch-list entry, read once at the start of a batch run and
/// read-only thereafter.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchEntry {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct WatchList {
    stocks: Vec<WatchEntry>,
}

/// Load the watch list from a JSON file of the form
/// `{"stocks": [{"code": "2330", "name": "..."}]}`. A missing file or a
/// body without a `stocks` array is an error; the batch path treats it as
/// fatal for that run only.
pub fn load(path: impl AsRef<Path>) -> Result<Vec<WatchEntry>> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read watch list {}", path.display()))?;
    let entries = parse(&raw)
        .with_context(|| format!("failed to parse watch list {}", path.display()))?;
    Ok(entries)
}

fn parse(raw: &str) -> Result<Vec<WatchEntry>> {
    let list: WatchList = serde_json::from_str(raw)?;
    Ok(list.stocks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_stocks_in_file_order() {
        let raw = r#"{
            "stocks": [
                {"code": "2330", "name": "台積電"},
                {"code": "2317", "name": "鴻海"}
            ]
        }"#;

        let entries = parse(raw).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].code, "2330");
        assert_eq!(entries[0].name, "台積電");
        assert_eq!(entries[1].code, "2317");
    }

    #[test]
    fn missing_stocks_array_is_an_error() {
        assert!(parse(r#"{"watch": []}"#).is_err());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(parse("not json").is_err());
    }

    #[test]
    fn entry_fields_default_to_empty() {
        let entries = parse(r#"{"stocks": [{"code": "2330"}]}"#).unwrap();
        assert_eq!(entries[0].name, "");
    }
}

use chrono::Local;

/// Convert a Gregorian `YYYYMMDD` date into the ROC calendar form the
/// exchange uses (`YYY/MM/DD`, ROC year = Gregorian year - 1911, year
/// un-padded).
///
/// Returns `None` when the input is not exactly 8 ASCII characters or the
/// year part is not numeric. Month and day are passed through as sliced;
/// out-of-range values produce a nonsensical date rather than an error.
pub fn roc_date(gregorian: &str) -> Option<String> {
    if gregorian.len() != 8 || !gregorian.is_ascii() {
        return None;
    }

    let year: i32 = gregorian[0..4].parse().ok()?;
    let month = &gregorian[4..6];
    let day = &gregorian[6..8];

    Some(format!("{}/{}/{}", year - 1911, month, day))
}

/// Current local date as `YYYYMMDD`, the default query date.
pub fn today_gregorian() -> String {
    Local::now().format("%Y%m%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_gregorian_to_roc() {
        assert_eq!(roc_date("20240115").as_deref(), Some("113/01/15"));
        assert_eq!(roc_date("19990607").as_deref(), Some("88/06/07"));
    }

    #[test]
    fn rejects_wrong_length() {
        assert_eq!(roc_date(""), None);
        assert_eq!(roc_date("2024011"), None);
        assert_eq!(roc_date("202401155"), None);
    }

    #[test]
    fn rejects_non_numeric_year() {
        assert_eq!(roc_date("abcd0115"), None);
        assert_eq!(roc_date("二〇二四0115"), None);
    }

    #[test]
    fn does_not_validate_month_or_day() {
        // Known looseness: length-8 numeric input is converted as-is.
        assert_eq!(roc_date("20241399").as_deref(), Some("113/13/99"));
    }

    #[test]
    fn today_is_eight_digits() {
        let today = today_gregorian();
        assert_eq!(today.len(), 8);
        assert!(today.chars().all(|c| c.is_ascii_digit()));
    }
}

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static DIGIT_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").unwrap());

/// Serialized-date marker the feed emits for date-typed cells, with a
/// zero-based month: `Date(2024,0,15)` is the 15th of January 2024.
static DATE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Date\(([0-9]+),([0-9]+),([0-9]+)").unwrap());

/// Every maximal digit run in `text`, left to right. Runs that do not fit a
/// `u32` are skipped. Non-numeric or empty input yields an empty list.
pub fn number_list(text: &str) -> Vec<u32> {
    DIGIT_RUNS
        .find_iter(text)
        .filter_map(|m| m.as_str().parse().ok())
        .collect()
}

/// Newline-separated play lines. A line survives only when its digit runs
/// form exactly one six-number play; anything else is dropped silently.
/// Surviving plays keep line order.
pub fn play_groups(text: &str) -> Vec<[u32; 6]> {
    text.split('\n')
        .map(number_list)
        .filter_map(|nums| <[u32; 6]>::try_from(nums).ok())
        .collect()
}

/// Normalize a stringified date cell to `DD-MM-YYYY` display form.
///
/// Cells carrying the feed's `Date(y,m0,d)` marker are reformatted with the
/// month incremented (the marker encodes it zero-based) and day/month padded
/// to two digits. A marker whose components do not form a real calendar date
/// passes through unchanged, the same as any other string form. Empty input
/// yields the empty string.
pub fn feed_date(text: &str) -> String {
    if let Some(caps) = DATE_MARKER.captures(text) {
        let parsed = (
            caps[1].parse::<i32>(),
            caps[2].parse::<u32>(),
            caps[3].parse::<u32>(),
        );
        if let (Ok(year), Ok(month0), Ok(day)) = parsed {
            let date = month0
                .checked_add(1)
                .and_then(|month| NaiveDate::from_ymd_opt(year, month, day));
            if let Some(date) = date {
                return date.format("%d-%m-%Y").to_string();
            }
        }
    }
    text.to_string()
}

/// Digits-only currency parse: `"$1.234.567"` becomes `1234567`. Input
/// without digits, or digits that overflow, yields 0.
pub fn currency(text: &str) -> u64 {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_list_digit_runs_in_order() {
        assert_eq!(number_list("3 - 11 - 25 - 40"), vec![3, 11, 25, 40]);
        assert_eq!(number_list("07,2,19"), vec![7, 2, 19]);
        assert_eq!(number_list(""), Vec::<u32>::new());
        assert_eq!(number_list("sin datos"), Vec::<u32>::new());
    }

    #[test]
    fn test_number_list_skips_overflowing_runs() {
        assert_eq!(number_list("5 99999999999999999999 7"), vec![5, 7]);
    }

    #[test]
    fn test_play_groups_keeps_only_six_number_lines() {
        let cell = "1 2 3 4 5 6\n7 8 9 10 11\n12 13 14 15 16 17 18\n19-20-21-22-23-24";
        let plays = play_groups(cell);
        assert_eq!(plays, vec![[1, 2, 3, 4, 5, 6], [19, 20, 21, 22, 23, 24]]);
    }

    #[test]
    fn test_play_groups_collapses_blank_lines() {
        let cell = "1 2 3 4 5 6\n\n\n7 8 9 10 11 12";
        assert_eq!(
            play_groups(cell),
            vec![[1, 2, 3, 4, 5, 6], [7, 8, 9, 10, 11, 12]]
        );
        assert!(play_groups("").is_empty());
    }

    #[test]
    fn test_feed_date_reformats_marker() {
        assert_eq!(feed_date("Date(2024,0,15)"), "15-01-2024");
        assert_eq!(feed_date("Date(2023,11,3)"), "03-12-2023");
    }

    #[test]
    fn test_feed_date_passes_other_forms_through() {
        assert_eq!(feed_date("13-06-2024"), "13-06-2024");
        assert_eq!(feed_date(""), "");
        // month 12 zero-based would be month 13; not a date, so untouched
        assert_eq!(feed_date("Date(2024,12,40)"), "Date(2024,12,40)");
    }

    #[test]
    fn test_currency_strips_non_digits() {
        assert_eq!(currency("$1.234.567"), 1_234_567);
        assert_eq!(currency("CLP 8.500 millones"), 8_500);
        assert_eq!(currency(""), 0);
        assert_eq!(currency("sin pozo"), 0);
    }
}

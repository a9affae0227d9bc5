use chrono::{Datelike, Local};

use super::names::strip_quotes;

/// Earliest year accepted as a release year.
pub const MIN_YEAR: i64 = 1000;

/// Trimmed value, or `None` when blank.
pub fn safe_str(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Lenient integer parse: `"2020.7"` → 2020, anything unparseable → 0.
pub fn safe_int(value: &str) -> i64 {
    match value.trim().parse::<f64>() {
        Ok(f) if f.is_finite() => f.trunc() as i64,
        _ => 0,
    }
}

/// Keep a genre only if it contains at least one ASCII letter.
pub fn sanitize_genre(genre: &str) -> Option<String> {
    let g = strip_quotes(genre.trim()).trim();
    g.chars()
        .any(|c| c.is_ascii_alphabetic())
        .then(|| g.to_string())
}

/// Year within `[MIN_YEAR, current_year]`, otherwise `None`.
pub fn sanitize_year_in(value: &str, current_year: i64) -> Option<i64> {
    let y = safe_int(value);
    (MIN_YEAR..=current_year).contains(&y).then_some(y)
}

pub fn sanitize_year(value: &str) -> Option<i64> {
    sanitize_year_in(value, i64::from(Local::now().year()))
}

/// `m:ss` rendering of a duration in seconds; zero renders as `0:00`.
pub fn format_duration(seconds: i64) -> String {
    format!("{}:{:02}", seconds.div_euclid(60), seconds.rem_euclid(60))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genres_need_a_letter() {
        assert_eq!(sanitize_genre("\"1234\""), None);
        assert_eq!(sanitize_genre("1234"), None);
        assert_eq!(sanitize_genre("--"), None);
        assert_eq!(sanitize_genre(""), None);
        assert_eq!(sanitize_genre("Lo-Fi"), Some("Lo-Fi".to_string()));
        assert_eq!(sanitize_genre(" \"Rock\" "), Some("Rock".to_string()));
        assert_eq!(sanitize_genre("80s"), Some("80s".to_string()));
    }

    #[test]
    fn years_are_bounded() {
        assert_eq!(sanitize_year_in("1899", 2024), Some(1899));
        assert_eq!(sanitize_year_in("3000", 2024), None);
        assert_eq!(sanitize_year_in("2024", 2024), Some(2024));
        assert_eq!(sanitize_year_in("999", 2024), None);
        assert_eq!(sanitize_year_in("1999.9", 2024), Some(1999));
        assert_eq!(sanitize_year_in("", 2024), None);
        assert_eq!(sanitize_year_in("n/a", 2024), None);
        assert_eq!(sanitize_year("1970"), Some(1970));
    }

    #[test]
    fn integers_are_lenient() {
        assert_eq!(safe_int("42"), 42);
        assert_eq!(safe_int(" 7.9 "), 7);
        assert_eq!(safe_int("-3.5"), -3);
        assert_eq!(safe_int("abc"), 0);
        assert_eq!(safe_int("inf"), 0);
        assert_eq!(safe_str("  x "), Some("x".to_string()));
        assert_eq!(safe_str("   "), None);
    }

    #[test]
    fn durations() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(5), "0:05");
        assert_eq!(format_duration(200), "3:20");
        assert_eq!(format_duration(3600), "60:00");
    }
}

//! Token-level parsers. None of these fail the caller: a token that cannot be
//! read resolves to `None` and the caller decides whether to log it.

use once_cell::sync::OnceCell;
use regex::Regex;

/// Decimal value of `token`, or `None` when it is empty or not a number.
#[must_use]
pub fn parse_number(token: &str) -> Option<f64> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    token.parse::<f64>().ok()
}

/// Integral value of `token`, or `None` when it is empty or not an integer.
#[must_use]
pub fn parse_integer(token: &str) -> Option<i32> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    token.parse::<i32>().ok()
}

/// Text value of `token`; empty tokens are absent.
#[must_use]
pub fn parse_text(token: &str) -> Option<String> {
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Cheap pre-filter: `YYYY-MM-DD` followed by anything.
#[must_use]
pub fn looks_like_date(token: &str) -> bool {
    static DATE_SHAPE: OnceCell<std::result::Result<Regex, String>> = OnceCell::new();
    let regex = DATE_SHAPE
        .get_or_init(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}").map_err(|err| err.to_string()));
    match regex {
        Ok(re) => re.is_match(token),
        Err(msg) => {
            tracing::error!(target = "quakebase::decode", error = %msg, "date shape regex init failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers() {
        assert_eq!(parse_number("5.2"), Some(5.2));
        assert_eq!(parse_number("-118.25"), Some(-118.25));
        assert_eq!(parse_number(" 10.0 "), Some(10.0));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("1.2.3"), None);
    }

    #[test]
    fn integers() {
        assert_eq!(parse_integer("120"), Some(120));
        assert_eq!(parse_integer("-7"), Some(-7));
        assert_eq!(parse_integer(""), None);
        assert_eq!(parse_integer("12.5"), None);
        assert_eq!(parse_integer("99999999999"), None);
    }

    #[test]
    fn text_tokens() {
        assert_eq!(parse_text("Mw"), Some("Mw".to_string()));
        assert_eq!(parse_text(""), None);
    }

    #[test]
    fn date_shape() {
        assert!(looks_like_date("2020-01-01 00:00:00+00:00"));
        assert!(looks_like_date("2020-01-01"));
        assert!(looks_like_date("2020-13-45garbage"));
        assert!(!looks_like_date("not-a-date"));
        assert!(!looks_like_date("20-01-01"));
        assert!(!looks_like_date(""));
        assert!(!looks_like_date(" 2020-01-01"));
    }
}

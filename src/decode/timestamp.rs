//! Catalog timestamps: `YYYY-MM-DD HH:MM:SS[.ffffff]±HH:MM`, tried in a fixed order.

use std::borrow::Cow;

use chrono::{DateTime, FixedOffset};

/// Accepted textual layouts, in the order they are attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampLayout {
    /// Six fractional digits (microseconds) before the offset.
    Microseconds,
    /// Whole seconds before the offset.
    Seconds,
}

impl TimestampLayout {
    pub const ORDER: [Self; 2] = [Self::Microseconds, Self::Seconds];

    #[must_use]
    pub fn pattern(self) -> &'static str {
        match self {
            Self::Microseconds => "%Y-%m-%d %H:%M:%S%.6f%:z",
            Self::Seconds => "%Y-%m-%d %H:%M:%S%:z",
        }
    }

    fn parse(self, token: &str) -> Option<DateTime<FixedOffset>> {
        // chrono treats `%.6f` as optional with any digit count; pin it to exactly six.
        if self == Self::Microseconds && fraction_digits(token) != Some(6) {
            return None;
        }
        DateTime::parse_from_str(token, self.pattern()).ok()
    }
}

/// Parse `token` with each layout in turn; `None` if every layout fails.
#[must_use]
pub fn parse_timestamp(token: &str) -> Option<DateTime<FixedOffset>> {
    parse_timestamp_with_layout(token).map(|(datetime, _)| datetime)
}

/// Like [`parse_timestamp`], also reporting which layout matched.
#[must_use]
pub fn parse_timestamp_with_layout(
    token: &str,
) -> Option<(DateTime<FixedOffset>, TimestampLayout)> {
    let token = normalize_zulu(token);
    TimestampLayout::ORDER
        .into_iter()
        .find_map(|layout| layout.parse(&token).map(|datetime| (datetime, layout)))
}

fn normalize_zulu(token: &str) -> Cow<'_, str> {
    match token.strip_suffix('Z') {
        Some(head) => Cow::Owned(format!("{head}+00:00")),
        None => Cow::Borrowed(token),
    }
}

fn fraction_digits(token: &str) -> Option<usize> {
    let (_, tail) = token.split_once('.')?;
    Some(tail.bytes().take_while(u8::is_ascii_digit).count())
}

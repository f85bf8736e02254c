//! Turns raw record strings into the strings printed on the form.
//!
//! Birth dates are strict: they must parse or rendering stops. Timeline
//! tokens and addresses are lenient and degrade to blank or partial output,
//! logging a warning so the degradation can be noticed.

use crate::FormatError;
use crate::calendar::{self, Clock, DateStyle};
use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

/// Timeline token meaning "ongoing as of the render date".
pub const PRESENT_SENTINEL: &str = "現在";
const PRESENT_SENTINEL_ASCII: &str = "present";

static TIMELINE_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{4})(?:-| +)([0-9]{1,2})$")
        .expect("timeline date pattern is valid")
});

static POSTAL_CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(〒\s*)?([0-9０-９]{3})[-－‐]?([0-9０-９]{4})")
        .expect("postal code pattern is valid")
});

/// Year and month cells of one timeline row. Both are empty when the token
/// could not be understood.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YearMonth {
    pub year: String,
    pub month: String,
}

impl YearMonth {
    fn blank() -> Self {
        Self::default()
    }

    pub fn is_blank(&self) -> bool {
        self.year.is_empty() && self.month.is_empty()
    }
}

/// An address split into its postal code and the rest of the line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedAddress {
    /// `NNN-NNNN` in ASCII digits, or empty.
    pub postal_code: String,
    pub address: String,
}

pub fn parse_birth_date(iso: &str) -> Result<NaiveDate, FormatError> {
    match NaiveDate::parse_from_str(iso.trim(), "%Y-%m-%d") {
        Ok(date) => Ok(date),
        Err(_) => Err(FormatError::InvalidDate {
            input: iso.to_string(),
        }),
    }
}

/// `1995-06-04` → `1995年 6月 4日`.
pub fn format_birth_date(iso: &str) -> Result<String, FormatError> {
    format_birth_date_styled(iso, DateStyle::Western)
}

pub fn format_birth_date_styled(iso: &str, style: DateStyle) -> Result<String, FormatError> {
    let date = parse_birth_date(iso)?;
    Ok(format!(
        "{}年 {}月 {}日",
        calendar::display_year(date.year(), date.month(), style),
        date.month(),
        date.day()
    ))
}

/// `2025-02-10` → `2025年 2月 10日現在`, printed next to the title.
pub fn format_as_of(date: NaiveDate, style: DateStyle) -> String {
    format!(
        "{}年 {}月 {}日現在",
        calendar::display_year(date.year(), date.month(), style),
        date.month(),
        date.day()
    )
}

/// Parses a timeline token into a year and month, resolving the present
/// sentinel against `clock`. Returns `None` for anything unrecognized.
pub fn parse_timeline_date(token: &str, clock: &dyn Clock) -> Option<(i32, u32)> {
    let token = to_half_width(token);
    let token = token.trim();
    if token == PRESENT_SENTINEL || token.eq_ignore_ascii_case(PRESENT_SENTINEL_ASCII) {
        let today = clock.today();
        return Some((today.year(), today.month()));
    }

    let caps = TIMELINE_DATE.captures(token)?;
    let year = caps[1].parse::<i32>().ok()?;
    let month = caps[2].parse::<u32>().ok()?;
    (1..=12).contains(&month).then_some((year, month))
}

/// Formats a timeline token for the year and month columns.
///
/// Recognizes `YYYY-MM`, `YYYY MM` and the present sentinel, with full-width
/// digits, hyphens and spaces accepted. Anything else yields blank cells
/// rather than an error.
pub fn format_timeline_date(token: &str, clock: &dyn Clock) -> YearMonth {
    format_timeline_date_styled(token, clock, DateStyle::Western)
}

pub fn format_timeline_date_styled(
    token: &str,
    clock: &dyn Clock,
    style: DateStyle,
) -> YearMonth {
    match parse_timeline_date(token, clock) {
        Some((year, month)) => YearMonth {
            year: calendar::display_year(year, month, style),
            month: month.to_string(),
        },
        None => {
            if token.trim().is_empty() {
                log::debug!("Empty timeline date token, leaving year and month blank");
            } else {
                log::warn!(
                    "Unrecognized timeline date token {:?}, leaving year and month blank",
                    token
                );
            }
            YearMonth::blank()
        }
    }
}

/// Splits a postal code (`〒166-0003`, `166-0003`, `1660003`) off an address
/// line, wherever it appears. Without a postal code the whole trimmed line is
/// the address.
///
/// A code without the `〒` marker must start the line or follow whitespace or
/// a colon, so house numbers are left alone.
pub fn parse_address(raw: &str) -> ParsedAddress {
    let mut from = 0;
    while let Some(caps) = POSTAL_CODE.captures_at(raw, from) {
        let Some(found) = caps.get(0) else { break };
        let before = &raw[..found.start()];
        let after = &raw[found.end()..];
        let marked = caps.get(1).is_some();

        // "1234-5678" or a longer digit run is not a postal code.
        let joined_after = after.chars().next().is_some_and(is_number_part);
        let joined_before = before
            .chars()
            .next_back()
            .is_some_and(|c| is_number_part(c) || (!marked && !is_separator(c)));

        if !joined_after && !joined_before {
            let postal_code = format!("{}-{}", to_half_width(&caps[2]), to_half_width(&caps[3]));
            return ParsedAddress {
                postal_code,
                address: join_around(before, after),
            };
        }
        let first = raw[found.start()..].chars().next();
        from = found.start() + first.map_or(1, char::len_utf8);
    }

    log::debug!("No postal code found in address {:?}", raw);
    ParsedAddress {
        postal_code: String::new(),
        address: raw.trim().to_string(),
    }
}

/// Rejoins the text on both sides of a removed postal code.
fn join_around(before: &str, after: &str) -> String {
    let before = before.trim();
    let after = after.trim();
    if before.is_empty() || after.is_empty() || before.ends_with([':', '：']) {
        format!("{}{}", before, after)
    } else {
        format!("{} {}", before, after)
    }
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, ':' | '：')
}

fn is_number_part(c: char) -> bool {
    c.is_ascii_digit() || ('０'..='９').contains(&c) || matches!(c, '-' | '－' | '‐')
}

/// Maps full-width digits, hyphens and spaces to their ASCII forms.
fn to_half_width(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '０'..='９' => char::from_digit(c as u32 - '０' as u32, 10).unwrap_or(c),
            '－' | '‐' => '-',
            '\u{3000}' => ' ',
            _ => c,
        })
        .collect()
}

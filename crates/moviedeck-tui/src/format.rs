//! Number and date formatting for movie data.

use chrono::NaiveDate;

/// Formats a number with thousands separators (e.g. 169940 -> "169,940").
#[allow(clippy::arithmetic_side_effects)]
#[must_use]
pub fn fmt_thousands(n: u64, separator: char) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i).is_multiple_of(3) {
            result.push(separator);
        }
        result.push(c);
    }
    result
}

/// Returns `true` for Portuguese locales (`pt`, `pt-BR`, `pt-PT`).
fn is_portuguese(language: &str) -> bool {
    language
        .split(['-', '_'])
        .next()
        .is_some_and(|lang| lang.eq_ignore_ascii_case("pt"))
}

/// Formats box office revenue for the given response language.
///
/// Portuguese locales render as `R$ 839.030.630`, everything else as
/// `$839,030,630`.
#[must_use]
pub fn fmt_revenue(revenue: u64, language: &str) -> String {
    if is_portuguese(language) {
        format!("R$ {}", fmt_thousands(revenue, '.'))
    } else {
        format!("${}", fmt_thousands(revenue, ','))
    }
}

/// Parses a TMDB `YYYY-MM-DD` date. Empty strings are `None`.
fn parse_date(date: Option<&str>) -> Option<NaiveDate> {
    let date = date?.trim();
    if date.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Formats a release date for display (`15/07/2010` in Portuguese locales).
///
/// Missing dates render as `-`; unparseable dates are shown verbatim.
#[must_use]
pub fn fmt_release_date(date: Option<&str>, language: &str) -> String {
    match (parse_date(date), date.map(str::trim)) {
        (Some(parsed), _) if is_portuguese(language) => parsed.format("%d/%m/%Y").to_string(),
        (Some(parsed), _) => parsed.format("%Y-%m-%d").to_string(),
        (None, Some(raw)) if !raw.is_empty() => String::from(raw),
        _ => String::from("-"),
    }
}

/// Extracts the release year, if the date parses.
#[must_use]
pub fn release_year(date: Option<&str>) -> Option<i32> {
    use chrono::Datelike;

    parse_date(date).map(|d| d.year())
}

/// Formats a vote average with one decimal.
#[must_use]
pub fn fmt_rating(vote_average: f64) -> String {
    format!("{vote_average:.1}")
}

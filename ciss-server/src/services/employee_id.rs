//! Registry id generation
//!
//! Ids look like `CISS/IOCL/2024-25/042`: a fixed company prefix, the client
//! abbreviation, the Indian financial year and a random 3-digit sequence.
//! The sequence is random rather than a reserved counter, so collisions are
//! possible at scale; the unique index on `employeeId` surfaces them at
//! insert time.

use chrono::{Datelike, NaiveDate, Utc};
use rand::Rng;

/// Fixed abbreviations for clients whose initials would be wrong or ambiguous
const KNOWN_ABBREVIATIONS: [(&str, &str); 2] = [
    ("Indian Oil Corporation Limited", "IOCL"),
    ("Oil India Limited", "OIL"),
];

/// Abbreviate a client display name for use in registry ids
///
/// Known names use the fixed table; multi-word names use initials
/// (whitespace and hyphens both split); short single words pass through,
/// longer ones are truncated to 4 chars. Always uppercase.
pub fn client_abbreviation(name: &str) -> String {
    let trimmed = name.trim();

    for (known, abbr) in KNOWN_ABBREVIATIONS {
        if trimmed.eq_ignore_ascii_case(known) {
            return abbr.to_string();
        }
    }

    let words: Vec<&str> = trimmed
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|w| !w.is_empty())
        .collect();

    if words.len() > 1 {
        words
            .iter()
            .filter_map(|w| w.chars().next())
            .collect::<String>()
            .to_uppercase()
    } else if trimmed.chars().count() <= 4 {
        trimmed.to_uppercase()
    } else {
        trimmed.chars().take(4).collect::<String>().to_uppercase()
    }
}

/// Indian financial year label for a date (April 1 – March 31)
pub fn financial_year_for(date: NaiveDate) -> String {
    let year = date.year();
    if date.month() >= 4 {
        format!("{}-{:02}", year, (year + 1) % 100)
    } else {
        format!("{}-{:02}", year - 1, year % 100)
    }
}

/// Financial year label for today
pub fn current_financial_year() -> String {
    financial_year_for(Utc::now().date_naive())
}

/// Assemble a registry id from its parts (deterministic core)
pub fn format_employee_id(client_name: &str, date: NaiveDate, sequence: u16) -> String {
    format!(
        "CISS/{}/{}/{:03}",
        client_abbreviation(client_name),
        financial_year_for(date),
        sequence
    )
}

/// Generate a fresh registry id for the client, dated today
///
/// Regenerating yields an unrelated id; nothing ties the old and new
/// sequence numbers together.
pub fn generate_employee_id(client_name: &str) -> String {
    let sequence = rand::thread_rng().gen_range(1..=999);
    format_employee_id(client_name, Utc::now().date_naive(), sequence)
}

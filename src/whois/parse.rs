//! Conversion of `whois-service` responses.

use chrono::{DateTime, Utc};
use whois_service::WhoisResponse;

use super::types::WhoisRecord;

/// Converts the crate's parsed data to a `WhoisRecord`.
///
/// A response without parsed data yields an empty record, which the expiry
/// check reports as an error.
pub(crate) fn convert_parsed_data(response: &WhoisResponse) -> WhoisRecord {
    let Some(parsed) = &response.parsed_data else {
        return WhoisRecord::default();
    };

    WhoisRecord {
        expiration_date: parsed.expiration_date.as_deref().and_then(parse_date_string),
        creation_date: parsed.creation_date.as_deref().and_then(parse_date_string),
        registrar: parsed.registrar.clone(),
        status: parsed.status.clone(),
        nameservers: parsed.name_servers.clone(),
    }
}

/// Attempts to parse a date string in various formats
pub(crate) fn parse_date_string(date_str: &str) -> Option<DateTime<Utc>> {
    let date_str = date_str.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Some(dt.with_timezone(&Utc));
    }

    // Drop trailing zone annotations such as "UTC" or "(JST)"
    let date_str = date_str
        .split_once(" (")
        .map(|(head, _)| head)
        .unwrap_or(date_str)
        .trim_end_matches(" UTC")
        .trim_end_matches(" GMT")
        .trim();

    // Try common WHOIS date formats
    let formats = [
        "%Y-%m-%dT%H:%M:%S%.fZ",
        "%Y-%m-%dT%H:%M:%SZ",
        "%Y-%m-%dT%H:%M:%S%z",
        "%Y-%m-%d %H:%M:%S%z",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d",
        "%Y.%m.%d %H:%M:%S",
        "%Y.%m.%d",
        "%Y/%m/%d",
        "%d-%b-%Y",
        "%d.%m.%Y",
        "%d/%m/%Y",
    ];

    for format in &formats {
        if let Ok(dt) = DateTime::parse_from_str(date_str, format) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(naive_dt) = chrono::NaiveDateTime::parse_from_str(date_str, format) {
            return Some(naive_dt.and_utc());
        }
        if let Ok(naive_date) = chrono::NaiveDate::parse_from_str(date_str, format) {
            return Some(naive_date.and_hms_opt(0, 0, 0)?.and_utc());
        }
    }

    None
}

//! DNS record extraction utilities.
//!
//! Helpers to pick SPF and DMARC records out of TXT answers and to normalize
//! TXT text from the DoH JSON API.

/// Extracts SPF record from TXT records.
///
/// SPF records start with "v=spf1".
pub fn extract_spf_record(txt_records: &[String]) -> Option<String> {
    txt_records
        .iter()
        .map(|txt| txt.trim())
        .find(|txt| txt.starts_with("v=spf1"))
        .map(str::to_string)
}

/// Extracts DMARC record from TXT records.
///
/// DMARC records live at `_dmarc.<domain>` and start with "v=DMARC1".
pub fn extract_dmarc_record(txt_records: &[String]) -> Option<String> {
    txt_records
        .iter()
        .map(|txt| txt.trim())
        .find(|txt| txt.starts_with("v=DMARC1"))
        .map(str::to_string)
}

/// Turns `"part one" "part two"` (DoH presentation form) into `part onepart two`.
pub(crate) fn normalize_txt(data: &str) -> String {
    let trimmed = data.trim();
    if !trimmed.starts_with('"') {
        return trimmed.to_string();
    }
    trimmed
        .split("\" \"")
        .map(|part| part.trim_matches('"'))
        .collect::<Vec<&str>>()
        .join("")
}

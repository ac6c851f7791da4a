//! Frequency descriptor → daily-dose multiplier
//!
//! A fixed lookup from common dosing-frequency phrases and abbreviations to
//! the number of doses per day. Unrecognized descriptors default to 1, and
//! PRN ("as needed") is deliberately counted as a single daily dose.

/// Number of doses per day for a frequency descriptor.
///
/// Matching is case-insensitive and trims surrounding whitespace. Every
/// interval phrase has a single multiplier; "every 6 hours"/"q6h" is four
/// doses per day.
pub fn daily_multiplier(frequency: &str) -> u32 {
    match frequency.to_lowercase().trim() {
        "once daily" | "daily" | "qd" => 1,
        "twice daily" | "bid" | "q12h" | "every 12 hours" => 2,
        "three times daily" | "tid" | "q8h" | "every 8 hours" => 3,
        "four times daily" | "qid" | "q6h" | "every 6 hours" => 4,
        "every 4 hours" | "q4h" => 6,
        "prn" | "as needed" => 1,
        _ => 1,
    }
}

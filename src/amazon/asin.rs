//! ASIN normalization.
//!
//! Offer listings are keyed by the 10-character ASIN. Books are often typed
//! as a hyphenated ISBN-13, whose last ten characters line up with the ASIN
//! for the purposes of the listing URL.

/// Length of an ISBN-13 once separators are removed.
const ISBN13_LEN: usize = 13;

/// Number of leading characters (the "978"/"979" prefix) dropped from an ISBN-13.
const ISBN13_PREFIX_LEN: usize = 3;

/// Cleans a raw identifier into the form used in the offer-listing URL.
///
/// Spaces and hyphens are removed. A 13-character result loses its first
/// three characters. Nothing else is validated: malformed input passes
/// through and simply yields a listing page that does not exist.
pub fn normalize(raw: &str) -> String {
    let cleaned: String = raw.chars().filter(|c| *c != ' ' && *c != '-').collect();

    if cleaned.chars().count() == ISBN13_LEN {
        cleaned.chars().skip(ISBN13_PREFIX_LEN).collect()
    } else {
        cleaned
    }
}

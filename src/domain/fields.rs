//! Derived-field calculations.
//!
//! These values are always recomputed server-side at write time and never
//! trusted from client input: age from birth date, normalized IBAN, and
//! the asset reference derived from an asset URL. All three functions are
//! pure and idempotent.

use chrono::{DateTime, NaiveDate, Utc};

/// Gregorian average year length (365.2425 days) in milliseconds.
///
/// Using the average-year constant instead of calendar-aware year
/// subtraction avoids leap-year edge drift around birthdays.
pub const AVERAGE_YEAR_MILLIS: i64 = 31_556_952_000;

/// Computes age as whole average-Gregorian-years elapsed between the
/// birth date (taken at midnight UTC) and `now`.
///
/// Returns 0 for birth dates at or after `now`.
#[must_use]
pub fn age_at(birth_date: NaiveDate, now: DateTime<Utc>) -> u32 {
    let birth = birth_date.and_hms_opt(0, 0, 0).map_or(now, |dt| dt.and_utc());
    let elapsed_ms = now.signed_duration_since(birth).num_milliseconds();
    if elapsed_ms <= 0 {
        return 0;
    }
    u32::try_from(elapsed_ms / AVERAGE_YEAR_MILLIS).unwrap_or(0)
}

/// Normalizes an IBAN: strips all whitespace and uppercases letters.
#[must_use]
pub fn normalize_iban(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Derives the stable asset reference from an asset URL.
///
/// Takes the final path segment, strips any query string or fragment,
/// then strips the file extension. Used to release an asset from the
/// store when no explicit asset id was recorded. Returns the input
/// unchanged when it does not look like a URL path.
#[must_use]
pub fn asset_ref_from_url(url: &str) -> String {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    let without_query = url.get(..end).unwrap_or(url);
    let segment = without_query
        .rsplit('/')
        .next()
        .unwrap_or(without_query);
    segment
        .rsplit_once('.')
        .map_or(segment, |(stem, _)| stem)
        .to_string()
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        let Some(date) = NaiveDate::from_ymd_opt(y, m, d) else {
            panic!("valid date");
        };
        date
    }

    #[test]
    fn age_uses_average_year_floor() {
        let birth = date(2000, 1, 1);
        let Some(now) = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).single() else {
            panic!("valid timestamp");
        };
        assert_eq!(age_at(birth, now), 24);
    }

    #[test]
    fn age_just_before_average_year_boundary() {
        let birth = date(2000, 1, 1);
        // One day before the 24th average-year mark has elapsed.
        let Some(now) = Utc.with_ymd_and_hms(2023, 12, 25, 0, 0, 0).single() else {
            panic!("valid timestamp");
        };
        assert_eq!(age_at(birth, now), 23);
    }

    #[test]
    fn future_birth_date_yields_zero() {
        let birth = date(2100, 1, 1);
        assert_eq!(age_at(birth, Utc::now()), 0);
    }

    #[test]
    fn iban_is_stripped_and_uppercased() {
        assert_eq!(
            normalize_iban(" sa03 8000 0000 6080 1016 7519 "),
            "SA0380000000608010167519"
        );
    }

    #[test]
    fn iban_normalization_is_idempotent() {
        let once = normalize_iban(" sa03 8000 0000 6080 1016 7519 ");
        assert_eq!(normalize_iban(&once), once);
    }

    #[test]
    fn asset_ref_strips_path_query_and_extension() {
        assert_eq!(
            asset_ref_from_url("https://assets.example.com/ids/a1b2c3.jpg?v=2"),
            "a1b2c3"
        );
        assert_eq!(asset_ref_from_url("photos/55ef"), "55ef");
        assert_eq!(asset_ref_from_url("plain-ref"), "plain-ref");
    }

    #[test]
    fn asset_ref_is_idempotent() {
        let once = asset_ref_from_url("https://assets.example.com/ids/a1b2c3.jpg");
        assert_eq!(asset_ref_from_url(&once), once);
    }
}

//! Expiry header timestamps
//!
//! Version-pinned assets are immutable and get an Expires header ten years
//! out; the version document and "latest" assets get one minute, so clients
//! revalidate shortly after every deploy. Both functions take the current
//! instant as a parameter so tests can pin the clock.

use chrono::{DateTime, Datelike, Duration, Utc};

/// HTTP-date format, e.g. `Fri, 01 Jan 2030 00:00:00 GMT`
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Expiry for immutable, version-pinned assets: ten years from now.
pub fn far_future_expiry(now: DateTime<Utc>) -> String {
    // Feb 29 + 10 years has no same-date equivalent; roll forward a day.
    let expiry = now
        .with_year(now.year() + 10)
        .unwrap_or_else(|| (now + Duration::days(1)).with_year(now.year() + 10).unwrap_or(now));
    format_http_date(expiry)
}

/// Expiry for mutable "latest" assets: one minute from now.
pub fn near_future_expiry(now: DateTime<Utc>) -> String {
    format_http_date(now + Duration::minutes(1))
}

fn format_http_date(instant: DateTime<Utc>) -> String {
    instant.format(HTTP_DATE_FORMAT).to_string()
}

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Default timezone for business dates.
/// Due dates are calendar dates in the lender's local market, so "today" must be
/// derived in that timezone rather than in UTC.
pub const DEFAULT_REPORTING_TZ: Tz = chrono_tz::Asia::Kolkata;

/// Converts a UTC instant to a business date in the given timezone.
///
/// This is the single source of truth for converting instants to domain dates.
/// Overdue detection compares due dates against the value returned here.
pub fn business_date_from_utc(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Convenience function that uses the default reporting timezone.
pub fn business_date_today() -> NaiveDate {
    business_date_from_utc(Utc::now(), DEFAULT_REPORTING_TZ)
}

pub fn utc_now_naive() -> NaiveDateTime {
    Utc::now().naive_utc()
}

// ⏰ Calendar arithmetic
// Ages and look-back windows are whole calendar years, never day counts.

use chrono::{Datelike, Months, NaiveDate};

/// Whole years from `from` to `to`.
///
/// A year counts once its anniversary is reached, so someone born on
/// 15-11-2005 is 17 on 14-11-2023 and 18 on 15-11-2023. A Feb 29 birthday
/// is reached on Mar 1 in non-leap years. Negative when `to` precedes `from`.
pub fn whole_years_between(from: NaiveDate, to: NaiveDate) -> i32 {
    if to < from {
        return -whole_years_between(to, from);
    }

    let mut years = to.year() - from.year();
    if (to.month(), to.day()) < (from.month(), from.day()) {
        years -= 1;
    }
    years
}

/// Age in whole years on `on` for someone born on `birth_date`
pub fn age_on(birth_date: NaiveDate, on: NaiveDate) -> i32 {
    whole_years_between(birth_date, on)
}

/// The same calendar day `years` earlier, Feb 29 clamped to Feb 28.
pub fn years_before(date: NaiveDate, years: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(years * 12))
        .unwrap_or(NaiveDate::MIN)
}

//! Gregorian leap-year rule.

/// Returns `true` if `year` is a Gregorian leap year.
///
/// Divisible by 400: leap. Otherwise divisible by 100: common.
/// Otherwise divisible by 4: leap. Everything else is common.
///
/// # Examples
///
/// ```
/// use hydat_calendar::is_leap_year;
///
/// assert!(is_leap_year(2000));
/// assert!(!is_leap_year(1900));
/// assert!(is_leap_year(2004));
/// assert!(!is_leap_year(2023));
/// ```
pub fn is_leap_year(year: i32) -> bool {
    if year % 400 == 0 {
        true
    } else if year % 100 == 0 {
        false
    } else {
        year % 4 == 0
    }
}

/// Number of calendar days in `year` (365 or 366).
pub fn days_in_year(year: i32) -> u16 {
    if is_leap_year(year) { 366 } else { 365 }
}

//! Date-string handling for report filters.
//!
//! Report endpoints accept either a bare `YYYY-MM-DD` date or a full
//! `YYYY-MM-DD HH:MM:SS` timestamp. Bare dates are widened to cover the
//! whole day before they reach the stored functions.

use chrono::Utc;

/// Widens a bare date to the start of that day. Values already carrying
/// a time component pass through untouched.
pub fn widen_lower_bound(value: &str) -> String {
    if value.contains(':') {
        value.to_string()
    } else {
        format!("{value} 00:00:00")
    }
}

/// Widens a bare date to the end of that day.
pub fn widen_upper_bound(value: &str) -> String {
    if value.contains(':') {
        value.to_string()
    } else {
        format!("{value} 23:59:59")
    }
}

/// Today's date as `YYYY-MM-DD`, used when a report defaults its window.
pub fn today() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_dates_are_widened_to_full_days() {
        assert_eq!(widen_lower_bound("2024-03-01"), "2024-03-01 00:00:00");
        assert_eq!(widen_upper_bound("2024-03-01"), "2024-03-01 23:59:59");
    }

    #[test]
    fn timestamps_pass_through() {
        assert_eq!(
            widen_lower_bound("2024-03-01 08:30:00"),
            "2024-03-01 08:30:00"
        );
        assert_eq!(
            widen_upper_bound("2024-03-01 08:30:00"),
            "2024-03-01 08:30:00"
        );
    }

    #[test]
    fn today_is_a_bare_date() {
        let d = today();
        assert_eq!(d.len(), 10);
        assert!(!d.contains(':'));
    }
}

use chrono::{DateTime, Utc};

/// `Nov 14, 2023 22:13` (UTC).
#[must_use]
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.format("%b %-d, %Y %H:%M").to_string()
}

/// `Nov 14, 2023`
#[must_use]
pub fn format_date(value: DateTime<Utc>) -> String {
    value.format("%b %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use study_core::time::fixed_now;

    #[test]
    fn formats_fixed_timestamp() {
        assert_eq!(format_datetime(fixed_now()), "Nov 14, 2023 22:13");
        assert_eq!(format_date(fixed_now()), "Nov 14, 2023");
    }
}

//! Shared utility functions for ECOS crates.

/// Date utility functions
pub mod dates {
    use chrono::NaiveDate;

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")?)
    }

    /// Parse a "YYYYMM" month stamp (ECOS key statistics format) into the
    /// first calendar day of that month.
    ///
    /// Exactly four year digits followed by two month digits are accepted;
    /// anything else yields `None`.
    pub fn parse_year_month(s: &str) -> Option<NaiveDate> {
        let s = s.trim();
        if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let year = s[0..4].parse::<i32>().ok()?;
        let month = s[4..6].parse::<u32>().ok()?;
        NaiveDate::from_ymd_opt(year, month, 1)
    }

}

/// Numeric coercion
pub mod numbers {
    /// Coerce a text value to a number.
    ///
    /// Leading/trailing whitespace is ignored. Text that is not a number, and
    /// `NaN`, map to `None`.
    pub fn parse_number(s: &str) -> Option<f64> {
        match s.trim().parse::<f64>() {
            Ok(v) if !v.is_nan() => Some(v),
            _ => None,
        }
    }

    #[cfg(test)]
    mod tests {
        use super::parse_number;

        #[test]
        fn test_parse_number() {
            assert_eq!(parse_number("10"), Some(10.0));
            assert_eq!(parse_number(" 3.5 "), Some(3.5));
            assert_eq!(parse_number("-0.25"), Some(-0.25));
            assert_eq!(parse_number("1e3"), Some(1000.0));
        }

        #[test]
        fn test_parse_number_missing() {
            assert_eq!(parse_number("n/a"), None);
            assert_eq!(parse_number(""), None);
            assert_eq!(parse_number("1,234"), None);
            assert_eq!(parse_number("NaN"), None);
        }
    }
}

use chrono::NaiveDate;

/// Accepted due date patterns, paired with the digit count a candidate must
/// have once `/` separators are stripped.
const DATE_FORMATS: [(&str, usize); 2] = [("%d%m%Y", 8), ("%d/%m/%Y", 8)];

/// Strict due date validation against the two accepted display formats,
/// `ddMMyyyy` and `dd/MM/yyyy`.
///
/// The length gate runs before any parsing so that inputs like `1/1/2024`
/// are rejected rather than leniently widened, and the calendar parse itself
/// rejects impossible dates (`31042024`, month 13, non-digits).
pub fn is_valid_date(date: &str) -> bool {
    DATE_FORMATS.iter().any(|(format, digits)| {
        let stripped_len = date.chars().filter(|c| *c != '/').count();
        if stripped_len != *digits {
            return false;
        }

        NaiveDate::parse_from_str(date, format).is_ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_both_display_formats() {
        assert!(is_valid_date("01012024"));
        assert!(is_valid_date("01/01/2024"));
        assert!(is_valid_date("31122030"));
        assert!(is_valid_date("31/12/2030"));
    }

    #[test]
    fn rejects_empty_and_junk() {
        assert!(!is_valid_date(""));
        assert!(!is_valid_date("not a date"));
        assert!(!is_valid_date("abcdefgh"));
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(!is_valid_date("1/1/2024"));
        assert!(!is_valid_date("112024"));
        assert!(!is_valid_date("010120245"));
        assert!(!is_valid_date("01/01/24"));
    }

    #[test]
    fn rejects_misplaced_separators() {
        assert!(!is_valid_date("0101/2024"));
        assert!(!is_valid_date("01//01/2024"));
        assert!(!is_valid_date("01-01-2024"));
    }

    #[test]
    fn rejects_impossible_calendar_dates() {
        // April has 30 days.
        assert!(!is_valid_date("31042024"));
        assert!(!is_valid_date("31/04/2024"));
        assert!(!is_valid_date("32012024"));
        assert!(!is_valid_date("00012024"));
        assert!(!is_valid_date("01132024"));
    }

    #[test]
    fn handles_leap_years() {
        assert!(is_valid_date("29022024"));
        assert!(is_valid_date("29/02/2024"));
        assert!(!is_valid_date("29022023"));
        assert!(!is_valid_date("29/02/1900"));
        assert!(is_valid_date("29/02/2000"));
    }
}

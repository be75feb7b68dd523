use chrono::{Local, NaiveDate};

/// Canonical `yyyy-mm-dd` rendering of the local calendar date. Every
/// day-boundary comparison in the bot (quiz date, attempt date, good-deed
/// daily cap) goes through this one routine so they always agree.
pub fn today_string() -> String {
    format_date(Local::now().date_naive())
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_date_is_iso_day() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(format_date(date), "2024-03-07");
    }

    #[test]
    fn today_string_has_canonical_shape() {
        let today = today_string();
        assert_eq!(today.len(), 10);
        assert_eq!(today.as_bytes()[4], b'-');
        assert_eq!(today.as_bytes()[7], b'-');
    }
}

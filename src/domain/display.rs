use chrono::{DateTime, Local, TimeZone, Utc};

use super::Category;

/// Label shown for a category. Values without a known label are returned as-is.
pub fn display_category(category: &Category) -> String {
    category.label().to_string()
}

/// Short date (day, abbreviated month, year) in the local time zone,
/// e.g. "15 Mar 2024".
pub fn display_date(timestamp: DateTime<Utc>) -> String {
    display_date_in(timestamp, &Local)
}

/// Short date rendered in the given time zone.
pub fn display_date_in<Tz: TimeZone>(timestamp: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    timestamp.with_timezone(tz).format("%-d %b %Y").to_string()
}

#[cfg(test)]
mod tests {
    use chrono::FixedOffset;

    use super::*;

    #[test]
    fn test_display_known_categories() {
        assert_eq!(display_category(&Category::Salary), "Salary");
        assert_eq!(display_category(&Category::Food), "Food & Dining");
        assert_eq!(display_category(&Category::Shopping), "Shopping");
        assert_eq!(display_category(&Category::Transport), "Transportation");
        assert_eq!(display_category(&Category::Bills), "Bills");
        assert_eq!(display_category(&Category::Other), "Other");
    }

    #[test]
    fn test_display_unknown_category_passes_through() {
        let legacy = Category::from("entertainment");
        assert_eq!(display_category(&legacy), "entertainment");
    }

    #[test]
    fn test_display_date_in_zone() {
        let timestamp = Utc.with_ymd_and_hms(2024, 3, 15, 20, 0, 0).unwrap();
        assert_eq!(display_date_in(timestamp, &Utc), "15 Mar 2024");

        // 20:00 UTC is already the next day in India.
        let ist = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        assert_eq!(display_date_in(timestamp, &ist), "16 Mar 2024");
    }

    #[test]
    fn test_display_date_local_has_year() {
        let timestamp = Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap();
        assert!(display_date(timestamp).ends_with("2024"));
    }
}

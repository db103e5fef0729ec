use chrono::{DateTime, Utc};

use crate::draft::MAX_RATING;

/// "March 2025", shown as "Shared on …" under feed posts.
pub fn format_publish_date(created_at: &DateTime<Utc>) -> String {
    created_at.format("%B %Y").to_string()
}

/// "3/4/2025", used in the profile list.
pub fn format_short_date(created_at: &DateTime<Utc>) -> String {
    created_at.format("%-m/%-d/%Y").to_string()
}

pub fn star_bar(ratings: u8) -> String {
    let filled = ratings.min(MAX_RATING) as usize;
    let mut bar = "★".repeat(filled);
    bar.push_str(&"☆".repeat(MAX_RATING as usize - filled));
    bar
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn dates() {
        let at = Utc.with_ymd_and_hms(2025, 3, 4, 10, 0, 0).unwrap();
        assert_eq!(format_publish_date(&at), "March 2025");
        assert_eq!(format_short_date(&at), "3/4/2025");
    }

    #[test]
    fn stars() {
        assert_eq!(star_bar(3), "★★★☆☆");
        assert_eq!(star_bar(0), "☆☆☆☆☆");
        assert_eq!(star_bar(9), "★★★★★");
    }
}

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::domain::DurationLabel;

static DURATION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(1 Hour|2 Hour|4 Hour|All Day)").expect("valid duration pattern"));

/// Find the first duration label mentioned in a transaction description.
///
/// # Examples
///
/// ```
/// use carpark_occupancy::parsing::duration::extract_duration_label;
/// use carpark_occupancy::core::domain::DurationLabel;
///
/// assert_eq!(extract_duration_label("P&D Tariff 4 Hour"), DurationLabel::FourHour);
/// assert_eq!(extract_duration_label("Season permit"), DurationLabel::Unknown);
/// ```
pub fn extract_duration_label(description: &str) -> DurationLabel {
    DURATION_PATTERN
        .find(description)
        .map(|m| m.as_str().parse().unwrap_or(DurationLabel::Unknown))
        .unwrap_or(DurationLabel::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_each_label() {
        assert_eq!(extract_duration_label("1 Hour"), DurationLabel::OneHour);
        assert_eq!(extract_duration_label("Car Park - 2 Hour"), DurationLabel::TwoHour);
        assert_eq!(extract_duration_label("4 Hour stay"), DurationLabel::FourHour);
        assert_eq!(extract_duration_label("All Day (weekday)"), DurationLabel::AllDay);
    }

    #[test]
    fn test_first_match_wins() {
        assert_eq!(
            extract_duration_label("All Day, upgrade from 1 Hour"),
            DurationLabel::AllDay
        );
    }

    #[test]
    fn test_unrecognized() {
        assert_eq!(extract_duration_label(""), DurationLabel::Unknown);
        assert_eq!(extract_duration_label("3 Hour"), DurationLabel::Unknown);
        assert_eq!(extract_duration_label("all day"), DurationLabel::Unknown);
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use todo_app::libs::formatter::{format_clock, format_duration};

    #[test]
    fn test_format_clock_whole_minutes() {
        assert_eq!(format_clock(&Duration::minutes(25)), "25:00");
        assert_eq!(format_clock(&Duration::seconds(90)), "01:30");
    }

    #[test]
    fn test_format_clock_pads_seconds() {
        assert_eq!(format_clock(&Duration::seconds(270)), "04:30");
        assert_eq!(format_clock(&Duration::seconds(5)), "00:05");
    }

    #[test]
    fn test_format_clock_zero_and_negative() {
        assert_eq!(format_clock(&Duration::zero()), "00:00");
        assert_eq!(format_clock(&Duration::seconds(-30)), "00:00");
    }

    #[test]
    fn test_format_clock_minutes_grow_past_an_hour() {
        assert_eq!(format_clock(&Duration::hours(1)), "60:00");
        assert_eq!(format_clock(&(Duration::minutes(125) + Duration::seconds(9))), "125:09");
    }

    #[test]
    fn test_format_clock_drops_subsecond_part() {
        assert_eq!(format_clock(&Duration::milliseconds(59_999)), "00:59");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(&Duration::zero()), "00:00");
        assert_eq!(format_duration(&Duration::minutes(90)), "01:30");
        assert_eq!(format_duration(&Duration::hours(12)), "12:00");
        assert_eq!(format_duration(&Duration::minutes(-5)), "00:00");
    }
}

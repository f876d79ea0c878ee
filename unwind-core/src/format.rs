//! Formatting helpers shared by the CLI outputs.

use chrono::NaiveDate;

/// Format a duration in seconds (e.g., "45s", "3m 20s", "1h 2m 3s").
pub fn format_duration(secs: i64) -> String {
    let secs = secs.max(0);
    if secs < 60 {
        return format!("{}s", secs);
    }
    let minutes = secs / 60;
    let seconds = secs % 60;
    if minutes < 60 {
        return format!("{}m {}s", minutes, seconds);
    }
    format!("{}h {}m {}s", minutes / 60, minutes % 60, seconds)
}

/// Format a day as "Mar 4".
pub fn format_day(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

/// Format an optional day range, or an em dash if missing.
pub fn format_day_range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> String {
    match (start, end) {
        (Some(start), Some(end)) if start == end => format_day(start),
        (Some(start), Some(end)) => format!("{} – {}", format_day(start), format_day(end)),
        _ => "—".to_string(),
    }
}

/// Pluralize a day count ("1 day", "12 days").
pub fn days(count: u32) -> String {
    if count == 1 {
        "1 day".to_string()
    } else {
        format!("{} days", count)
    }
}

/// Get month abbreviation from a zero-based index.
pub fn month_abbrev(month0: usize) -> &'static str {
    const MONTHS: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    MONTHS.get(month0).copied().unwrap_or("???")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(45), "45s");
        assert_eq!(format_duration(200), "3m 20s");
        assert_eq!(format_duration(3723), "1h 2m 3s");
        assert_eq!(format_duration(-5), "0s");
    }

    #[test]
    fn test_format_days() {
        let mar4 = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let dec31 = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(format_day(mar4), "Mar 4");
        assert_eq!(format_day_range(Some(mar4), Some(dec31)), "Mar 4 – Dec 31");
        assert_eq!(format_day_range(Some(mar4), Some(mar4)), "Mar 4");
        assert_eq!(format_day_range(None, None), "—");
        assert_eq!(days(1), "1 day");
        assert_eq!(days(303), "303 days");
    }

    #[test]
    fn test_month_abbrev() {
        assert_eq!(month_abbrev(0), "Jan");
        assert_eq!(month_abbrev(11), "Dec");
        assert_eq!(month_abbrev(12), "???");
    }
}

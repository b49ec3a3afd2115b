use chrono::{DateTime, Datelike, Local, NaiveDate, Utc};
use ratatui::style::Style;
use ratatui::text::Span;

use crate::util::unicode;

/// Markdown-style checkbox
pub(super) fn checkbox(completed: bool) -> &'static str {
    if completed { "[x]" } else { "[ ]" }
}

/// Relative creation time: "Just now" under an hour, "3h ago" under a day,
/// then the date ("Oct 2"), with the year when it differs from `now`'s.
/// The gap is absolute, so clock skew into the future reads the same way.
pub fn format_created_at(created: DateTime<Utc>, now: DateTime<Local>) -> String {
    let created = created.with_timezone(&Local);
    let hours = (now - created).num_hours().abs();
    if hours < 1 {
        "Just now".to_string()
    } else if hours < 24 {
        format!("{}h ago", hours)
    } else if created.year() == now.year() {
        created.format("%b %-d").to_string()
    } else {
        created.format("%b %-d, %Y").to_string()
    }
}

/// Long date for the day card ("October 16, 2026")
pub(super) fn long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Compute total display width of a slice of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum()
}

/// Pad `spans` so that `right` ends at the last column. Drops `right` if it
/// doesn't fit.
pub(super) fn push_right_aligned<'a>(
    spans: &mut Vec<Span<'a>>,
    right: Vec<Span<'a>>,
    width: usize,
    fill: Style,
) {
    let used = spans_width(spans);
    let right_width = spans_width(&right);
    if used + right_width < width {
        spans.push(Span::styled(" ".repeat(width - used - right_width), fill));
        spans.extend(right);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn local(y: i32, m: u32, d: u32, h: u32) -> DateTime<Local> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0)
            .unwrap()
            .with_timezone(&Local)
    }

    #[test]
    fn created_just_now() {
        let now = local(2026, 10, 16, 12);
        let created = now.with_timezone(&Utc) - Duration::minutes(59);
        assert_eq!(format_created_at(created, now), "Just now");
        // Clock skew puts creation in the future
        let future = now.with_timezone(&Utc) + Duration::minutes(5);
        assert_eq!(format_created_at(future, now), "Just now");
    }

    #[test]
    fn future_creation_uses_absolute_gap() {
        let now = local(2026, 10, 16, 12);
        let future = now.with_timezone(&Utc) + Duration::hours(3);
        assert_eq!(format_created_at(future, now), "3h ago");
    }

    #[test]
    fn created_hours_ago() {
        let now = local(2026, 10, 16, 12);
        let created = now.with_timezone(&Utc) - Duration::minutes(185);
        assert_eq!(format_created_at(created, now), "3h ago");
        let created = now.with_timezone(&Utc) - Duration::hours(23);
        assert_eq!(format_created_at(created, now), "23h ago");
    }

    #[test]
    fn created_on_earlier_date() {
        let now = local(2026, 10, 16, 12);
        let created = Utc.with_ymd_and_hms(2026, 10, 2, 12, 0, 0).unwrap();
        assert_eq!(format_created_at(created, now), "Oct 2");
        let created = Utc.with_ymd_and_hms(2025, 6, 14, 12, 0, 0).unwrap();
        assert_eq!(format_created_at(created, now), "Jun 14, 2025");
    }

    #[test]
    fn long_date_format() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        assert_eq!(long_date(date), "October 16, 2026");
    }

    #[test]
    fn right_alignment() {
        let mut spans = vec![Span::raw("left")];
        push_right_aligned(&mut spans, vec![Span::raw("right")], 12, Style::default());
        assert_eq!(spans_width(&spans), 12);

        let mut spans = vec![Span::raw("left")];
        push_right_aligned(&mut spans, vec![Span::raw("right")], 8, Style::default());
        assert_eq!(spans_width(&spans), 4);
    }
}

use chrono::{DateTime, Local, Utc};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// "just now", "5m ago", "2h ago", "3d ago", then a date
pub fn format_relative_time(unix_secs: u64) -> String {
    let now = Utc::now().timestamp().max(0) as u64;
    let elapsed = now.saturating_sub(unix_secs);

    match elapsed {
        0..=59 => "just now".to_string(),
        60..=3599 => format!("{}m ago", elapsed / 60),
        3600..=86_399 => format!("{}h ago", elapsed / 3600),
        86_400..=604_799 => format!("{}d ago", elapsed / 86_400),
        _ => DateTime::<Utc>::from_timestamp(unix_secs as i64, 0)
            .map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
    }
}

/// Truncate to a display width, appending an ellipsis when cut. Grapheme
/// aware so emoji and combining marks are never split.
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for grapheme in text.graphemes(true) {
        let w = grapheme.width();
        if used + w + 1 > max_width {
            break;
        }
        out.push_str(grapheme);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_relative_time_buckets() {
        let now = Utc::now().timestamp() as u64;
        assert_eq!(format_relative_time(now), "just now");
        assert_eq!(format_relative_time(now - 120), "2m ago");
        assert_eq!(format_relative_time(now - 7200), "2h ago");
        assert_eq!(format_relative_time(now - 2 * 86_400), "2d ago");
    }

    #[test]
    fn test_truncate_leaves_short_strings_alone() {
        assert_eq!(truncate_with_ellipsis("short", 10), "short");
        assert!(truncate_with_ellipsis("a much longer string", 8).ends_with('…'));
    }
}

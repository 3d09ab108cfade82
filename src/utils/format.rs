/// Format hours as text the way the sheet stores them: always at least one
/// decimal place.
pub fn format_hours(hours: f64) -> String {
    if hours == hours.floor() {
        format!("{:.1}", hours)
    } else {
        format!("{}", hours)
    }
}

/// Create a simple ASCII progress bar
pub fn progress_bar(filled: u32, total: u32, width: usize) -> String {
    if total == 0 {
        return "░".repeat(width);
    }
    let ratio = (filled as f64 / total as f64).min(1.0);
    let filled_count = (ratio * width as f64).round() as usize;
    let empty_count = width.saturating_sub(filled_count);
    format!("{}{}", "█".repeat(filled_count), "░".repeat(empty_count))
}

/// Truncate to `max` characters, appending an ellipsis when cut.
pub fn truncate(s: &str, max: usize) -> String {
    let flat = s.replace('\n', " ");
    if flat.chars().count() <= max {
        return flat;
    }
    let mut out: String = flat.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hours_keep_a_decimal() {
        assert_eq!(format_hours(8.0), "8.0");
        assert_eq!(format_hours(7.5), "7.5");
        assert_eq!(format_hours(0.0), "0.0");
    }

    #[test]
    fn bar_scales_to_width() {
        assert_eq!(progress_bar(5, 10, 4), "██░░");
        assert_eq!(progress_bar(0, 0, 3), "░░░");
        assert_eq!(progress_bar(20, 10, 2), "██");
    }

    #[test]
    fn truncate_flattens_lines() {
        assert_eq!(truncate("a\nb", 10), "a b");
        assert_eq!(truncate("abcdef", 4), "abc…");
    }
}

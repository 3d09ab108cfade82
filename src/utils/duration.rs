/// Quick-pick values suggested when a gym time or study hours value is
/// rejected.
pub const DURATION_PRESETS: &[&str] = &["0:00", "0:30", "1:00", "1:30", "2:00", "2:30", "3:00"];

/// Hours and minutes parsed from an `H:MM` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoursMinutes {
    pub hours: u64,
    pub minutes: u8,
}

impl HoursMinutes {
    pub fn total_minutes(&self) -> u64 {
        self.hours.saturating_mul(60).saturating_add(self.minutes as u64)
    }
}

/// Returns true when `s` is one or more digits, a colon, and exactly two
/// digits in `00..=59`. Hours have no upper bound.
pub fn validate_duration(s: &str) -> bool {
    split_duration(s).is_some()
}

/// Parse an `H:MM` duration. Hours that overflow `u64` saturate.
pub fn parse_duration(s: &str) -> Option<HoursMinutes> {
    let (hours, minutes) = split_duration(s)?;
    let hours = hours.bytes().fold(0u64, |acc, b| {
        acc.saturating_mul(10).saturating_add((b - b'0') as u64)
    });
    let minutes: u8 = minutes.parse().ok()?;
    Some(HoursMinutes { hours, minutes })
}

fn split_duration(s: &str) -> Option<(&str, &str)> {
    let (hours, minutes) = s.split_once(':')?;
    if hours.is_empty() || !hours.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match minutes.as_bytes() {
        [tens, ones] if (b'0'..=b'5').contains(tens) && ones.is_ascii_digit() => {
            Some((hours, minutes))
        }
        _ => None,
    }
}

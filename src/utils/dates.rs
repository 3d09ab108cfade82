use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Format every stored date uses.
pub const ISO_DATE: &str = "%Y-%m-%d";

/// Year-first shapes, then month-first, then day-first. A day-first shape
/// only matches when the leading number cannot be a month.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d",
    "%m-%d-%Y", "%m/%d/%Y", "%m.%d.%Y",
    "%d-%m-%Y", "%d/%m/%Y", "%d.%m.%Y",
];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Lenient date parsing for cells that may have been typed by hand into the
/// sheet. Returns `None` instead of failing.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(ISO_DATE).to_string()
}

/// Rewrites a date cell as `YYYY-MM-DD`, keeping the raw value when it does
/// not parse.
pub fn normalize_date_cell(raw: &str) -> String {
    match parse_date(raw) {
        Some(d) => format_date(d),
        None => raw.to_string(),
    }
}

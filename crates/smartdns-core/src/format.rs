// ── Cell formatting ──

use std::fmt::Display;

use chrono::{DateTime, Local, TimeZone, Utc};

use crate::i18n::Language;

/// `"N %"`.
pub fn success_rate(rate: f64) -> String {
    format!("{rate} %")
}

/// `"N/A"` for a negative (unmeasured) value, otherwise `"<value> ms"`.
pub fn avg_time(ms: f64) -> String {
    if ms < 0.0 {
        "N/A".to_owned()
    } else {
        format!("{ms} ms")
    }
}

/// Render a timestamp in the local time zone, with a locale-specific
/// layout. Missing timestamps render empty.
pub fn timestamp(ts: Option<&DateTime<Utc>>, language: Language) -> String {
    timestamp_in(ts, language, &Local)
}

pub fn timestamp_in<Tz>(ts: Option<&DateTime<Utc>>, language: Language, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let Some(ts) = ts else {
        return String::new();
    };
    let pattern = match language {
        Language::En => "%-m/%-d/%Y, %-I:%M:%S %p",
        Language::ZhCn => "%Y/%-m/%-d %H:%M:%S",
    };
    ts.with_timezone(tz).format(pattern).to_string()
}

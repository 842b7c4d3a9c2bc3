use chrono::{DateTime, Utc};

/// Compact age of `then` relative to `now`: `5m`, `3h`, `2d`, then a date.
///
/// Timestamps in the future render as `now`.
pub fn format_age(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds();

    if secs < 60 {
        return "now".to_string();
    }
    if secs < 3_600 {
        return format!("{}m", secs / 60);
    }
    if secs < 86_400 {
        return format!("{}h", secs / 3_600);
    }
    if secs < 7 * 86_400 {
        return format!("{}d", secs / 86_400);
    }
    if then.format("%Y").to_string() == now.format("%Y").to_string() {
        then.format("%b %d").to_string()
    } else {
        then.format("%b %d %Y").to_string()
    }
}

/// [`format_age`] against the current clock.
pub fn age(then: DateTime<Utc>) -> String {
    format_age(then, Utc::now())
}

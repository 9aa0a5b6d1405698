use chrono::{DateTime, Utc};
use serde_json::{Number, Value};

/// Shown in place of any optional field that has no value.
pub const PLACEHOLDER: &str = "\u{2014}";

const CURRENCY_CODE: &str = "ARS";

// Relative timestamp for list views: floored, bucketed at 1 min, 60 min,
// 24 h and 7 days.
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff_ms = (now - then).num_milliseconds();
    let diff_min = diff_ms.div_euclid(60_000);
    let diff_hr = diff_ms.div_euclid(3_600_000);
    let diff_day = diff_ms.div_euclid(86_400_000);

    if diff_min < 1 {
        "just now".to_string()
    } else if diff_min < 60 {
        format!("{} min ago", diff_min)
    } else if diff_hr < 24 {
        format!("{} hours ago", diff_hr)
    } else if diff_day < 7 {
        format!("{} days ago", diff_day)
    } else {
        absolute_date(then)
    }
}

/// `M/D/YYYY`, as the en-US locale prints a date.
pub fn absolute_date(at: DateTime<Utc>) -> String {
    at.format("%-m/%-d/%Y").to_string()
}

/// Formats an amount as en-US currency in ARS: thousands grouped, at most two
/// fraction digits and none when the amount is whole.
pub fn format_ars(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;

    let mut out = String::new();
    if amount < 0.0 && cents > 0 {
        out.push('-');
    }
    out.push_str(CURRENCY_CODE);
    out.push('\u{a0}');
    out.push_str(&group_thousands(whole));
    if fraction != 0 {
        let digits = format!("{:02}", fraction);
        out.push('.');
        out.push_str(digits.trim_end_matches('0'));
    }
    out
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `min_advance_days` -> `min advance days`
pub fn humanize_key(key: &str) -> String {
    key.replace('_', " ")
}

/// `30`, `22.5`; whole floats drop their trailing `.0`.
pub fn display_number(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => {
            format!("{}", f as i64)
        }
        _ => n.to_string(),
    }
}

/// Renders a free-form JSON value the way it reads in a label.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => display_number(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

pub fn or_placeholder(value: Option<&str>) -> String {
    value.unwrap_or(PLACEHOLDER).to_string()
}

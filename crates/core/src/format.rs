//! Display rules for table cells and chips.
//!
//! Tables keep "absent" visibly different from zero, so every helper here
//! takes an `Option` and renders `None` as [`PLACEHOLDER`]. Charts go through
//! [`chart_value`] instead, which turns `None` into 0.

pub const PLACEHOLDER: &str = "—";

/// Groups the integer part the Indian way: last three digits, then pairs.
pub fn group_indian(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (integer, fraction) = match formatted.split_once('.') {
        Some((integer, fraction)) => (integer.to_string(), Some(fraction.to_string())),
        None => (formatted, None),
    };

    let digits: Vec<char> = integer.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 2);
    let head_len = digits.len().saturating_sub(3);
    for (index, digit) in digits[..head_len].iter().enumerate() {
        if index > 0 && (head_len - index) % 2 == 0 {
            grouped.push(',');
        }
        grouped.push(*digit);
    }
    if head_len > 0 {
        grouped.push(',');
    }
    grouped.extend(&digits[head_len..]);

    let negative = value < 0.0 && formatted_is_nonzero(&grouped, fraction.as_deref());
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(&fraction);
    }
    out
}

fn formatted_is_nonzero(integer: &str, fraction: Option<&str>) -> bool {
    integer
        .chars()
        .chain(fraction.unwrap_or_default().chars())
        .any(|c| c.is_ascii_digit() && c != '0')
}

/// `₹1,23,456.70`; negatives come out as `-₹1,200.00`.
pub fn inr(value: Option<f64>) -> String {
    value.map_or_else(
        || PLACEHOLDER.to_string(),
        |amount| {
            let grouped = group_indian(amount, 2);
            grouped
                .strip_prefix('-')
                .map_or_else(|| format!("₹{grouped}"), |rest| format!("-₹{rest}"))
        },
    )
}

pub fn fixed(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| PLACEHOLDER.to_string(), |v| format!("{v:.decimals$}"))
}

/// Ratio in, percentage out: `0.123` at one decimal is `12.3%`.
pub fn percent(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(
        || PLACEHOLDER.to_string(),
        |v| format!("{:.*}%", decimals, v * 100.0),
    )
}

/// Plain number with Indian grouping and at most three decimals, trailing
/// zeros dropped.
pub fn number(value: Option<f64>) -> String {
    value.map_or_else(
        || PLACEHOLDER.to_string(),
        |v| {
            let grouped = group_indian(v, 3);
            let trimmed = grouped.trim_end_matches('0').trim_end_matches('.');
            if trimmed.is_empty() || trimmed == "-" {
                "0".to_string()
            } else {
                trimmed.to_string()
            }
        },
    )
}

pub fn text(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(PLACEHOLDER)
        .to_string()
}

pub const fn chart_value(value: Option<f64>) -> f64 {
    match value {
        Some(v) => v,
        None => 0.0,
    }
}

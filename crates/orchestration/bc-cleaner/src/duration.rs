//! Parsing and formatting of retention thresholds.

use chrono::Duration;

const NANOS_PER_SEC: i64 = 1_000_000_000;

/// Parse a retention threshold such as `90d`, `2160h0m0s`, `1.5h` or `500ms`.
///
/// The input is a sequence of `<number><unit>` segments where the number may
/// carry a decimal fraction. Supported units:
/// - `ns`, `us` (or `µs`), `ms` sub-second
/// - `s` seconds
/// - `m` minutes
/// - `h` hours
/// - `d` days
/// - `w` weeks
///
/// A bare `0` is accepted. Negative values are rejected, and the total is
/// kept at nanosecond precision so it must fit in an `i64` of nanoseconds.
pub fn parse_max_age(input: &str) -> Result<Duration, String> {
    let input = input.trim();

    if input.is_empty() {
        return Err("Empty max age".to_string());
    }
    if input.starts_with('-') {
        return Err(format!("Max age must not be negative: {input}"));
    }
    if input == "0" {
        return Ok(Duration::zero());
    }

    let mut total: i64 = 0;
    let mut rest = input;

    while !rest.is_empty() {
        let (whole, tail) = split_while(rest, |c| c.is_ascii_digit());
        let (fraction, tail) = match tail.strip_prefix('.') {
            Some(after_dot) => split_while(after_dot, |c| c.is_ascii_digit()),
            None => ("", tail),
        };

        if whole.is_empty() && fraction.is_empty() {
            let found = rest.chars().next().unwrap_or_default();
            return Err(format!("Missing number before '{found}' in max age: {input}"));
        }

        let (unit, tail) = split_while(tail, char::is_alphabetic);
        if unit.is_empty() {
            return Err(format!(
                "Missing unit in max age: {input}. Use 'ms', 's', 'm', 'h', 'd' or 'w'"
            ));
        }

        let unit_nanos = unit_nanos(unit).ok_or_else(|| {
            format!(
                "Invalid max age unit '{unit}' in {input}. Use 'ms', 's', 'm', 'h', 'd' or 'w'"
            )
        })?;

        total = segment_nanos(whole, fraction, unit_nanos)
            .and_then(|segment| total.checked_add(segment))
            .ok_or_else(|| format!("Max age out of range: {input}"))?;

        rest = tail;
    }

    Ok(Duration::nanoseconds(total))
}

fn split_while(s: &str, pred: impl Fn(char) -> bool) -> (&str, &str) {
    let end = s.find(|c: char| !pred(c)).unwrap_or(s.len());
    s.split_at(end)
}

fn unit_nanos(unit: &str) -> Option<i64> {
    let nanos = match unit.to_lowercase().as_str() {
        "ns" => 1,
        "us" | "\u{b5}s" | "\u{3bc}s" => 1_000,
        "ms" => 1_000_000,
        "s" => NANOS_PER_SEC,
        "m" => 60 * NANOS_PER_SEC,
        "h" => 3_600 * NANOS_PER_SEC,
        "d" => 86_400 * NANOS_PER_SEC,
        "w" => 604_800 * NANOS_PER_SEC,
        _ => return None,
    };
    Some(nanos)
}

/// Nanoseconds for `<whole>.<fraction>` of a unit, truncating below 1ns.
fn segment_nanos(whole: &str, fraction: &str, unit_nanos: i64) -> Option<i64> {
    let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let mut nanos = whole.checked_mul(unit_nanos)?;

    if !fraction.is_empty() {
        // Digits past the 18th cannot change the result for any unit above
        let fraction = &fraction[..fraction.len().min(18)];
        let value: i128 = fraction.parse().ok()?;
        let scale = 10_i128.pow(fraction.len() as u32);
        let part = i64::try_from(value * i128::from(unit_nanos) / scale).ok()?;
        nanos = nanos.checked_add(part)?;
    }

    Some(nanos)
}

/// Format a duration compactly, e.g. `90d`, `1h30m` or `0s`.
pub fn format_duration(duration: Duration) -> String {
    let mut secs = duration.num_seconds();
    if secs == 0 {
        return "0s".to_string();
    }

    let mut out = String::new();
    if secs < 0 {
        out.push('-');
        secs = secs.abs();
    }

    for (unit, size) in [('d', 86_400), ('h', 3_600), ('m', 60), ('s', 1)] {
        if secs >= size {
            out.push_str(&format!("{}{}", secs / size, unit));
            secs %= size;
        }
    }

    out
}

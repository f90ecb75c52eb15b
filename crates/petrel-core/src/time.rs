//! Human-readable duration strings for configuration values.

use std::time::Duration;

/// Parse a duration string like `30m`, `1h30m`, or `1d2h3m4s`.
///
/// Units are `s`, `m`, `h`, and `d`; each unit must be preceded by a
/// number. Returns `None` on unknown units, missing numbers, or overflow.
pub fn parse_duration(input: &str) -> Option<Duration> {
    let mut total: u64 = 0;
    let mut chars = input.chars().peekable();

    while chars.peek().is_some() {
        let mut digits = String::new();
        while let Some(c) = chars.peek() {
            if c.is_ascii_digit() {
                digits.push(chars.next()?);
            } else {
                break;
            }
        }
        if digits.is_empty() {
            return None;
        }

        let value: u64 = digits.parse().ok()?;
        let unit_secs: u64 = match chars.next()? {
            's' => 1,
            'm' => 60,
            'h' => 3600,
            'd' => 86_400,
            _ => return None,
        };
        total = total.checked_add(value.checked_mul(unit_secs)?)?;
    }

    Some(Duration::from_secs(total))
}

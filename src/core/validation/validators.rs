//! Reusable field validators
//!
//! Each validator receives the raw submitted value (`None` when the field
//! was not posted) and returns the user-facing message on failure.

/// Message produced when a value cannot be read as a number
pub const NOT_A_NUMBER: &str = "Expected number, received nan";

/// Validator: field must be present and non-empty
pub fn required(
    message: &'static str,
) -> impl Fn(Option<&str>) -> Result<(), String> + Send + Sync + Clone {
    move |value: Option<&str>| match value {
        Some(s) if !s.is_empty() => Ok(()),
        _ => Err(message.to_string()),
    }
}

/// Validator: value must be one of the allowed strings (exact match)
pub fn in_list(
    allowed: &'static [&'static str],
    message: &'static str,
) -> impl Fn(Option<&str>) -> Result<(), String> + Send + Sync + Clone {
    move |value: Option<&str>| match value {
        Some(s) if allowed.contains(&s) => Ok(()),
        _ => Err(message.to_string()),
    }
}

/// Validator: number must be strictly greater than `min`
pub fn greater_than(
    min: f64,
    message: &'static str,
) -> impl Fn(f64) -> Result<(), String> + Send + Sync + Clone {
    move |value: f64| {
        if value > min {
            Ok(())
        } else {
            Err(message.to_string())
        }
    }
}

/// Coerce a submitted value to a number
///
/// Surrounding whitespace is ignored and a missing or blank value reads as
/// `0`, so it fails a later positivity check rather than the number check.
/// Unsigned `0x`/`0o`/`0b` integer literals are accepted. Non-finite results
/// are rejected.
pub fn coerce_number(value: Option<&str>) -> Result<f64, String> {
    let trimmed = value.unwrap_or("").trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }

    if let Some(n) = parse_prefixed_integer(trimmed) {
        return Ok(n);
    }

    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(NOT_A_NUMBER.to_string()),
    }
}

/// `0x1A`, `0o17`, `0b101` (no sign, no fraction)
fn parse_prefixed_integer(value: &str) -> Option<f64> {
    let radix = match value.get(..2)? {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };
    let digits = &value[2..];
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    u64::from_str_radix(digits, radix).ok().map(|n| n as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    // === required() ===

    #[test]
    fn test_required_missing_returns_error() {
        let v = required("Please select a customer.");
        assert_eq!(v(None), Err("Please select a customer.".to_string()));
    }

    #[test]
    fn test_required_empty_returns_error() {
        let v = required("Please select a customer.");
        assert!(v(Some("")).is_err());
    }

    #[test]
    fn test_required_value_returns_ok() {
        let v = required("Please select a customer.");
        assert!(v(Some("c1")).is_ok());
    }

    // === in_list() ===

    #[test]
    fn test_in_list_exact_match() {
        let v = in_list(&["pending", "paid"], "bad status");
        assert!(v(Some("paid")).is_ok());
        assert!(v(Some("PAID")).is_err());
        assert!(v(Some("")).is_err());
        assert!(v(None).is_err());
    }

    // === greater_than() ===

    #[test]
    fn test_greater_than_is_strict() {
        let v = greater_than(0.0, "too small");
        assert!(v(0.0).is_err());
        assert!(v(-1.0).is_err());
        assert!(v(0.01).is_ok());
    }

    // === coerce_number() ===

    #[test]
    fn test_coerce_blank_is_zero() {
        assert_eq!(coerce_number(None), Ok(0.0));
        assert_eq!(coerce_number(Some("")), Ok(0.0));
        assert_eq!(coerce_number(Some("   ")), Ok(0.0));
    }

    #[test]
    fn test_coerce_trims_whitespace() {
        assert_eq!(coerce_number(Some(" 10.50 ")), Ok(10.5));
    }

    #[test]
    fn test_coerce_rejects_garbage() {
        assert_eq!(coerce_number(Some("abc")), Err(NOT_A_NUMBER.to_string()));
        assert_eq!(coerce_number(Some("12abc")), Err(NOT_A_NUMBER.to_string()));
    }

    #[test]
    fn test_coerce_prefixed_integers() {
        assert_eq!(coerce_number(Some("0x1A")), Ok(26.0));
        assert_eq!(coerce_number(Some(" 0X1a ")), Ok(26.0));
        assert_eq!(coerce_number(Some("0o17")), Ok(15.0));
        assert_eq!(coerce_number(Some("0b101")), Ok(5.0));
    }

    #[test]
    fn test_coerce_rejects_malformed_prefixed_integers() {
        for value in ["0x", "0xG1", "0x+1A", "-0x1A", "0b102", "0x1.5"] {
            assert_eq!(
                coerce_number(Some(value)),
                Err(NOT_A_NUMBER.to_string()),
                "{:?}",
                value
            );
        }
    }

    #[test]
    fn test_coerce_rejects_non_finite() {
        assert!(coerce_number(Some("NaN")).is_err());
        assert!(coerce_number(Some("inf")).is_err());
    }
}

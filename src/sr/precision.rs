//! Fixed-point decimal formatting for DICOM decimal strings.
//!
//! Consumers of exported contour data compare values textually, so the
//! formatting has to match what other SR writers produce: a fixed number of
//! fraction digits, exact ties rounded away from zero, and no `-` on zero.

/// Format `value` with exactly `digits` fraction digits.
///
/// Non-finite values are written as `NaN`, `Infinity` and `-Infinity`.
pub fn to_fixed(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let negative = value < 0.0;
    let magnitude = value.abs();

    let text = if is_exact_tie(magnitude, digits) {
        // One more digit is exact here and ends in '5'.
        let mut longer = format!("{:.*}", digits + 1, magnitude);
        longer.pop();
        if longer.ends_with('.') {
            longer.pop();
        }
        increment_last_digit(&longer)
    } else {
        format!("{:.*}", digits, magnitude)
    };

    if negative {
        format!("-{}", text)
    } else {
        text
    }
}

/// Whether `magnitude` lies exactly halfway between two values with
/// `digits` fraction digits.
fn is_exact_tie(magnitude: f64, digits: usize) -> bool {
    // A finite double has a terminating decimal expansion. A tie has exactly
    // `digits + 1` fraction digits, the last being 5.
    let exact = format!("{:.*}", digits + 40, magnitude);
    let Some((_, fraction)) = exact.split_once('.') else {
        return false;
    };
    let tail = &fraction[digits..];
    tail.starts_with('5') && tail[1..].bytes().all(|b| b == b'0')
}

/// Add one unit in the last place of a non-negative decimal string.
fn increment_last_digit(text: &str) -> String {
    let mut bytes = text.as_bytes().to_vec();
    let mut i = bytes.len();
    loop {
        if i == 0 {
            bytes.insert(0, b'1');
            break;
        }
        i -= 1;
        match bytes[i] {
            b'.' => continue,
            b'9' => bytes[i] = b'0',
            digit => {
                bytes[i] = digit + 1;
                break;
            }
        }
    }
    String::from_utf8(bytes).unwrap_or_else(|_| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers_get_fraction_digits() {
        assert_eq!(to_fixed(5.0, 2), "5.00");
        assert_eq!(to_fixed(0.0, 2), "0.00");
        assert_eq!(to_fixed(-12.0, 2), "-12.00");
    }

    #[test]
    fn test_rounds_to_nearest() {
        assert_eq!(to_fixed(1.234, 2), "1.23");
        assert_eq!(to_fixed(1.236, 2), "1.24");
        assert_eq!(to_fixed(-87.456, 2), "-87.46");
    }

    #[test]
    fn test_exact_ties_round_away_from_zero() {
        assert_eq!(to_fixed(0.125, 2), "0.13");
        assert_eq!(to_fixed(0.375, 2), "0.38");
        assert_eq!(to_fixed(2.5, 0), "3");
        assert_eq!(to_fixed(-0.125, 2), "-0.13");
        assert_eq!(to_fixed(9.995, 2), "9.99"); // 9.995 is below the tie in binary
        assert_eq!(to_fixed(99.875, 2), "99.88");
        assert_eq!(to_fixed(9.9999999, 2), "10.00");
    }

    #[test]
    fn test_carry_through_integer_part() {
        assert_eq!(increment_last_digit("9.99"), "10.00");
        assert_eq!(increment_last_digit("0.12"), "0.13");
        assert_eq!(increment_last_digit("199"), "200");
    }

    #[test]
    fn test_zero_sign() {
        assert_eq!(to_fixed(-0.0, 2), "0.00");
        assert_eq!(to_fixed(-0.001, 2), "-0.00");
    }

    #[test]
    fn test_non_finite() {
        assert_eq!(to_fixed(f64::NAN, 2), "NaN");
        assert_eq!(to_fixed(f64::INFINITY, 2), "Infinity");
        assert_eq!(to_fixed(f64::NEG_INFINITY, 2), "-Infinity");
    }
}

/// Formats a number like C's `%g`: six significant digits, no trailing zeros,
/// exponent notation outside `1e-4 .. 1e6`.
///
/// Negative zero prints as `0`.
pub fn fmt_g(value: f64) -> String {
    const PRECISION: i32 = 6;

    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return if value.is_nan() {
            "nan".to_string()
        } else if value > 0.0 {
            "inf".to_string()
        } else {
            "-inf".to_string()
        };
    }

    // Round to the target precision first so the exponent reflects carries
    // (999999.7 becomes 1e+06).
    let sci = format!("{:.*e}", (PRECISION - 1) as usize, value);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if exp < -4 || exp >= PRECISION {
        let mantissa = trim_fraction(mantissa);
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exp.abs())
    } else {
        let decimals = (PRECISION - 1 - exp).max(0) as usize;
        let fixed = format!("{:.*}", decimals, value);
        let trimmed = trim_fraction(&fixed);
        if trimmed == "-0" {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    }
}

/// Formats with two fixed decimals (`%.2f`), without a negative zero.
pub fn fmt_2(value: f64) -> String {
    let out = format!("{value:.2}");
    if out == "-0.00" { "0.00".to_string() } else { out }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

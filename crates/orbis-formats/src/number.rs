//! `%g`-style float formatting for text formats.

/// Format `v` like C's `%g`: six significant digits, trailing zeros removed,
/// scientific notation when the exponent is below -4 or at least 6.
pub fn format_g(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if v == 0.0 {
        return if v.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // Rounding to six digits can bump the exponent (999999.5 -> 1e+06), so
    // take it from the rounded scientific form.
    let sci = format!("{v:.5e}");
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);

    if !(-4..6).contains(&exp) {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", trim_zeros(mantissa), exp.abs())
    } else {
        let decimals = (5 - exp) as usize;
        trim_zeros(&format!("{v:.decimals$}")).to_string()
    }
}

fn trim_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_printf() {
        let cases = [
            (1.0, "1"),
            (0.5, "0.5"),
            (1.03, "1.03"),
            (-0.25, "-0.25"),
            (123456.0, "123456"),
            (1234567.0, "1.23457e+06"),
            (999999.5, "1e+06"),
            (0.0001, "0.0001"),
            (0.00001234, "1.234e-05"),
            (0.123456789, "0.123457"),
            (6.123233995736766e-17, "6.12323e-17"),
            (0.0, "0"),
        ];
        for (v, expected) in cases {
            assert_eq!(format_g(v), expected, "{v}");
        }
    }
}

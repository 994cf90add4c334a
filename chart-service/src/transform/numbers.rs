//! Number parsing and printing with the rules the dashboard API and its
//! charts agree on: values arrive as JSON numbers or decimal strings, and
//! unparsable values become `NaN` and stay in the series.

use serde_json::Value;

/// Parse a stat value the way `parseFloat` does: skip leading whitespace,
/// read the longest numeric prefix, `NaN` when there is none.
pub fn parse_float(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => parse_float_str(s),
        // Arrays stringify to their comma-joined elements first.
        Value::Array(items) => {
            let joined: Vec<String> = items
                .iter()
                .map(|item| match item {
                    Value::Null => String::new(),
                    Value::String(s) => s.clone(),
                    Value::Number(n) => js_number(n.as_f64().unwrap_or(f64::NAN)),
                    other => other.to_string(),
                })
                .collect();
            parse_float_str(&joined.join(","))
        }
        Value::Null | Value::Bool(_) | Value::Object(_) => f64::NAN,
    }
}

/// Same as [`parse_float`] for an optional field; a missing field is `NaN`.
pub fn parse_field(value: Option<&Value>) -> f64 {
    value.map_or(f64::NAN, parse_float)
}

pub fn parse_float_str(s: &str) -> f64 {
    let s = s.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    let bytes = s.as_bytes();
    let mut pos = 0;

    let negative = match bytes.first() {
        Some(b'-') => {
            pos = 1;
            true
        }
        Some(b'+') => {
            pos = 1;
            false
        }
        _ => false,
    };

    if s[pos..].starts_with("Infinity") {
        return if negative { f64::NEG_INFINITY } else { f64::INFINITY };
    }

    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let int_len = digits_from(pos);
    let int_part = &s[pos..pos + int_len];
    pos += int_len;

    let mut frac_part = "";
    if bytes.get(pos) == Some(&b'.') {
        let frac_len = digits_from(pos + 1);
        frac_part = &s[pos + 1..pos + 1 + frac_len];
        pos += 1 + frac_len;
    }

    if int_part.is_empty() && frac_part.is_empty() {
        return f64::NAN;
    }

    let mut exponent = String::new();
    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        let mut exp_pos = pos + 1;
        let mut sign = "";
        if let Some(&b) = bytes.get(exp_pos) {
            if b == b'+' || b == b'-' {
                sign = if b == b'-' { "-" } else { "" };
                exp_pos += 1;
            }
        }
        let exp_len = digits_from(exp_pos);
        if exp_len > 0 {
            exponent = format!("e{sign}{}", &s[exp_pos..exp_pos + exp_len]);
        }
    }

    let normalized = format!(
        "{}{}.{}{}",
        if negative { "-" } else { "" },
        if int_part.is_empty() { "0" } else { int_part },
        if frac_part.is_empty() { "0" } else { frac_part },
        exponent
    );
    normalized.parse().unwrap_or(f64::NAN)
}

/// Print a number the way chart labels show it: shortest round-trip form,
/// `NaN`/`Infinity` spelled out, no negative zero, exponent form below `1e-6`
/// and from `1e21` up.
pub fn js_number(x: f64) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if x == 0.0 {
        return "0".to_string();
    }

    // `{:e}` gives the shortest digits as `d.ddde<exp>`.
    let sci = format!("{:e}", x.abs());
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let sign = if x < 0.0 { "-" } else { "" };

    if (-6..21).contains(&exp) {
        format!("{x}")
    } else {
        let exp_sign = if exp < 0 { "-" } else { "+" };
        format!("{sign}{mantissa}e{exp_sign}{}", exp.abs())
    }
}

/// Round half up, as `Math.round` does.
pub fn js_round(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Fix to `decimal_places` then drop trailing zeros: `format_number(2.50, 3) == "2.5"`.
pub fn format_number(x: f64, decimal_places: usize) -> String {
    js_number(round(x, decimal_places))
}

/// Round to `decimal_places`; `NaN` stays `NaN`.
pub fn round(x: f64, decimal_places: usize) -> f64 {
    if !x.is_finite() {
        return x;
    }
    to_fixed(x, decimal_places).parse().unwrap_or(f64::NAN)
}

/// Every fractional digit of a finite `f64` fits in this many places.
const EXACT_PLACES: usize = 1100;

/// `x` written with `decimal_places` decimals, rounding the exact binary value
/// half away from zero: `to_fixed(2.5, 0) == "3"`, `to_fixed(0.125, 2) == "0.13"`.
pub fn to_fixed(x: f64, decimal_places: usize) -> String {
    let exact = format!("{:.*}", EXACT_PLACES, x.abs());
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let places = decimal_places.min(frac_part.len());

    let mut digits: Vec<u8> = int_part.bytes().chain(frac_part[..places].bytes()).collect();
    if frac_part.as_bytes().get(places).is_some_and(|d| *d >= b'5') {
        let mut carry = true;
        for d in digits.iter_mut().rev() {
            if *d == b'9' {
                *d = b'0';
            } else {
                *d += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, b'1');
        }
    }

    let split = digits.len() - places;
    let digits = String::from_utf8_lossy(&digits);
    let sign = if x < 0.0 { "-" } else { "" };
    if places == 0 {
        format!("{sign}{digits}")
    } else {
        format!("{sign}{}.{}", &digits[..split], &digits[split..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_numbers_and_decimal_strings() {
        assert_eq!(parse_float(&json!(5)), 5.0);
        assert_eq!(parse_float(&json!("5")), 5.0);
        assert_eq!(parse_float(&json!("12.500")), 12.5);
        assert_eq!(parse_float(&json!("  -3.25e2kg")), -325.0);
        assert_eq!(parse_float(&json!(".5")), 0.5);
        assert_eq!(parse_float(&json!("7.")), 7.0);
        assert_eq!(parse_float(&json!("1e")), 1.0);
        assert_eq!(parse_float(&json!("-Infinity")), f64::NEG_INFINITY);
        assert_eq!(parse_float(&json!(["4", "9"])), 4.0);
    }

    #[test]
    fn non_numeric_values_are_nan() {
        for value in [json!("abc"), json!(""), json!("."), json!(null), json!(true), json!({"v": 1}), json!([])] {
            assert!(parse_float(&value).is_nan(), "{value} should be NaN");
        }
        assert!(parse_field(None).is_nan());
    }

    #[test]
    fn prints_like_chart_labels() {
        assert_eq!(js_number(5.0), "5");
        assert_eq!(js_number(-0.0), "0");
        assert_eq!(js_number(2.75), "2.75");
        assert_eq!(js_number(f64::NAN), "NaN");
        assert_eq!(js_number(f64::INFINITY), "Infinity");
        assert_eq!(js_number(0.000001), "0.000001");
        assert_eq!(js_number(1e-7), "1e-7");
        assert_eq!(js_number(-1.5e-9), "-1.5e-9");
        assert_eq!(js_number(123456789012345680000.0), "123456789012345680000");
        assert_eq!(js_number(1e21), "1e+21");
        assert_eq!(js_number(2.5e22), "2.5e+22");
    }

    #[test]
    fn rounding_helpers() {
        assert_eq!(format_number(33.3333, 1), "33.3");
        assert_eq!(format_number(2.5, 3), "2.5");
        assert_eq!(round(1.23456, 3), 1.235);
        assert!(round(f64::NAN, 3).is_nan());
        assert_eq!(js_round(2.5), 3.0);
        assert_eq!(js_round(-2.5), -2.0);
    }

    #[test]
    fn ties_round_away_from_zero() {
        assert_eq!(format_number(81.25, 1), "81.3");
        assert_eq!(format_number(2.5, 0), "3");
        assert_eq!(round(0.125, 2), 0.13);
        assert_eq!(format_number(-2.5, 0), "-3");
        assert_eq!(to_fixed(9.995, 2), "9.99");
        assert_eq!(to_fixed(99.95, 1), "100.0");
        assert_eq!(to_fixed(1.005, 2), "1.00");
        assert_eq!(to_fixed(0.5, 0), "1");
    }
}

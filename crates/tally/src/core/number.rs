//! Number text conversions
//!
//! Operands live as text until they are needed for arithmetic. Parsing is
//! lenient the way a browser's `parseFloat` is (longest numeric prefix wins),
//! and results are printed with the shortest round-trip digits, switching to
//! exponent notation outside `1e-7 < |x| < 1e21`.

/// Parse the longest numeric prefix of `text`, or NaN if there is none
///
/// # Example
/// ```
/// use tally::core::parse_float;
///
/// assert_eq!(parse_float("12.5"), 12.5);
/// assert_eq!(parse_float("7+"), 7.0);
/// assert!(parse_float("").is_nan());
/// assert!(parse_float("-").is_nan());
/// ```
pub fn parse_float(text: &str) -> f64 {
    let text = text.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    if rest.starts_with("Infinity") {
        return if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let bytes = rest.as_bytes();
    let count_digits = |from: usize| {
        bytes[from..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let int_len = count_digits(0);
    let mut end = int_len;
    let mut frac_len = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_len = count_digits(end + 1);
        end += 1 + frac_len;
    }
    if int_len == 0 && frac_len == 0 {
        return f64::NAN;
    }

    let mut exponent = "";
    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(exp_end);
        if exp_digits > 0 {
            exponent = &rest[end..exp_end + exp_digits];
        }
    }

    let int_part = if int_len == 0 { "0" } else { &rest[..int_len] };
    let frac_part = if frac_len == 0 {
        ""
    } else {
        &rest[int_len..int_len + 1 + frac_len]
    };

    let literal = format!(
        "{}{}{}{}",
        if negative { "-" } else { "" },
        int_part,
        frac_part,
        exponent
    );
    literal.parse::<f64>().unwrap_or(f64::NAN)
}

/// Format a result the way it is shown on the display
///
/// # Example
/// ```
/// use tally::core::format_number;
///
/// assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
/// assert_eq!(format_number(150.0), "150");
/// assert_eq!(format_number(1e21), "1e+21");
/// assert_eq!(format_number(-0.0), "0");
/// ```
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value < 0.0 {
        return format!("-{}", format_number(-value));
    }

    // `{:e}` yields the shortest round-trip digits, e.g. "1.2345e3"
    let scientific = format!("{:e}", value);
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    let k = digits.len() as i32;
    let n = exponent + 1;

    if k <= n && n <= 21 {
        format!("{}{}", digits, "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (int_part, frac_part) = digits.split_at(n as usize);
        format!("{}.{}", int_part, frac_part)
    } else if -6 < n && n <= 0 {
        format!("0.{}{}", "0".repeat((-n) as usize), digits)
    } else {
        let e = n - 1;
        let sign = if e >= 0 { '+' } else { '-' };
        let (lead, tail) = digits.split_at(1);
        if tail.is_empty() {
            format!("{}e{}{}", lead, sign, e.abs())
        } else {
            format!("{}.{}e{}{}", lead, tail, sign, e.abs())
        }
    }
}

//! Number formatting for element attributes.
//!
//! Element files are diffed and version-controlled, so every coordinate is
//! written with as few decimals as possible and the same input always yields
//! the same text. The decimal separator is always `.`.

/// Format `value` with at most `decimals` fractional digits.
///
/// Trailing zeros and a bare trailing `.` are stripped, values close to zero
/// never come out as `-0`, and for `decimals > 1` a fractional part within
/// 5 units of the last digit of a whole number is snapped onto it, absorbing
/// drift from repeated scaling.
///
/// ```
/// use elmt_scaler::format::format_value;
/// assert_eq!(format_value(1.0, 2), "1");
/// assert_eq!(format_value(-0.004, 2), "0");
/// assert_eq!(format_value(12.345, 1), "12.3");
/// ```
pub fn format_value(value: f64, decimals: usize) -> String {
    if decimals == 0 {
        return (value.round() as i64).to_string();
    }

    let mut value = value;
    let epsilon = 0.1 / 10f64.powi(decimals as i32);
    if value.abs() <= epsilon {
        value = 0.0;
    }

    let divider = 10i64.pow(decimals as u32);
    let mut scaled = (value * divider as f64).round() as i64;
    if scaled == 0 {
        return "0".to_string();
    }

    if decimals > 1 {
        let rest = scaled % divider;
        if (0 < rest && rest < 5) || (-5 < rest && rest < 0) {
            scaled -= rest;
        } else if rest > 0 && rest > divider - 5 {
            scaled += divider - rest;
        } else if rest < 0 && rest < -(divider - 5) {
            scaled -= divider + rest;
        }
    }

    let formatted = format!("{:.*}", decimals, scaled as f64 / divider as f64);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Format a value that must always be a whole number (terminal positions,
/// angles, font sizes).
pub fn format_int(value: f64) -> String {
    format_value(value, 0)
}

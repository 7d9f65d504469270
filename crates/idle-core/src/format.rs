//! Compact display formatting for large counters.

/// Short magnitude suffixes: K, M, B, T, then aa..zz.
const NAMED: [&str; 4] = ["K", "M", "B", "T"];
const SUFFIX_COUNT: usize = NAMED.len() + 26 * 26;

fn suffix(index: usize) -> String {
    if index < NAMED.len() {
        return NAMED[index].to_string();
    }
    let k = index - NAMED.len();
    let first = char::from(b'a' + (k / 26) as u8);
    let second = char::from(b'a' + (k % 26) as u8);
    format!("{first}{second}")
}

/// Human-readable number for idle game counters, e.g. `1.50K`, `2.00aa`.
///
/// NaN and infinities render as `"0"`.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let mut value = value;
    let mut abs = value.abs();
    if abs < 1000.0 {
        return if abs >= 100.0 {
            format!("{value:.0}")
        } else if abs >= 10.0 {
            format!("{value:.1}")
        } else {
            format!("{value:.2}")
        };
    }
    let mut index = 0;
    while abs >= 1000.0 && index < SUFFIX_COUNT {
        value /= 1000.0;
        abs /= 1000.0;
        index += 1;
    }
    format!("{value:.2}{}", suffix(index - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_values_use_adaptive_precision() {
        assert_eq!(format_number(5.0), "5.00");
        assert_eq!(format_number(12.34), "12.3");
        assert_eq!(format_number(512.0), "512");
    }

    #[test]
    fn large_values_get_suffixes() {
        assert_eq!(format_number(1_500.0), "1.50K");
        assert_eq!(format_number(-2_000_000.0), "-2.00M");
        assert_eq!(format_number(3.0e12), "3.00T");
        assert_eq!(format_number(4.0e15), "4.00aa");
        assert_eq!(format_number(5.0e18), "5.00ab");
    }

    #[test]
    fn non_finite_is_zero() {
        assert_eq!(format_number(f64::NAN), "0");
        assert_eq!(format_number(f64::INFINITY), "0");
    }
}

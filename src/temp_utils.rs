//! Small conversions between the simulated temperature and what the
//! presentation layer and the results service expect.

use crate::constants::TO_KELVIN;

/// Converts Celsius to Kelvin.
pub fn celsius_to_kelvin(temp_c: f64) -> f64 {
    temp_c + TO_KELVIN
}

/// Whole degrees for the on-screen readout. Truncates toward zero.
pub fn display_celsius(temp_c: f64) -> i32 {
    temp_c as i32
}

/// Result value with one decimal place, e.g. `"150.0"`.
pub fn format_result_celsius(temp_c: f64) -> String {
    format!("{:.1}", temp_c)
}

/// Whole seconds between two clock readings, truncated and never negative.
pub fn elapsed_whole_seconds(now_s: f64, since_s: f64) -> i64 {
    (now_s - since_s).max(0.0) as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_display_truncates() {
        assert_eq!(display_celsius(0.0), 0);
        assert_eq!(display_celsius(9.99), 9);
        assert_eq!(display_celsius(150.0), 150);
    }

    #[test]
    fn test_result_has_one_decimal() {
        assert_eq!(format_result_celsius(150.0), "150.0");
        assert_eq!(format_result_celsius(42.25), "42.2");
        assert_eq!(format_result_celsius(0.0), "0.0");
    }

    #[test]
    fn test_elapsed_whole_seconds() {
        assert_eq!(elapsed_whole_seconds(35.9, 5.0), 30);
        assert_eq!(elapsed_whole_seconds(5.0, 5.0), 0);
        assert_eq!(elapsed_whole_seconds(1.0, 5.0), 0);
    }

    #[test]
    fn test_kelvin() {
        assert_abs_diff_eq!(celsius_to_kelvin(0.0), 273.15);
        assert_abs_diff_eq!(celsius_to_kelvin(150.0), 423.15);
    }
}

use crate::excel::CellValue;

/// Date-time layout used when comparing date cells
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Canonical text of a cell for equality comparison.
///
/// Missing values (empty cells, error cells, NaN) become `""`; integral numbers
/// lose their fractional part so `10.0` and `10` compare equal.
pub fn normalize(value: &CellValue) -> String {
    match value {
        CellValue::Empty | CellValue::Error(_) => String::new(),
        CellValue::Number(n) => normalize_number(*n),
        CellValue::Boolean(b) => (if *b { "True" } else { "False" }).to_string(),
        CellValue::DateTime(dt) => dt.format(DATETIME_FORMAT).to_string(),
        CellValue::String(s) => s.trim().to_string(),
    }
}

fn normalize_number(n: f64) -> String {
    if n.is_nan() {
        return String::new();
    }

    if n.is_finite() && n.fract() == 0.0 {
        // -0.0 would otherwise print as "-0"
        if n == 0.0 {
            return "0".to_string();
        }
        return format!("{:.0}", n);
    }

    n.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_missing_values() {
        assert_eq!(normalize(&CellValue::Empty), "");
        assert_eq!(normalize(&CellValue::Number(f64::NAN)), "");
        assert_eq!(normalize(&CellValue::Error("#N/A".to_string())), "");
    }

    #[test]
    fn test_integral_floats() {
        assert_eq!(normalize(&CellValue::Number(10.0)), "10");
        assert_eq!(normalize(&CellValue::Number(0.0)), "0");
        assert_eq!(normalize(&CellValue::Number(-0.0)), "0");
        assert_eq!(normalize(&CellValue::Number(-42.0)), "-42");
        assert_eq!(normalize(&CellValue::Number(123.0)), "123");
        assert_eq!(normalize(&CellValue::Number(1e20)), "100000000000000000000");
    }

    #[test]
    fn test_integral_float_matches_integer_text() {
        for v in [0.0, 1.0, 7.0, 250.0, 1_000_000.0] {
            assert_eq!(normalize(&CellValue::Number(v)), (v as i64).to_string());
        }
    }

    #[test]
    fn test_fractional_numbers() {
        assert_eq!(normalize(&CellValue::Number(12.34)), "12.34");
        assert_eq!(normalize(&CellValue::Number(-0.5)), "-0.5");
        assert_eq!(normalize(&CellValue::Number(f64::INFINITY)), "inf");
    }

    #[test]
    fn test_strings_are_trimmed() {
        assert_eq!(normalize(&"  hello  ".into()), "hello");
        assert_eq!(normalize(&"test".into()), "test");
        assert_eq!(normalize(&"\t\n".into()), "");
    }

    #[test]
    fn test_booleans_and_dates() {
        assert_eq!(normalize(&true.into()), "True");
        assert_eq!(normalize(&CellValue::Boolean(false)), "False");

        let date = NaiveDate::from_ymd_opt(2024, 5, 17)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(normalize(&CellValue::DateTime(date)), "2024-05-17 00:00:00");
    }
}

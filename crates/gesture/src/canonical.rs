//! Canonical serialization of a trace plus its color salt.
//!
//! The trace is written as a compact JSON array of records:
//!
//! ```text
//! [{"x":0,"y":0,"time_stamp":1000},{"x":12.5,"y":3,"time_stamp":1016}]#000000
//! ```
//!
//! Key order is fixed (`x`, `y`, `time_stamp`) and point order is insertion
//! order. The normalized color follows the closing bracket with no separator.
//!
//! Coordinates use the shortest round-trip digits, laid out as:
//!
//! - plain digits when the magnitude is in `[1e-6, 1e21)`: `12`, `12.5`,
//!   `0.000001`, `100000000000000000000` (no `.0` on integral values)
//! - scientific with an explicit exponent sign otherwise: `1e-7`, `1.5e+21`
//! - `0` for both zeros, `null` for NaN and infinities

use serde::ser::Error as _;
use serde::{Serialize, Serializer};
use serde_json::value::RawValue;

use crate::ink::normalize_color;
use crate::types::CapturePoint;

/// Coordinate in canonical number form.
#[derive(Debug, Clone, Copy)]
struct CanonicalNumber(f64);

impl Serialize for CanonicalNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match format_number(self.0) {
            Some(text) => RawValue::from_string(text)
                .map_err(S::Error::custom)?
                .serialize(serializer),
            None => serializer.serialize_none(),
        }
    }
}

/// Lay out a finite value in canonical number form; `None` for non-finite.
fn format_number(value: f64) -> Option<String> {
    if !value.is_finite() {
        return None;
    }
    if value == 0.0 {
        return Some("0".to_string());
    }

    // `{:e}` yields the shortest round-trip digits, e.g. `1.25e1`
    let scientific = format!("{:e}", value.abs());
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    // Position of the decimal point relative to the first digit
    let n = exponent.parse::<i32>().unwrap_or(0) + 1;

    let mut out = String::with_capacity(digits.len() + 8);
    if value < 0.0 {
        out.push('-');
    }
    if k <= n && n <= 21 {
        out.push_str(&digits);
        out.extend(std::iter::repeat_n('0', (n - k) as usize));
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        out.push_str(int);
        out.push('.');
        out.push_str(frac);
    } else if -6 < n && n <= 0 {
        out.push_str("0.");
        out.extend(std::iter::repeat_n('0', (-n) as usize));
        out.push_str(&digits);
    } else {
        let (first, rest) = digits.split_at(1);
        out.push_str(first);
        if !rest.is_empty() {
            out.push('.');
            out.push_str(rest);
        }
        let e = n - 1;
        out.push('e');
        out.push(if e < 0 { '-' } else { '+' });
        out.push_str(&e.abs().to_string());
    }
    Some(out)
}

#[derive(Serialize)]
struct CanonicalPoint {
    x: CanonicalNumber,
    y: CanonicalNumber,
    time_stamp: u64,
}

impl From<&CapturePoint> for CanonicalPoint {
    fn from(point: &CapturePoint) -> Self {
        Self {
            x: CanonicalNumber(point.x),
            y: CanonicalNumber(point.y),
            time_stamp: point.timestamp,
        }
    }
}

/// Serialize the trace alone (no salt).
pub fn serialize_trace(points: &[CapturePoint]) -> Result<String, serde_json::Error> {
    let records: Vec<CanonicalPoint> = points.iter().map(CanonicalPoint::from).collect();
    serde_json::to_string(&records)
}

/// Build the full canonical string: serialized trace followed by the normalized color.
pub fn canonical_string(points: &[CapturePoint], color: &str) -> Result<String, serde_json::Error> {
    let mut canonical = serialize_trace(points)?;
    canonical.push_str(&normalize_color(color));
    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_point_format() {
        let points = [CapturePoint::new(0.0, 0.0, 1000)];
        assert_eq!(
            canonical_string(&points, "black").unwrap(),
            r#"[{"x":0,"y":0,"time_stamp":1000}]#000000"#
        );
    }

    #[test]
    fn test_fractional_and_negative_values() {
        let points = [
            CapturePoint::new(12.5, 3.0, 1016),
            CapturePoint::new(-0.0, -7.25, 1017),
            CapturePoint::new(0.1, 123456.789, 1018),
        ];
        assert_eq!(
            serialize_trace(&points).unwrap(),
            r#"[{"x":12.5,"y":3,"time_stamp":1016},{"x":0,"y":-7.25,"time_stamp":1017},{"x":0.1,"y":123456.789,"time_stamp":1018}]"#
        );
    }

    #[test]
    fn test_number_layout_boundaries() {
        let cases = [
            (1000.0, "1000"),
            (0.1, "0.1"),
            (0.000001, "0.000001"),
            (0.0000012, "0.0000012"),
            (0.0000001, "1e-7"),
            (-0.00000015, "-1.5e-7"),
            (9_007_199_254_740_993.0, "9007199254740992"),
            (1e20, "100000000000000000000"),
            (1e21, "1e+21"),
            (1.5e300, "1.5e+300"),
            (-123.456, "-123.456"),
        ];
        for (value, expected) in cases {
            assert_eq!(format_number(value).as_deref(), Some(expected), "{}", value);
        }
        assert_eq!(format_number(f64::NAN), None);
    }

    #[test]
    fn test_small_fraction_serializes_without_exponent() {
        let points = [CapturePoint::new(0.000001, 1e21, 7)];
        assert_eq!(
            serialize_trace(&points).unwrap(),
            r#"[{"x":0.000001,"y":1e+21,"time_stamp":7}]"#
        );
    }

    #[test]
    fn test_non_finite_values_become_null() {
        let points = [CapturePoint::new(f64::NAN, f64::INFINITY, 5)];
        assert_eq!(
            serialize_trace(&points).unwrap(),
            r#"[{"x":null,"y":null,"time_stamp":5}]"#
        );
    }

    #[test]
    fn test_empty_trace_serializes_to_empty_array() {
        assert_eq!(serialize_trace(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_order_is_preserved() {
        let a = CapturePoint::new(1.0, 2.0, 10);
        let b = CapturePoint::new(3.0, 4.0, 20);
        let forward = serialize_trace(&[a, b]).unwrap();
        let backward = serialize_trace(&[b, a]).unwrap();
        assert_ne!(forward, backward);
        assert!(forward.find(r#""x":1"#).unwrap() < forward.find(r#""x":3"#).unwrap());
    }

    #[test]
    fn test_salt_is_normalized() {
        let points = [CapturePoint::new(1.0, 1.0, 1)];
        assert_eq!(
            canonical_string(&points, "#F00").unwrap(),
            canonical_string(&points, "red").unwrap()
        );
        assert!(canonical_string(&points, "custom ink").unwrap().ends_with("]custom ink"));
    }
}

//! Fortran output editing: rendering typed values into one fixed-width line.
use std::fmt;

use crate::{Descriptor, FormatSpec, Value};

/// Error produced when a value cannot be rendered into its column.
///
/// `field` is the 1-based index of the value slot.
#[derive(Debug)]
pub struct EncodeError {
    /// Index of the offending value slot.
    pub field: usize,
    /// The error message.
    pub msg: String,
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field {}: {}", self.field, self.msg)
    }
}

impl std::error::Error for EncodeError {}

#[cold]
#[inline(never)]
fn wrong_kind(field: usize, descriptor: &Descriptor, value: &Value) -> EncodeError {
    let column = match descriptor {
        Descriptor::Int { .. } => "an integer",
        Descriptor::Real { .. } | Descriptor::Exp { .. } => "a real",
        Descriptor::Text { .. } => "a text",
        Descriptor::Skip { .. } => unreachable!("skip columns carry no value"),
    };
    EncodeError {
        field,
        msg: format!("{} value {} in {} column", value.kind(), value, column),
    }
}

/// Encodes one value per value-carrying column into a fixed-width line.
///
/// `values` must hold exactly [`format.value_slots()`][FormatSpec::value_slots]
/// entries; a `None` entry leaves its column blank, as do `X` columns.
/// Numbers are right-justified; a number too wide for its column fills it
/// with `*`, following Fortran. Integer values promote into real columns,
/// any other kind mismatch is an error.
pub fn encode(values: &[Option<Value>], format: &FormatSpec) -> Result<String, EncodeError> {
    if values.len() != format.value_slots() {
        return Err(EncodeError {
            field: values.len().min(format.value_slots()) + 1,
            msg: format!(
                "format describes {} value column(s), {} value(s) given",
                format.value_slots(),
                values.len()
            ),
        });
    }

    let mut line = String::with_capacity(format.width());
    let mut slot = 0;
    for descriptor in format.descriptors() {
        let width = descriptor.width();
        if let Descriptor::Skip { .. } = descriptor {
            blanks(&mut line, width);
            continue;
        }

        let field = slot + 1;
        let value = &values[slot];
        slot += 1;
        let Some(value) = value else {
            blanks(&mut line, width);
            continue;
        };

        match (descriptor, value) {
            (Descriptor::Int { .. }, Value::Int(int)) => int_column(&mut line, width, *int),
            (Descriptor::Real { frac, .. }, Value::Int(int)) => {
                real_column(&mut line, width, *frac, *int as f64)
            }
            (Descriptor::Real { frac, .. }, Value::Real(real)) => {
                real_column(&mut line, width, *frac, *real)
            }
            (Descriptor::Exp { frac, .. }, Value::Int(int)) => {
                exp_column(&mut line, width, *frac, *int as f64)
            }
            (Descriptor::Exp { frac, .. }, Value::Real(real)) => {
                exp_column(&mut line, width, *frac, *real)
            }
            (Descriptor::Text { .. }, Value::Text(text)) => text_column(&mut line, width, text),
            (descriptor, value) => return Err(wrong_kind(field, descriptor, value)),
        }
    }
    Ok(line)
}

fn blanks(line: &mut String, width: usize) {
    for _ in 0..width {
        line.push(' ');
    }
}

/// Fortran renders any value too wide for its column as a field of `*`.
fn stars(line: &mut String, width: usize) {
    for _ in 0..width {
        line.push('*');
    }
}

fn justified(line: &mut String, width: usize, rendered: &str) {
    if rendered.len() > width {
        stars(line, width);
    } else {
        blanks(line, width - rendered.len());
        line.push_str(rendered);
    }
}

fn int_column(line: &mut String, width: usize, value: i64) {
    let mut digits = String::new();
    itoap::write_to_string(&mut digits, value);
    justified(line, width, &digits);
}

/// Strips the leading zero of `0.…`/`-0.…` when the rendering would not fit
/// otherwise, as Fortran output editing does.
fn drop_leading_zero(rendered: &mut String, width: usize) {
    if rendered.len() > width {
        if rendered.starts_with("0.") {
            rendered.remove(0);
        } else if rendered.starts_with("-0.") {
            rendered.remove(1);
        }
    }
}

fn real_column(line: &mut String, width: usize, frac: usize, value: f64) {
    let mut rendered = format!("{:.*}", frac, value);
    drop_leading_zero(&mut rendered, width);
    justified(line, width, &rendered);
}

fn exp_column(line: &mut String, width: usize, frac: usize, value: f64) {
    if !value.is_finite() {
        stars(line, width);
        return;
    }

    let (mantissa, exponent) = normalized(value, frac);
    let mut rendered = format!(
        "{:.*}E{}{:02}",
        frac,
        mantissa,
        if exponent < 0 { '-' } else { '+' },
        exponent.abs()
    );
    drop_leading_zero(&mut rendered, width);
    justified(line, width, &rendered);
}

/// Scales `value` into `±0.d₁d₂…` form, returning the scaled mantissa and
/// the decimal exponent.
fn normalized(value: f64, frac: usize) -> (f64, i32) {
    if value == 0.0 {
        return (0.0, 0);
    }
    let magnitude = value.abs();
    let mut exponent = magnitude.log10().floor() as i32 + 1;
    // Scale in two steps; 10^309 alone would overflow for values near
    // f64::MAX.
    let mut mantissa = value / 10f64.powi(exponent - 1) / 10.0;
    // Rounding to `frac` digits can push the mantissa to ±1.0; renormalize.
    if format!("{:.*}", frac, mantissa.abs()).starts_with('1') {
        exponent += 1;
        // The rescaled value's rounded digits are exactly 0.1.
        mantissa = if mantissa < 0.0 { -0.1 } else { 0.1 };
    }
    (mantissa, exponent)
}

fn text_column(line: &mut String, width: usize, value: &str) {
    let count = value.chars().count();
    if count > width {
        // Keep the leftmost `width` characters.
        line.extend(value.chars().take(width));
    } else {
        blanks(line, width - count);
        line.push_str(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(s: &str) -> FormatSpec {
        s.parse().unwrap()
    }

    fn one(format: &str, value: Value) -> Result<String, EncodeError> {
        encode(&[Some(value)], &spec(format))
    }

    #[test]
    fn integers() {
        assert_eq!(one("(I3)", Value::Int(3)).unwrap(), "  3");
        assert_eq!(one("(I4)", Value::Int(-12)).unwrap(), " -12");
        assert_eq!(one("(I3)", Value::Int(123)).unwrap(), "123");
        assert_eq!(one("(I3)", Value::Int(1234)).unwrap(), "***");
        assert_eq!(one("(I3)", Value::Int(-123)).unwrap(), "***");
    }

    #[test]
    fn reals() {
        assert_eq!(one("(F8.5)", Value::Real(0.1357)).unwrap(), " 0.13570");
        assert_eq!(one("(F8.2)", Value::Real(10.0)).unwrap(), "   10.00");
        assert_eq!(one("(F6.2)", Value::Real(-1.25)).unwrap(), " -1.25");
        // The leading zero is dropped when the column is too narrow for it.
        assert_eq!(one("(F5.4)", Value::Real(0.0)).unwrap(), ".0000");
        assert_eq!(one("(F6.4)", Value::Real(-0.25)).unwrap(), "-.2500");
        assert_eq!(one("(F4.2)", Value::Real(123.45)).unwrap(), "****");
        // Rendering rounds to the column's fractional digits.
        assert_eq!(one("(F6.2)", Value::Real(1.005)).unwrap(), "  1.00");
        assert_eq!(one("(F6.2)", Value::Real(1.996)).unwrap(), "  2.00");
    }

    #[test]
    fn integer_promotes_into_real_column() {
        assert_eq!(one("(F6.2)", Value::Int(3)).unwrap(), "  3.00");
        assert_eq!(one("(E9.3)", Value::Int(25)).unwrap(), "0.250E+02");
    }

    #[test]
    fn exponent_form() {
        assert_eq!(one("(E10.4)", Value::Real(1.18)).unwrap(), "0.1180E+01");
        assert_eq!(one("(E11.4)", Value::Real(-1.18)).unwrap(), "-0.1180E+01");
        assert_eq!(one("(E10.4)", Value::Real(0.0)).unwrap(), "0.0000E+00");
        assert_eq!(one("(E10.4)", Value::Real(0.09999)).unwrap(), "0.9999E-01");
        // Rounding pushes the mantissa up one decade.
        assert_eq!(one("(E10.4)", Value::Real(0.099999)).unwrap(), "0.1000E+00");
        assert_eq!(one("(E12.4)", Value::Real(6.022e23)).unwrap(), "  0.6022E+24");
        assert_eq!(one("(E10.4)", Value::Real(1.0e-7)).unwrap(), "0.1000E-06");
        assert_eq!(one("(E6.4)", Value::Real(1.18)).unwrap(), "******");
    }

    #[test]
    fn text() {
        assert_eq!(one("(A8)", Value::Text("TESTTEXT".into())).unwrap(), "TESTTEXT");
        // Text is right-justified and truncated from the right.
        assert_eq!(one("(A5)", Value::Text("ABC".into())).unwrap(), "  ABC");
        assert_eq!(one("(A3)", Value::Text("ABCDE".into())).unwrap(), "ABC");
    }

    #[test]
    fn blank_slots_and_skips() {
        let format = spec("(I2, 3X, A2)");
        assert_eq!(
            encode(&[None, Some(Value::Text("ok".into()))], &format).unwrap(),
            "     ok"
        );
    }

    #[test]
    fn kind_mismatch() {
        assert!(one("(I3)", Value::Real(1.0)).is_err());
        assert!(one("(I3)", Value::Text("abc".into())).is_err());
        assert!(one("(F6.2)", Value::Text("abc".into())).is_err());
        assert!(one("(A3)", Value::Int(1)).is_err());
    }

    #[test]
    fn wrong_value_count() {
        let format = spec("(I2, I2)");
        assert!(encode(&[Some(Value::Int(1))], &format).is_err());
    }

    #[test]
    fn round_trips_through_decode() {
        let format = spec("(I3, F5.4, F8.5, A8)");
        let values = [
            Some(Value::Int(3)),
            Some(Value::Real(0.0)),
            Some(Value::Real(0.1357)),
            Some(Value::Text("TESTTEXT".into())),
        ];
        let line = encode(&values, &format).unwrap();
        assert_eq!(line, "  3.0000 0.13570TESTTEXT");
        let decoded = crate::decode(&line, &format).unwrap();
        assert_eq!(
            decoded,
            values.iter().map(|v| v.clone().unwrap()).collect::<Vec<_>>()
        );
    }
}

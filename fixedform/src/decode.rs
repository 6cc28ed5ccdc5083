//! Fortran input editing: turning one fixed-width line into typed values.
use std::fmt;

use num_traits::{
    ops::overflowing::{OverflowingAdd, OverflowingMul, OverflowingSub},
    FromPrimitive, Zero,
};

use crate::{Descriptor, FormatSpec, Value};

/// Error produced when a line does not decode against a format.
///
/// `column` is the 1-based byte position in the line, normally the start of
/// the offending column.
#[derive(Debug)]
pub struct FormatError {
    /// Position of the error in the line.
    pub column: usize,
    /// The error message.
    pub msg: String,
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "column {}: {}", self.column, self.msg)
    }
}

impl std::error::Error for FormatError {}

#[cold]
#[inline(never)]
fn malformed(bytes: &[u8], start: usize, end: usize, what: &str) -> FormatError {
    let field = String::from_utf8_lossy(bytes.get(start..end.min(bytes.len())).unwrap_or(&[]));
    FormatError {
        column: start + 1,
        msg: format!("malformed {} field {:?}", what, field),
    }
}

/// Decodes one line against a format, producing one [`Value`] per
/// value-carrying column, in column order.
///
/// Columns are byte positions. A line shorter than
/// [`format.width()`][FormatSpec::width] is treated as blank-padded on the
/// right; a longer line is an error. Blanks inside numeric columns are
/// ignored, and an all-blank numeric column reads as zero. A real column
/// without an explicit decimal point has its point implied `d` digits from
/// the right; exponents may be written `E`/`D` style or, as Fortran allows,
/// as a bare `+`/`-` following the mantissa.
pub fn decode(line: &str, format: &FormatSpec) -> Result<Vec<Value>, FormatError> {
    let bytes = line.as_bytes();
    if bytes.len() > format.width() {
        return Err(FormatError {
            column: format.width() + 1,
            msg: format!(
                "line is {} columns long, format describes {}",
                bytes.len(),
                format.width()
            ),
        });
    }

    let mut values = Vec::with_capacity(format.value_slots());
    let mut at = 0;
    for descriptor in format.descriptors() {
        let end = at + descriptor.width();
        match *descriptor {
            Descriptor::Int { .. } => values.push(Value::Int(int_field(bytes, at, end)?)),
            Descriptor::Real { frac, .. } | Descriptor::Exp { frac, .. } => {
                values.push(Value::Real(real_field(bytes, at, end, frac)?))
            }
            Descriptor::Text { .. } => values.push(Value::Text(text_field(bytes, at, end)?)),
            Descriptor::Skip { .. } => {}
        }
        at = end;
    }
    Ok(values)
}

/// Returns the byte at `i`, with positions past the end of the line reading
/// as blanks.
#[inline]
fn byte_at(bytes: &[u8], i: usize) -> u8 {
    bytes.get(i).copied().unwrap_or(b' ')
}

/// Accumulates decimal digits into `I`, tracking overflow.
///
/// Negative values are accumulated by subtraction so that the full two's
/// complement range is reachable. Returns `None` on overflow.
fn signed_decimal<I>(digits: &[u8], negative: bool) -> Option<I>
where
    I: Zero + FromPrimitive + OverflowingAdd + OverflowingSub + OverflowingMul,
{
    let mut value = I::zero();
    let mut overflow = false;

    for &digit in digits {
        let (new_value, overflowed) = value.overflowing_mul(&I::from_u8(10).unwrap());
        overflow |= overflowed;
        value = new_value;

        let (new_value, overflowed) = if negative {
            value.overflowing_sub(&I::from_u8(digit).unwrap())
        } else {
            value.overflowing_add(&I::from_u8(digit).unwrap())
        };
        overflow |= overflowed;
        value = new_value;
    }

    (!overflow).then_some(value)
}

fn int_field(bytes: &[u8], start: usize, end: usize) -> Result<i64, FormatError> {
    let mut digits = vec![];
    let mut negative = false;
    let mut signed = false;

    for i in start..end {
        match byte_at(bytes, i) {
            b' ' => {}
            sign @ (b'+' | b'-') if !signed && digits.is_empty() => {
                signed = true;
                negative = sign == b'-';
            }
            digit @ b'0'..=b'9' => digits.push(digit - b'0'),
            _ => return Err(malformed(bytes, start, end, "integer")),
        }
    }
    if signed && digits.is_empty() {
        return Err(malformed(bytes, start, end, "integer"));
    }

    signed_decimal(&digits, negative).ok_or_else(|| FormatError {
        column: start + 1,
        msg: "integer field overflows".to_owned(),
    })
}

fn real_field(bytes: &[u8], start: usize, end: usize, frac: usize) -> Result<f64, FormatError> {
    let mut mantissa = String::new();
    let mut has_point = false;
    let mut in_exponent = false;
    let mut exp_signed = false;
    let mut exp_negative = false;
    let mut exp_digits = vec![];

    for i in start..end {
        match byte_at(bytes, i) {
            b' ' => {}
            digit @ b'0'..=b'9' if in_exponent => exp_digits.push(digit - b'0'),
            digit @ b'0'..=b'9' => mantissa.push(digit as char),
            b'.' if !in_exponent && !has_point => {
                has_point = true;
                mantissa.push('.');
            }
            b'e' | b'E' | b'd' | b'D' if !in_exponent && !mantissa.is_empty() => {
                in_exponent = true;
            }
            sign @ (b'+' | b'-') if !in_exponent && mantissa.is_empty() => {
                mantissa.push(sign as char);
            }
            // Fortran allows the exponent marker to be a bare sign.
            sign @ (b'+' | b'-') if !in_exponent && !mantissa.is_empty() => {
                in_exponent = true;
                exp_signed = true;
                exp_negative = sign == b'-';
            }
            sign @ (b'+' | b'-') if !exp_signed && exp_digits.is_empty() => {
                exp_signed = true;
                exp_negative = sign == b'-';
            }
            _ => return Err(malformed(bytes, start, end, "real")),
        }
    }

    if mantissa.is_empty() && !in_exponent {
        return Ok(0.0);
    }
    if in_exponent && exp_digits.is_empty() {
        return Err(malformed(bytes, start, end, "real"));
    }

    let exponent: i32 = signed_decimal(&exp_digits, exp_negative)
        .ok_or_else(|| malformed(bytes, start, end, "real"))?;
    let scale = if has_point {
        exponent
    } else {
        exponent - frac as i32
    };

    format!("{}e{}", mantissa, scale)
        .parse()
        .map_err(|_| malformed(bytes, start, end, "real"))
}

fn text_field(bytes: &[u8], start: usize, end: usize) -> Result<String, FormatError> {
    let avail = end.min(bytes.len());
    let mut text = if start < avail {
        std::str::from_utf8(&bytes[start..avail])
            .map_err(|_| FormatError {
                column: start + 1,
                msg: "text field is not valid UTF-8".to_owned(),
            })?
            .to_owned()
    } else {
        String::new()
    };
    for _ in text.len()..end - start {
        text.push(' ');
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(s: &str) -> FormatSpec {
        s.parse().unwrap()
    }

    fn one(format: &str, line: &str) -> Result<Value, FormatError> {
        decode(line, &spec(format)).map(|mut values| values.remove(0))
    }

    #[test]
    fn integers() {
        assert_eq!(one("(I3)", "  3").unwrap(), Value::Int(3));
        assert_eq!(one("(I4)", " -12").unwrap(), Value::Int(-12));
        assert_eq!(one("(I4)", "+12 ").unwrap(), Value::Int(12));
        // Blanks inside the column are ignored.
        assert_eq!(one("(I4)", "1 2 ").unwrap(), Value::Int(12));
        // An all-blank numeric column reads as zero.
        assert_eq!(one("(I3)", "   ").unwrap(), Value::Int(0));
        assert_eq!(one("(I3)", "").unwrap(), Value::Int(0));
        assert_eq!(
            one("(I19)", "9223372036854775807").unwrap(),
            Value::Int(i64::MAX)
        );
        assert_eq!(
            one("(I20)", "-9223372036854775808").unwrap(),
            Value::Int(i64::MIN)
        );

        assert!(one("(I3)", "1a2").is_err());
        assert!(one("(I3)", "1-2").is_err());
        assert!(one("(I3)", "  -").is_err());
        assert!(one("(I20)", " 9223372036854775808").is_err());
    }

    #[test]
    fn reals_with_point() {
        assert_eq!(one("(F5.4)", "  0.0").unwrap(), Value::Real(0.0));
        assert_eq!(one("(F8.5)", "   .1357").unwrap(), Value::Real(0.1357));
        assert_eq!(one("(F8.5)", "    1.18").unwrap(), Value::Real(1.18));
        assert_eq!(one("(F6.2)", " -1.25").unwrap(), Value::Real(-1.25));
        assert_eq!(one("(F4.1)", "25. ").unwrap(), Value::Real(25.0));
    }

    #[test]
    fn implied_decimal_point() {
        assert_eq!(one("(F6.4)", "  3959").unwrap(), Value::Real(0.3959));
        assert_eq!(one("(F6.2)", "   125").unwrap(), Value::Real(1.25));
        assert_eq!(one("(F6.2)", "  -125").unwrap(), Value::Real(-1.25));
        assert_eq!(one("(F6.0)", "   125").unwrap(), Value::Real(125.0));
    }

    #[test]
    fn exponents() {
        assert_eq!(one("(E8.2)", "  1.2E+2").unwrap(), Value::Real(120.0));
        assert_eq!(one("(E8.2)", "  1.2e-1").unwrap(), Value::Real(0.12));
        assert_eq!(one("(E8.2)", "  1.2D+2").unwrap(), Value::Real(120.0));
        // Bare-sign exponent, as in "1.2-1" for 1.2e-1.
        assert_eq!(one("(E8.2)", "   1.2-1").unwrap(), Value::Real(0.12));
        // Implied point applies before the exponent: 314e+2 with d=2 is 3.14e2.
        assert_eq!(one("(E8.2)", "   314+2").unwrap(), Value::Real(314.0));
        assert_eq!(one("(F8.2)", "  1.2E+2").unwrap(), Value::Real(120.0));

        assert!(one("(E8.2)", "   1.2E+").is_err());
        assert!(one("(E8.2)", "    1.2E").is_err());
        assert!(one("(E8.2)", " 1.2E+-2").is_err());
        assert!(one("(E8.2)", "  1.2E2E").is_err());
    }

    #[test]
    fn blank_and_malformed_reals() {
        assert_eq!(one("(F8.5)", "        ").unwrap(), Value::Real(0.0));
        assert!(one("(F5.4)", "  1.2.3").is_err());
        assert!(one("(F4.1)", "   .").is_err());
        assert!(one("(F4.1)", "   -").is_err());
        assert!(one("(F4.1)", "abcd").is_err());
    }

    #[test]
    fn text() {
        assert_eq!(one("(A8)", "TESTTEXT").unwrap(), Value::Text("TESTTEXT".into()));
        assert_eq!(one("(A5)", "AB CD").unwrap(), Value::Text("AB CD".into()));
        // Short lines read as blank-padded.
        assert_eq!(one("(A5)", "AB").unwrap(), Value::Text("AB   ".into()));
        assert_eq!(one("(A3)", "").unwrap(), Value::Text("   ".into()));
    }

    #[test]
    fn skip_columns() {
        let values = decode("ab12", &spec("(2X, I2)")).unwrap();
        assert_eq!(values, [Value::Int(12)]);
    }

    #[test]
    fn line_longer_than_format() {
        let err = decode("1234", &spec("(I3)")).unwrap_err();
        assert_eq!(err.column, 4);
    }

    #[test]
    fn whole_card() {
        let values = decode(
            "  3  0.0   .1357 0   .3959    1.18TESTTEXTFIXEDRIGHT",
            &spec("(I3, F5.4, F8.5, I2, F8.5, F8.5, A8, A5, A5)"),
        )
        .unwrap();
        assert_eq!(
            values,
            [
                Value::Int(3),
                Value::Real(0.0),
                Value::Real(0.1357),
                Value::Int(0),
                Value::Real(0.3959),
                Value::Real(1.18),
                Value::Text("TESTTEXT".into()),
                Value::Text("FIXED".into()),
                Value::Text("RIGHT".into()),
            ]
        );
    }
}

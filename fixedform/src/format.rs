//! Parsing of Fortran-style edit-descriptor format strings.
use std::{fmt, str::FromStr};

/// A single edit descriptor, describing one fixed-width column.
///
/// Repeat counts in the format string are already expanded, so a
/// [`FormatSpec`] holds one `Descriptor` per physical column.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Descriptor {
    /// `Iw`: a `w` column wide integer.
    Int {
        /// Column width.
        width: usize,
    },
    /// `Fw.d`: a `w` column wide real with `d` fractional digits.
    ///
    /// On input, `d` only matters for values written without an explicit
    /// decimal point; on output it is the number of digits printed after the
    /// point.
    Real {
        /// Column width.
        width: usize,
        /// Fractional digits.
        frac: usize,
    },
    /// `Ew.d` (or `Dw.d`): like [`Real`][Descriptor::Real] but written in
    /// normalized exponent form.
    Exp {
        /// Column width.
        width: usize,
        /// Fractional digits.
        frac: usize,
    },
    /// `Aw`: `w` columns of raw text.
    Text {
        /// Column width.
        width: usize,
    },
    /// `nX`: `n` columns that carry no value.
    Skip {
        /// Column width.
        width: usize,
    },
}

impl Descriptor {
    /// Width of the column in the line, in bytes.
    pub fn width(&self) -> usize {
        match *self {
            Descriptor::Int { width }
            | Descriptor::Real { width, .. }
            | Descriptor::Exp { width, .. }
            | Descriptor::Text { width }
            | Descriptor::Skip { width } => width,
        }
    }

    /// Whether decoding this column produces a [`Value`][crate::Value].
    ///
    /// Only `X` columns don't.
    pub fn produces_value(&self) -> bool {
        !matches!(self, Descriptor::Skip { .. })
    }
}

/// A parsed format string, e.g. `"(I3, F5.4, 2F8.5, A8)"`.
///
/// The supported descriptors are the subset used by card-style input decks:
/// `Iw`, `Fw.d`, `Ew.d`, `Dw.d`, `Aw` and `nX`, each with an optional repeat
/// count, in a single parenthesized, comma-separated group. Descriptor
/// letters are case insensitive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatSpec {
    descriptors: Vec<Descriptor>,
    width: usize,
    value_slots: usize,
}

impl FormatSpec {
    /// The expanded descriptors, one per column.
    pub fn descriptors(&self) -> &[Descriptor] {
        &self.descriptors
    }

    /// Total line width described by the format, in bytes.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of values [`decode`][crate::decode] produces for this format
    /// and [`encode`][crate::encode] consumes.
    pub fn value_slots(&self) -> usize {
        self.value_slots
    }
}

impl FromStr for FormatSpec {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, SpecError> {
        Parser::new(s).parse()
    }
}

/// Error produced when a format string is malformed.
///
/// `column` is the 1-based byte position in the format string.
#[derive(Debug)]
pub struct SpecError {
    /// Position of the error in the format string.
    pub column: usize,
    /// The error message.
    pub msg: String,
}

impl fmt::Display for SpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "format string column {}: {}", self.column, self.msg)
    }
}

impl std::error::Error for SpecError {}

struct Parser<'a> {
    bytes: &'a [u8],
    at: usize,
}

impl<'a> Parser<'a> {
    fn new(s: &'a str) -> Self {
        Self {
            bytes: s.trim().as_bytes(),
            at: 0,
        }
    }

    fn give_up(&self, msg: impl Into<String>) -> SpecError {
        self.give_up_at(self.at, msg)
    }

    fn give_up_at(&self, at: usize, msg: impl Into<String>) -> SpecError {
        SpecError {
            column: at + 1,
            msg: msg.into(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.at).copied()
    }

    fn skip_blanks(&mut self) {
        while let Some(b' ' | b'\t') = self.peek() {
            self.at += 1;
        }
    }

    fn number(&mut self) -> Option<usize> {
        let mut value: usize = 0;
        let start = self.at;
        while let Some(digit @ b'0'..=b'9') = self.peek() {
            value = value.saturating_mul(10).saturating_add((digit - b'0') as usize);
            self.at += 1;
        }
        (self.at != start).then_some(value)
    }

    fn parse(mut self) -> Result<FormatSpec, SpecError> {
        if self.peek() != Some(b'(') {
            return Err(self.give_up("expected '(' at the start of the format"));
        }
        self.at += 1;

        let mut descriptors = vec![];
        loop {
            self.skip_blanks();
            self.item(&mut descriptors)?;
            self.skip_blanks();
            match self.peek() {
                Some(b',') => self.at += 1,
                Some(b')') => {
                    self.at += 1;
                    break;
                }
                Some(other) => {
                    return Err(
                        self.give_up(format!("expected ',' or ')', found {:?}", other as char))
                    )
                }
                None => return Err(self.give_up("unterminated format, expected ')'")),
            }
        }
        self.skip_blanks();
        if self.peek().is_some() {
            return Err(self.give_up("trailing characters after ')'"));
        }

        let width = descriptors.iter().map(Descriptor::width).sum();
        let value_slots = descriptors.iter().filter(|d| d.produces_value()).count();
        Ok(FormatSpec {
            descriptors,
            width,
            value_slots,
        })
    }

    fn item(&mut self, descriptors: &mut Vec<Descriptor>) -> Result<(), SpecError> {
        let repeat = self.number();

        let letter_at = self.at;
        let letter = match self.peek() {
            Some(letter @ (b'a'..=b'z' | b'A'..=b'Z')) => letter.to_ascii_uppercase(),
            Some(b'(') => return Err(self.give_up("nested groups are not supported")),
            Some(other) => {
                return Err(self.give_up(format!(
                    "expected an edit descriptor, found {:?}",
                    other as char
                )))
            }
            None => return Err(self.give_up("expected an edit descriptor")),
        };
        self.at += 1;

        // nX carries its width as the repeat count.
        if letter == b'X' {
            let width = repeat.unwrap_or(1);
            descriptors.push(Descriptor::Skip { width });
            return Ok(());
        }

        let width = match self.number() {
            Some(0) | None => return Err(self.give_up("descriptor requires a nonzero width")),
            Some(width) => width,
        };

        let frac = if self.peek() == Some(b'.') {
            self.at += 1;
            match self.number() {
                Some(frac) => Some(frac),
                None => return Err(self.give_up("expected digits after '.'")),
            }
        } else {
            None
        };

        let descriptor = match (letter, frac) {
            (b'I', None) => Descriptor::Int { width },
            (b'I', Some(_)) => {
                return Err(self.give_up_at(letter_at, "'I' takes no fractional digits"))
            }
            (b'F', Some(frac)) => Descriptor::Real { width, frac },
            (b'E' | b'D', Some(frac)) => Descriptor::Exp { width, frac },
            (b'F' | b'E' | b'D', None) => {
                return Err(self.give_up_at(
                    letter_at,
                    format!("'{}' requires fractional digits, e.g. F8.2", letter as char),
                ))
            }
            (b'A', None) => Descriptor::Text { width },
            (b'A', Some(_)) => {
                return Err(self.give_up_at(letter_at, "'A' takes no fractional digits"))
            }
            _ => {
                return Err(self.give_up_at(
                    letter_at,
                    format!("unsupported edit descriptor '{}'", letter as char),
                ))
            }
        };

        for _ in 0..repeat.unwrap_or(1) {
            descriptors.push(descriptor);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Result<FormatSpec, SpecError> {
        s.parse()
    }

    #[test]
    fn single_descriptors() {
        let spec = parse("(I3)").unwrap();
        assert_eq!(spec.descriptors(), [Descriptor::Int { width: 3 }]);
        assert_eq!(spec.width(), 3);
        assert_eq!(spec.value_slots(), 1);

        let spec = parse("(F8.5)").unwrap();
        assert_eq!(spec.descriptors(), [Descriptor::Real { width: 8, frac: 5 }]);

        let spec = parse("(E10.4)").unwrap();
        assert_eq!(spec.descriptors(), [Descriptor::Exp { width: 10, frac: 4 }]);

        let spec = parse("(D10.4)").unwrap();
        assert_eq!(spec.descriptors(), [Descriptor::Exp { width: 10, frac: 4 }]);

        let spec = parse("(A8)").unwrap();
        assert_eq!(spec.descriptors(), [Descriptor::Text { width: 8 }]);
    }

    #[test]
    fn repeat_counts() {
        let spec = parse("(2F8.5, 3X, A4)").unwrap();
        assert_eq!(
            spec.descriptors(),
            [
                Descriptor::Real { width: 8, frac: 5 },
                Descriptor::Real { width: 8, frac: 5 },
                Descriptor::Skip { width: 3 },
                Descriptor::Text { width: 4 },
            ]
        );
        assert_eq!(spec.width(), 23);
        assert_eq!(spec.value_slots(), 3);
    }

    #[test]
    fn bare_skip() {
        let spec = parse("(X, I2)").unwrap();
        assert_eq!(spec.width(), 3);
        assert_eq!(spec.value_slots(), 1);
    }

    #[test]
    fn case_insensitive() {
        assert_eq!(parse("(i3, f5.4, a8)").unwrap(), parse("(I3, F5.4, A8)").unwrap());
    }

    #[test]
    fn original_card_format() {
        let spec = parse("(I3, F5.4, F8.5, I2, F8.5, F8.5, A8, A5, A5)").unwrap();
        assert_eq!(spec.width(), 52);
        assert_eq!(spec.value_slots(), 9);
    }

    #[test]
    fn errors() {
        assert!(parse("I3").is_err());
        assert!(parse("(I3").is_err());
        assert!(parse("(I3) extra").is_err());
        assert!(parse("(I)").is_err());
        assert!(parse("(I0)").is_err());
        assert!(parse("(F8)").is_err());
        assert!(parse("(F8.)").is_err());
        assert!(parse("(I3.2)").is_err());
        assert!(parse("(A5.1)").is_err());
        assert!(parse("(Q5)").is_err());
        assert!(parse("(2(I3))").is_err());
        assert!(parse("(I3; F5.4)").is_err());
    }

    #[test]
    fn error_positions() {
        let err = parse("(I3, Q5)").unwrap_err();
        assert_eq!(err.column, 6);
    }
}

use std::fmt;

/// A single decoded field value.
///
/// Fixed-width lines only ever carry three kinds of data: integers (`I`
/// columns), reals (`F` and `E` columns) and raw text (`A` columns). A
/// [`Value`] is whichever of those a column produced, or should produce when
/// [encoding][crate::encode].
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// An integer, from an `I` column.
    Int(i64),
    /// A real number, from an `F` or `E` column.
    Real(f64),
    /// Raw column text, from an `A` column, including any padding blanks.
    Text(String),
}

impl Value {
    /// The kind of this value, as used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Real(_) => "real",
            Value::Text(_) => "text",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(value) => write!(f, "{}", value),
            Value::Real(value) => write!(f, "{}", value),
            Value::Text(value) => f.write_str(value),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Real(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

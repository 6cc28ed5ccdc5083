//! Fixedform reads and writes Fortran-style fixed-width text fields.
//!
//! Legacy scientific and engineering input decks describe each line as a
//! sequence of fixed byte columns, using Fortran edit descriptors such as
//! `(I3, F5.4, 2F8.5, A8)`. This crate implements the subset of those
//! descriptors that card-style decks actually use (`Iw`, `Fw.d`, `Ew.d`,
//! `Dw.d`, `Aw` and `nX`), together with the input and output editing rules
//! that come with them:
//!
//! * blanks inside numeric columns are ignored, and an all-blank numeric
//!   column reads as zero;
//! * a real column without an explicit decimal point has its point implied
//!   `d` digits from the right, and exponents may be marked with `E`, `D` or
//!   a bare sign;
//! * a line shorter than the format reads as blank-padded on the right,
//!   while a longer line is rejected;
//! * on output, numbers are right-justified, a number too wide for its
//!   column fills it with `*`, and the leading zero of `0.…` is dropped when
//!   the column is too narrow for it.
//!
//! The three operations are [`FormatSpec`] parsing (via [`FromStr`]),
//! [`decode`] and [`encode`]:
//!
//! ```rust
//! use fixedform::{decode, encode, FormatSpec, Value};
//!
//! let format: FormatSpec = "(I3, F8.2, A4)".parse().unwrap();
//!
//! let values = decode(" 42    3.14TEXT", &format).unwrap();
//! assert_eq!(
//!     values,
//!     [Value::Int(42), Value::Real(3.14), Value::Text("TEXT".into())]
//! );
//!
//! let line = encode(
//!     &values.into_iter().map(Some).collect::<Vec<_>>(),
//!     &format,
//! )
//! .unwrap();
//! assert_eq!(line, " 42    3.14TEXT");
//! ```
//!
//! Columns are byte positions; the crate is intended for the ASCII data
//! these formats were designed around, though `A` columns pass through any
//! UTF-8 text whose bytes happen to fall on column boundaries.
//!
//! [`FromStr`]: std::str::FromStr

#![warn(missing_docs)]
mod decode;
mod encode;
mod format;
mod value;

pub use decode::{decode, FormatError};
pub use encode::{encode, EncodeError};
pub use format::{Descriptor, FormatSpec, SpecError};
pub use value::Value;

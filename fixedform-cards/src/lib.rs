//! Composable record grammars for fixed-width card decks.
//!
//! Many legacy scientific and engineering programs read "card" input: files
//! of fixed-width lines whose columns are described by Fortran-style edit
//! descriptors. This crate lets a caller describe such a deck declaratively
//! as a tree of [`Card`] nodes and then validate a block of lines against
//! it ([`Card::matches`]), parse the block into structured data
//! ([`Card::read`], [`Card::data`]), or render the data back into
//! fixed-width text ([`Card::write`]).
//!
//! Six node kinds compose by containment:
//!
//! * [`FieldCard`]: one line of fixed-width columns, decoded by
//!   [`fixedform`], with optional fixed-value fields;
//! * [`FixedTextCard`]: one line of fixed literal text;
//! * [`CardStack`]: a fixed sequence of cards forming one multi-line
//!   record;
//! * [`CardRepeat`]: a repeated card, ended by a marker card or by the
//!   first non-matching line;
//! * [`CardAlternates`]: the first matching card out of an ordered list,
//!   retrying the previous winner first;
//! * [`CardOptional`]: a card that may be absent.
//!
//! ```rust
//! use fixedform_cards::{Card, CardRepeat, CardStack, Field, FieldCard, FixedTextCard};
//!
//! let point = FieldCard::new("(I4, F8.2)", [Field::named("N"), Field::named("X")]).unwrap();
//! let mut deck: Card = CardStack::new([
//!     FixedTextCard::new("POINTS").into(),
//!     CardRepeat::new(point)
//!         .with_end_marker(FixedTextCard::new("END"))
//!         .with_name("points")
//!         .into(),
//! ])
//! .into();
//!
//! let lines = ["POINTS", "   1   10.00", "   2    2.50", "END"];
//! assert!(deck.matches(&lines));
//!
//! deck.read(&lines).unwrap();
//! assert_eq!(deck.num_lines(), 4);
//!
//! let data = deck.data();
//! let points = data.get("points").unwrap();
//! assert_eq!(points.at(0).unwrap().int("N"), Some(1));
//! assert_eq!(points.at(1).unwrap().real("X"), Some(2.5));
//!
//! assert_eq!(deck.write().unwrap(), lines.join("\n"));
//! ```
//!
//! Validation is speculative but safe: `matches` performs its trial read on
//! a private clone, and `read` commits a clone only on success, so a failed
//! attempt never leaves observable state behind. The same discipline drives
//! a repeat's per-iteration template trial and the candidate probing of
//! alternates.

#![warn(missing_docs)]
mod alternates;
mod card;
mod data;
mod error;
mod field;
mod fixed_text;
mod optional;
mod repeat;
mod stack;

pub use alternates::CardAlternates;
pub use card::{Card, PostReadHook};
pub use data::CardData;
pub use error::CardError;
pub use field::{Field, FieldCard};
pub use fixed_text::FixedTextCard;
pub use optional::CardOptional;
pub use repeat::CardRepeat;
pub use stack::CardStack;

use fixedform::{EncodeError, FormatError, SpecError, Value};
use thiserror::Error;

/// Errors produced when defining, reading or writing cards.
///
/// [`Card::matches`][crate::Card::matches] swallows all of these into
/// `false` after discarding its trial copy; [`Card::read`][crate::Card::read]
/// propagates the first error encountered upward unchanged. Container cards
/// do not wrap child errors, with one exception: a repeat with an end marker
/// wraps a failed template read in [`RepeatTemplate`][Self::RepeatTemplate],
/// while a repeat without one treats that failure as the end of the
/// repetition instead of an error.
#[derive(Error, Debug)]
pub enum CardError {
    /// A fixed field decoded to a value other than its required literal.
    #[error("fixed field with wrong value: {actual}/{expected}")]
    FixedFieldMismatch {
        /// Name of the fixed field.
        name: String,
        /// The required literal.
        expected: Value,
        /// The value the line actually carries.
        actual: Value,
    },
    /// A fixed-text line differs from its required content.
    #[error("fixed text with wrong value: {actual:?}/{expected:?}")]
    FixedTextMismatch {
        /// The required line content.
        expected: String,
        /// The line actually read.
        actual: String,
    },
    /// A line did not decode against a card's column format.
    #[error(transparent)]
    Format(#[from] FormatError),
    /// No candidate of an alternates card matched the input.
    #[error("none of the alternate cards matched")]
    NoAlternateMatched,
    /// Inside a repeat with an end marker, a line matched neither the marker
    /// nor the template.
    #[error("card in a terminated repeat does not match the template")]
    RepeatTemplate(#[source] Box<CardError>),
    /// The input ended before the card's lines did.
    #[error("unexpected end of input")]
    EndOfInput,
    /// A value could not be rendered into its column on write.
    #[error(transparent)]
    Encode(#[from] EncodeError),
    /// A field name the card does not declare.
    #[error("card has no field named {0:?}")]
    UnknownField(String),
    /// The column format string of a card is malformed.
    #[error(transparent)]
    Spec(#[from] SpecError),
    /// A card's field list does not line up with its column format.
    #[error("format describes {expected} value column(s), {given} field(s) given")]
    FieldCount {
        /// Value columns in the format.
        expected: usize,
        /// Fields in the card definition.
        given: usize,
    },
}

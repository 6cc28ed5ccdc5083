use std::collections::HashMap;

use fixedform::{decode, encode, FormatSpec, Value};

use crate::{Card, CardData, CardError, PostReadHook};

/// Binding of one value column of a [`FieldCard`] to a role.
#[derive(Clone, Debug)]
pub struct Field {
    pub(crate) name: Option<String>,
    pub(crate) expected: Option<Value>,
}

impl Field {
    /// A field whose decoded value is stored under `name`.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            expected: None,
        }
    }

    /// A column that is decoded but not kept.
    ///
    /// The column still has to decode cleanly for the card to match; its
    /// value is dropped, and [`write`][Card::write] leaves it blank.
    pub fn discard() -> Self {
        Self {
            name: None,
            expected: None,
        }
    }

    /// A field whose decoded value must equal `value` for the card to
    /// match.
    ///
    /// The field is stored under the literal's text rendering as its name,
    /// and [`write`][Card::write] always renders the literal itself.
    pub fn fixed(value: impl Into<Value>) -> Self {
        let value = value.into();
        Self {
            name: Some(value.to_string()),
            expected: Some(value),
        }
    }
}

/// One physical line of fixed-width columns.
///
/// The column layout is a Fortran-style format string such as
/// `"(I3, F5.4, A8)"`, decoded and encoded by [`fixedform`]; `fields` binds
/// each value-carrying column, in order, to a [`Field`] role.
///
/// ```rust
/// use fixedform_cards::{Card, Field, FieldCard};
///
/// let mut card: Card = FieldCard::new(
///     "(I4, F8.2, A5)",
///     [Field::named("N"), Field::named("X"), Field::fixed("LOAD ")],
/// )
/// .unwrap()
/// .into();
///
/// card.read(&["   7   12.50LOAD "]).unwrap();
/// assert_eq!(card.data().int("N"), Some(7));
/// assert_eq!(card.data().real("X"), Some(12.5));
/// assert!(!card.matches(&["   7   12.50DUMP "]));
/// ```
#[derive(Clone)]
pub struct FieldCard {
    format: FormatSpec,
    fields: Vec<Field>,
    values: HashMap<String, Value>,
    pub(crate) name: Option<String>,
    pub(crate) hook: Option<PostReadHook>,
}

impl std::fmt::Debug for FieldCard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldCard")
            .field("format", &self.format)
            .field("fields", &self.fields)
            .field("values", &self.values)
            .field("name", &self.name)
            .field("hook", &self.hook.as_ref().map(|_| "<hook>"))
            .finish()
    }
}

impl FieldCard {
    /// Creates a card from a format string and the fields bound to its
    /// value columns.
    ///
    /// Fails if the format string is malformed or if `fields` does not have
    /// exactly one entry per value column.
    pub fn new(format: &str, fields: impl Into<Vec<Field>>) -> Result<Self, CardError> {
        let format: FormatSpec = format.parse()?;
        let fields = fields.into();
        if format.value_slots() != fields.len() {
            return Err(CardError::FieldCount {
                expected: format.value_slots(),
                given: fields.len(),
            });
        }
        Ok(Self {
            format,
            fields,
            values: HashMap::new(),
            name: None,
            hook: None,
        })
    }

    /// Sets the card's name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets a callback to run after each successful read of this card.
    pub fn with_post_read_hook(mut self, hook: impl Fn(&mut Card) + 'static) -> Self {
        self.hook = Some(std::rc::Rc::new(hook));
        self
    }

    /// The current value of a named field.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Updates a named field.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), CardError> {
        if !self.fields.iter().any(|f| f.name.as_deref() == Some(name)) {
            return Err(CardError::UnknownField(name.to_owned()));
        }
        self.values.insert(name.to_owned(), value.into());
        Ok(())
    }

    pub(crate) fn read_line(&mut self, lines: &[&str]) -> Result<(), CardError> {
        let line = lines.first().ok_or(CardError::EndOfInput)?;
        let decoded = decode(line, &self.format)?;

        // Check every fixed field before storing anything.
        for (field, value) in self.fields.iter().zip(&decoded) {
            if let Some(expected) = &field.expected {
                if value != expected {
                    return Err(CardError::FixedFieldMismatch {
                        name: field.name.clone().unwrap_or_default(),
                        expected: expected.clone(),
                        actual: value.clone(),
                    });
                }
            }
        }

        for (field, value) in self.fields.iter().zip(decoded) {
            if let Some(name) = &field.name {
                self.values.insert(name.clone(), value);
            }
        }
        Ok(())
    }

    pub(crate) fn write_line(&self) -> Result<String, CardError> {
        let values: Vec<Option<Value>> = self
            .fields
            .iter()
            .map(|field| {
                if let Some(expected) = &field.expected {
                    Some(expected.clone())
                } else {
                    field.name.as_ref().and_then(|name| self.values.get(name).cloned())
                }
            })
            .collect();
        Ok(encode(&values, &self.format)?)
    }

    pub(crate) fn data(&self) -> CardData {
        CardData::Record(
            self.values
                .iter()
                .map(|(name, value)| (name.clone(), CardData::Value(value.clone())))
                .collect(),
        )
    }
}

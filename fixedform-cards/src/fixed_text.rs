use std::collections::HashMap;

use crate::{Card, CardData, CardError, PostReadHook};

/// One physical line of fixed literal text.
///
/// The line must equal the literal exactly; no column decoding is involved.
/// For composability the card exposes the same external shape as a
/// [`FieldCard`][crate::FieldCard] with a single fixed field: its data is a
/// record with one entry, keyed and valued by the literal.
#[derive(Clone)]
pub struct FixedTextCard {
    text: String,
    pub(crate) name: Option<String>,
    pub(crate) hook: Option<PostReadHook>,
}

impl FixedTextCard {
    /// Creates a card matching exactly `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            name: None,
            hook: None,
        }
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

    /// The literal line this card matches.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub(crate) fn read_line(&mut self, lines: &[&str]) -> Result<(), CardError> {
        let line = lines.first().ok_or(CardError::EndOfInput)?;
        if *line != self.text {
            return Err(CardError::FixedTextMismatch {
                expected: self.text.clone(),
                actual: (*line).to_owned(),
            });
        }
        Ok(())
    }

    pub(crate) fn write_line(&self) -> String {
        self.text.clone()
    }

    pub(crate) fn data(&self) -> CardData {
        let mut fields = HashMap::new();
        fields.insert(self.text.clone(), CardData::Value(self.text.clone().into()));
        CardData::Record(fields)
    }
}

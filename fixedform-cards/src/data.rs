use std::collections::HashMap;

use fixedform::Value;

/// Structured data produced by reading a card.
///
/// Field cards and stacks produce a [`Record`][Self::Record]; repeats
/// produce a [`List`][Self::List] with one entry per instance, in input
/// order. Individual fields are [`Value`][Self::Value] leaves.
///
/// Container cards build this view on demand from their current state, so
/// the data seen through an alternates or optional card always reflects
/// whichever candidate last matched.
#[derive(Clone, Debug, PartialEq)]
pub enum CardData {
    /// A single field value.
    Value(Value),
    /// The named fields of a card, plus the full data of any named child.
    Record(HashMap<String, CardData>),
    /// The instances of a repeated card.
    List(Vec<CardData>),
}

impl CardData {
    /// An empty record, the data of a card that matched nothing.
    pub fn empty() -> Self {
        CardData::Record(HashMap::new())
    }

    /// Looks up an entry of a record.
    pub fn get(&self, name: &str) -> Option<&CardData> {
        match self {
            CardData::Record(fields) => fields.get(name),
            _ => None,
        }
    }

    /// Looks up an instance of a list.
    pub fn at(&self, index: usize) -> Option<&CardData> {
        match self {
            CardData::List(instances) => instances.get(index),
            _ => None,
        }
    }

    /// The instances of a list, empty for other data.
    pub fn as_list(&self) -> &[CardData] {
        match self {
            CardData::List(instances) => instances,
            _ => &[],
        }
    }

    /// This datum as an integer value.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            CardData::Value(Value::Int(value)) => Some(*value),
            _ => None,
        }
    }

    /// This datum as a real value.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            CardData::Value(Value::Real(value)) => Some(*value),
            _ => None,
        }
    }

    /// This datum as column text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CardData::Value(Value::Text(value)) => Some(value),
            _ => None,
        }
    }

    /// Shorthand for [`get`][Self::get] followed by [`as_int`][Self::as_int].
    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(CardData::as_int)
    }

    /// Shorthand for [`get`][Self::get] followed by
    /// [`as_real`][Self::as_real].
    pub fn real(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(CardData::as_real)
    }

    /// Shorthand for [`get`][Self::get] followed by
    /// [`as_text`][Self::as_text].
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(CardData::as_text)
    }

    /// Number of entries of a record or instances of a list; 1 for a value.
    pub fn len(&self) -> usize {
        match self {
            CardData::Value(_) => 1,
            CardData::Record(fields) => fields.len(),
            CardData::List(instances) => instances.len(),
        }
    }

    /// Whether this datum holds nothing.
    pub fn is_empty(&self) -> bool {
        match self {
            CardData::Value(_) => false,
            CardData::Record(fields) => fields.is_empty(),
            CardData::List(instances) => instances.is_empty(),
        }
    }
}

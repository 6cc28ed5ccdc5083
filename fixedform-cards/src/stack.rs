use std::collections::HashMap;

use fixedform::Value;

use crate::{Card, CardData, CardError, PostReadHook};

/// A fixed, ordered sequence of cards forming one logical multi-line
/// record.
///
/// Reading walks the children in declaration order, each consuming its own
/// lines from the running offset; the first child failure aborts the whole
/// stack with that child's error. There is no rollback on the direct read
/// path; [`Card::read`] provides the all-or-none guarantee.
///
/// The stack's data merges every child's record entries in declaration
/// order (on a duplicate key the later child wins) and additionally maps
/// the name of each named child to that child's full data.
#[derive(Clone)]
pub struct CardStack {
    children: Vec<Card>,
    pub(crate) name: Option<String>,
    pub(crate) hook: Option<PostReadHook>,
}

impl CardStack {
    /// Creates a stack of cards, matched in order.
    pub fn new(children: impl Into<Vec<Card>>) -> Self {
        Self {
            children: children.into(),
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

    /// The stack's children.
    pub fn children(&self) -> &[Card] {
        &self.children
    }

    /// The stack's children, for updating their data before a write.
    pub fn children_mut(&mut self) -> &mut [Card] {
        &mut self.children
    }

    pub(crate) fn read_children(&mut self, lines: &[&str]) -> Result<(), CardError> {
        let mut at = 0;
        for child in &mut self.children {
            child.read_direct(&lines[at..])?;
            at += child.num_lines();
        }
        Ok(())
    }

    pub(crate) fn write_lines(&self, out: &mut Vec<String>) -> Result<(), CardError> {
        for child in &self.children {
            child.write_lines(out)?;
        }
        Ok(())
    }

    pub(crate) fn num_lines(&self) -> usize {
        self.children.iter().map(Card::num_lines).sum()
    }

    pub(crate) fn data(&self) -> CardData {
        let mut fields = HashMap::new();
        for child in &self.children {
            let data = child.data();
            if let CardData::Record(child_fields) = &data {
                for (name, value) in child_fields {
                    fields.insert(name.clone(), value.clone());
                }
            }
            if let Some(name) = child.name() {
                fields.insert(name.to_owned(), data);
            }
        }
        CardData::Record(fields)
    }

    pub(crate) fn set_value(&mut self, name: &str, value: Value) -> Result<(), CardError> {
        for child in &mut self.children {
            match child.set(name, value.clone()) {
                Err(CardError::UnknownField(_)) => continue,
                result => return result,
            }
        }
        Err(CardError::UnknownField(name.to_owned()))
    }
}

use std::rc::Rc;

use fixedform::Value;

use crate::{
    CardAlternates, CardData, CardError, CardOptional, CardRepeat, CardStack, FieldCard,
    FixedTextCard,
};

/// Callback invoked once after a card finishes a successful read.
///
/// The callback receives the card itself, with its data fully populated, and
/// is free to fix up fields or compute derived values through
/// [`Card::set`]. It runs at the single success point of a read, outside
/// the matching logic; note that trial reads performed on clones (by
/// [`Card::matches`] and by repeat and alternates probing) run it on the
/// clone as well.
pub type PostReadHook = Rc<dyn Fn(&mut Card)>;

/// A node of a record grammar.
///
/// A card covers a contiguous span of fixed-width lines: a single physical
/// line for the two leaf variants, and whatever its children cover for the
/// container variants. All variants share one protocol:
///
/// * [`matches`][Self::matches] checks a span of lines against the card
///   without mutating it;
/// * [`read`][Self::read] parses a span of lines into the card's data;
/// * [`write`][Self::write] renders the card's data back into fixed-width
///   lines;
/// * [`num_lines`][Self::num_lines] is the number of physical lines the
///   card currently covers.
///
/// Cards nest arbitrarily; the variant structs document their individual
/// matching rules.
#[derive(Clone)]
pub enum Card {
    /// One line of fixed-width columns.
    Field(FieldCard),
    /// One line of fixed literal text.
    FixedText(FixedTextCard),
    /// A fixed sequence of cards forming one multi-line record.
    Stack(CardStack),
    /// A repeated card, optionally ended by a marker card.
    Repeat(CardRepeat),
    /// The first matching card out of an ordered list of candidates.
    Alternates(CardAlternates),
    /// A card that may be absent.
    Optional(CardOptional),
}

impl Card {
    /// Checks whether `lines` starts with a span this card matches.
    ///
    /// This is a trial [`read_direct`][Self::read_direct] performed on a
    /// private clone; the card itself is never mutated, and any read error
    /// reports as `false`.
    pub fn matches(&self, lines: &[&str]) -> bool {
        let mut probe = self.clone();
        probe.read_direct(lines).is_ok()
    }

    /// Reads a prefix of `lines` into this card's data.
    ///
    /// The read is all-or-none: it is performed on a clone which replaces
    /// this card only on success, so a failed read leaves the card exactly
    /// as it was. For large inputs where the cost of cloning per read is
    /// prohibitive, [`read_direct`][Self::read_direct] skips that
    /// guarantee.
    pub fn read(&mut self, lines: &[&str]) -> Result<(), CardError> {
        let mut probe = self.clone();
        probe.read_direct(lines)?;
        *self = probe;
        Ok(())
    }

    /// Reads a prefix of `lines` into this card's data, in place.
    ///
    /// Unlike [`read`][Self::read] this does not clone first: on failure
    /// the card may be left partially updated (for example, the leading
    /// children of a stack whose later child failed keep their new data).
    pub fn read_direct(&mut self, lines: &[&str]) -> Result<(), CardError> {
        match self {
            Card::Field(card) => card.read_line(lines)?,
            Card::FixedText(card) => card.read_line(lines)?,
            Card::Stack(card) => card.read_children(lines)?,
            Card::Repeat(card) => card.read_instances(lines)?,
            Card::Alternates(card) => card.read_selected(lines)?,
            Card::Optional(card) => card.read_inner(lines)?,
        }
        if let Some(hook) = self.post_read_hook() {
            hook(self);
        }
        Ok(())
    }

    /// Renders the card's current data as fixed-width text, lines joined
    /// with `'\n'`.
    pub fn write(&self) -> Result<String, CardError> {
        let mut lines = vec![];
        self.write_lines(&mut lines)?;
        Ok(lines.join("\n"))
    }

    pub(crate) fn write_lines(&self, out: &mut Vec<String>) -> Result<(), CardError> {
        match self {
            Card::Field(card) => out.push(card.write_line()?),
            Card::FixedText(card) => out.push(card.write_line()),
            Card::Stack(card) => card.write_lines(out)?,
            Card::Repeat(card) => card.write_lines(out)?,
            Card::Alternates(card) => card.write_lines(out)?,
            Card::Optional(card) => card.write_lines(out)?,
        }
        Ok(())
    }

    /// Number of physical lines this card currently covers.
    ///
    /// Fixed at 1 for the leaf variants and at the sum of the children for
    /// a stack; for the other containers it reflects the most recent read
    /// and is 0 before any.
    pub fn num_lines(&self) -> usize {
        match self {
            Card::Field(_) | Card::FixedText(_) => 1,
            Card::Stack(card) => card.num_lines(),
            Card::Repeat(card) => card.num_lines(),
            Card::Alternates(card) => card.num_lines(),
            Card::Optional(card) => card.num_lines(),
        }
    }

    /// The card's name, if it was given one.
    ///
    /// A containing stack exposes a named child's full data under its name,
    /// in addition to merging the child's fields.
    pub fn name(&self) -> Option<&str> {
        match self {
            Card::Field(card) => card.name.as_deref(),
            Card::FixedText(card) => card.name.as_deref(),
            Card::Stack(card) => card.name.as_deref(),
            Card::Repeat(card) => card.name.as_deref(),
            Card::Alternates(card) => card.name.as_deref(),
            Card::Optional(card) => card.name.as_deref(),
        }
    }

    /// A structured view of the card's current data.
    pub fn data(&self) -> CardData {
        match self {
            Card::Field(card) => card.data(),
            Card::FixedText(card) => card.data(),
            Card::Stack(card) => card.data(),
            Card::Repeat(card) => card.data(),
            Card::Alternates(card) => card.data(),
            Card::Optional(card) => card.data(),
        }
    }

    /// Updates the named field, so that a subsequent
    /// [`write`][Self::write] renders the new value.
    ///
    /// Containers delegate: a stack tries its children in order and updates
    /// the first that declares the field, alternates and optional cards
    /// update the candidate that last matched. Repeats have no named
    /// fields; update their [instances][CardRepeat::instances_mut]
    /// directly.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), CardError> {
        self.set_value(name, value.into())
    }

    fn set_value(&mut self, name: &str, value: Value) -> Result<(), CardError> {
        match self {
            Card::Field(card) => card.set(name, value),
            Card::FixedText(_) | Card::Repeat(_) => Err(CardError::UnknownField(name.to_owned())),
            Card::Stack(card) => card.set_value(name, value),
            Card::Alternates(card) => match card.selected_mut() {
                Some(selected) => selected.set_value(name, value),
                None => Err(CardError::UnknownField(name.to_owned())),
            },
            Card::Optional(card) => match card.matched_mut() {
                Some(matched) => matched.set_value(name, value),
                None => Err(CardError::UnknownField(name.to_owned())),
            },
        }
    }

    fn post_read_hook(&self) -> Option<PostReadHook> {
        match self {
            Card::Field(card) => card.hook.clone(),
            Card::FixedText(card) => card.hook.clone(),
            Card::Stack(card) => card.hook.clone(),
            Card::Repeat(card) => card.hook.clone(),
            Card::Alternates(card) => card.hook.clone(),
            Card::Optional(card) => card.hook.clone(),
        }
    }
}

impl From<FieldCard> for Card {
    fn from(card: FieldCard) -> Self {
        Card::Field(card)
    }
}

impl From<FixedTextCard> for Card {
    fn from(card: FixedTextCard) -> Self {
        Card::FixedText(card)
    }
}

impl From<CardStack> for Card {
    fn from(card: CardStack) -> Self {
        Card::Stack(card)
    }
}

impl From<CardRepeat> for Card {
    fn from(card: CardRepeat) -> Self {
        Card::Repeat(card)
    }
}

impl From<CardAlternates> for Card {
    fn from(card: CardAlternates) -> Self {
        Card::Alternates(card)
    }
}

impl From<CardOptional> for Card {
    fn from(card: CardOptional) -> Self {
        Card::Optional(card)
    }
}

use crate::{Card, CardData, CardError, PostReadHook};

/// A card that may be absent.
///
/// Reading tries the wrapped card: when it matches it is read and the
/// optional behaves exactly like it; otherwise nothing is consumed, the
/// data is empty and [`num_lines`][Card::num_lines] reports 0. Either way
/// the read succeeds, so [`matches`][Card::matches] is always true.
#[derive(Clone)]
pub struct CardOptional {
    inner: Box<Card>,
    matched: bool,
    pub(crate) name: Option<String>,
    pub(crate) hook: Option<PostReadHook>,
}

impl CardOptional {
    /// Creates an optional wrapper around `inner`.
    pub fn new(inner: impl Into<Card>) -> Self {
        Self {
            inner: Box::new(inner.into()),
            matched: false,
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

    /// The wrapped card.
    pub fn inner(&self) -> &Card {
        &self.inner
    }

    /// Whether the wrapped card matched on the most recent read.
    pub fn is_matched(&self) -> bool {
        self.matched
    }

    pub(crate) fn matched_mut(&mut self) -> Option<&mut Card> {
        self.matched.then(|| &mut *self.inner)
    }

    pub(crate) fn read_inner(&mut self, lines: &[&str]) -> Result<(), CardError> {
        if self.inner.matches(lines) {
            self.inner.read_direct(lines)?;
            self.matched = true;
        } else {
            self.matched = false;
        }
        Ok(())
    }

    pub(crate) fn write_lines(&self, out: &mut Vec<String>) -> Result<(), CardError> {
        if self.matched {
            self.inner.write_lines(out)?;
        }
        Ok(())
    }

    pub(crate) fn num_lines(&self) -> usize {
        if self.matched {
            self.inner.num_lines()
        } else {
            0
        }
    }

    pub(crate) fn data(&self) -> CardData {
        if self.matched {
            self.inner.data()
        } else {
            CardData::empty()
        }
    }
}

use crate::{Card, CardData, CardError, PostReadHook};

/// The first matching card out of an ordered list of candidates.
///
/// Reading tries the candidate that matched most recently first, then the
/// remaining candidates in their declared order, skipping the previous
/// winner. The first candidate whose trial succeeds is read for real and
/// becomes the new winner; data and line count delegate to it. When no
/// candidate matches, the read fails with
/// [`NoAlternateMatched`][CardError::NoAlternateMatched] and the previous
/// winner stays selected.
///
/// Trying the last winner first is purely an attempt-ordering optimization
/// for inputs where the same alternative repeats consecutively; it cannot
/// change which candidate wins, only how quickly it is found.
#[derive(Clone)]
pub struct CardAlternates {
    candidates: Vec<Card>,
    matched: Option<usize>,
    pub(crate) name: Option<String>,
    pub(crate) hook: Option<PostReadHook>,
}

impl CardAlternates {
    /// Creates an alternates card over `candidates`, tried in order.
    pub fn new(candidates: impl Into<Vec<Card>>) -> Self {
        Self {
            candidates: candidates.into(),
            matched: None,
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

    /// The candidates, in their declared order.
    pub fn candidates(&self) -> &[Card] {
        &self.candidates
    }

    /// The candidate that matched most recently.
    pub fn selected(&self) -> Option<&Card> {
        self.matched.map(|index| &self.candidates[index])
    }

    pub(crate) fn selected_mut(&mut self) -> Option<&mut Card> {
        self.matched.map(|index| &mut self.candidates[index])
    }

    pub(crate) fn read_selected(&mut self, lines: &[&str]) -> Result<(), CardError> {
        let previous = self.matched;
        let order = previous
            .into_iter()
            .chain((0..self.candidates.len()).filter(|&index| Some(index) != previous));

        for index in order {
            if self.candidates[index].matches(lines) {
                self.candidates[index].read_direct(lines)?;
                self.matched = Some(index);
                return Ok(());
            }
        }
        Err(CardError::NoAlternateMatched)
    }

    pub(crate) fn write_lines(&self, out: &mut Vec<String>) -> Result<(), CardError> {
        match self.selected() {
            Some(selected) => selected.write_lines(out),
            None => Ok(()),
        }
    }

    pub(crate) fn num_lines(&self) -> usize {
        self.selected().map_or(0, Card::num_lines)
    }

    pub(crate) fn data(&self) -> CardData {
        self.selected().map_or_else(CardData::empty, Card::data)
    }
}

use crate::{Card, CardData, CardError, PostReadHook};

/// Outcome of probing the input at the repeat's cursor, with the number of
/// lines consumed.
enum Step {
    /// The template matched; holds the instance that read it.
    Instance(Card, usize),
    /// The end marker matched and has been read.
    Terminator(usize),
    /// No end marker is configured and the template does not match; the
    /// repetition is over.
    NoMoreMatches,
}

/// Zero or more repetitions of a template card.
///
/// Each iteration reads a fresh clone of the template; the clones are kept
/// as the repeat's [instances][Self::instances] and their data forms the
/// repeat's [`CardData::List`].
///
/// Termination depends on whether an [end marker][Self::with_end_marker] is
/// configured. With one, iteration ends when the marker matches (the marker
/// is read and its lines counted), and a line matching neither the marker
/// nor the template is an error. Without one, iteration ends at the first
/// line the template does not match, which is not an error. Running out of
/// input ends the iteration successfully in both modes.
#[derive(Clone)]
pub struct CardRepeat {
    template: Box<Card>,
    end: Option<Box<Card>>,
    instances: Vec<Card>,
    end_matched: bool,
    consumed: usize,
    pub(crate) name: Option<String>,
    pub(crate) hook: Option<PostReadHook>,
}

impl CardRepeat {
    /// Creates a repeat of `template`, terminated by template mismatch.
    pub fn new(template: impl Into<Card>) -> Self {
        Self {
            template: Box::new(template.into()),
            end: None,
            instances: vec![],
            end_matched: false,
            consumed: 0,
            name: None,
            hook: None,
        }
    }

    /// Terminates the repeat with a marker card instead.
    ///
    /// In this mode every line before the marker has to match the template.
    pub fn with_end_marker(mut self, end: impl Into<Card>) -> Self {
        self.end = Some(Box::new(end.into()));
        self
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

    /// The instances read by the most recent read, in input order.
    pub fn instances(&self) -> &[Card] {
        &self.instances
    }

    /// The instances, for updating their data before a write.
    pub fn instances_mut(&mut self) -> &mut [Card] {
        &mut self.instances
    }

    /// The end marker, if one is configured.
    pub fn end_marker(&self) -> Option<&Card> {
        self.end.as_deref()
    }

    fn next_step(&mut self, rest: &[&str]) -> Result<Step, CardError> {
        if let Some(end) = &mut self.end {
            if end.matches(rest) {
                end.read_direct(rest)?;
                return Ok(Step::Terminator(end.num_lines()));
            }
        }

        let mut instance = (*self.template).clone();
        match instance.read_direct(rest) {
            Ok(()) => {
                let consumed = instance.num_lines();
                Ok(Step::Instance(instance, consumed))
            }
            Err(_) if self.end.is_none() => Ok(Step::NoMoreMatches),
            Err(err) => Err(CardError::RepeatTemplate(Box::new(err))),
        }
    }

    pub(crate) fn read_instances(&mut self, lines: &[&str]) -> Result<(), CardError> {
        self.instances.clear();
        self.end_matched = false;
        self.consumed = 0;

        let mut at = 0;
        while at < lines.len() {
            match self.next_step(&lines[at..])? {
                Step::Instance(instance, consumed) => {
                    at += consumed;
                    self.instances.push(instance);
                    // A zero-line instance (an optional template that
                    // matched nothing) cannot make further progress.
                    if consumed == 0 {
                        break;
                    }
                }
                Step::Terminator(consumed) => {
                    at += consumed;
                    self.end_matched = true;
                    break;
                }
                Step::NoMoreMatches => break,
            }
        }
        self.consumed = at;
        Ok(())
    }

    pub(crate) fn write_lines(&self, out: &mut Vec<String>) -> Result<(), CardError> {
        for instance in &self.instances {
            instance.write_lines(out)?;
        }
        if self.end_matched {
            if let Some(end) = &self.end {
                end.write_lines(out)?;
            }
        }
        Ok(())
    }

    pub(crate) fn num_lines(&self) -> usize {
        self.consumed
    }

    pub(crate) fn data(&self) -> CardData {
        CardData::List(self.instances.iter().map(Card::data).collect())
    }
}

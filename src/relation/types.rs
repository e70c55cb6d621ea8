/// Number of slots in a relation item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    /// `(head, tail)`, e.g. (compound, disease).
    Pair,
    /// `(head, relation, tail)`, e.g. (drug, interaction, drug).
    Triple,
}

impl Arity {
    pub fn slot_count(self) -> usize {
        match self {
            Arity::Pair => 2,
            Arity::Triple => 3,
        }
    }

    /// Slot positions pooled into one entity list for slot-level F1.
    ///
    /// Triples pool both participants (slots 0 and 2) and score the relation separately.
    pub fn slot_groups(self) -> &'static [&'static [usize]] {
        match self {
            Arity::Pair => &[&[0], &[1]],
            Arity::Triple => &[&[0, 2], &[1]],
        }
    }
}

/// One parsed relational assertion; immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructuredItem {
    slots: Box<[String]>,
}

impl StructuredItem {
    pub fn new<I, S>(slots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            slots: slots.into_iter().map(Into::into).collect(),
        }
    }

    /// The fail-open placeholder for malformed input: every slot empty.
    pub fn degraded(arity: Arity) -> Self {
        Self {
            slots: vec![String::new(); arity.slot_count()].into_boxed_slice(),
        }
    }

    pub fn slots(&self) -> &[String] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&str> {
        self.slots.get(index).map(String::as_str)
    }

    pub fn arity(&self) -> usize {
        self.slots.len()
    }

    /// `true` for the fail-open placeholder; it never matches anything.
    pub fn is_degraded(&self) -> bool {
        self.slots.iter().all(String::is_empty)
    }
}

impl std::fmt::Display for StructuredItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({})", self.slots.join(", "))
    }
}

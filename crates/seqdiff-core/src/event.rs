//! Traversal events

use std::cmp::Ordering;
use std::fmt;

use crate::change::ChangeError;

/// What a traversal step did.
///
/// Actions order by their symbol, like [`ChangeKind`](crate::ChangeKind).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Both elements are part of the common subsequence
    Match,
    /// The old element has no counterpart
    DiscardA,
    /// The new element has no counterpart
    DiscardB,
    /// An unmatched old element paired with an unmatched new one
    Change,
    /// The old sequence ran out while the new one continues
    FinishedA,
    /// The new sequence ran out while the old one continues
    FinishedB,
}

impl Action {
    /// Name of the callback this action is delivered to.
    pub fn name(self) -> &'static str {
        match self {
            Action::Match => "match",
            Action::DiscardA => "discard_a",
            Action::DiscardB => "discard_b",
            Action::Change => "change",
            Action::FinishedA => "finished_a",
            Action::FinishedB => "finished_b",
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Action::Match => '=',
            Action::DiscardA => '-',
            Action::DiscardB => '+',
            Action::Change => '!',
            Action::FinishedA => '>',
            Action::FinishedB => '<',
        }
    }

    pub fn from_symbol(symbol: char) -> Result<Self, ChangeError> {
        match symbol {
            '=' => Ok(Action::Match),
            '-' => Ok(Action::DiscardA),
            '+' => Ok(Action::DiscardB),
            '!' => Ok(Action::Change),
            '>' => Ok(Action::FinishedA),
            '<' => Ok(Action::FinishedB),
            other => Err(ChangeError::UnknownSymbol(other)),
        }
    }
}

impl PartialOrd for Action {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Action {
    fn cmp(&self, other: &Self) -> Ordering {
        self.symbol().cmp(&other.symbol())
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One step of a traversal.
///
/// Positions are the traversal cursors into each sequence and are always
/// set. An element is `None` when its side does not take part in the step:
/// the new side of a [`Action::DiscardA`], the old side of a
/// [`Action::DiscardB`], or a cursor that has run past the end.
pub struct Event<'a, T> {
    pub action: Action,
    pub old_position: usize,
    pub old_element: Option<&'a T>,
    pub new_position: usize,
    pub new_element: Option<&'a T>,
}

impl<'a, T> Event<'a, T> {
    pub fn new(
        action: Action,
        old_position: usize,
        old_element: Option<&'a T>,
        new_position: usize,
        new_element: Option<&'a T>,
    ) -> Self {
        Self {
            action,
            old_position,
            old_element,
            new_position,
            new_element,
        }
    }

    /// The old side as `(index, element)`, if it takes part.
    pub fn old(&self) -> Option<(usize, &'a T)> {
        self.old_element.map(|element| (self.old_position, element))
    }

    /// The new side as `(index, element)`, if it takes part.
    pub fn new_side(&self) -> Option<(usize, &'a T)> {
        self.new_element.map(|element| (self.new_position, element))
    }

    pub fn positions(&self) -> (usize, usize) {
        (self.old_position, self.new_position)
    }

    /// A `discard_b`: the new element is not in the old sequence.
    pub fn is_add(&self) -> bool {
        self.action == Action::DiscardB
    }

    /// A `discard_a`: the old element is not in the new sequence.
    pub fn is_delete(&self) -> bool {
        self.action == Action::DiscardA
    }

    pub fn is_unchanged(&self) -> bool {
        self.action == Action::Match
    }

    pub fn is_changed(&self) -> bool {
        self.action == Action::Change
    }

    /// `(symbol, (old_position, old_element), (new_position, new_element))`
    #[allow(clippy::type_complexity)]
    pub fn to_tuple(&self) -> (char, (usize, Option<&'a T>), (usize, Option<&'a T>)) {
        (
            self.action.symbol(),
            (self.old_position, self.old_element),
            (self.new_position, self.new_element),
        )
    }

    #[allow(clippy::type_complexity)]
    pub fn from_tuple(
        (symbol, (old_position, old_element), (new_position, new_element)): (
            char,
            (usize, Option<&'a T>),
            (usize, Option<&'a T>),
        ),
    ) -> Result<Self, ChangeError> {
        Ok(Self::new(
            Action::from_symbol(symbol)?,
            old_position,
            old_element,
            new_position,
            new_element,
        ))
    }
}

// Manual impls: deriving would demand `T: Clone` for a struct of references.
impl<T> Clone for Event<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Event<'_, T> {}

impl<T: PartialEq> PartialEq for Event<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.action == other.action
            && self.old_position == other.old_position
            && self.old_element == other.old_element
            && self.new_position == other.new_position
            && self.new_element == other.new_element
    }
}

impl<T: Eq> Eq for Event<'_, T> {}

impl<T: Ord> PartialOrd for Event<'_, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Ord> Ord for Event<'_, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.action
            .cmp(&other.action)
            .then(self.old_position.cmp(&other.old_position))
            .then_with(|| self.old_element.cmp(&other.old_element))
            .then(self.new_position.cmp(&other.new_position))
            .then_with(|| self.new_element.cmp(&other.new_element))
    }
}

impl<T: fmt::Debug> fmt::Debug for Event<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("action", &self.action)
            .field("old_position", &self.old_position)
            .field("old_element", &self.old_element)
            .field("new_position", &self.new_position)
            .field("new_element", &self.new_element)
            .finish()
    }
}

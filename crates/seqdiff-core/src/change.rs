//! Change representation for diff results

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChangeError {
    #[error("Unknown change symbol: {0:?}")]
    UnknownSymbol(char),
    #[error("A hunk change must be an add or a delete, got {0:?}")]
    InvalidHunkKind(ChangeKind),
    #[error("Sides present do not fit a {0:?} change")]
    InvalidShape(ChangeKind),
}

/// The kind of change in a diff.
///
/// Variants are declared in the order of their symbols (`!`, `+`, `-`, `=`),
/// which is the order changes sort by.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(into = "char", try_from = "char")]
pub enum ChangeKind {
    /// An old element was replaced by a new one
    Changed,
    /// Content was added
    Add,
    /// Content was removed
    Delete,
    /// Content is unchanged
    Unchanged,
}

impl ChangeKind {
    pub fn symbol(self) -> char {
        match self {
            ChangeKind::Changed => '!',
            ChangeKind::Add => '+',
            ChangeKind::Delete => '-',
            ChangeKind::Unchanged => '=',
        }
    }

    pub fn from_symbol(symbol: char) -> Result<Self, ChangeError> {
        match symbol {
            '!' => Ok(ChangeKind::Changed),
            '+' => Ok(ChangeKind::Add),
            '-' => Ok(ChangeKind::Delete),
            '=' => Ok(ChangeKind::Unchanged),
            other => Err(ChangeError::UnknownSymbol(other)),
        }
    }

    pub fn is_add(self) -> bool {
        self == ChangeKind::Add
    }

    pub fn is_delete(self) -> bool {
        self == ChangeKind::Delete
    }

    pub fn is_unchanged(self) -> bool {
        self == ChangeKind::Unchanged
    }

    pub fn is_changed(self) -> bool {
        self == ChangeKind::Changed
    }

    /// An add has only a new side, a delete only an old side, and the
    /// other kinds have both.
    fn check_shape(self, has_old: bool, has_new: bool) -> Result<(), ChangeError> {
        let fits = match self {
            ChangeKind::Add => !has_old && has_new,
            ChangeKind::Delete => has_old && !has_new,
            ChangeKind::Unchanged | ChangeKind::Changed => has_old && has_new,
        };
        if fits {
            Ok(())
        } else {
            Err(ChangeError::InvalidShape(self))
        }
    }
}

impl From<ChangeKind> for char {
    fn from(kind: ChangeKind) -> char {
        kind.symbol()
    }
}

impl TryFrom<char> for ChangeKind {
    type Error = ChangeError;

    fn try_from(symbol: char) -> Result<Self, Self::Error> {
        ChangeKind::from_symbol(symbol)
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A hunk-style change: one element added or deleted at a position.
///
/// For deletes the position indexes the old sequence, for adds the new one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Change<T> {
    kind: ChangeKind,
    position: usize,
    element: T,
}

impl<T> Change<T> {
    pub fn new(kind: ChangeKind, position: usize, element: T) -> Result<Self, ChangeError> {
        match kind {
            ChangeKind::Add | ChangeKind::Delete => Ok(Self {
                kind,
                position,
                element,
            }),
            other => Err(ChangeError::InvalidHunkKind(other)),
        }
    }

    pub fn add(position: usize, element: T) -> Self {
        Self {
            kind: ChangeKind::Add,
            position,
            element,
        }
    }

    pub fn delete(position: usize, element: T) -> Self {
        Self {
            kind: ChangeKind::Delete,
            position,
            element,
        }
    }

    pub fn kind(&self) -> ChangeKind {
        self.kind
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn element(&self) -> &T {
        &self.element
    }

    pub fn into_element(self) -> T {
        self.element
    }

    pub fn is_add(&self) -> bool {
        self.kind.is_add()
    }

    pub fn is_delete(&self) -> bool {
        self.kind.is_delete()
    }

    pub fn is_unchanged(&self) -> bool {
        false
    }

    pub fn is_changed(&self) -> bool {
        false
    }

    pub fn to_tuple(&self) -> (char, usize, T)
    where
        T: Clone,
    {
        (self.kind.symbol(), self.position, self.element.clone())
    }

    pub fn from_tuple((symbol, position, element): (char, usize, T)) -> Result<Self, ChangeError> {
        Self::new(ChangeKind::from_symbol(symbol)?, position, element)
    }

    /// The same change seen from the other side of the diff.
    pub fn reversed(&self) -> Self
    where
        T: Clone,
    {
        let kind = if self.is_add() {
            ChangeKind::Delete
        } else {
            ChangeKind::Add
        };
        Self {
            kind,
            position: self.position,
            element: self.element.clone(),
        }
    }
}

impl<T: Serialize> Serialize for Change<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.kind, self.position, &self.element).serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Change<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (kind, position, element) = <(ChangeKind, usize, T)>::deserialize(deserializer)?;
        Change::new(kind, position, element).map_err(serde::de::Error::custom)
    }
}

/// A fully aligned change: one step of an sdiff.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SdiffChange<T> {
    kind: ChangeKind,
    old_element: Option<T>,
    new_element: Option<T>,
}

impl<T> SdiffChange<T> {
    pub fn new(kind: ChangeKind, old_element: Option<T>, new_element: Option<T>) -> Self {
        Self {
            kind,
            old_element,
            new_element,
        }
    }

    pub fn unchanged(old: T, new: T) -> Self {
        Self::new(ChangeKind::Unchanged, Some(old), Some(new))
    }

    pub fn changed(old: T, new: T) -> Self {
        Self::new(ChangeKind::Changed, Some(old), Some(new))
    }

    pub fn add(new: T) -> Self {
        Self::new(ChangeKind::Add, None, Some(new))
    }

    pub fn delete(old: T) -> Self {
        Self::new(ChangeKind::Delete, Some(old), None)
    }

    pub fn kind(&self) -> ChangeKind {
        self.kind
    }

    pub fn old_element(&self) -> Option<&T> {
        self.old_element.as_ref()
    }

    pub fn new_element(&self) -> Option<&T> {
        self.new_element.as_ref()
    }

    pub fn is_add(&self) -> bool {
        self.kind.is_add()
    }

    pub fn is_delete(&self) -> bool {
        self.kind.is_delete()
    }

    pub fn is_unchanged(&self) -> bool {
        self.kind.is_unchanged()
    }

    pub fn is_changed(&self) -> bool {
        self.kind.is_changed()
    }

    pub fn to_tuple(&self) -> (char, Option<T>, Option<T>)
    where
        T: Clone,
    {
        (
            self.kind.symbol(),
            self.old_element.clone(),
            self.new_element.clone(),
        )
    }

    /// Decode a tuple, rejecting sides that contradict the kind.
    pub fn from_tuple(
        (symbol, old_element, new_element): (char, Option<T>, Option<T>),
    ) -> Result<Self, ChangeError> {
        let kind = ChangeKind::from_symbol(symbol)?;
        kind.check_shape(old_element.is_some(), new_element.is_some())?;
        Ok(Self::new(kind, old_element, new_element))
    }
}

impl<T: Serialize> Serialize for SdiffChange<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.kind, &self.old_element, &self.new_element).serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for SdiffChange<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (kind, old_element, new_element) =
            <(ChangeKind, Option<T>, Option<T>)>::deserialize(deserializer)?;
        kind.check_shape(old_element.is_some(), new_element.is_some())
            .map_err(serde::de::Error::custom)?;
        Ok(SdiffChange::new(kind, old_element, new_element))
    }
}

/// An aligned change whose sides also carry their sequence index, for
/// line-numbered rendering.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContextChange<T> {
    kind: ChangeKind,
    old: Option<(usize, T)>,
    new: Option<(usize, T)>,
}

impl<T> ContextChange<T> {
    pub fn new(kind: ChangeKind, old: Option<(usize, T)>, new: Option<(usize, T)>) -> Self {
        Self { kind, old, new }
    }

    pub fn kind(&self) -> ChangeKind {
        self.kind
    }

    pub fn old(&self) -> Option<(usize, &T)> {
        self.old.as_ref().map(|(index, element)| (*index, element))
    }

    pub fn new_side(&self) -> Option<(usize, &T)> {
        self.new.as_ref().map(|(index, element)| (*index, element))
    }

    pub fn is_add(&self) -> bool {
        self.kind.is_add()
    }

    pub fn is_delete(&self) -> bool {
        self.kind.is_delete()
    }

    pub fn is_unchanged(&self) -> bool {
        self.kind.is_unchanged()
    }

    pub fn is_changed(&self) -> bool {
        self.kind.is_changed()
    }

    /// Drop the indices, keeping the aligned elements.
    pub fn into_sdiff(self) -> SdiffChange<T> {
        SdiffChange::new(
            self.kind,
            self.old.map(|(_, element)| element),
            self.new.map(|(_, element)| element),
        )
    }

    pub fn to_tuple(&self) -> (char, Option<(usize, T)>, Option<(usize, T)>)
    where
        T: Clone,
    {
        (self.kind.symbol(), self.old.clone(), self.new.clone())
    }

    /// Decode a tuple, rejecting sides that contradict the kind.
    pub fn from_tuple(
        (symbol, old, new): (char, Option<(usize, T)>, Option<(usize, T)>),
    ) -> Result<Self, ChangeError> {
        let kind = ChangeKind::from_symbol(symbol)?;
        kind.check_shape(old.is_some(), new.is_some())?;
        Ok(Self::new(kind, old, new))
    }
}

impl<T: Serialize> Serialize for ContextChange<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.kind, &self.old, &self.new).serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for ContextChange<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (kind, old, new) =
            <(ChangeKind, Option<(usize, T)>, Option<(usize, T)>)>::deserialize(deserializer)?;
        kind.check_shape(old.is_some(), new.is_some())
            .map_err(serde::de::Error::custom)?;
        Ok(ContextChange::new(kind, old, new))
    }
}

/// A hunk is a run of adds and deletes bounded by matches on both sides
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hunk<T> {
    changes: Vec<Change<T>>,
}

impl<T> Hunk<T> {
    pub fn new(changes: Vec<Change<T>>) -> Self {
        Self { changes }
    }

    pub fn changes(&self) -> &[Change<T>] {
        &self.changes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Change<T>> {
        self.changes.iter()
    }

    pub fn into_changes(self) -> Vec<Change<T>> {
        self.changes
    }

    /// Get the number of changes in this hunk
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Check if hunk is empty
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Number of insertions in this hunk
    pub fn insertions(&self) -> usize {
        self.changes.iter().filter(|c| c.is_add()).count()
    }

    /// Number of deletions in this hunk
    pub fn deletions(&self) -> usize {
        self.changes.iter().filter(|c| c.is_delete()).count()
    }

    pub(crate) fn push(&mut self, change: Change<T>) {
        self.changes.push(change);
    }

    pub(crate) fn take(&mut self) -> Self {
        Self {
            changes: std::mem::take(&mut self.changes),
        }
    }
}

impl<T> Default for Hunk<T> {
    fn default() -> Self {
        Self {
            changes: Vec::new(),
        }
    }
}

impl<T> From<Vec<Change<T>>> for Hunk<T> {
    fn from(changes: Vec<Change<T>>) -> Self {
        Self::new(changes)
    }
}

impl<'a, T> IntoIterator for &'a Hunk<T> {
    type Item = &'a Change<T>;
    type IntoIter = std::slice::Iter<'a, Change<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}

impl<T> IntoIterator for Hunk<T> {
    type Item = Change<T>;
    type IntoIter = std::vec::IntoIter<Change<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

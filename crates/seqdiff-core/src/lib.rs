//! seqdiff core - LCS alignment and diff traversal engine
//!
//! This library computes the longest common subsequence of two sequences
//! and walks both of them along it, letting pluggable callbacks build
//! hunk-style diffs, fully aligned side-by-side diffs, or anything else.
//!
//! ```
//! let old = ['a', 'b', 'c', 'e', 'h', 'j', 'l', 'm', 'n', 'p'];
//! let new = ['b', 'c', 'd', 'e', 'f', 'j', 'k', 'l', 'm', 'r', 's', 't'];
//!
//! let common: String = seqdiff_core::lcs(&old, &new).into_iter().collect();
//! assert_eq!(common, "bcejlm");
//!
//! let hunks = seqdiff_core::diff(&old, &new);
//! assert_eq!(hunks.len(), 5);
//! assert_eq!(seqdiff_core::patch(&old, &hunks).unwrap(), new);
//! ```

pub mod alignment;
pub mod callbacks;
pub mod change;
pub mod event;
pub mod patch;
pub mod traverse;

use std::hash::Hash;

pub use alignment::{Alignment, AlignmentError};
pub use callbacks::{ContextBuilder, EventSink, HunkBuilder, NoopCallbacks, Reducer, SdiffBuilder};
pub use change::{Change, ChangeError, ChangeKind, ContextChange, Hunk, SdiffChange};
pub use event::{Action, Event};
pub use patch::{patch, patch_sdiff, unpatch, unpatch_sdiff, PatchError};
pub use traverse::{traverse_balanced, traverse_sequences, Callbacks};

/// Compute the alignment of `old` against `new`.
pub fn alignment<T: Hash + Eq>(old: &[T], new: &[T]) -> Alignment {
    Alignment::new(old, new)
}

/// The longest common subsequence of `old` and `new`, as elements of `old`.
pub fn lcs<'a, T: Hash + Eq>(old: &'a [T], new: &[T]) -> Vec<&'a T> {
    Alignment::new(old, new)
        .pairs()
        .map(|(i, _)| &old[i])
        .collect()
}

/// Hunks of adds and deletes that turn `old` into `new`.
pub fn diff<T: Hash + Eq + Clone>(old: &[T], new: &[T]) -> Vec<Hunk<T>> {
    diff_with(old, new, HunkBuilder::new())
}

/// Drive `reducer` with a sequence traversal of `old` and `new`.
pub fn diff_with<T, R>(old: &[T], new: &[T], mut reducer: R) -> R::Output
where
    T: Hash + Eq,
    R: Reducer<T>,
{
    traverse_sequences(old, new, &mut reducer);
    reducer.finish()
}

/// One aligned change per step, pairing replaced elements as changes.
pub fn sdiff<T: Hash + Eq + Clone>(old: &[T], new: &[T]) -> Vec<SdiffChange<T>> {
    sdiff_with(old, new, SdiffBuilder::new())
}

/// Like [`sdiff`], with every side carrying its index.
pub fn context_sdiff<T: Hash + Eq + Clone>(old: &[T], new: &[T]) -> Vec<ContextChange<T>> {
    sdiff_with(old, new, ContextBuilder::new())
}

/// Drive `reducer` with a balanced traversal of `old` and `new`.
pub fn sdiff_with<T, R>(old: &[T], new: &[T], mut reducer: R) -> R::Output
where
    T: Hash + Eq,
    R: Reducer<T>,
{
    traverse_balanced(old, new, &mut reducer);
    reducer.finish()
}

/// Like [`diff`], with elements compared by the key `key` derives.
pub fn diff_by_key<T, K, F>(old: &[T], new: &[T], key: F) -> Vec<Hunk<T>>
where
    T: Clone,
    K: Hash + Eq,
    F: FnMut(&T) -> K,
{
    let mut builder = HunkBuilder::new();
    Alignment::by_key(old, new, key).walk_sequences(old, new, &mut builder);
    builder.finish()
}

/// Like [`sdiff`], with elements compared by the key `key` derives.
///
/// Unchanged steps keep both elements, which may differ outside the key.
pub fn sdiff_by_key<T, K, F>(old: &[T], new: &[T], key: F) -> Vec<SdiffChange<T>>
where
    T: Clone,
    K: Hash + Eq,
    F: FnMut(&T) -> K,
{
    let mut builder = SdiffBuilder::new();
    Alignment::by_key(old, new, key).walk_balanced(old, new, &mut builder);
    builder.finish()
}

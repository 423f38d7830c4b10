//! Applying diffs to sequences
//!
//! A diff computed between `old` and `new` can rebuild `new` from `old`
//! ([`patch`]) or `old` from `new` ([`unpatch`]). Every element the diff
//! expects to find in the source is checked before it is skipped.

use thiserror::Error;
use tracing::trace;

use crate::change::{Change, Hunk, SdiffChange};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatchError {
    #[error("Source element at position {position} does not match the diff")]
    Mismatch { position: usize },
    #[error("Diff refers to position {position} but the source has {len} elements")]
    OutOfRange { position: usize, len: usize },
}

/// Rebuild the new sequence from the old one and their hunks.
pub fn patch<T>(src: &[T], hunks: &[Hunk<T>]) -> Result<Vec<T>, PatchError>
where
    T: Clone + PartialEq,
{
    apply_hunks(src, hunks, false)
}

/// Rebuild the old sequence from the new one and their hunks.
pub fn unpatch<T>(src: &[T], hunks: &[Hunk<T>]) -> Result<Vec<T>, PatchError>
where
    T: Clone + PartialEq,
{
    apply_hunks(src, hunks, true)
}

/// Rebuild the new sequence from the old one and their aligned changes.
pub fn patch_sdiff<T>(src: &[T], changes: &[SdiffChange<T>]) -> Result<Vec<T>, PatchError>
where
    T: Clone + PartialEq,
{
    apply_sdiff(src, changes, false)
}

/// Rebuild the old sequence from the new one and their aligned changes.
pub fn unpatch_sdiff<T>(src: &[T], changes: &[SdiffChange<T>]) -> Result<Vec<T>, PatchError>
where
    T: Clone + PartialEq,
{
    apply_sdiff(src, changes, true)
}

/// Tracks how far the source has been consumed and the output produced.
struct Applier<'a, T> {
    src: &'a [T],
    out: Vec<T>,
    /// index into `src`
    ai: usize,
}

impl<'a, T: Clone + PartialEq> Applier<'a, T> {
    fn new(src: &'a [T]) -> Self {
        Self {
            src,
            out: Vec::with_capacity(src.len()),
            ai: 0,
        }
    }

    fn copy_one(&mut self) -> Result<(), PatchError> {
        let element = self.src.get(self.ai).ok_or(PatchError::OutOfRange {
            position: self.ai,
            len: self.src.len(),
        })?;
        self.out.push(element.clone());
        self.ai += 1;
        Ok(())
    }

    /// Copy unchanged source elements until the source reaches `position`.
    fn copy_until_src(&mut self, position: usize) -> Result<(), PatchError> {
        while self.ai < position {
            self.copy_one()?;
        }
        Ok(())
    }

    /// Copy unchanged source elements until the output reaches `position`.
    fn copy_until_out(&mut self, position: usize) -> Result<(), PatchError> {
        while self.out.len() < position {
            self.copy_one()?;
        }
        Ok(())
    }

    /// Skip the source element at the cursor, which must equal `expected`.
    fn skip(&mut self, expected: &T) -> Result<(), PatchError> {
        match self.src.get(self.ai) {
            Some(found) if found == expected => {
                self.ai += 1;
                Ok(())
            }
            Some(_) => Err(PatchError::Mismatch { position: self.ai }),
            None => Err(PatchError::OutOfRange {
                position: self.ai,
                len: self.src.len(),
            }),
        }
    }

    fn finish(mut self) -> Result<Vec<T>, PatchError> {
        let len = self.src.len();
        self.copy_until_src(len)?;
        Ok(self.out)
    }
}

fn apply_hunks<T>(src: &[T], hunks: &[Hunk<T>], reverse: bool) -> Result<Vec<T>, PatchError>
where
    T: Clone + PartialEq,
{
    let mut applier = Applier::new(src);

    for change in hunks.iter().flat_map(Hunk::iter) {
        // Reversed, an add is something to remove from the source.
        let removes = change.is_delete() != reverse;
        if removes {
            apply_removal(&mut applier, change)?;
        } else {
            applier.copy_until_out(change.position())?;
            applier.out.push(change.element().clone());
        }
    }

    trace!(hunks = hunks.len(), reverse, "applied hunks");
    applier.finish()
}

fn apply_removal<T>(applier: &mut Applier<'_, T>, change: &Change<T>) -> Result<(), PatchError>
where
    T: Clone + PartialEq,
{
    applier.copy_until_src(change.position())?;
    applier.skip(change.element())
}

fn apply_sdiff<T>(
    src: &[T],
    changes: &[SdiffChange<T>],
    reverse: bool,
) -> Result<Vec<T>, PatchError>
where
    T: Clone + PartialEq,
{
    let mut applier = Applier::new(src);

    for change in changes {
        let (from, to) = if reverse {
            (change.new_element(), change.old_element())
        } else {
            (change.old_element(), change.new_element())
        };

        if let Some(expected) = from {
            applier.skip(expected)?;
        }
        if let Some(element) = to {
            applier.out.push(element.clone());
        }
    }

    trace!(changes = changes.len(), reverse, "applied sdiff");
    applier.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{diff, sdiff};

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_patch_reference() {
        let a = chars("abcehjlmnp");
        let b = chars("bcdefjklmrst");
        let hunks = diff(&a, &b);

        assert_eq!(patch(&a, &hunks), Ok(b.clone()));
        assert_eq!(unpatch(&b, &hunks), Ok(a));
    }

    #[test]
    fn test_patch_sdiff_reference() {
        let a = chars("abcehjlmnp");
        let b = chars("bcdefjklmrst");
        let changes = sdiff(&a, &b);

        assert_eq!(patch_sdiff(&a, &changes), Ok(b.clone()));
        assert_eq!(unpatch_sdiff(&b, &changes), Ok(a));
    }

    #[test]
    fn test_empty_patch_copies_source() {
        let a = chars("abc");
        assert_eq!(patch(&a, &[]), Ok(a.clone()));
        assert_eq!(patch_sdiff(&a, &[]), Ok(a));
    }

    #[test]
    fn test_patch_detects_mismatch() {
        let hunks = diff(&chars("abc"), &chars("ac"));
        assert_eq!(
            patch(&chars("axc"), &hunks),
            Err(PatchError::Mismatch { position: 1 })
        );
    }

    #[test]
    fn test_patch_detects_short_source() {
        let hunks = diff(&chars("abcd"), &chars("abc"));
        assert_eq!(
            patch(&chars("ab"), &hunks),
            Err(PatchError::OutOfRange {
                position: 2,
                len: 2
            })
        );
    }

    #[test]
    fn test_unpatch_sdiff_detects_mismatch() {
        let changes = sdiff(&chars("ab"), &chars("ax"));
        assert_eq!(
            unpatch_sdiff(&chars("ay"), &changes),
            Err(PatchError::Mismatch { position: 1 })
        );
    }
}

//! Longest common subsequence alignment
//!
//! Implements the Hunt–McIlroy algorithm with patience-sort thresholds.
//!
//! # Algorithm
//!
//! 1. Strip the common prefix and suffix, matching them directly.
//! 2. Index the positions of every element of the new sequence's middle.
//! 3. For each old element, walk its candidate positions from last to first
//!    and place each into a `thresh` array, where `thresh[k]` is the smallest
//!    new index ending a common subsequence of length `k + 1`. Every
//!    placement links back to the chain that ended at `thresh[k - 1]`.
//! 4. Follow the links from the longest chain to fill the alignment.
//!
//! # Complexity
//!
//! - Time: O((m + n) log m) for mostly distinct elements, degrading towards
//!   O(m * n) when elements repeat a lot. No cap is applied.
//! - Space: O(m + n) plus one link per threshold update.

use std::hash::Hash;

use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlignmentError {
    #[error(
        "alignment was computed for sequences of length {expected_old} and {expected_new}, \
         got {found_old} and {found_new}"
    )]
    LengthMismatch {
        expected_old: usize,
        expected_new: usize,
        found_old: usize,
        found_new: usize,
    },
}

/// Maps each old index to the new index it matches, if any.
///
/// Matched new indices strictly increase with the old index, and the
/// matched pairs form a longest common subsequence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Alignment {
    matches: Vec<Option<usize>>,
    new_len: usize,
}

/// One threshold placement: `old` matched `new`, extending the chain `prev`.
#[derive(Debug, Clone, Copy)]
struct Link {
    prev: Option<usize>,
    old: usize,
    new: usize,
}

impl Alignment {
    /// Align two sequences by value equality.
    pub fn new<T: Hash + Eq>(old: &[T], new: &[T]) -> Self {
        let mut matches = vec![None; old.len()];
        let middle = trim(&mut matches, old.len(), new.len(), |i, j| old[i] == new[j]);

        if !middle.is_empty() {
            let mut positions: FxHashMap<&T, Vec<usize>> = FxHashMap::default();
            for j in middle.new_start..middle.new_end {
                positions.entry(&new[j]).or_default().push(j);
            }
            let positions = &positions;
            patience(&mut matches, &middle, move |i| {
                positions.get(&old[i]).map_or(&[][..], Vec::as_slice)
            });
        }

        Self::finish(matches, new.len(), &middle)
    }

    /// Align two sequences by comparing a key derived from every element.
    pub fn by_key<T, K, F>(old: &[T], new: &[T], mut key: F) -> Self
    where
        K: Hash + Eq,
        F: FnMut(&T) -> K,
    {
        let old_keys: Vec<K> = old.iter().map(&mut key).collect();
        let new_keys: Vec<K> = new.iter().map(&mut key).collect();
        Self::new(&old_keys, &new_keys)
    }

    /// Align two sequences with a caller-supplied equality.
    ///
    /// `eq` must be an equivalence relation. Candidate classes are found by a
    /// linear scan over the distinct elements, so this is slower than
    /// [`Alignment::new`] when many distinct elements are involved.
    pub fn by<T, F>(old: &[T], new: &[T], mut eq: F) -> Self
    where
        F: FnMut(&T, &T) -> bool,
    {
        let mut matches = vec![None; old.len()];
        let middle = trim(&mut matches, old.len(), new.len(), |i, j| eq(&old[i], &new[j]));

        if !middle.is_empty() {
            // (representative new index, every new index equal to it)
            let mut classes: Vec<(usize, Vec<usize>)> = Vec::new();
            for j in middle.new_start..middle.new_end {
                match classes.iter().position(|(rep, _)| eq(&new[*rep], &new[j])) {
                    Some(c) => classes[c].1.push(j),
                    None => classes.push((j, vec![j])),
                }
            }
            let candidates: Vec<&[usize]> = (middle.old_start..middle.old_end)
                .map(|i| {
                    classes
                        .iter()
                        .find(|(rep, _)| eq(&old[i], &new[*rep]))
                        .map_or(&[][..], |(_, members)| members.as_slice())
                })
                .collect();
            patience(&mut matches, &middle, |i| candidates[i - middle.old_start]);
        }

        Self::finish(matches, new.len(), &middle)
    }

    fn finish(matches: Vec<Option<usize>>, new_len: usize, middle: &Middle) -> Self {
        let alignment = Self { matches, new_len };
        debug!(
            old_len = alignment.len(),
            new_len,
            prefix = middle.old_start,
            suffix = alignment.len() - middle.old_end,
            lcs_len = alignment.lcs_len(),
            "computed alignment"
        );
        alignment
    }

    /// The new index matched by old index `i`.
    pub fn get(&self, i: usize) -> Option<usize> {
        self.matches.get(i).copied().flatten()
    }

    /// Length of the old sequence.
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Length of the new sequence.
    pub fn new_len(&self) -> usize {
        self.new_len
    }

    /// Length of the common subsequence.
    pub fn lcs_len(&self) -> usize {
        self.matches.iter().flatten().count()
    }

    /// One past the last matched old index, or 0 when nothing matched.
    pub fn matched_end(&self) -> usize {
        self.matches
            .iter()
            .rposition(Option::is_some)
            .map_or(0, |i| i + 1)
    }

    pub fn as_slice(&self) -> &[Option<usize>] {
        &self.matches
    }

    /// Matched `(old, new)` index pairs in ascending order.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.matches
            .iter()
            .enumerate()
            .filter_map(|(i, j)| j.map(|j| (i, j)))
    }

    /// Make sure the alignment describes sequences of these lengths.
    pub fn check(&self, old_len: usize, new_len: usize) -> Result<(), AlignmentError> {
        if self.len() == old_len && self.new_len == new_len {
            Ok(())
        } else {
            Err(AlignmentError::LengthMismatch {
                expected_old: self.len(),
                expected_new: self.new_len,
                found_old: old_len,
                found_new: new_len,
            })
        }
    }
}

/// The untrimmed middle of both sequences, as half-open ranges.
#[derive(Debug, Clone, Copy)]
struct Middle {
    old_start: usize,
    old_end: usize,
    new_start: usize,
    new_end: usize,
}

impl Middle {
    fn is_empty(&self) -> bool {
        self.old_start == self.old_end || self.new_start == self.new_end
    }
}

fn trim(
    matches: &mut [Option<usize>],
    old_len: usize,
    new_len: usize,
    mut same: impl FnMut(usize, usize) -> bool,
) -> Middle {
    let mut m = Middle {
        old_start: 0,
        old_end: old_len,
        new_start: 0,
        new_end: new_len,
    };

    while m.old_start < m.old_end && m.new_start < m.new_end && same(m.old_start, m.new_start) {
        matches[m.old_start] = Some(m.new_start);
        m.old_start += 1;
        m.new_start += 1;
    }

    while m.old_start < m.old_end && m.new_start < m.new_end && same(m.old_end - 1, m.new_end - 1)
    {
        m.old_end -= 1;
        m.new_end -= 1;
        matches[m.old_end] = Some(m.new_end);
    }

    m
}

/// Run the threshold pass over the middle and record the longest chain.
///
/// `candidates(i)` returns the ascending new indices equal to `old[i]`.
fn patience<'c>(
    matches: &mut [Option<usize>],
    middle: &Middle,
    mut candidates: impl FnMut(usize) -> &'c [usize],
) {
    let mut thresh: Vec<usize> = Vec::new();
    // tails[k] is the link that produced thresh[k]
    let mut tails: Vec<usize> = Vec::new();
    let mut links: Vec<Link> = Vec::new();

    for i in middle.old_start..middle.old_end {
        let mut slot: Option<usize> = None;

        // Descending order keeps a single old element from extending a chain
        // it has itself just ended.
        for &j in candidates(i).iter().rev() {
            slot = match slot {
                Some(k) if k > 0 && thresh[k] > j && thresh[k - 1] < j => {
                    thresh[k] = j;
                    Some(k)
                }
                _ => replace_next_larger(&mut thresh, j),
            };

            if let Some(k) = slot {
                let prev = k.checked_sub(1).map(|p| tails[p]);
                links.push(Link {
                    prev,
                    old: i,
                    new: j,
                });
                let id = links.len() - 1;
                if k == tails.len() {
                    tails.push(id);
                } else {
                    tails[k] = id;
                }
            }
        }
    }

    trace!(
        chain = thresh.len(),
        links = links.len(),
        "threshold pass finished"
    );

    let mut cursor = tails.last().copied();
    while let Some(id) = cursor {
        let link = links[id];
        matches[link.old] = Some(link.new);
        cursor = link.prev;
    }
}

/// Overwrite the smallest entry not less than `value` with `value`, or
/// append it when every entry is smaller. Returns the slot written, or
/// `None` when `value` is already present.
fn replace_next_larger(thresh: &mut Vec<usize>, value: usize) -> Option<usize> {
    if thresh.last().map_or(true, |&last| value > last) {
        thresh.push(value);
        return Some(thresh.len() - 1);
    }

    let slot = thresh.partition_point(|&t| t < value);
    if thresh[slot] == value {
        None
    } else {
        thresh[slot] = value;
        Some(slot)
    }
}

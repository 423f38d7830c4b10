//! Walking two sequences along their alignment
//!
//! Both traversals move strictly forward through the old and new sequences
//! and report every step to a [`Callbacks`] implementation. Every handler has
//! a no-op default, so an implementation only writes the ones it cares about.

use crate::alignment::{Alignment, AlignmentError};
use crate::event::{Action, Event};

/// Receives traversal events.
pub trait Callbacks<T> {
    /// `old[i]` and `new[j]` are part of the common subsequence.
    fn matched(&mut self, _event: Event<'_, T>) {}

    /// `old[i]` has no counterpart in the new sequence.
    fn discard_a(&mut self, _event: Event<'_, T>) {}

    /// `new[j]` has no counterpart in the old sequence.
    fn discard_b(&mut self, _event: Event<'_, T>) {}

    /// An unmatched old element sits opposite an unmatched new one.
    ///
    /// Only delivered by [`traverse_balanced`], and only when
    /// [`Callbacks::handles_change`] returns `true`.
    fn change(&mut self, _event: Event<'_, T>) {}

    /// Whether [`Callbacks::change`] should be used instead of a
    /// `discard_a`/`discard_b` pair.
    fn handles_change(&self) -> bool {
        false
    }

    /// The old sequence is exhausted and the new one still has elements.
    fn finished_a(&mut self, _event: Event<'_, T>) {}

    /// The new sequence is exhausted and the old one still has elements.
    fn finished_b(&mut self, _event: Event<'_, T>) {}
}

impl<T, C: Callbacks<T> + ?Sized> Callbacks<T> for &mut C {
    fn matched(&mut self, event: Event<'_, T>) {
        (**self).matched(event)
    }

    fn discard_a(&mut self, event: Event<'_, T>) {
        (**self).discard_a(event)
    }

    fn discard_b(&mut self, event: Event<'_, T>) {
        (**self).discard_b(event)
    }

    fn change(&mut self, event: Event<'_, T>) {
        (**self).change(event)
    }

    fn handles_change(&self) -> bool {
        (**self).handles_change()
    }

    fn finished_a(&mut self, event: Event<'_, T>) {
        (**self).finished_a(event)
    }

    fn finished_b(&mut self, event: Event<'_, T>) {
        (**self).finished_b(event)
    }
}

/// Builds events for one pair of sequences.
struct Cursor<'a, T> {
    old: &'a [T],
    new: &'a [T],
}

impl<'a, T> Cursor<'a, T> {
    fn matched(&self, i: usize, j: usize) -> Event<'a, T> {
        Event::new(Action::Match, i, self.old.get(i), j, self.new.get(j))
    }

    fn change(&self, i: usize, j: usize) -> Event<'a, T> {
        Event::new(Action::Change, i, self.old.get(i), j, self.new.get(j))
    }

    fn discard_a(&self, i: usize, j: usize) -> Event<'a, T> {
        Event::new(Action::DiscardA, i, self.old.get(i), j, None)
    }

    fn discard_b(&self, i: usize, j: usize) -> Event<'a, T> {
        Event::new(Action::DiscardB, i, None, j, self.new.get(j))
    }

    fn finished_a(&self, j: usize) -> Event<'a, T> {
        let i = self.old.len().saturating_sub(1);
        Event::new(Action::FinishedA, i, self.old.last(), j, self.new.get(j))
    }

    fn finished_b(&self, i: usize) -> Event<'a, T> {
        let j = self.new.len().saturating_sub(1);
        Event::new(Action::FinishedB, i, self.old.get(i), j, self.new.last())
    }
}

impl Alignment {
    /// Walk `old` and `new` along this alignment, reporting matches and
    /// discards in order.
    ///
    /// Up to the last matched old element, unmatched new elements are
    /// reported right before the match that follows them. Past it, the
    /// remaining old and new elements are discarded alternately while both
    /// sides have some left. When one side runs out first, `finished_a` or
    /// `finished_b` fires once before the rest of the other side is flushed.
    pub fn traverse_sequences<T, C>(
        &self,
        old: &[T],
        new: &[T],
        callbacks: C,
    ) -> Result<(), AlignmentError>
    where
        C: Callbacks<T>,
    {
        self.check(old.len(), new.len())?;
        self.walk_sequences(old, new, callbacks);
        Ok(())
    }

    /// Walk `old` and `new` along this alignment, pairing the unmatched
    /// elements between two matches.
    ///
    /// While both sides of a gap have unmatched elements, each pair is
    /// reported as one `change`, or as `discard_a` followed by `discard_b`
    /// when the callbacks do not handle changes. Whatever remains on the
    /// longer side is discarded afterwards.
    pub fn traverse_balanced<T, C>(
        &self,
        old: &[T],
        new: &[T],
        callbacks: C,
    ) -> Result<(), AlignmentError>
    where
        C: Callbacks<T>,
    {
        self.check(old.len(), new.len())?;
        self.walk_balanced(old, new, callbacks);
        Ok(())
    }

    pub(crate) fn walk_sequences<T, C: Callbacks<T>>(&self, old: &[T], new: &[T], mut callbacks: C) {
        let cursor = Cursor { old, new };
        let (a_len, b_len) = (old.len(), new.len());

        let mut j = 0;
        let last = self.matched_end();
        for i in 0..last {
            match self.get(i) {
                Some(matched) => {
                    while j < matched {
                        callbacks.discard_b(cursor.discard_b(i, j));
                        j += 1;
                    }
                    callbacks.matched(cursor.matched(i, matched));
                    j = matched + 1;
                }
                None => callbacks.discard_a(cursor.discard_a(i, j)),
            }
        }

        let mut i = last;
        let mut finished_a = false;
        let mut finished_b = false;
        while i < a_len || j < b_len {
            if i == a_len && j < b_len {
                if finished_a {
                    while j < b_len {
                        callbacks.discard_b(cursor.discard_b(i, j));
                        j += 1;
                    }
                } else {
                    callbacks.finished_a(cursor.finished_a(j));
                    finished_a = true;
                }
            }

            if j == b_len && i < a_len {
                if finished_b {
                    while i < a_len {
                        callbacks.discard_a(cursor.discard_a(i, j));
                        i += 1;
                    }
                } else {
                    callbacks.finished_b(cursor.finished_b(i));
                    finished_b = true;
                }
            }

            if i < a_len {
                callbacks.discard_a(cursor.discard_a(i, j));
                i += 1;
            }

            if j < b_len {
                callbacks.discard_b(cursor.discard_b(i, j));
                j += 1;
            }
        }
    }

    pub(crate) fn walk_balanced<T, C: Callbacks<T>>(&self, old: &[T], new: &[T], mut callbacks: C) {
        let cursor = Cursor { old, new };

        let mut i = 0;
        let mut j = 0;
        for (match_i, match_j) in self.pairs() {
            balance_gap(&cursor, &mut callbacks, &mut i, &mut j, match_i, match_j);
            callbacks.matched(cursor.matched(i, j));
            i += 1;
            j += 1;
        }
        balance_gap(&cursor, &mut callbacks, &mut i, &mut j, old.len(), new.len());
    }
}

/// Report everything in `[i, i_end)` and `[j, j_end)`, pairing both sides.
fn balance_gap<T, C: Callbacks<T>>(
    cursor: &Cursor<'_, T>,
    callbacks: &mut C,
    i: &mut usize,
    j: &mut usize,
    i_end: usize,
    j_end: usize,
) {
    while *i < i_end || *j < j_end {
        match (*i < i_end, *j < j_end) {
            (true, true) if callbacks.handles_change() => {
                callbacks.change(cursor.change(*i, *j));
                *i += 1;
                *j += 1;
            }
            (true, true) => {
                callbacks.discard_a(cursor.discard_a(*i, *j));
                *i += 1;
                callbacks.discard_b(cursor.discard_b(*i, *j));
                *j += 1;
            }
            (true, false) => {
                callbacks.discard_a(cursor.discard_a(*i, *j));
                *i += 1;
            }
            (false, _) => {
                callbacks.discard_b(cursor.discard_b(*i, *j));
                *j += 1;
            }
        }
    }
}

/// Walk two sequences along their longest common subsequence.
///
/// See [`Alignment::traverse_sequences`].
pub fn traverse_sequences<T, C>(old: &[T], new: &[T], callbacks: C)
where
    T: std::hash::Hash + Eq,
    C: Callbacks<T>,
{
    Alignment::new(old, new).walk_sequences(old, new, callbacks);
}

/// Walk two sequences along their longest common subsequence, pairing
/// unmatched elements.
///
/// See [`Alignment::traverse_balanced`].
pub fn traverse_balanced<T, C>(old: &[T], new: &[T], callbacks: C)
where
    T: std::hash::Hash + Eq,
    C: Callbacks<T>,
{
    Alignment::new(old, new).walk_balanced(old, new, callbacks);
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records `(name, old_position, new_position)` for every event.
    #[derive(Default)]
    struct Recorder {
        with_change: bool,
        events: Vec<(&'static str, usize, usize)>,
    }

    impl Recorder {
        fn push(&mut self, event: Event<'_, char>) {
            self.events
                .push((event.action.name(), event.old_position, event.new_position));
        }
    }

    impl Callbacks<char> for Recorder {
        fn matched(&mut self, event: Event<'_, char>) {
            self.push(event)
        }

        fn discard_a(&mut self, event: Event<'_, char>) {
            self.push(event)
        }

        fn discard_b(&mut self, event: Event<'_, char>) {
            self.push(event)
        }

        fn change(&mut self, event: Event<'_, char>) {
            self.push(event)
        }

        fn handles_change(&self) -> bool {
            self.with_change
        }

        fn finished_a(&mut self, event: Event<'_, char>) {
            self.push(event)
        }

        fn finished_b(&mut self, event: Event<'_, char>) {
            self.push(event)
        }
    }

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_balanced_with_change() {
        let mut recorder = Recorder {
            with_change: true,
            ..Default::default()
        };
        traverse_balanced(&chars("abc"), &chars("axc"), &mut recorder);
        assert_eq!(
            recorder.events,
            vec![("match", 0, 0), ("change", 1, 1), ("match", 2, 2)]
        );
    }

    #[test]
    fn test_balanced_without_change() {
        let mut recorder = Recorder::default();
        traverse_balanced(&chars("abc"), &chars("axc"), &mut recorder);
        assert_eq!(
            recorder.events,
            vec![
                ("match", 0, 0),
                ("discard_a", 1, 1),
                ("discard_b", 2, 1),
                ("match", 2, 2)
            ]
        );
    }

    #[test]
    fn test_balanced_surplus_after_pairs() {
        let mut recorder = Recorder {
            with_change: true,
            ..Default::default()
        };
        traverse_balanced(&chars("aXYZb"), &chars("aPb"), &mut recorder);
        assert_eq!(
            recorder.events,
            vec![
                ("match", 0, 0),
                ("change", 1, 1),
                ("discard_a", 2, 2),
                ("discard_a", 3, 2),
                ("match", 4, 2)
            ]
        );
    }

    #[test]
    fn test_sequences_reference_tail() {
        let mut recorder = Recorder::default();
        traverse_sequences(&chars("abcehjlmnp"), &chars("bcdefjklmrst"), &mut recorder);
        assert_eq!(
            recorder.events,
            vec![
                ("discard_a", 0, 0),
                ("match", 1, 0),
                ("match", 2, 1),
                ("discard_b", 3, 2),
                ("match", 3, 3),
                ("discard_a", 4, 4),
                ("discard_b", 5, 4),
                ("match", 5, 5),
                ("discard_b", 6, 6),
                ("match", 6, 7),
                ("match", 7, 8),
                ("discard_a", 8, 9),
                ("discard_b", 9, 9),
                ("discard_a", 9, 10),
                ("discard_b", 10, 10),
                ("finished_a", 9, 11),
                ("discard_b", 10, 11),
            ]
        );
    }

    #[test]
    fn test_sequences_finished_b() {
        let mut recorder = Recorder::default();
        traverse_sequences(&chars("abxy"), &chars("ab"), &mut recorder);
        assert_eq!(
            recorder.events,
            vec![
                ("match", 0, 0),
                ("match", 1, 1),
                ("finished_b", 2, 1),
                ("discard_a", 2, 2),
                ("discard_a", 3, 2),
            ]
        );
    }

    #[test]
    fn test_sequences_empty_old() {
        let empty: Vec<char> = Vec::new();
        let mut recorder = Recorder::default();
        traverse_sequences(&empty, &chars("xy"), &mut recorder);
        assert_eq!(
            recorder.events,
            vec![
                ("finished_a", 0, 0),
                ("discard_b", 0, 0),
                ("discard_b", 0, 1),
            ]
        );
    }

    /// `(action, old_position, old_element, new_position, new_element)`
    type Finished = (Action, usize, Option<char>, usize, Option<char>);

    /// Every `finished_*` event of a sequence traversal.
    fn finished_events(old: &str, new: &str) -> Vec<Finished> {
        let mut events = Vec::new();
        traverse_sequences(
            &chars(old),
            &chars(new),
            crate::callbacks::EventSink::new(|event: Event<'_, char>| {
                if matches!(event.action, Action::FinishedA | Action::FinishedB) {
                    events.push((
                        event.action,
                        event.old_position,
                        event.old_element.copied(),
                        event.new_position,
                        event.new_element.copied(),
                    ));
                }
            }),
        );
        events
    }

    #[test]
    fn test_finished_a_carries_last_old_and_next_new() {
        assert_eq!(
            finished_events("ab", "abxy"),
            vec![(Action::FinishedA, 1, Some('b'), 2, Some('x'))]
        );
        assert_eq!(
            finished_events("", "xy"),
            vec![(Action::FinishedA, 0, None, 0, Some('x'))]
        );
    }

    #[test]
    fn test_finished_b_carries_next_old_and_last_new() {
        assert_eq!(
            finished_events("abxy", "ab"),
            vec![(Action::FinishedB, 2, Some('x'), 1, Some('b'))]
        );
        assert_eq!(
            finished_events("xy", ""),
            vec![(Action::FinishedB, 0, Some('x'), 0, None)]
        );
    }

    #[test]
    fn test_no_finished_event_when_both_sides_end_together() {
        assert!(finished_events("abc", "axc").is_empty());
        assert!(finished_events("", "").is_empty());
    }

    #[test]
    fn test_sequences_identical() {
        let mut recorder = Recorder::default();
        traverse_sequences(&chars("ab"), &chars("ab"), &mut recorder);
        assert_eq!(recorder.events, vec![("match", 0, 0), ("match", 1, 1)]);
    }

    #[test]
    fn test_discard_events_omit_other_side() {
        struct Check;
        impl Callbacks<char> for Check {
            fn discard_a(&mut self, event: Event<'_, char>) {
                assert!(event.old_element.is_some());
                assert!(event.new_element.is_none());
            }

            fn discard_b(&mut self, event: Event<'_, char>) {
                assert!(event.old_element.is_none());
                assert!(event.new_element.is_some());
            }

            fn matched(&mut self, event: Event<'_, char>) {
                assert_eq!(event.old_element, event.new_element);
            }
        }

        traverse_sequences(&chars("abcehjlmnp"), &chars("bcdefjklmrst"), Check);
        traverse_balanced(&chars("abcehjlmnp"), &chars("bcdefjklmrst"), Check);
    }

    #[test]
    fn test_alignment_length_mismatch() {
        let old = chars("ab");
        let alignment = Alignment::new(&old, &old);
        let result = alignment.traverse_sequences(&old, &chars("abc"), &mut Recorder::default());
        assert!(matches!(
            result,
            Err(AlignmentError::LengthMismatch { found_new: 3, .. })
        ));
        let result = alignment.traverse_balanced(&chars("a"), &old, &mut Recorder::default());
        assert!(result.is_err());
    }
}

//! Callbacks that turn traversal events into diff results

use crate::change::{Change, ChangeKind, ContextChange, Hunk, SdiffChange};
use crate::event::Event;
use crate::traverse::Callbacks;

/// Callbacks that build a value out of the events they receive.
pub trait Reducer<T>: Callbacks<T> {
    type Output;

    /// Consume the reducer once the traversal is over.
    fn finish(self) -> Self::Output;
}

/// Ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCallbacks;

impl<T> Callbacks<T> for NoopCallbacks {}

impl<T> Reducer<T> for NoopCallbacks {
    type Output = ();

    fn finish(self) {}
}

/// Groups consecutive discards into hunks, closing a hunk at every match.
#[derive(Debug, Clone)]
pub struct HunkBuilder<T> {
    hunk: Hunk<T>,
    hunks: Vec<Hunk<T>>,
}

impl<T> HunkBuilder<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hunks completed so far.
    pub fn hunks(&self) -> &[Hunk<T>] {
        &self.hunks
    }

    fn close_hunk(&mut self) {
        if !self.hunk.is_empty() {
            let hunk = self.hunk.take();
            self.hunks.push(hunk);
        }
    }
}

impl<T> Default for HunkBuilder<T> {
    fn default() -> Self {
        Self {
            hunk: Hunk::default(),
            hunks: Vec::new(),
        }
    }
}

impl<T: Clone> Callbacks<T> for HunkBuilder<T> {
    fn matched(&mut self, _event: Event<'_, T>) {
        self.close_hunk();
    }

    fn discard_a(&mut self, event: Event<'_, T>) {
        if let Some((position, element)) = event.old() {
            self.hunk.push(Change::delete(position, element.clone()));
        }
    }

    fn discard_b(&mut self, event: Event<'_, T>) {
        if let Some((position, element)) = event.new_side() {
            self.hunk.push(Change::add(position, element.clone()));
        }
    }
}

impl<T: Clone> Reducer<T> for HunkBuilder<T> {
    type Output = Vec<Hunk<T>>;

    fn finish(mut self) -> Vec<Hunk<T>> {
        self.close_hunk();
        self.hunks
    }
}

/// Records one aligned change per traversal step.
#[derive(Debug, Clone)]
pub struct SdiffBuilder<T> {
    changes: Vec<SdiffChange<T>>,
}

impl<T> SdiffBuilder<T> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T> Default for SdiffBuilder<T> {
    fn default() -> Self {
        Self {
            changes: Vec::new(),
        }
    }
}

impl<T: Clone> SdiffBuilder<T> {
    fn record(&mut self, kind: ChangeKind, event: Event<'_, T>) {
        self.changes.push(SdiffChange::new(
            kind,
            event.old_element.cloned(),
            event.new_element.cloned(),
        ));
    }
}

impl<T: Clone> Callbacks<T> for SdiffBuilder<T> {
    fn matched(&mut self, event: Event<'_, T>) {
        self.record(ChangeKind::Unchanged, event);
    }

    fn discard_a(&mut self, event: Event<'_, T>) {
        self.record(ChangeKind::Delete, event);
    }

    fn discard_b(&mut self, event: Event<'_, T>) {
        self.record(ChangeKind::Add, event);
    }

    fn change(&mut self, event: Event<'_, T>) {
        self.record(ChangeKind::Changed, event);
    }

    fn handles_change(&self) -> bool {
        true
    }
}

impl<T: Clone> Reducer<T> for SdiffBuilder<T> {
    type Output = Vec<SdiffChange<T>>;

    fn finish(self) -> Vec<SdiffChange<T>> {
        self.changes
    }
}

/// Like [`SdiffBuilder`], but every side keeps its index.
#[derive(Debug, Clone)]
pub struct ContextBuilder<T> {
    changes: Vec<ContextChange<T>>,
}

impl<T> ContextBuilder<T> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T> Default for ContextBuilder<T> {
    fn default() -> Self {
        Self {
            changes: Vec::new(),
        }
    }
}

impl<T: Clone> ContextBuilder<T> {
    fn record(&mut self, kind: ChangeKind, event: Event<'_, T>) {
        let old = event.old().map(|(i, element)| (i, element.clone()));
        let new = event.new_side().map(|(j, element)| (j, element.clone()));
        self.changes.push(ContextChange::new(kind, old, new));
    }
}

impl<T: Clone> Callbacks<T> for ContextBuilder<T> {
    fn matched(&mut self, event: Event<'_, T>) {
        self.record(ChangeKind::Unchanged, event);
    }

    fn discard_a(&mut self, event: Event<'_, T>) {
        self.record(ChangeKind::Delete, event);
    }

    fn discard_b(&mut self, event: Event<'_, T>) {
        self.record(ChangeKind::Add, event);
    }

    fn change(&mut self, event: Event<'_, T>) {
        self.record(ChangeKind::Changed, event);
    }

    fn handles_change(&self) -> bool {
        true
    }
}

impl<T: Clone> Reducer<T> for ContextBuilder<T> {
    type Output = Vec<ContextChange<T>>;

    fn finish(self) -> Vec<ContextChange<T>> {
        self.changes
    }
}

/// Forwards every event to a closure.
///
/// The event's [`action`](Event::action) tells which handler it was sent
/// to. Changes are accepted unless [`EventSink::without_change`] is used.
pub struct EventSink<F> {
    sink: F,
    handles_change: bool,
}

impl<F> EventSink<F> {
    pub fn new(sink: F) -> Self {
        Self {
            sink,
            handles_change: true,
        }
    }

    /// Receive `discard_a`/`discard_b` pairs instead of `change` events.
    pub fn without_change(mut self) -> Self {
        self.handles_change = false;
        self
    }

    pub fn into_inner(self) -> F {
        self.sink
    }
}

impl<T, F> Callbacks<T> for EventSink<F>
where
    F: FnMut(Event<'_, T>),
{
    fn matched(&mut self, event: Event<'_, T>) {
        (self.sink)(event)
    }

    fn discard_a(&mut self, event: Event<'_, T>) {
        (self.sink)(event)
    }

    fn discard_b(&mut self, event: Event<'_, T>) {
        (self.sink)(event)
    }

    fn change(&mut self, event: Event<'_, T>) {
        (self.sink)(event)
    }

    fn handles_change(&self) -> bool {
        self.handles_change
    }

    fn finished_a(&mut self, event: Event<'_, T>) {
        (self.sink)(event)
    }

    fn finished_b(&mut self, event: Event<'_, T>) {
        (self.sink)(event)
    }
}

impl<T, F> Reducer<T> for EventSink<F>
where
    F: FnMut(Event<'_, T>),
{
    type Output = F;

    fn finish(self) -> F {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traverse::{traverse_balanced, traverse_sequences};

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_hunk_builder_closes_on_match() {
        let mut builder = HunkBuilder::<char>::new();
        traverse_sequences(&chars("axb"), &chars("ayb"), &mut builder);
        assert_eq!(builder.hunks().len(), 1);

        let hunks = builder.finish();
        assert_eq!(
            hunks[0].changes(),
            &[Change::delete(1, 'x'), Change::add(1, 'y')]
        );
    }

    #[test]
    fn test_hunk_builder_flushes_trailing_hunk() {
        let mut builder = HunkBuilder::<char>::new();
        traverse_sequences(&chars("ab"), &chars("abc"), &mut builder);
        assert!(builder.hunks().is_empty());
        assert_eq!(builder.finish(), vec![Hunk::new(vec![Change::add(2, 'c')])]);
    }

    #[test]
    fn test_hunk_builder_ignores_changes_under_balance() {
        let mut builder = HunkBuilder::<char>::new();
        traverse_balanced(&chars("abc"), &chars("axc"), &mut builder);
        let hunks = builder.finish();
        assert_eq!(
            hunks,
            vec![Hunk::new(vec![Change::delete(1, 'b'), Change::add(1, 'x')])]
        );
    }

    #[test]
    fn test_sdiff_builder() {
        let mut builder = SdiffBuilder::<char>::new();
        traverse_balanced(&chars("abc"), &chars("axcd"), &mut builder);
        assert_eq!(
            builder.finish(),
            vec![
                SdiffChange::unchanged('a', 'a'),
                SdiffChange::changed('b', 'x'),
                SdiffChange::unchanged('c', 'c'),
                SdiffChange::add('d'),
            ]
        );
    }

    #[test]
    fn test_context_builder_keeps_indices() {
        let mut builder = ContextBuilder::<char>::new();
        traverse_balanced(&chars("xab"), &chars("ab"), &mut builder);
        assert_eq!(
            builder.finish(),
            vec![
                ContextChange::new(ChangeKind::Delete, Some((0, 'x')), None),
                ContextChange::new(ChangeKind::Unchanged, Some((1, 'a')), Some((0, 'a'))),
                ContextChange::new(ChangeKind::Unchanged, Some((2, 'b')), Some((1, 'b'))),
            ]
        );
    }

    #[test]
    fn test_event_sink_tags_events() {
        let mut names = Vec::new();
        traverse_balanced(
            &chars("abc"),
            &chars("axc"),
            EventSink::new(|event: Event<'_, char>| {
                names.push(format!(
                    "{}({},{})",
                    event.action, event.old_position, event.new_position
                ))
            }),
        );
        assert_eq!(names, vec!["match(0,0)", "change(1,1)", "match(2,2)"]);
    }

    #[test]
    fn test_event_sink_without_change() {
        let mut names = Vec::new();
        traverse_balanced(
            &chars("abc"),
            &chars("axc"),
            EventSink::new(|event: Event<'_, char>| names.push(event.action.name()))
                .without_change(),
        );
        assert_eq!(names, vec!["match", "discard_a", "discard_b", "match"]);
    }

    #[test]
    fn test_noop_callbacks() {
        let mut noop = NoopCallbacks;
        traverse_sequences(&chars("abc"), &chars("xyz"), &mut noop);
        traverse_balanced(&chars("abc"), &chars("xyz"), noop);
        Reducer::<char>::finish(noop);
    }
}

//! Change notification for triangulations.
//!
//! Every mutator opens a [`ChangeSpan`]. Spans nest; listeners hear exactly one
//! [`ChangeEvent`] when the outermost span closes, so a composite operation
//! (or a caller holding a span across many calls) is observed as one change.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use super::Triangulation;
use crate::debug_invariants::DebugInvariants;
use crate::topology::cache::InvalidateCache;

/// Emitted once per outermost change span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Revision reached after the change.
    pub revision: u64,
    /// Number of simplices after the change.
    pub size: usize,
}

/// Observer of triangulation changes.
pub trait ChangeListener: Send + Sync {
    fn triangulation_changed(&self, event: &ChangeEvent);
}

impl<F> ChangeListener for F
where
    F: Fn(&ChangeEvent) + Send + Sync,
{
    fn triangulation_changed(&self, event: &ChangeEvent) {
        self(event)
    }
}

/// Scope guard bracketing a group of mutations.
///
/// Dereferences to the triangulation, so mutators can be called through it.
pub struct ChangeSpan<'a, const N: usize> {
    tri: &'a mut Triangulation<N>,
}

impl<'a, const N: usize> ChangeSpan<'a, N> {
    pub(super) fn open(tri: &'a mut Triangulation<N>) -> Self {
        tri.span_depth += 1;
        tri.invalidate_cache();
        Self { tri }
    }
}

impl<const N: usize> Deref for ChangeSpan<'_, N> {
    type Target = Triangulation<N>;
    fn deref(&self) -> &Triangulation<N> {
        self.tri
    }
}

impl<const N: usize> DerefMut for ChangeSpan<'_, N> {
    fn deref_mut(&mut self) -> &mut Triangulation<N> {
        self.tri
    }
}

impl<const N: usize> Drop for ChangeSpan<'_, N> {
    fn drop(&mut self) {
        let tri = &mut *self.tri;
        tri.invalidate_cache();
        tri.span_depth -= 1;
        if tri.span_depth > 0 {
            return;
        }
        if !std::thread::panicking() {
            tri.debug_assert_invariants();
        }
        tri.revision += 1;
        let event = ChangeEvent {
            revision: tri.revision,
            size: tri.simplices.len(),
        };
        log::trace!(
            "triangulation changed: revision {} ({} simplices, {} listeners)",
            event.revision,
            event.size,
            tri.listeners.len()
        );
        for listener in &tri.listeners {
            listener.triangulation_changed(&event);
        }
    }
}

impl<const N: usize> Triangulation<N> {
    /// Opens a change span. Mutations made through the returned guard are
    /// reported as one event when the outermost span is dropped.
    pub fn change_span(&mut self) -> ChangeSpan<'_, N> {
        ChangeSpan::open(self)
    }

    /// Registers a listener. Listeners are not carried over by `clone`.
    pub fn add_listener(&mut self, listener: Arc<dyn ChangeListener>) {
        self.listeners.push(listener);
    }

    /// Unregisters `listener`; returns whether it was registered.
    pub fn remove_listener(&mut self, listener: &Arc<dyn ChangeListener>) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| !Arc::ptr_eq(l, listener));
        self.listeners.len() != before
    }

    /// Number of completed change spans since creation.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::perm::Perm;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<ChangeEvent>>);

    impl ChangeListener for Recorder {
        fn triangulation_changed(&self, event: &ChangeEvent) {
            self.0.lock().unwrap().push(*event);
        }
    }

    #[test]
    fn nested_spans_fire_once() {
        let recorder = Arc::new(Recorder::default());
        let mut tri = Triangulation::<3>::new();
        tri.add_listener(recorder.clone());
        {
            let mut span = tri.change_span();
            span.new_simplices(2);
            span.join(0, 0, 1, Perm::identity()).unwrap();
            span.join(0, 1, 1, Perm::identity()).unwrap();
        }
        let events = recorder.0.lock().unwrap().clone();
        assert_eq!(events, vec![ChangeEvent { revision: 1, size: 2 }]);
    }

    #[test]
    fn each_top_level_mutation_fires() {
        let recorder = Arc::new(Recorder::default());
        let mut tri = Triangulation::<4>::new();
        tri.add_listener(recorder.clone());
        tri.new_simplex();
        tri.new_simplex();
        tri.join(0, 3, 1, Perm::identity()).unwrap();
        assert_eq!(recorder.0.lock().unwrap().len(), 3);
        assert_eq!(tri.revision(), 3);
    }

    #[test]
    fn failed_mutation_is_silent() {
        let recorder = Arc::new(Recorder::default());
        let mut tri = Triangulation::<3>::new();
        tri.new_simplex();
        tri.add_listener(recorder.clone());
        assert!(tri.unjoin(0, 1).is_err());
        assert!(recorder.0.lock().unwrap().is_empty());
    }

    #[test]
    fn closures_listen_and_can_be_removed() {
        let hits = Arc::new(Mutex::new(0usize));
        let seen = hits.clone();
        let listener: Arc<dyn ChangeListener> = Arc::new(move |_: &ChangeEvent| {
            *seen.lock().unwrap() += 1;
        });
        let mut tri = Triangulation::<3>::new();
        tri.add_listener(listener.clone());
        tri.new_simplex();
        assert!(tri.remove_listener(&listener));
        tri.new_simplex();
        assert_eq!(*hits.lock().unwrap(), 1);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "[invariants] Triangulation")]
    fn one_sided_gluing_fails_when_span_closes() {
        let mut tri = Triangulation::<3>::new();
        tri.new_simplices(2);
        let mut span = tri.change_span();
        span.simplices[0].adj[1] = Some(1);
    }

    #[test]
    fn clones_drop_listeners() {
        let recorder = Arc::new(Recorder::default());
        let mut tri = Triangulation::<3>::new();
        tri.add_listener(recorder.clone());
        let mut copy = tri.clone();
        copy.new_simplex();
        assert!(recorder.0.lock().unwrap().is_empty());
    }
}

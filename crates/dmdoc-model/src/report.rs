//! Progress reporting for model loading and resolution.
//!
//! The loader and [`ElementStore::flatten`](crate::ElementStore::flatten)
//! take a `&dyn Reporter` instead of logging through a global. The CLI passes
//! [`TracingReporter`]; tests pass [`RecordingReporter`] to assert on events.

/// Notable step during loading or resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModelEvent {
    /// A namespace was registered.
    NamespaceCreated {
        /// Namespace name.
        name: String,
        /// True when created because an element referenced it, rather than
        /// from the explicit namespace listing.
        implicit: bool,
    },
    /// An element was added to the store.
    ElementLoaded {
        /// Element fqn.
        fqn: String,
        /// Owning namespace.
        namespace: String,
    },
    /// `flatten()` completed.
    HierarchyResolved {
        /// Number of elements resolved.
        elements: usize,
        /// Number of elements with at least one ancestor.
        with_parents: usize,
    },
}

/// Receiver of [`ModelEvent`]s.
pub trait Reporter {
    /// Handle one event.
    fn report(&self, event: &ModelEvent);
}

/// Forwards events to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, event: &ModelEvent) {
        match event {
            ModelEvent::NamespaceCreated { name, implicit } => {
                if *implicit {
                    tracing::debug!(namespace = %name, "Namespace created from element reference");
                } else {
                    tracing::debug!(namespace = %name, "Namespace registered");
                }
            }
            ModelEvent::ElementLoaded { fqn, namespace } => {
                tracing::trace!(fqn = %fqn, namespace = %namespace, "Element loaded");
            }
            ModelEvent::HierarchyResolved {
                elements,
                with_parents,
            } => {
                tracing::info!(elements, with_parents, "Element hierarchy resolved");
            }
        }
    }
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&self, _event: &ModelEvent) {}
}

/// Records events in memory for assertions.
#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: std::sync::Mutex<Vec<ModelEvent>>,
}

#[cfg(any(test, feature = "mock"))]
impl RecordingReporter {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events recorded so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn events(&self) -> Vec<ModelEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[cfg(any(test, feature = "mock"))]
impl Reporter for RecordingReporter {
    fn report(&self, event: &ModelEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

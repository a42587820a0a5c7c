//! Model error types.

/// Error returned while loading or resolving a data model.
///
/// Every variant describes malformed input and is fatal for the run.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Two data elements share a fully-qualified name.
    #[error("Duplicate element: {fqn} is defined more than once")]
    DuplicateFqn {
        /// The repeated fqn.
        fqn: String,
    },
    /// An element extends a parent that is not in the model.
    #[error("Unresolved parent: {fqn} extends {parent}, which is not defined")]
    UnresolvedParent {
        /// Element declaring the dangling reference.
        fqn: String,
        /// The missing parent fqn.
        parent: String,
    },
    /// The parent chain loops back on itself.
    #[error("Cyclic hierarchy: {}", .cycle.join(" -> "))]
    CyclicHierarchy {
        /// Fqns on the loop, starting and ending with the repeated fqn.
        cycle: Vec<String>,
    },
    /// The model document is not valid JSON or has the wrong shape.
    #[error("Invalid model document: {0}")]
    Json(#[from] serde_json::Error),
}

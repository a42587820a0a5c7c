//! Data-model resolution for dmdoc.
//!
//! This crate turns the flat list of data-element definitions found in a
//! model export into a resolved [`Model`]:
//!
//! - [`ElementStore`]: elements keyed by fully-qualified name, with
//!   inheritance resolution ([`ElementStore::flatten`])
//! - [`NamespaceRegistry`]: namespaces with their output paths and members
//! - [`ModelLoader`]: populates both stores from a decoded [`ModelInput`]
//!
//! # Two-phase contract
//!
//! Loading and resolution never interleave. [`Model::load`] ingests every
//! namespace and element, runs `flatten()` once, and only then hands out an
//! immutable [`Model`]. Page generation reads the frozen model and may do so
//! from many threads.
//!
//! # Example
//!
//! ```
//! use dmdoc_model::{Model, NullReporter};
//!
//! let json = r#"{
//!     "namespaces": { "onc": { "description": "Oncology" } },
//!     "dataElements": [
//!         { "fqn": "onc.Tumor", "namespace": "onc", "fields": [{ "name": "size" }] },
//!         { "fqn": "onc.MalignantTumor", "namespace": "onc", "parentFqn": "onc.Tumor",
//!           "fields": [{ "name": "grade" }] }
//!     ]
//! }"#;
//!
//! let model = Model::from_json_str(json, &NullReporter)?;
//! let tumor = model.element("onc.MalignantTumor").unwrap();
//! assert_eq!(tumor.hierarchy(), ["onc.Tumor"]);
//! # Ok::<(), dmdoc_model::ModelError>(())
//! ```

mod element;
mod error;
mod loader;
mod model;
mod namespace;
mod report;
mod store;

pub use element::{Cardinality, Constraint, Element, ElementDef, Field, ResolvedField, display_name};
pub use error::ModelError;
pub use loader::{ModelInput, ModelLoader, NamespaceInput, ProjectInfo};
pub use model::Model;
pub use namespace::{Namespace, NamespaceRegistry, namespace_path};
#[cfg(any(test, feature = "mock"))]
pub use report::RecordingReporter;
pub use report::{ModelEvent, NullReporter, Reporter, TracingReporter};
pub use store::ElementStore;

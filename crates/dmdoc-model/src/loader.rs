//! Model export ingestion.
//!
//! [`ModelInput`] mirrors the JSON export:
//!
//! ```json
//! {
//!   "projectInfo": { "name": "...", "version": "..." },
//!   "namespaces": { "onc": { "description": "..." } },
//!   "dataElements": [ { "fqn": "...", "namespace": "...", "parentFqn": "...", "fields": [] } ]
//! }
//! ```
//!
//! [`ModelLoader`] copies every definition into an [`ElementStore`] and a
//! [`NamespaceRegistry`]. It never keeps references into the input.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::element::{Element, ElementDef};
use crate::error::ModelError;
use crate::namespace::NamespaceRegistry;
use crate::report::{ModelEvent, Reporter};
use crate::store::ElementStore;

/// Top-level project metadata.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectInfo {
    /// Project name.
    pub name: String,
    /// Project version.
    pub version: String,
    /// Free-text description (Markdown).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Entry of the explicit namespace listing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamespaceInput {
    /// Human-readable description.
    pub description: String,
}

/// Decoded model export.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelInput {
    /// Project metadata.
    pub project_info: ProjectInfo,
    /// Namespace name to description.
    pub namespaces: BTreeMap<String, NamespaceInput>,
    /// Data element definitions, in export order.
    pub data_elements: Vec<ElementDef>,
}

impl ModelInput {
    /// Parse an export from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Convert an already-decoded JSON document.
    pub fn from_json_value(value: &serde_json::Value) -> Result<Self, ModelError> {
        Ok(Self::deserialize(value)?)
    }
}

/// Populates an [`ElementStore`] and a [`NamespaceRegistry`].
///
/// Namespace descriptions and elements may be ingested in either order;
/// namespaces are created on first reference by whichever pass gets there
/// first.
pub struct ModelLoader<'r> {
    elements: ElementStore,
    namespaces: NamespaceRegistry,
    reporter: &'r dyn Reporter,
}

impl<'r> ModelLoader<'r> {
    /// Create a loader with empty stores.
    #[must_use]
    pub fn new(reporter: &'r dyn Reporter) -> Self {
        Self {
            elements: ElementStore::new(),
            namespaces: NamespaceRegistry::new(),
            reporter,
        }
    }

    /// Ingest a whole export: namespace listing first, then elements.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DuplicateFqn`] if two elements share an fqn.
    pub fn load(&mut self, input: &ModelInput) -> Result<(), ModelError> {
        self.load_namespaces(&input.namespaces);
        for def in &input.data_elements {
            self.load_element(def)?;
        }
        Ok(())
    }

    /// Register the explicit namespace listing.
    pub fn load_namespaces(&mut self, namespaces: &BTreeMap<String, NamespaceInput>) {
        for (name, ns) in namespaces {
            if !self.namespaces.contains(name) {
                self.reporter.report(&ModelEvent::NamespaceCreated {
                    name: name.clone(),
                    implicit: false,
                });
            }
            self.namespaces.describe(name, ns.description.clone());
        }
    }

    /// Copy one element definition into the store and link it to its
    /// namespace.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DuplicateFqn`] if the fqn is already stored. The
    /// stored element and namespace membership are left unchanged.
    pub fn load_element(&mut self, def: &ElementDef) -> Result<(), ModelError> {
        let element = self.elements.insert(Element::from_def(def.clone()))?;

        if !self.namespaces.contains(element.namespace()) {
            self.reporter.report(&ModelEvent::NamespaceCreated {
                name: element.namespace().to_owned(),
                implicit: true,
            });
        }
        let namespace = self.namespaces.add_element(element.namespace(), element.fqn());
        let page = namespace.claim_page(element.name());
        element.set_location(namespace.path(), page);

        self.reporter.report(&ModelEvent::ElementLoaded {
            fqn: element.fqn().to_owned(),
            namespace: element.namespace().to_owned(),
        });
        Ok(())
    }

    /// Hand over the populated stores.
    #[must_use]
    pub fn finish(self) -> (ElementStore, NamespaceRegistry) {
        (self.elements, self.namespaces)
    }
}

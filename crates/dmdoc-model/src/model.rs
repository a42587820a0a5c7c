//! Resolved model aggregate.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::element::Element;
use crate::error::ModelError;
use crate::loader::{ModelInput, ModelLoader, ProjectInfo};
use crate::namespace::{Namespace, NamespaceRegistry};
use crate::report::Reporter;
use crate::store::ElementStore;

/// Fully loaded and resolved data model.
///
/// Built by [`Model::load`], which runs loading and resolution to completion
/// before returning. The model has no mutating API afterwards, so it can be
/// shared freely across page-generation threads.
#[derive(Debug)]
pub struct Model {
    project: ProjectInfo,
    exported_at: DateTime<Utc>,
    elements: ElementStore,
    namespaces: NamespaceRegistry,
    children: HashMap<String, Vec<String>>,
}

impl Model {
    /// Load and resolve a model, stamping it with the current time.
    ///
    /// # Errors
    ///
    /// Returns the first [`ModelError`] raised by loading or resolution.
    pub fn load(input: &ModelInput, reporter: &dyn Reporter) -> Result<Self, ModelError> {
        Self::load_at(input, Utc::now(), reporter)
    }

    /// Load and resolve a model with an explicit export timestamp.
    pub fn load_at(
        input: &ModelInput,
        exported_at: DateTime<Utc>,
        reporter: &dyn Reporter,
    ) -> Result<Self, ModelError> {
        let mut loader = ModelLoader::new(reporter);
        loader.load(input)?;
        let (mut elements, namespaces) = loader.finish();
        elements.flatten(reporter)?;

        let mut children: HashMap<String, Vec<String>> = HashMap::new();
        for element in elements.list() {
            if let Some(parent) = element.parent_fqn() {
                children
                    .entry(parent.to_owned())
                    .or_default()
                    .push(element.fqn().to_owned());
            }
        }

        Ok(Self {
            project: input.project_info.clone(),
            exported_at,
            elements,
            namespaces,
            children,
        })
    }

    /// Parse JSON text and load it.
    pub fn from_json_str(json: &str, reporter: &dyn Reporter) -> Result<Self, ModelError> {
        Self::load(&ModelInput::from_json_str(json)?, reporter)
    }

    /// Project metadata.
    #[must_use]
    pub fn project(&self) -> &ProjectInfo {
        &self.project
    }

    /// Timestamp captured once for this run.
    #[must_use]
    pub fn exported_at(&self) -> DateTime<Utc> {
        self.exported_at
    }

    /// The resolved element store.
    #[must_use]
    pub fn elements(&self) -> &ElementStore {
        &self.elements
    }

    /// The namespace registry.
    #[must_use]
    pub fn namespaces(&self) -> &NamespaceRegistry {
        &self.namespaces
    }

    /// Look up an element by fqn.
    #[must_use]
    pub fn element(&self, fqn: &str) -> Option<&Element> {
        self.elements.get(fqn)
    }

    /// Look up a namespace by name.
    #[must_use]
    pub fn namespace(&self, name: &str) -> Option<&Namespace> {
        self.namespaces.get(name)
    }

    /// Members of a namespace sorted by display name, ties broken by fqn.
    ///
    /// Returns an empty list for an unknown namespace.
    #[must_use]
    pub fn namespace_elements(&self, name: &str) -> Vec<&Element> {
        let Some(namespace) = self.namespaces.get(name) else {
            return Vec::new();
        };

        let mut members: Vec<&Element> = namespace
            .members()
            .iter()
            .filter_map(|fqn| self.elements.get(fqn))
            .collect();
        members.sort_by_cached_key(|e| (e.display_name(), e.fqn().to_owned()));
        members
    }

    /// Direct sub-elements of `fqn`, in fqn order.
    #[must_use]
    pub fn children_of(&self, fqn: &str) -> Vec<&Element> {
        self.children
            .get(fqn)
            .into_iter()
            .flatten()
            .filter_map(|child| self.elements.get(child))
            .collect()
    }

    /// Element named by a field type reference.
    ///
    /// Tries the reference as an fqn first, then as a simple name inside
    /// `namespace`.
    #[must_use]
    pub fn resolve_type(&self, type_ref: &str, namespace: &str) -> Option<&Element> {
        self.elements.get(type_ref).or_else(|| {
            if type_ref.contains('.') {
                None
            } else {
                self.elements.get(&format!("{namespace}.{type_ref}"))
            }
        })
    }
}

//! Element store and hierarchy resolution.
//!
//! Elements are kept in a `BTreeMap` keyed by fqn, so [`ElementStore::list`]
//! always yields lexicographic fqn order regardless of input order.
//!
//! # Resolution
//!
//! [`ElementStore::flatten`] computes, for every element:
//!
//! - `hierarchy`: ancestor fqns, nearest parent first
//! - `merged_fields`: own and inherited fields, applied root to leaf
//!
//! A field re-declared by a more specific element replaces the inherited
//! definition in place: the entry keeps the position of the least specific
//! declaration and carries the most specific definition.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashSet};

use indexmap::IndexMap;
use indexmap::map::Entry as FieldEntry;

use crate::element::{Element, ResolvedField};
use crate::error::ModelError;
use crate::report::{ModelEvent, Reporter};

/// Data elements keyed by fully-qualified name.
#[derive(Debug, Default)]
pub struct ElementStore {
    elements: BTreeMap<String, Element>,
}

impl ElementStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an element under its fqn.
    ///
    /// The first definition of an fqn wins; a second one is rejected and the
    /// stored element is left untouched.
    pub fn insert(&mut self, element: Element) -> Result<&mut Element, ModelError> {
        match self.elements.entry(element.fqn().to_owned()) {
            Entry::Occupied(entry) => Err(ModelError::DuplicateFqn {
                fqn: entry.key().clone(),
            }),
            Entry::Vacant(entry) => Ok(entry.insert(element)),
        }
    }

    /// Look up an element by fqn.
    #[must_use]
    pub fn get(&self, fqn: &str) -> Option<&Element> {
        self.elements.get(fqn)
    }

    /// All elements in lexicographic fqn order.
    pub fn list(&self) -> impl ExactSizeIterator<Item = &Element> {
        self.elements.values()
    }

    /// Elements with at least one ancestor, in fqn order.
    ///
    /// Only meaningful after [`flatten`](Self::flatten).
    pub fn with_hierarchy(&self) -> impl Iterator<Item = &Element> {
        self.list().filter(|e| !e.hierarchy().is_empty())
    }

    /// Number of stored elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Resolve the hierarchy and merged field table of every element.
    ///
    /// Results are computed from each element's own fields, so calling this
    /// again yields the same state. On error no element is modified.
    ///
    /// # Errors
    ///
    /// - [`ModelError::UnresolvedParent`] if a parent fqn is not in the store
    /// - [`ModelError::CyclicHierarchy`] if a parent chain revisits an fqn
    pub fn flatten(&mut self, reporter: &dyn Reporter) -> Result<(), ModelError> {
        let mut resolved = Vec::with_capacity(self.elements.len());
        for element in self.elements.values() {
            let hierarchy = self.ancestors(element)?;
            let merged = self.merge_fields(element, &hierarchy);
            resolved.push((hierarchy, merged));
        }

        let mut with_parents = 0;
        for (element, (hierarchy, merged)) in self.elements.values_mut().zip(resolved) {
            if !hierarchy.is_empty() {
                with_parents += 1;
            }
            element.set_resolution(hierarchy, merged);
        }

        reporter.report(&ModelEvent::HierarchyResolved {
            elements: self.elements.len(),
            with_parents,
        });
        Ok(())
    }

    /// Walk the parent chain of `element`, nearest parent first.
    fn ancestors(&self, element: &Element) -> Result<Vec<String>, ModelError> {
        let mut path: Vec<&str> = vec![element.fqn()];
        let mut visited: HashSet<&str> = HashSet::from([element.fqn()]);
        let mut current = element;

        while let Some(parent_fqn) = current.parent_fqn() {
            if visited.contains(parent_fqn) {
                let start = path.iter().position(|f| *f == parent_fqn).unwrap_or(0);
                let mut cycle: Vec<String> = path[start..].iter().map(|f| (*f).to_owned()).collect();
                cycle.push(parent_fqn.to_owned());
                return Err(ModelError::CyclicHierarchy { cycle });
            }

            let parent = self
                .elements
                .get(parent_fqn)
                .ok_or_else(|| ModelError::UnresolvedParent {
                    fqn: current.fqn().to_owned(),
                    parent: parent_fqn.to_owned(),
                })?;

            visited.insert(parent.fqn());
            path.push(parent.fqn());
            current = parent;
        }

        Ok(path[1..].iter().map(|f| (*f).to_owned()).collect())
    }

    /// Merge own and inherited fields, applying declarations root to leaf.
    fn merge_fields(&self, element: &Element, hierarchy: &[String]) -> Vec<ResolvedField> {
        let lineage = hierarchy
            .iter()
            .rev()
            .filter_map(|fqn| self.elements.get(fqn))
            .chain(std::iter::once(element));

        let mut merged: IndexMap<&str, ResolvedField> = IndexMap::new();
        for declarer in lineage {
            let inherited = declarer.fqn() != element.fqn();
            for field in declarer.fields() {
                let mut entry = ResolvedField {
                    field: field.clone(),
                    declared_in: declarer.fqn().to_owned(),
                    overrides: None,
                    inherited,
                };
                match merged.entry(field.name.as_str()) {
                    FieldEntry::Occupied(mut slot) => {
                        let previous = slot.get();
                        entry.overrides = if previous.declared_in == entry.declared_in {
                            previous.overrides.clone()
                        } else {
                            Some(previous.declared_in.clone())
                        };
                        slot.insert(entry);
                    }
                    FieldEntry::Vacant(slot) => {
                        slot.insert(entry);
                    }
                }
            }
        }

        merged.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementDef, Field};
    use crate::report::{NullReporter, RecordingReporter};
    use pretty_assertions::assert_eq;

    fn element(fqn: &str, parent: Option<&str>, fields: &[&str]) -> Element {
        Element::from_def(ElementDef {
            fqn: fqn.to_owned(),
            name: None,
            namespace: fqn.rsplit_once('.').map_or("", |(ns, _)| ns).to_owned(),
            parent_fqn: parent.map(str::to_owned),
            fields: fields.iter().map(|name| Field::new(*name)).collect(),
            description: None,
        })
    }

    fn store(elements: Vec<Element>) -> ElementStore {
        let mut store = ElementStore::new();
        for e in elements {
            store.insert(e).unwrap();
        }
        store
    }

    fn field_names(element: &Element) -> Vec<&str> {
        element
            .merged_fields()
            .iter()
            .map(|f| f.field.name.as_str())
            .collect()
    }

    #[test]
    fn test_insert_rejects_duplicate_and_keeps_first() {
        let mut store = ElementStore::new();
        store.insert(element("onc.Tumor", None, &["size"])).unwrap();

        let err = store
            .insert(element("onc.Tumor", None, &["other"]))
            .unwrap_err();

        assert!(matches!(err, ModelError::DuplicateFqn { ref fqn } if fqn == "onc.Tumor"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("onc.Tumor").unwrap().fields()[0].name, "size");
    }

    #[test]
    fn test_root_element_has_empty_hierarchy() {
        let mut store = store(vec![element("onc.Tumor", None, &["size", "site"])]);
        store.flatten(&NullReporter).unwrap();

        let tumor = store.get("onc.Tumor").unwrap();
        assert!(tumor.hierarchy().is_empty());
        assert_eq!(field_names(tumor), ["size", "site"]);
        assert!(tumor.merged_fields().iter().all(|f| !f.inherited));
    }

    #[test]
    fn test_hierarchy_nearest_first() {
        let mut store = store(vec![
            element("a.Root", None, &[]),
            element("a.Mid", Some("a.Root"), &[]),
            element("a.Leaf", Some("a.Mid"), &[]),
        ]);
        store.flatten(&NullReporter).unwrap();

        assert_eq!(store.get("a.Leaf").unwrap().hierarchy(), ["a.Mid", "a.Root"]);
        assert_eq!(store.get("a.Mid").unwrap().hierarchy(), ["a.Root"]);
    }

    #[test]
    fn test_hierarchy_is_parent_plus_parent_hierarchy() {
        let mut store = store(vec![
            element("a.Root", None, &[]),
            element("a.Mid", Some("a.Root"), &[]),
            element("a.Leaf", Some("a.Mid"), &[]),
            element("a.Other", Some("a.Root"), &[]),
        ]);
        store.flatten(&NullReporter).unwrap();

        for e in store.list() {
            if let Some(parent_fqn) = e.parent_fqn() {
                let parent = store.get(parent_fqn).unwrap();
                let mut expected = vec![parent_fqn.to_owned()];
                expected.extend(parent.hierarchy().iter().cloned());
                assert_eq!(e.hierarchy(), expected.as_slice());
            }
        }
    }

    #[test]
    fn test_inherited_fields_come_first() {
        let mut store = store(vec![
            element("onc.Tumor", None, &["size"]),
            element("onc.MalignantTumor", Some("onc.Tumor"), &["grade"]),
        ]);
        store.flatten(&NullReporter).unwrap();

        let malignant = store.get("onc.MalignantTumor").unwrap();
        assert_eq!(field_names(malignant), ["size", "grade"]);

        let size = malignant.merged_field("size").unwrap();
        assert!(size.inherited);
        assert_eq!(size.declared_in, "onc.Tumor");

        let grade = malignant.merged_field("grade").unwrap();
        assert!(!grade.inherited);
        assert_eq!(grade.declared_in, "onc.MalignantTumor");
    }

    #[test]
    fn test_shadowed_field_keeps_ancestor_position() {
        let root = element("a.Root", None, &["id", "status", "note"]);
        // Re-declare "status" with a type so the winning definition is visible.
        let leaf = Element::from_def(ElementDef {
            fqn: "a.Leaf".to_owned(),
            name: None,
            namespace: "a".to_owned(),
            parent_fqn: Some("a.Root".to_owned()),
            fields: vec![Field::new("extra"), Field::new("status").with_type("a.Code")],
            description: None,
        });
        let mut store = store(vec![root, leaf]);
        store.flatten(&NullReporter).unwrap();

        let leaf = store.get("a.Leaf").unwrap();
        assert_eq!(field_names(leaf), ["id", "status", "note", "extra"]);

        let status = leaf.merged_field("status").unwrap();
        assert_eq!(status.field.type_ref.as_deref(), Some("a.Code"));
        assert_eq!(status.declared_in, "a.Leaf");
        assert_eq!(status.overrides.as_deref(), Some("a.Root"));
        assert!(!status.inherited);
        assert_eq!(
            leaf.merged_fields()
                .iter()
                .filter(|f| f.field.name == "status")
                .count(),
            1
        );
    }

    #[test]
    fn test_shadowing_across_three_levels() {
        let mut store = store(vec![
            element("a.Root", None, &["value"]),
            element("a.Mid", Some("a.Root"), &["value"]),
            element("a.Leaf", Some("a.Mid"), &[]),
        ]);
        store.flatten(&NullReporter).unwrap();

        let leaf = store.get("a.Leaf").unwrap();
        let value = leaf.merged_field("value").unwrap();
        assert_eq!(value.declared_in, "a.Mid");
        assert_eq!(value.overrides.as_deref(), Some("a.Root"));
        assert!(value.inherited);
    }

    #[test]
    fn test_flatten_is_idempotent() {
        let mut store = store(vec![
            element("a.Root", None, &["id", "status"]),
            element("a.Mid", Some("a.Root"), &["status", "code"]),
            element("a.Leaf", Some("a.Mid"), &["extra"]),
        ]);
        store.flatten(&NullReporter).unwrap();
        let first: Vec<Element> = store.list().cloned().collect();

        store.flatten(&NullReporter).unwrap();
        let second: Vec<Element> = store.list().cloned().collect();

        assert_eq!(first, second);
        assert_eq!(field_names(store.get("a.Leaf").unwrap()), ["id", "status", "code", "extra"]);
    }

    #[test]
    fn test_two_element_cycle() {
        let mut store = store(vec![
            element("a.X", Some("a.Y"), &[]),
            element("a.Y", Some("a.X"), &[]),
        ]);
        let err = store.flatten(&NullReporter).unwrap_err();

        match err {
            ModelError::CyclicHierarchy { cycle } => {
                assert_eq!(cycle, ["a.X", "a.Y", "a.X"]);
            }
            other => panic!("expected cycle error, got {other:?}"),
        }
    }

    #[test]
    fn test_self_parent_is_cycle() {
        let mut store = store(vec![element("a.X", Some("a.X"), &[])]);
        let err = store.flatten(&NullReporter).unwrap_err();
        assert!(matches!(err, ModelError::CyclicHierarchy { ref cycle } if cycle == &["a.X", "a.X"]));
    }

    #[test]
    fn test_cycle_above_element_is_reported() {
        // a.A -> a.B -> a.C -> a.B: a.A is not on the loop itself.
        let mut store = store(vec![
            element("a.A", Some("a.B"), &[]),
            element("a.B", Some("a.C"), &[]),
            element("a.C", Some("a.B"), &[]),
        ]);
        let err = store.flatten(&NullReporter).unwrap_err();
        assert!(matches!(err, ModelError::CyclicHierarchy { ref cycle } if cycle == &["a.B", "a.C", "a.B"]));
    }

    #[test]
    fn test_dangling_parent() {
        let mut store = store(vec![
            element("a.Root", None, &[]),
            element("a.Leaf", Some("a.Missing"), &[]),
        ]);
        let err = store.flatten(&NullReporter).unwrap_err();

        match err {
            ModelError::UnresolvedParent { fqn, parent } => {
                assert_eq!(fqn, "a.Leaf");
                assert_eq!(parent, "a.Missing");
            }
            other => panic!("expected unresolved parent, got {other:?}"),
        }
    }

    #[test]
    fn test_dangling_grandparent_names_declaring_element() {
        let mut store = store(vec![
            element("a.Mid", Some("a.Gone"), &[]),
            element("a.Leaf", Some("a.Mid"), &[]),
        ]);
        let err = store.flatten(&NullReporter).unwrap_err();
        assert!(matches!(err, ModelError::UnresolvedParent { ref fqn, .. } if fqn == "a.Mid"));
    }

    #[test]
    fn test_failed_flatten_leaves_state_untouched() {
        let mut store = store(vec![
            element("a.Root", None, &["id"]),
            element("a.Leaf", Some("a.Root"), &[]),
        ]);
        store.flatten(&NullReporter).unwrap();
        store.insert(element("a.Zed", Some("a.Nowhere"), &[])).unwrap();

        assert!(store.flatten(&NullReporter).is_err());
        assert_eq!(store.get("a.Leaf").unwrap().hierarchy(), ["a.Root"]);
        assert!(store.get("a.Zed").unwrap().hierarchy().is_empty());
    }

    #[test]
    fn test_list_is_fqn_ordered() {
        let store = store(vec![
            element("b.Second", None, &[]),
            element("a.First", None, &[]),
            element("c.Third", None, &[]),
        ]);
        let fqns: Vec<&str> = store.list().map(Element::fqn).collect();
        assert_eq!(fqns, ["a.First", "b.Second", "c.Third"]);
    }

    #[test]
    fn test_with_hierarchy_filters_roots() {
        let mut store = store(vec![
            element("a.Root", None, &[]),
            element("a.Leaf", Some("a.Root"), &[]),
            element("a.Loner", None, &[]),
        ]);
        store.flatten(&NullReporter).unwrap();

        let fqns: Vec<&str> = store.with_hierarchy().map(Element::fqn).collect();
        assert_eq!(fqns, ["a.Leaf"]);
    }

    #[test]
    fn test_flatten_reports_counts() {
        let mut store = store(vec![
            element("a.Root", None, &[]),
            element("a.Leaf", Some("a.Root"), &[]),
        ]);
        let reporter = RecordingReporter::new();
        store.flatten(&reporter).unwrap();

        assert_eq!(
            reporter.events(),
            [ModelEvent::HierarchyResolved {
                elements: 2,
                with_parents: 1
            }]
        );
    }
}

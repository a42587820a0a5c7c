//! Namespace registry.
//!
//! Namespaces are created on first reference, either from the explicit
//! namespace listing of a model export or from an element naming a
//! namespace that was never listed. Both ingestion passes go through
//! [`NamespaceRegistry::get_or_create`], so their relative order does not
//! matter.
//!
//! Output locations are unique: the registry never hands the same directory
//! to two namespaces, and each namespace never hands the same page file to
//! two elements. Comparison is case-insensitive so the site also survives
//! case-insensitive filesystems.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

/// A named group of elements mapped to an output directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Namespace {
    name: String,
    description: String,
    path: String,
    members: Vec<String>,
    /// Lowercased page stems already assigned, including the namespace's own
    /// `index`.
    #[serde(skip)]
    pages: BTreeSet<String>,
}

impl Namespace {
    fn new(name: &str, path: String) -> Self {
        Self {
            name: name.to_owned(),
            description: String::new(),
            path,
            members: Vec::new(),
            pages: BTreeSet::from(["index".to_owned()]),
        }
    }

    /// Namespace name (e.g., "shr.core").
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable description. Empty when the export did not list it.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Output directory, relative to the site root (e.g., "shr/core").
    ///
    /// Usually [`namespace_path`] of the name. When another namespace already
    /// maps there, a `-2`, `-3`, ... suffix is added.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Fqns of member elements, in ingestion order.
    #[must_use]
    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub(crate) fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub(crate) fn push_member(&mut self, fqn: &str) {
        self.members.push(fqn.to_owned());
    }

    /// Reserve a page file name for an element called `name`.
    ///
    /// The name is reduced to `[A-Za-z0-9_-]`. `index` and names already
    /// taken get a numeric suffix.
    pub(crate) fn claim_page(&mut self, name: &str) -> String {
        let stem = first_free(&safe_segment(name), &self.pages);
        self.pages.insert(stem.to_lowercase());
        format!("{stem}.html")
    }
}

/// Replace every character outside `[A-Za-z0-9_-]` with `_`.
pub(crate) fn safe_segment(segment: &str) -> String {
    segment
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// `base`, or `base-N` for the smallest `N >= 2` not in `taken`.
///
/// `taken` holds lowercased entries.
fn first_free(base: &str, taken: &BTreeSet<String>) -> String {
    let mut candidate = base.to_owned();
    let mut n = 1;
    while taken.contains(&candidate.to_lowercase()) {
        n += 1;
        candidate = format!("{base}-{n}");
    }
    candidate
}

/// Map a namespace name to a filesystem-safe relative path.
///
/// Dots become path separators and any character outside `[A-Za-z0-9_-]`
/// becomes `_`. Empty segments (from leading, trailing or doubled dots) are
/// dropped; a name with no usable segment maps to `_`.
#[must_use]
pub fn namespace_path(name: &str) -> String {
    let segments: Vec<String> = name
        .split('.')
        .filter(|s| !s.is_empty())
        .map(safe_segment)
        .collect();

    if segments.is_empty() {
        "_".to_owned()
    } else {
        segments.join("/")
    }
}

/// All namespaces of a model, keyed and ordered by name.
#[derive(Debug, Default)]
pub struct NamespaceRegistry {
    namespaces: BTreeMap<String, Namespace>,
    /// Lowercased output paths already assigned.
    paths: BTreeSet<String>,
}

impl NamespaceRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the namespace called `name`, registering it first if needed.
    pub fn get_or_create(&mut self, name: &str) -> &mut Namespace {
        match self.namespaces.entry(name.to_owned()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let path = first_free(&namespace_path(name), &self.paths);
                self.paths.insert(path.to_lowercase());
                entry.insert(Namespace::new(name, path))
            }
        }
    }

    /// Look up a namespace without creating it.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Namespace> {
        self.namespaces.get(name)
    }

    /// Whether a namespace has been registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.namespaces.contains_key(name)
    }

    /// Set the description of a namespace, creating it if needed.
    pub fn describe(&mut self, name: &str, description: impl Into<String>) {
        self.get_or_create(name).set_description(description);
    }

    /// Append an element to a namespace's member list, creating the
    /// namespace if needed. Returns the namespace so the caller can claim a
    /// page in it.
    pub fn add_element(&mut self, namespace: &str, fqn: &str) -> &mut Namespace {
        let ns = self.get_or_create(namespace);
        ns.push_member(fqn);
        ns
    }

    /// All namespaces in lexicographic name order.
    pub fn list(&self) -> impl ExactSizeIterator<Item = &Namespace> {
        self.namespaces.values()
    }

    /// Number of registered namespaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.namespaces.len()
    }

    /// Whether no namespace has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }
}

//! Data element types.
//!
//! [`ElementDef`] is the element as it appears in the model export.
//! [`Element`] is the stored form: the definition plus the values computed
//! by the loader (`namespace_path`, `page_name`) and by resolution (`hierarchy`,
//! `merged_fields`).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::namespace::safe_segment;

/// Data element definition as read from the model export.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementDef {
    /// Fully-qualified name (e.g., "onc.MalignantTumor").
    pub fqn: String,
    /// Simple name. Derived from the fqn when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Declaring namespace name.
    pub namespace: String,
    /// Fqn of the element this one extends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_fqn: Option<String>,
    /// Own fields, in declaration order.
    #[serde(default)]
    pub fields: Vec<Field>,
    /// Free-text description (Markdown).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A field or constraint declared on an element.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Field name, unique within the merged table of an element.
    pub name: String,
    /// Type reference: an element fqn or a primitive name.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_ref: Option<String>,
    /// Cardinality.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<Cardinality>,
    /// Constraints applied to the field value.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<Constraint>,
    /// Free-text description (Markdown).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Field {
    /// Create a field with only a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_ref: None,
            card: None,
            constraints: Vec::new(),
            description: None,
        }
    }

    /// Set the type reference.
    #[must_use]
    pub fn with_type(mut self, type_ref: impl Into<String>) -> Self {
        self.type_ref = Some(type_ref.into());
        self
    }

    /// Set the cardinality.
    #[must_use]
    pub fn with_card(mut self, min: u32, max: Option<u32>) -> Self {
        self.card = Some(Cardinality { min, max });
        self
    }
}

/// Field cardinality. `max == None` means unbounded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cardinality {
    /// Minimum occurrences.
    #[serde(default)]
    pub min: u32,
    /// Maximum occurrences.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "{}..{max}", self.min),
            None => write!(f, "{}..*", self.min),
        }
    }
}

/// A constraint on a field value (value set binding, fixed value, ...).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    /// Constraint kind.
    #[serde(rename = "type")]
    pub kind: String,
    /// Constraint payload, kept as raw JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    /// Free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            None | Some(serde_json::Value::Null) => f.write_str(&self.kind),
            Some(serde_json::Value::String(s)) => write!(f, "{}: {s}", self.kind),
            Some(value) => write!(f, "{}: {value}", self.kind),
        }
    }
}

/// Entry of an element's merged field table.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedField {
    /// The most specific definition of the field.
    pub field: Field,
    /// Fqn of the element that supplied `field`.
    pub declared_in: String,
    /// Fqn of the less specific element whose definition was shadowed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overrides: Option<String>,
    /// True when `declared_in` is an ancestor rather than the element itself.
    pub inherited: bool,
}

/// A stored data element.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    fqn: String,
    name: String,
    namespace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent_fqn: Option<String>,
    fields: Vec<Field>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    hierarchy: Vec<String>,
    namespace_path: String,
    page_name: String,
    merged_fields: Vec<ResolvedField>,
}

impl Element {
    /// Build an unresolved element from its definition.
    ///
    /// The definition is consumed; callers holding borrowed input clone it
    /// first so the element never aliases caller-owned data.
    #[must_use]
    pub fn from_def(def: ElementDef) -> Self {
        let name = def
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| simple_name(&def.fqn).to_owned());
        let merged_fields = own_table(&def.fqn, &def.fields);
        let page_name = format!("{}.html", safe_segment(&name));

        Self {
            fqn: def.fqn,
            name,
            namespace: def.namespace,
            parent_fqn: def.parent_fqn.filter(|p| !p.is_empty()),
            fields: def.fields,
            description: def.description,
            hierarchy: Vec::new(),
            namespace_path: String::new(),
            page_name,
            merged_fields,
        }
    }

    /// Fully-qualified name.
    #[must_use]
    pub fn fqn(&self) -> &str {
        &self.fqn
    }

    /// Simple name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable label derived from the simple name.
    #[must_use]
    pub fn display_name(&self) -> String {
        display_name(&self.name)
    }

    /// Declaring namespace name.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Fqn of the extended element, if any.
    #[must_use]
    pub fn parent_fqn(&self) -> Option<&str> {
        self.parent_fqn.as_deref()
    }

    /// Own fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Free-text description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Ancestor fqns, nearest parent first. Empty for root elements.
    #[must_use]
    pub fn hierarchy(&self) -> &[String] {
        &self.hierarchy
    }

    /// Output directory assigned by the owning namespace.
    #[must_use]
    pub fn namespace_path(&self) -> &str {
        &self.namespace_path
    }

    /// Own and inherited fields, most specific definition wins.
    #[must_use]
    pub fn merged_fields(&self) -> &[ResolvedField] {
        &self.merged_fields
    }

    /// Look up a merged field by name.
    #[must_use]
    pub fn merged_field(&self, name: &str) -> Option<&ResolvedField> {
        self.merged_fields.iter().find(|f| f.field.name == name)
    }

    /// File name of this element's page inside its namespace directory.
    ///
    /// The simple name restricted to `[A-Za-z0-9_-]`. Once loaded, the owning
    /// namespace guarantees no other element or the namespace index shares
    /// it.
    #[must_use]
    pub fn page_name(&self) -> &str {
        &self.page_name
    }

    pub(crate) fn set_location(&mut self, path: &str, page_name: String) {
        path.clone_into(&mut self.namespace_path);
        self.page_name = page_name;
    }

    pub(crate) fn set_resolution(&mut self, hierarchy: Vec<String>, merged: Vec<ResolvedField>) {
        self.hierarchy = hierarchy;
        self.merged_fields = merged;
    }
}

/// Merged table of an element with no ancestors.
fn own_table(fqn: &str, fields: &[Field]) -> Vec<ResolvedField> {
    fields
        .iter()
        .map(|field| ResolvedField {
            field: field.clone(),
            declared_in: fqn.to_owned(),
            overrides: None,
            inherited: false,
        })
        .collect()
}

/// Last `.`-separated segment of an fqn.
fn simple_name(fqn: &str) -> &str {
    fqn.rsplit('.').next().unwrap_or(fqn)
}

/// Turn an identifier into a display label.
///
/// CamelCase boundaries become spaces and acronyms stay together:
/// `MalignantTumor` → `Malignant Tumor`, `HTTPServer` → `HTTP Server`.
/// Underscores are treated as word separators.
#[must_use]
pub fn display_name(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut label = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' {
            if !label.is_empty() && !label.ends_with(' ') {
                label.push(' ');
            }
            continue;
        }
        if i > 0 && c.is_uppercase() && !label.ends_with(' ') {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower)
            {
                label.push(' ');
            }
        }
        label.push(c);
    }

    label.trim_end().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn def(fqn: &str) -> ElementDef {
        ElementDef {
            fqn: fqn.to_owned(),
            name: None,
            namespace: "onc".to_owned(),
            parent_fqn: None,
            fields: vec![Field::new("size")],
            description: None,
        }
    }

    #[test]
    fn test_name_derived_from_fqn() {
        let element = Element::from_def(def("onc.MalignantTumor"));
        assert_eq!(element.name(), "MalignantTumor");
        assert_eq!(element.page_name(), "MalignantTumor.html");
    }

    #[test]
    fn test_page_name_drops_path_characters() {
        let mut d = def("onc.Escaped");
        d.name = Some("../../escaped".to_owned());
        let element = Element::from_def(d);
        assert_eq!(element.name(), "../../escaped");
        assert_eq!(element.page_name(), "______escaped.html");
    }

    #[test]
    fn test_explicit_name_kept() {
        let mut d = def("onc.MalignantTumor");
        d.name = Some("Malignant".to_owned());
        let element = Element::from_def(d);
        assert_eq!(element.name(), "Malignant");
    }

    #[test]
    fn test_empty_parent_treated_as_root() {
        let mut d = def("onc.Tumor");
        d.parent_fqn = Some(String::new());
        let element = Element::from_def(d);
        assert_eq!(element.parent_fqn(), None);
    }

    #[test]
    fn test_unresolved_element_merged_equals_own() {
        let element = Element::from_def(def("onc.Tumor"));
        assert!(element.hierarchy().is_empty());
        assert_eq!(element.merged_fields().len(), 1);
        let size = element.merged_field("size").unwrap();
        assert_eq!(size.declared_in, "onc.Tumor");
        assert!(!size.inherited);
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = serde_json::json!({
            "fqn": "onc.MalignantTumor",
            "namespace": "onc",
            "parentFqn": "onc.Tumor",
            "fields": [
                { "name": "grade", "type": "onc.Grade", "card": { "min": 0, "max": 1 } }
            ]
        });
        let d: ElementDef = serde_json::from_value(json).unwrap();
        assert_eq!(d.parent_fqn.as_deref(), Some("onc.Tumor"));
        assert_eq!(d.fields[0].type_ref.as_deref(), Some("onc.Grade"));
        assert_eq!(d.fields[0].card, Some(Cardinality { min: 0, max: Some(1) }));
    }

    #[test]
    fn test_cardinality_display() {
        assert_eq!(Cardinality { min: 0, max: Some(1) }.to_string(), "0..1");
        assert_eq!(Cardinality { min: 1, max: None }.to_string(), "1..*");
    }

    #[test]
    fn test_constraint_display() {
        let fixed = Constraint {
            kind: "fixedValue".to_owned(),
            value: Some(serde_json::json!("active")),
            description: None,
        };
        assert_eq!(fixed.to_string(), "fixedValue: active");

        let bare = Constraint {
            kind: "mustSupport".to_owned(),
            value: None,
            description: None,
        };
        assert_eq!(bare.to_string(), "mustSupport");

        let numeric = Constraint {
            kind: "maxLength".to_owned(),
            value: Some(serde_json::json!(42)),
            description: None,
        };
        assert_eq!(numeric.to_string(), "maxLength: 42");
    }

    #[test]
    fn test_display_name_camel_case() {
        assert_eq!(display_name("MalignantTumor"), "Malignant Tumor");
        assert_eq!(display_name("Tumor"), "Tumor");
    }

    #[test]
    fn test_display_name_keeps_acronyms() {
        assert_eq!(display_name("HTTPServer"), "HTTP Server");
        assert_eq!(display_name("TNMStage"), "TNM Stage");
        assert_eq!(display_name("BodySiteV2"), "Body Site V2");
    }

    #[test]
    fn test_display_name_underscores() {
        assert_eq!(display_name("body_site"), "body site");
        assert_eq!(display_name("Body__Site_"), "Body Site");
    }
}

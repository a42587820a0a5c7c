//! Template contexts for each kind of page.
//!
//! Every context is computed from the frozen model and the path of the page
//! being rendered, so links come out relative to that page.

use dmdoc_model::{Element, Model, Namespace, ResolvedField};
use dmdoc_renderer::{MarkdownRenderer, escape_html, relative_path};
use serde::Serialize;

pub(crate) const INDEX_PAGE: &str = "index.html";
pub(crate) const ALL_ELEMENTS_PAGE: &str = "all-elements.html";
pub(crate) const HIERARCHY_PAGE: &str = "hierarchy.html";
pub(crate) const STYLESHEET: &str = "dmdoc.css";
pub(crate) const MODEL_DUMP: &str = "model.json";

/// Output path of a namespace page.
pub(crate) fn namespace_page(namespace: &Namespace) -> String {
    format!("{}/{INDEX_PAGE}", namespace.path())
}

/// Output path of an element page.
pub(crate) fn element_page(element: &Element) -> String {
    format!("{}/{}", element.namespace_path(), element.page_name())
}

/// Attribute-ready relative URL from page `from` to page `to`.
fn href(from: &str, to: &str) -> String {
    escape_html(&relative_path(from, to))
}

/// Shared state for building page contexts.
pub(crate) struct PageContext<'a> {
    pub model: &'a Model,
    pub markdown: MarkdownRenderer,
    pub site_title: &'a str,
    pub generated: String,
}

/// A hyperlink. `href` is `None` for the current page.
///
/// `href` is already HTML-escaped; templates emit it with `|safe`.
#[derive(Debug, Serialize)]
pub(crate) struct Link {
    label: String,
    href: Option<String>,
    title: Option<String>,
}

impl Link {
    fn current(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: None,
            title: None,
        }
    }
}

/// Header, navigation and footer data shared by every page.
#[derive(Debug, Serialize)]
pub(crate) struct Chrome {
    title: String,
    site_title: String,
    css: String,
    home: String,
    all_elements: String,
    hierarchy: String,
    generated: String,
    breadcrumbs: Vec<Link>,
}

#[derive(Debug, Serialize)]
pub(crate) struct IndexPage {
    page: Chrome,
    project_name: String,
    version: String,
    description: String,
    element_count: usize,
    namespaces: Vec<NamespaceRow>,
}

#[derive(Debug, Serialize)]
struct NamespaceRow {
    link: Link,
    summary: String,
    elements: usize,
}

#[derive(Debug, Serialize)]
pub(crate) struct ElementListPage {
    page: Chrome,
    elements: Vec<ElementRow>,
}

#[derive(Debug, Serialize)]
struct ElementRow {
    link: Link,
    fqn: String,
    namespace: Link,
    summary: String,
    parent: Option<Link>,
}

#[derive(Debug, Serialize)]
pub(crate) struct HierarchyPage {
    page: Chrome,
    rows: Vec<HierarchyRow>,
}

#[derive(Debug, Serialize)]
struct HierarchyRow {
    link: Link,
    fqn: String,
    /// Root first, nearest parent last.
    ancestors: Vec<Link>,
}

#[derive(Debug, Serialize)]
pub(crate) struct NamespacePage {
    page: Chrome,
    name: String,
    description: String,
    elements: Vec<ElementRow>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ElementPage {
    page: Chrome,
    label: String,
    fqn: String,
    namespace: Link,
    description: String,
    ancestors: Vec<Link>,
    fields: Vec<FieldRow>,
    children: Vec<Link>,
}

#[derive(Debug, Serialize)]
struct FieldRow {
    name: String,
    type_link: Option<Link>,
    card: Option<String>,
    constraints: Vec<String>,
    description: String,
    inherited_from: Option<Link>,
    overrides: Option<Link>,
}

impl PageContext<'_> {
    fn chrome(&self, from: &str, title: impl Into<String>, breadcrumbs: Vec<Link>) -> Chrome {
        Chrome {
            title: title.into(),
            site_title: self.site_title.to_owned(),
            css: href(from, STYLESHEET),
            home: href(from, INDEX_PAGE),
            all_elements: href(from, ALL_ELEMENTS_PAGE),
            hierarchy: href(from, HIERARCHY_PAGE),
            generated: self.generated.clone(),
            breadcrumbs,
        }
    }

    fn home_crumb(&self, from: &str) -> Link {
        Link {
            label: self.site_title.to_owned(),
            href: Some(href(from, INDEX_PAGE)),
            title: None,
        }
    }

    fn element_link(&self, from: &str, element: &Element) -> Link {
        Link {
            label: element.display_name(),
            href: Some(href(from, &element_page(element))),
            title: Some(element.fqn().to_owned()),
        }
    }

    /// Link to `fqn`, or plain text when the element is not in the model.
    fn fqn_link(&self, from: &str, fqn: &str) -> Link {
        match self.model.element(fqn) {
            Some(element) => self.element_link(from, element),
            None => Link::current(fqn),
        }
    }

    fn namespace_link(&self, from: &str, name: &str) -> Link {
        match self.model.namespace(name) {
            Some(namespace) => Link {
                label: namespace.name().to_owned(),
                href: Some(href(from, &namespace_page(namespace))),
                title: None,
            },
            None => Link::current(name),
        }
    }

    fn render_description(&self, text: Option<&str>) -> String {
        text.map(|t| self.markdown.render(t)).unwrap_or_default()
    }

    fn summary(&self, text: Option<&str>) -> String {
        text.map(|t| self.markdown.summary(t)).unwrap_or_default()
    }

    fn element_row(&self, from: &str, element: &Element) -> ElementRow {
        ElementRow {
            link: self.element_link(from, element),
            fqn: element.fqn().to_owned(),
            namespace: self.namespace_link(from, element.namespace()),
            summary: self.summary(element.description()),
            parent: element.parent_fqn().map(|p| self.fqn_link(from, p)),
        }
    }

    /// Ancestor links, root first.
    fn ancestor_links(&self, from: &str, element: &Element) -> Vec<Link> {
        element
            .hierarchy()
            .iter()
            .rev()
            .map(|fqn| self.fqn_link(from, fqn))
            .collect()
    }

    pub fn index_page(&self) -> IndexPage {
        let from = INDEX_PAGE;
        let project = self.model.project();
        let namespaces = self
            .model
            .namespaces()
            .list()
            .map(|ns| NamespaceRow {
                link: self.namespace_link(from, ns.name()),
                summary: self.summary(Some(ns.description())),
                elements: ns.members().len(),
            })
            .collect();

        IndexPage {
            page: self.chrome(from, "Overview", Vec::new()),
            project_name: project.name.clone(),
            version: project.version.clone(),
            description: self.render_description(project.description.as_deref()),
            element_count: self.model.elements().len(),
            namespaces,
        }
    }

    pub fn all_elements_page(&self) -> ElementListPage {
        let from = ALL_ELEMENTS_PAGE;
        ElementListPage {
            page: self.chrome(
                from,
                "All elements",
                vec![self.home_crumb(from), Link::current("All elements")],
            ),
            elements: self
                .model
                .elements()
                .list()
                .map(|e| self.element_row(from, e))
                .collect(),
        }
    }

    pub fn hierarchy_page(&self) -> HierarchyPage {
        let from = HIERARCHY_PAGE;
        HierarchyPage {
            page: self.chrome(
                from,
                "Hierarchy",
                vec![self.home_crumb(from), Link::current("Hierarchy")],
            ),
            rows: self
                .model
                .elements()
                .with_hierarchy()
                .map(|e| HierarchyRow {
                    link: self.element_link(from, e),
                    fqn: e.fqn().to_owned(),
                    ancestors: self.ancestor_links(from, e),
                })
                .collect(),
        }
    }

    pub fn namespace_page(&self, namespace: &Namespace) -> NamespacePage {
        let path = namespace_page(namespace);
        let from = path.as_str();
        NamespacePage {
            page: self.chrome(
                from,
                namespace.name(),
                vec![self.home_crumb(from), Link::current(namespace.name())],
            ),
            name: namespace.name().to_owned(),
            description: self.render_description(Some(namespace.description())),
            elements: self
                .model
                .namespace_elements(namespace.name())
                .into_iter()
                .map(|e| self.element_row(from, e))
                .collect(),
        }
    }

    pub fn element_page(&self, element: &Element) -> ElementPage {
        let path = element_page(element);
        let from = path.as_str();
        let label = element.display_name();

        ElementPage {
            page: self.chrome(
                from,
                label.clone(),
                vec![
                    self.home_crumb(from),
                    self.namespace_link(from, element.namespace()),
                    Link::current(label.clone()),
                ],
            ),
            label,
            fqn: element.fqn().to_owned(),
            namespace: self.namespace_link(from, element.namespace()),
            description: self.render_description(element.description()),
            ancestors: self.ancestor_links(from, element),
            fields: element
                .merged_fields()
                .iter()
                .map(|f| self.field_row(from, element, f))
                .collect(),
            children: self
                .model
                .children_of(element.fqn())
                .into_iter()
                .map(|c| self.element_link(from, c))
                .collect(),
        }
    }

    fn field_row(&self, from: &str, owner: &Element, resolved: &ResolvedField) -> FieldRow {
        let field = &resolved.field;
        let type_link = field.type_ref.as_deref().map(|type_ref| {
            match self.model.resolve_type(type_ref, owner.namespace()) {
                Some(target) => Link {
                    label: target.name().to_owned(),
                    href: Some(href(from, &element_page(target))),
                    title: Some(target.fqn().to_owned()),
                },
                None => Link::current(type_ref),
            }
        });

        FieldRow {
            name: field.name.clone(),
            type_link,
            card: field.card.map(|c| c.to_string()),
            constraints: field.constraints.iter().map(ToString::to_string).collect(),
            description: self.render_description(field.description.as_deref()),
            inherited_from: resolved
                .inherited
                .then(|| self.fqn_link(from, &resolved.declared_in)),
            overrides: resolved
                .overrides
                .as_deref()
                .map(|fqn| self.fqn_link(from, fqn)),
        }
    }
}

//! Static site generation for dmdoc.
//!
//! [`SiteBuilder`] reads a frozen [`dmdoc_model::Model`] and writes a
//! self-contained HTML site:
//!
//! ```text
//! index.html               project overview and namespace list
//! all-elements.html        every element
//! hierarchy.html           elements with their ancestor chains
//! <namespace>/index.html   namespace page
//! <namespace>/<Page>.html  element page (name sanitised, unique per namespace)
//! dmdoc.css
//! model.json               resolved model dump
//! ```
//!
//! Every link is relative, so the site can be browsed straight from disk.

mod builder;
mod pages;
mod templates;

pub use builder::{BuildConfig, BuildError, BuildReport, SiteBuilder};

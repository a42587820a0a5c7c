//! Description rendering for dmdoc.
//!
//! Element, namespace and project descriptions in a model export are
//! Markdown. [`MarkdownRenderer`] turns them into HTML fragments for pages
//! and into one-line summaries for listing tables.
//!
//! # Quick Start
//!
//! ```
//! use dmdoc_renderer::MarkdownRenderer;
//!
//! let renderer = MarkdownRenderer::new();
//! assert_eq!(renderer.render("A *solid* mass."), "<p>A <em>solid</em> mass.</p>\n");
//! assert_eq!(renderer.summary("First.\n\nSecond."), "First.");
//! ```

mod markdown;
mod util;

pub use markdown::MarkdownRenderer;
pub use util::{escape_html, relative_path};

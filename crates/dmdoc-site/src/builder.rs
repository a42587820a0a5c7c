//! Static site builder.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use dmdoc_model::{Element, Model, Namespace, ProjectInfo};
use dmdoc_renderer::MarkdownRenderer;
use minijinja::Environment;
use rayon::prelude::*;
use serde::Serialize;

use crate::pages::{
    ALL_ELEMENTS_PAGE, HIERARCHY_PAGE, INDEX_PAGE, MODEL_DUMP, PageContext, STYLESHEET,
    element_page, namespace_page,
};
use crate::templates;

/// Configuration for static site building.
#[derive(Clone, Debug)]
pub struct BuildConfig {
    /// Title shown in page headers. Defaults to the project name.
    pub title: Option<String>,
    /// Render descriptions as Markdown.
    pub markdown: bool,
    /// Render element pages on the rayon thread pool.
    pub parallel: bool,
    /// Remove the output directory before writing.
    pub clean: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            title: None,
            markdown: true,
            parallel: true,
            clean: false,
        }
    }
}

/// Summary of a completed build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildReport {
    /// Directory the site was written to.
    pub output_dir: PathBuf,
    /// Files written, including the stylesheet and model dump.
    pub pages: usize,
    /// Element pages among `pages`.
    pub elements: usize,
    /// Namespace pages among `pages`.
    pub namespaces: usize,
}

/// Error returned by the static site builder.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
    #[error("Model serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Resolved model as written to `model.json`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ModelDump<'a> {
    project_info: &'a ProjectInfo,
    exported_at: DateTime<Utc>,
    namespaces: Vec<&'a Namespace>,
    data_elements: Vec<&'a Element>,
}

/// Builds a static documentation site from a resolved model.
pub struct SiteBuilder<'a> {
    model: &'a Model,
    config: BuildConfig,
    env: Environment<'static>,
}

impl<'a> SiteBuilder<'a> {
    /// Create a builder for `model`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Template`] if an embedded template fails to
    /// parse.
    pub fn new(model: &'a Model, config: BuildConfig) -> Result<Self, BuildError> {
        Ok(Self {
            model,
            config,
            env: templates::environment()?,
        })
    }

    /// Write the site into `output_dir`.
    ///
    /// # Errors
    ///
    /// Returns the first I/O, template or serialization error. Pages already
    /// written are left in place.
    pub fn build(&self, output_dir: &Path) -> Result<BuildReport, BuildError> {
        if self.config.clean && output_dir.exists() {
            tracing::debug!(dir = %output_dir.display(), "Cleaning output directory");
            fs::remove_dir_all(output_dir).map_err(|e| io_error(output_dir, e))?;
        }
        fs::create_dir_all(output_dir).map_err(|e| io_error(output_dir, e))?;

        let site_title = self
            .config
            .title
            .as_deref()
            .filter(|t| !t.is_empty())
            .or_else(|| Some(self.model.project().name.as_str()).filter(|n| !n.is_empty()))
            .unwrap_or("Data Dictionary");
        let ctx = PageContext {
            model: self.model,
            markdown: MarkdownRenderer::new().with_markdown(self.config.markdown),
            site_title,
            generated: self
                .model
                .exported_at()
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string(),
        };

        write_file(output_dir, STYLESHEET, templates::STYLESHEET_CONTENT)?;
        self.render_to(output_dir, INDEX_PAGE, "index.html", &ctx.index_page())?;
        self.render_to(
            output_dir,
            ALL_ELEMENTS_PAGE,
            "all-elements.html",
            &ctx.all_elements_page(),
        )?;
        self.render_to(output_dir, HIERARCHY_PAGE, "hierarchy.html", &ctx.hierarchy_page())?;
        self.write_model_dump(output_dir)?;
        let mut pages = 5;

        let namespaces: Vec<&Namespace> = self.model.namespaces().list().collect();
        for namespace in &namespaces {
            self.render_to(
                output_dir,
                &namespace_page(namespace),
                "namespace.html",
                &ctx.namespace_page(namespace),
            )?;
        }
        pages += namespaces.len();

        let elements: Vec<&Element> = self.model.elements().list().collect();
        let render_element = |element: &&Element| {
            self.render_to(
                output_dir,
                &element_page(element),
                "element.html",
                &ctx.element_page(element),
            )
        };
        if self.config.parallel {
            elements.par_iter().try_for_each(render_element)?;
        } else {
            elements.iter().try_for_each(render_element)?;
        }
        pages += elements.len();

        tracing::info!(
            pages,
            elements = elements.len(),
            namespaces = namespaces.len(),
            dir = %output_dir.display(),
            "Site built"
        );

        Ok(BuildReport {
            output_dir: output_dir.to_path_buf(),
            pages,
            elements: elements.len(),
            namespaces: namespaces.len(),
        })
    }

    fn render_to<S: Serialize>(
        &self,
        output_dir: &Path,
        page_path: &str,
        template: &str,
        context: &S,
    ) -> Result<(), BuildError> {
        let html = self.env.get_template(template)?.render(context)?;
        tracing::trace!(page = page_path, "Rendered page");
        write_file(output_dir, page_path, &html)
    }

    fn write_model_dump(&self, output_dir: &Path) -> Result<(), BuildError> {
        let dump = ModelDump {
            project_info: self.model.project(),
            exported_at: self.model.exported_at(),
            namespaces: self.model.namespaces().list().collect(),
            data_elements: self.model.elements().list().collect(),
        };
        let json = serde_json::to_string_pretty(&dump)?;
        write_file(output_dir, MODEL_DUMP, &json)
    }
}

fn write_file(output_dir: &Path, page_path: &str, content: &str) -> Result<(), BuildError> {
    let path = output_dir.join(page_path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
    }
    fs::write(&path, content).map_err(|e| io_error(&path, e))
}

fn io_error(path: &Path, source: io::Error) -> BuildError {
    BuildError::Io {
        path: path.to_path_buf(),
        source,
    }
}

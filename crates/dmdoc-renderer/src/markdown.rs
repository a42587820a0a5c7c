//! Markdown to HTML conversion using pulldown-cmark.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd, html};

use crate::util::escape_html;

/// Renders description text to HTML.
///
/// Uses GitHub-flavored extensions (tables, strikethrough, task lists). Raw
/// HTML embedded in descriptions is escaped rather than passed through, since
/// model exports are not trusted page authors.
#[derive(Clone, Copy, Debug)]
pub struct MarkdownRenderer {
    markdown: bool,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer {
    /// Create a renderer with Markdown enabled.
    #[must_use]
    pub fn new() -> Self {
        Self { markdown: true }
    }

    /// Enable or disable Markdown.
    ///
    /// With Markdown off, text is escaped and each blank-line separated block
    /// becomes a `<p>`.
    #[must_use]
    pub fn with_markdown(mut self, enabled: bool) -> Self {
        self.markdown = enabled;
        self
    }

    /// Whether Markdown is enabled.
    #[must_use]
    pub fn markdown(&self) -> bool {
        self.markdown
    }

    /// Render text to an HTML fragment.
    #[must_use]
    pub fn render(&self, text: &str) -> String {
        if !self.markdown {
            return plain_paragraphs(text)
                .map(|p| format!("<p>{}</p>\n", escape_html(&p)))
                .collect();
        }

        let events = Parser::new_ext(text, Self::options()).map(|event| match event {
            Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
            other => other,
        });
        let mut out = String::with_capacity(text.len() * 3 / 2);
        html::push_html(&mut out, events);
        out
    }

    /// Plain text of the first paragraph, with whitespace collapsed.
    ///
    /// Returns an empty string when the text has no paragraph.
    #[must_use]
    pub fn summary(&self, text: &str) -> String {
        if !self.markdown {
            return plain_paragraphs(text).next().unwrap_or_default();
        }

        let mut in_paragraph = false;
        let mut buf = String::new();
        for event in Parser::new_ext(text, Self::options()) {
            match event {
                Event::Start(Tag::Paragraph) => in_paragraph = true,
                Event::End(TagEnd::Paragraph) if in_paragraph => break,
                Event::Text(t) | Event::Code(t) if in_paragraph => buf.push_str(&t),
                Event::InlineHtml(t) if in_paragraph => buf.push_str(&t),
                Event::SoftBreak | Event::HardBreak if in_paragraph => buf.push(' '),
                _ => {}
            }
        }
        collapse_whitespace(&buf)
    }

    fn options() -> Options {
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
    }
}

/// Blank-line separated blocks of `text`, whitespace collapsed.
fn plain_paragraphs(text: &str) -> impl Iterator<Item = String> {
    let mut blocks = Vec::new();
    let mut current = String::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(' ');
            current.push_str(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks.into_iter().map(|b| collapse_whitespace(&b))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

//! Markdown fragment rendering backed by pulldown-cmark.

use super::{ExternalMarkdownRenderer, RenderError};
use pulldown_cmark::{Options, Parser, html};

/// An [`ExternalMarkdownRenderer`] for environments without a dedicated
/// slide renderer. Tables and strikethrough are enabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct PulldownRenderer;

impl ExternalMarkdownRenderer for PulldownRenderer {
    fn render(&self, fragment: &str) -> Result<String, RenderError> {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);

        let parser = Parser::new_ext(fragment, options);
        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);

        Ok(html_output)
    }
}

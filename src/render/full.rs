//! Whole-document rendering through an external slide renderer.

use super::{
    ExternalSlideRenderer, RenderError, RenderedSlide, Renderer, RendererKind, SlideResult,
};
use crate::config::EffectiveConfig;
use crate::segment::{SlideSpan, join_slides};
use std::sync::Arc;

/// The per-slide wrapper element a slide renderer emits, one per slide in
/// document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDelimiter {
    tag: String,
}

impl OutputDelimiter {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Split a rendered blob into one outer wrapper element per slide.
    ///
    /// Nested wrappers of the same tag stay inside their parent. An unclosed
    /// wrapper runs to the end of the blob.
    pub fn split<'a>(&self, html: &'a str) -> Vec<&'a str> {
        let open = format!("<{}", self.tag);
        let close = format!("</{}>", self.tag);

        let mut slides = Vec::new();
        let mut cursor = 0;
        while let Some(start) = find_open(html, cursor, &open) {
            let mut depth = 1usize;
            let mut pos = start + open.len();
            let end = loop {
                let next_open = find_open(html, pos, &open);
                let next_close = html[pos..].find(&close).map(|i| i + pos);
                match (next_open, next_close) {
                    (Some(o), Some(c)) if o < c => {
                        depth += 1;
                        pos = o + open.len();
                    }
                    (_, Some(c)) => {
                        depth -= 1;
                        pos = c + close.len();
                        if depth == 0 {
                            break pos;
                        }
                    }
                    (_, None) => break html.len(),
                }
            };
            slides.push(&html[start..end]);
            cursor = end;
        }
        slides
    }
}

impl Default for OutputDelimiter {
    fn default() -> Self {
        Self::new("section")
    }
}

/// Find `<tag` at or after `from` where the tag name ends right there.
fn find_open(html: &str, from: usize, open: &str) -> Option<usize> {
    let mut from = from;
    while let Some(found) = html[from..].find(open) {
        let at = from + found;
        let after = at + open.len();
        match html[after..].chars().next() {
            Some(c) if c.is_whitespace() || c == '>' || c == '/' => return Some(at),
            None => return None,
            _ => from = after,
        }
    }
    None
}

/// The document handed to a slide renderer: front-matter describing the
/// effective config, then the slides joined by canonical boundaries.
pub fn compose_document(spans: &[SlideSpan], config: &EffectiveConfig) -> String {
    let mut document = config.to_front_matter();
    document.push('\n');
    document.push_str(&join_slides(spans.iter().map(|span| span.text.as_str())));
    document
}

pub struct FullRenderer {
    service: Arc<dyn ExternalSlideRenderer>,
    delimiter: OutputDelimiter,
}

impl FullRenderer {
    pub fn new(service: Arc<dyn ExternalSlideRenderer>, delimiter: OutputDelimiter) -> Self {
        Self { service, delimiter }
    }
}

impl Renderer for FullRenderer {
    fn kind(&self) -> RendererKind {
        RendererKind::Full
    }

    fn render(
        &self,
        spans: &[SlideSpan],
        config: &EffectiveConfig,
    ) -> Result<Vec<SlideResult>, RenderError> {
        let blob = self.service.render(&compose_document(spans, config))?;
        let slides = self.delimiter.split(&blob.html);
        if slides.is_empty() {
            let err = RenderError::Malformed(format!("no <{}> wrapper in output", self.delimiter.tag));
            return Ok(vec![Err(err); spans.len()]);
        }
        Ok(slides
            .into_iter()
            .map(|html| Ok(RenderedSlide::new(html, Some(blob.css.clone()))))
            .collect())
    }
}

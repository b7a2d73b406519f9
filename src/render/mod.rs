//! Render dispatch.
//!
//! A [`Dispatcher`] owns a chain of [`Renderer`]s chosen once from the
//! [`Capabilities`] the caller injects: a full slide renderer when one is
//! available, otherwise a plain markdown renderer, with the in-crate
//! [`MinimalRenderer`] always last. Every pass yields exactly one
//! [`RenderedSlide`] per span. A span whose render fails becomes a
//! placeholder; a backend that fails as a whole is demoted in favour of the
//! next renderer in the chain.

mod full;
mod minimal;
#[cfg(feature = "markdown")]
mod pulldown;

use crate::config::EffectiveConfig;
use crate::segment::SlideSpan;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, warn};

pub use full::{FullRenderer, OutputDelimiter, compose_document};
pub use minimal::{MinimalRenderer, render_minimal};
#[cfg(feature = "markdown")]
pub use pulldown::PulldownRenderer;

/// HTML substituted for a slide whose render failed.
pub const PLACEHOLDER_HTML: &str = "<error>";

/// Backend-normalized output for one slide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderedSlide {
    pub html: String,
    pub css: Option<String>,
}

impl RenderedSlide {
    pub fn new(html: impl Into<String>, css: Option<String>) -> Self {
        Self {
            html: html.into(),
            css,
        }
    }

    pub fn placeholder() -> Self {
        Self {
            html: PLACEHOLDER_HTML.to_string(),
            css: None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.html == PLACEHOLDER_HTML && self.css.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("renderer failed: {0}")]
    Failed(String),
    #[error("malformed renderer output: {0}")]
    Malformed(String),
    #[error("renderer unavailable")]
    Unavailable,
}

/// Output of an external whole-document slide renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideBlob {
    pub html: String,
    pub css: String,
}

/// A slide-rendering service that takes a whole document, front-matter
/// included, and returns every slide in one HTML blob.
pub trait ExternalSlideRenderer: Send + Sync {
    fn render(&self, markdown: &str) -> Result<SlideBlob, RenderError>;
}

/// A generic markdown-to-HTML service for single fragments.
pub trait ExternalMarkdownRenderer: Send + Sync {
    fn render(&self, fragment: &str) -> Result<String, RenderError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RendererKind {
    Full,
    Plain,
    Minimal,
}

impl RendererKind {
    /// Whether slides are rendered independently of each other.
    pub fn is_per_span(&self) -> bool {
        !matches!(self, Self::Full)
    }
}

impl fmt::Display for RendererKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Full => "full",
            Self::Plain => "plain",
            Self::Minimal => "minimal",
        })
    }
}

/// Result for a single slide within a pass.
pub type SlideResult = Result<RenderedSlide, RenderError>;

pub trait Renderer: Send + Sync {
    fn kind(&self) -> RendererKind;

    /// Render a pass. The outer error means the backend itself is unusable;
    /// per-slide failures are reported in the returned vector.
    fn render(
        &self,
        spans: &[SlideSpan],
        config: &EffectiveConfig,
    ) -> Result<Vec<SlideResult>, RenderError>;
}

/// Renders each span through an [`ExternalMarkdownRenderer`].
pub struct PlainRenderer {
    service: Arc<dyn ExternalMarkdownRenderer>,
}

impl PlainRenderer {
    pub fn new(service: Arc<dyn ExternalMarkdownRenderer>) -> Self {
        Self { service }
    }
}

impl Renderer for PlainRenderer {
    fn kind(&self) -> RendererKind {
        RendererKind::Plain
    }

    fn render(
        &self,
        spans: &[SlideSpan],
        _config: &EffectiveConfig,
    ) -> Result<Vec<SlideResult>, RenderError> {
        Ok(spans
            .iter()
            .map(|span| {
                self.service
                    .render(&span.text)
                    .map(|html| RenderedSlide::new(html, None))
            })
            .collect())
    }
}

/// The renderer services available in the current environment.
#[derive(Clone, Default)]
pub struct Capabilities {
    pub slide_renderer: Option<Arc<dyn ExternalSlideRenderer>>,
    pub markdown_renderer: Option<Arc<dyn ExternalMarkdownRenderer>>,
    pub delimiter: OutputDelimiter,
}

impl Capabilities {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_slide_renderer(mut self, renderer: Arc<dyn ExternalSlideRenderer>) -> Self {
        self.slide_renderer = Some(renderer);
        self
    }

    pub fn with_markdown_renderer(mut self, renderer: Arc<dyn ExternalMarkdownRenderer>) -> Self {
        self.markdown_renderer = Some(renderer);
        self
    }

    pub fn with_delimiter(mut self, delimiter: OutputDelimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// The renderer chain in preference order. Always ends with the minimal
    /// renderer.
    fn probe(&self) -> Vec<Box<dyn Renderer>> {
        let mut chain: Vec<Box<dyn Renderer>> = Vec::with_capacity(3);
        if let Some(service) = &self.slide_renderer {
            chain.push(Box::new(FullRenderer::new(
                Arc::clone(service),
                self.delimiter.clone(),
            )));
        }
        if let Some(service) = &self.markdown_renderer {
            chain.push(Box::new(PlainRenderer::new(Arc::clone(service))));
        }
        chain.push(Box::new(MinimalRenderer));
        chain
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capabilities")
            .field("slide_renderer", &self.slide_renderer.is_some())
            .field("markdown_renderer", &self.markdown_renderer.is_some())
            .field("delimiter", &self.delimiter)
            .finish()
    }
}

pub struct Dispatcher {
    chain: Vec<Box<dyn Renderer>>,
    active: AtomicUsize,
}

impl Dispatcher {
    /// Probe `capabilities` once and build the renderer chain.
    pub fn probe(capabilities: &Capabilities) -> Self {
        let chain = capabilities.probe();
        debug!(renderer = %chain[0].kind(), "renderer selected");
        Self {
            chain,
            active: AtomicUsize::new(0),
        }
    }

    pub fn minimal() -> Self {
        Self::probe(&Capabilities::none())
    }

    /// Build a dispatcher from an explicit chain, most preferred first.
    pub fn from_renderers(mut chain: Vec<Box<dyn Renderer>>) -> Self {
        if chain.last().map(|r| r.kind()) != Some(RendererKind::Minimal) {
            chain.push(Box::new(MinimalRenderer));
        }
        Self {
            chain,
            active: AtomicUsize::new(0),
        }
    }

    pub fn active_kind(&self) -> RendererKind {
        self.active_renderer()
            .map_or(RendererKind::Minimal, |renderer| renderer.kind())
    }

    fn active_renderer(&self) -> Option<&dyn Renderer> {
        self.chain
            .get(self.active.load(Ordering::Acquire))
            .map(|renderer| renderer.as_ref())
    }

    /// Render every span. The result always has `spans.len()` entries.
    pub fn render(&self, spans: &[SlideSpan], config: &EffectiveConfig) -> Vec<RenderedSlide> {
        loop {
            let index = self.active.load(Ordering::Acquire);
            let Some(renderer) = self.chain.get(index) else {
                return vec![RenderedSlide::placeholder(); spans.len()];
            };

            match renderer.render(spans, config) {
                Ok(results) => return normalize(renderer.kind(), spans.len(), results),
                Err(err) if index + 1 < self.chain.len() => {
                    warn!(renderer = %renderer.kind(), error = %err, "renderer failed; falling back");
                    // Another caller may have demoted already; either way move on.
                    let _ = self.active.compare_exchange(
                        index,
                        index + 1,
                        Ordering::AcqRel,
                        Ordering::Acquire,
                    );
                }
                Err(err) => {
                    warn!(renderer = %renderer.kind(), error = %err, "no renderer left");
                    return vec![RenderedSlide::placeholder(); spans.len()];
                }
            }
        }
    }

    /// Render only the spans whose text differs from `previous_spans`, or whose
    /// previous render failed, reusing `previous_rendered` for the rest.
    ///
    /// Falls back to a full pass when the backend renders whole documents or
    /// the slide count changed.
    pub fn render_changed(
        &self,
        spans: &[SlideSpan],
        config: &EffectiveConfig,
        previous_spans: &[SlideSpan],
        previous_rendered: &[RenderedSlide],
    ) -> Vec<RenderedSlide> {
        if !self.active_kind().is_per_span()
            || spans.len() != previous_spans.len()
            || previous_rendered.len() != previous_spans.len()
        {
            return self.render(spans, config);
        }

        let changed: Vec<usize> = spans
            .iter()
            .zip(previous_spans.iter().zip(previous_rendered))
            .enumerate()
            .filter(|(_, (new, (old, slide)))| new.text != old.text || slide.is_placeholder())
            .map(|(index, _)| index)
            .collect();
        debug!(changed = changed.len(), total = spans.len(), "partial render");

        let subset: Vec<SlideSpan> = changed.iter().map(|&i| spans[i].clone()).collect();
        let fresh = self.render(&subset, config);

        let mut rendered = previous_rendered.to_vec();
        for (index, slide) in changed.into_iter().zip(fresh) {
            rendered[index] = slide;
        }
        rendered
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field(
                "chain",
                &self.chain.iter().map(|r| r.kind()).collect::<Vec<_>>(),
            )
            .field("active", &self.active_kind())
            .finish()
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::minimal()
    }
}

/// Map per-slide results onto exactly `expected` slides.
fn normalize(kind: RendererKind, expected: usize, results: Vec<SlideResult>) -> Vec<RenderedSlide> {
    if results.len() != expected {
        warn!(
            renderer = %kind,
            expected,
            actual = results.len(),
            "slide count mismatch in renderer output"
        );
    }

    let mut slides: Vec<RenderedSlide> = results
        .into_iter()
        .take(expected)
        .enumerate()
        .map(|(index, result)| {
            result.unwrap_or_else(|err| {
                warn!(renderer = %kind, slide = index, error = %err, "slide render failed");
                RenderedSlide::placeholder()
            })
        })
        .collect();
    slides.resize(expected, RenderedSlide::placeholder());
    slides
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::segment;

    struct Failing;

    impl ExternalMarkdownRenderer for Failing {
        fn render(&self, _fragment: &str) -> Result<String, RenderError> {
            Err(RenderError::Unavailable)
        }
    }

    struct Echo;

    impl ExternalMarkdownRenderer for Echo {
        fn render(&self, fragment: &str) -> Result<String, RenderError> {
            Ok(format!("<p>{fragment}</p>"))
        }
    }

    #[test]
    fn test_probe_order() {
        let caps = Capabilities::none().with_markdown_renderer(Arc::new(Echo));
        assert_eq!(Dispatcher::probe(&caps).active_kind(), RendererKind::Plain);
        assert_eq!(Dispatcher::minimal().active_kind(), RendererKind::Minimal);
    }

    #[test]
    fn test_normalize_pads_and_truncates() {
        let short = normalize(RendererKind::Full, 3, vec![Ok(RenderedSlide::new("a", None))]);
        assert_eq!(short.len(), 3);
        assert!(short[1].is_placeholder() && short[2].is_placeholder());

        let long = normalize(
            RendererKind::Full,
            1,
            vec![
                Ok(RenderedSlide::new("a", None)),
                Ok(RenderedSlide::new("b", None)),
            ],
        );
        assert_eq!(long, vec![RenderedSlide::new("a", None)]);
    }

    #[test]
    fn test_all_failures_still_yield_every_slide() {
        let caps = Capabilities::none().with_markdown_renderer(Arc::new(Failing));
        let dispatcher = Dispatcher::probe(&caps);
        let rendered = dispatcher.render(&segment("a\n---\nb"), &EffectiveConfig::default());
        assert_eq!(rendered.len(), 2);
        assert!(rendered.iter().all(RenderedSlide::is_placeholder));
    }

    #[test]
    fn test_render_changed_reuses_untouched_slides() {
        let caps = Capabilities::none().with_markdown_renderer(Arc::new(Echo));
        let dispatcher = Dispatcher::probe(&caps);
        let config = EffectiveConfig::default();
        let old_spans = segment("a\n---\nb");
        let stale = vec![RenderedSlide::new("kept", None), RenderedSlide::new("old", None)];
        let new_spans = segment("a\n---\nc");
        let rendered = dispatcher.render_changed(&new_spans, &config, &old_spans, &stale);
        assert_eq!(rendered[0].html, "kept");
        assert_eq!(rendered[1].html, "<p>c</p>");
    }

    #[test]
    fn test_render_changed_retries_placeholders() {
        let caps = Capabilities::none().with_markdown_renderer(Arc::new(Echo));
        let dispatcher = Dispatcher::probe(&caps);
        let config = EffectiveConfig::default();
        let spans = segment("a\n---\nb");
        let previous = vec![RenderedSlide::new("kept", None), RenderedSlide::placeholder()];
        let rendered = dispatcher.render_changed(&spans, &config, &spans, &previous);
        assert_eq!(rendered[0].html, "kept");
        assert_eq!(rendered[1].html, "<p>b</p>");
    }
}

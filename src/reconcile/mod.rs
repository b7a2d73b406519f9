//! Reconciliation: from new source text and settings to a new immutable
//! [`ViewSnapshot`].
//!
//! Each pass re-segments, re-merges the configuration, renders, re-clamps
//! navigation and assembles a snapshot. When the spans, the front-matter and
//! the effective config are all unchanged, the previous snapshot is returned
//! as is.
//!
//! Renders may run elsewhere: [`Reconciler::prepare`] stamps a
//! [`PendingRender`] with a generation and [`Reconciler::complete`] drops the
//! result if a newer pass was prepared in the meantime.

mod snapshot;

use crate::config::{EffectiveConfig, SettingsLayer, merge_with_front_matter};
use crate::render::{Dispatcher, RenderedSlide};
use crate::segment::{Segmentation, segment_document};
use std::sync::Arc;
use tracing::debug;

pub use snapshot::ViewSnapshot;

/// Result of [`Reconciler::prepare`].
#[derive(Debug)]
pub enum Prepared {
    /// Spans, front-matter and config match the previous snapshot; nothing to
    /// render.
    Unchanged(Arc<ViewSnapshot>),
    Render(PendingRender),
}

/// Result of [`Reconciler::complete`].
#[derive(Debug, Clone)]
pub enum Outcome {
    Applied(Arc<ViewSnapshot>),
    /// A newer pass was prepared after this one; the render was discarded.
    Stale { generation: u64, latest: u64 },
}

impl Outcome {
    pub fn snapshot(self) -> Option<Arc<ViewSnapshot>> {
        match self {
            Self::Applied(snapshot) => Some(snapshot),
            Self::Stale { .. } => None,
        }
    }
}

/// A prepared pass waiting for its render.
#[derive(Debug, Clone)]
pub struct PendingRender {
    generation: u64,
    segmentation: Segmentation,
    config: EffectiveConfig,
    previous: Option<Arc<ViewSnapshot>>,
}

impl PendingRender {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn segmentation(&self) -> &Segmentation {
        &self.segmentation
    }

    pub fn config(&self) -> &EffectiveConfig {
        &self.config
    }

    /// Run the render. Only spans whose text changed are re-rendered when the
    /// config is unchanged and the backend renders slides independently.
    pub fn render(&self, dispatcher: &Dispatcher) -> Vec<RenderedSlide> {
        let spans = &self.segmentation.spans;
        match &self.previous {
            Some(previous) if previous.config() == &self.config => dispatcher.render_changed(
                spans,
                &self.config,
                previous.slides(),
                previous.rendered(),
            ),
            _ => dispatcher.render(spans, &self.config),
        }
    }
}

#[derive(Debug)]
pub struct Reconciler {
    dispatcher: Arc<Dispatcher>,
    defaults: EffectiveConfig,
    issued: u64,
}

impl Reconciler {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self::with_shared(Arc::new(dispatcher))
    }

    pub fn with_shared(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            dispatcher,
            defaults: EffectiveConfig::default(),
            issued: 0,
        }
    }

    /// Replace the built-in defaults used as the lowest config layer.
    pub fn with_defaults(mut self, defaults: EffectiveConfig) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    pub fn defaults(&self) -> &EffectiveConfig {
        &self.defaults
    }

    /// The generation of the most recently prepared pass.
    pub fn latest_generation(&self) -> u64 {
        self.issued
    }

    /// Segment and merge, then either reuse `previous` or hand back a render
    /// to run. Every call supersedes all earlier pending renders.
    pub fn prepare(
        &mut self,
        previous: Option<&Arc<ViewSnapshot>>,
        text: &str,
        settings: &SettingsLayer,
    ) -> Prepared {
        self.issued += 1;
        let segmentation = segment_document(text);
        let config = merge_with_front_matter(
            &self.defaults,
            settings,
            segmentation.front_matter.as_ref().map(|fm| fm.raw.as_str()),
        );

        if let Some(previous) = previous
            && previous.config() == &config
            && previous.slides() == segmentation.spans.as_slice()
            && previous.front_matter() == segmentation.front_matter.as_ref()
        {
            debug!(generation = self.issued, "source unchanged; reusing snapshot");
            return Prepared::Unchanged(Arc::clone(previous));
        }

        Prepared::Render(PendingRender {
            generation: self.issued,
            segmentation,
            config,
            previous: previous.cloned(),
        })
    }

    /// Accept a finished render unless a newer pass was prepared since.
    ///
    /// Navigation is carried over from `current`, the snapshot on display,
    /// and re-clamped to the new slide count.
    pub fn complete(
        &mut self,
        current: Option<&Arc<ViewSnapshot>>,
        pending: PendingRender,
        rendered: Vec<RenderedSlide>,
    ) -> Outcome {
        if pending.generation != self.issued {
            debug!(
                generation = pending.generation,
                latest = self.issued,
                "stale render discarded"
            );
            return Outcome::Stale {
                generation: pending.generation,
                latest: self.issued,
            };
        }
        Outcome::Applied(assemble(current, pending, rendered))
    }

    /// Prepare, render and complete in one call.
    pub fn reconcile(
        &mut self,
        previous: Option<&Arc<ViewSnapshot>>,
        text: &str,
        settings: &SettingsLayer,
    ) -> Arc<ViewSnapshot> {
        match self.prepare(previous, text, settings) {
            Prepared::Unchanged(snapshot) => snapshot,
            Prepared::Render(pending) => {
                let rendered = pending.render(&self.dispatcher);
                assemble(previous, pending, rendered)
            }
        }
    }
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(Dispatcher::minimal())
    }
}

fn assemble(
    current: Option<&Arc<ViewSnapshot>>,
    pending: PendingRender,
    mut rendered: Vec<RenderedSlide>,
) -> Arc<ViewSnapshot> {
    let PendingRender {
        generation,
        segmentation,
        config,
        ..
    } = pending;
    let slide_count = segmentation.spans.len();
    rendered.resize(slide_count, RenderedSlide::placeholder());

    let navigation = current
        .map(|snapshot| snapshot.navigation())
        .unwrap_or_default()
        .on_slide_count_changed(slide_count);

    Arc::new(ViewSnapshot::new(
        generation,
        segmentation,
        rendered,
        navigation,
        config,
    ))
}

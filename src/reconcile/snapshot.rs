use crate::config::EffectiveConfig;
use crate::nav::NavigationState;
use crate::render::RenderedSlide;
use crate::segment::{FrontMatter, Segmentation, SlideSpan};
use std::sync::Arc;

/// The view state emitted by one reconciliation.
///
/// Snapshots are immutable and replaced wholesale. Slides and rendered output
/// are shared, so a navigation-only update is cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSnapshot {
    generation: u64,
    slides: Arc<[SlideSpan]>,
    rendered: Arc<[RenderedSlide]>,
    front_matter: Option<FrontMatter>,
    navigation: NavigationState,
    config: EffectiveConfig,
}

impl ViewSnapshot {
    pub(super) fn new(
        generation: u64,
        segmentation: Segmentation,
        rendered: Vec<RenderedSlide>,
        navigation: NavigationState,
        config: EffectiveConfig,
    ) -> Self {
        Self {
            generation,
            slides: segmentation.spans.into(),
            rendered: rendered.into(),
            front_matter: segmentation.front_matter,
            navigation,
            config,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn slides(&self) -> &[SlideSpan] {
        &self.slides
    }

    pub fn rendered(&self) -> &[RenderedSlide] {
        &self.rendered
    }

    pub fn front_matter(&self) -> Option<&FrontMatter> {
        self.front_matter.as_ref()
    }

    pub fn navigation(&self) -> NavigationState {
        self.navigation
    }

    pub fn config(&self) -> &EffectiveConfig {
        &self.config
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn current_span(&self) -> Option<&SlideSpan> {
        self.slides.get(self.navigation.current_index())
    }

    /// The rendered slide at the current index.
    pub fn current_rendered(&self) -> Option<&RenderedSlide> {
        self.rendered.get(self.navigation.current_index())
    }

    /// A copy sharing slides and rendered output, with `navigation` re-clamped
    /// to this snapshot's slide count.
    pub fn with_navigation(&self, navigation: NavigationState) -> Self {
        Self {
            slides: Arc::clone(&self.slides),
            rendered: Arc::clone(&self.rendered),
            navigation: navigation.on_slide_count_changed(self.slides.len()),
            ..self.clone()
        }
    }
}

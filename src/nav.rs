//! Current-slide navigation.
//!
//! [`NavigationState`] is a small value type. Transitions return the new
//! state and always keep `current_index < slide_count`, with `slide_count`
//! never below one.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationState {
    current_index: usize,
    slide_count: usize,
}

impl NavigationState {
    /// A state on the first of `slide_count` slides.
    pub fn new(slide_count: usize) -> Self {
        Self {
            current_index: 0,
            slide_count: slide_count.max(1),
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn slide_count(&self) -> usize {
        self.slide_count
    }

    pub fn is_first(&self) -> bool {
        self.current_index == 0
    }

    pub fn is_last(&self) -> bool {
        self.current_index + 1 == self.slide_count
    }

    /// Advance one slide; no-op on the last slide.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn next(self) -> Self {
        if self.is_last() {
            return self;
        }
        Self {
            current_index: self.current_index + 1,
            ..self
        }
    }

    /// Go back one slide; no-op on the first slide.
    #[must_use]
    pub fn previous(self) -> Self {
        Self {
            current_index: self.current_index.saturating_sub(1),
            ..self
        }
    }

    /// Jump to `index`, clamped into range.
    #[must_use]
    pub fn go_to(self, index: usize) -> Self {
        Self {
            current_index: index.min(self.slide_count - 1),
            ..self
        }
    }

    /// Move by `delta` slides, clamped into range.
    #[must_use]
    pub fn step(self, delta: isize) -> Self {
        let target = self.current_index.saturating_add_signed(delta);
        self.go_to(target)
    }

    /// Re-clamp after the deck changed size. The index is kept while it is
    /// still valid, otherwise it moves to the new last slide.
    #[must_use]
    pub fn on_slide_count_changed(self, slide_count: usize) -> Self {
        let slide_count = slide_count.max(1);
        Self {
            current_index: self.current_index.min(slide_count - 1),
            slide_count,
        }
    }

    /// Back to the first slide, keeping the count.
    #[must_use]
    pub fn reset(self) -> Self {
        Self::new(self.slide_count)
    }

    /// One-based counter text, e.g. `2 / 5`.
    pub fn label(&self) -> String {
        format!("{} / {}", self.current_index + 1, self.slide_count)
    }
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::new(1)
    }
}

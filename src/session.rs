//! A presentation session: one reconciler plus the snapshot on display.
//!
//! The document text and the settings stay with the caller and are passed in
//! on every edit.

use crate::config::SettingsLayer;
use crate::nav::NavigationState;
use crate::reconcile::{Outcome, PendingRender, Prepared, Reconciler, ViewSnapshot};
use crate::render::{Capabilities, Dispatcher, RenderedSlide};
use std::sync::Arc;

#[derive(Debug)]
pub struct Session {
    reconciler: Reconciler,
    current: Arc<ViewSnapshot>,
}

impl Session {
    pub fn new(capabilities: &Capabilities) -> Self {
        Self::with_reconciler(Reconciler::new(Dispatcher::probe(capabilities)))
    }

    /// Start from an empty document.
    pub fn with_reconciler(mut reconciler: Reconciler) -> Self {
        let current = reconciler.reconcile(None, "", &SettingsLayer::default());
        Self {
            reconciler,
            current,
        }
    }

    pub fn snapshot(&self) -> &Arc<ViewSnapshot> {
        &self.current
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    /// Reconcile after the text or settings changed. Navigation is kept where
    /// still valid.
    pub fn edit(&mut self, text: &str, settings: &SettingsLayer) -> &Arc<ViewSnapshot> {
        self.current = self
            .reconciler
            .reconcile(Some(&self.current), text, settings);
        &self.current
    }

    /// Replace the document, e.g. after opening a file. Navigation returns to
    /// the first slide.
    pub fn load(&mut self, text: &str, settings: &SettingsLayer) -> &Arc<ViewSnapshot> {
        self.edit(text, settings);
        let navigation = self.current.navigation();
        self.navigate(navigation.reset())
    }

    /// Start an edit whose render runs elsewhere. `None` when nothing needs
    /// rendering.
    pub fn begin_edit(&mut self, text: &str, settings: &SettingsLayer) -> Option<PendingRender> {
        match self.reconciler.prepare(Some(&self.current), text, settings) {
            Prepared::Unchanged(snapshot) => {
                self.current = snapshot;
                None
            }
            Prepared::Render(pending) => Some(pending),
        }
    }

    /// Apply a render started with [`Session::begin_edit`]. Returns `false`
    /// when a newer edit superseded it.
    pub fn finish_edit(
        &mut self,
        pending: PendingRender,
        rendered: Vec<RenderedSlide>,
    ) -> bool {
        match self
            .reconciler
            .complete(Some(&self.current), pending, rendered)
        {
            Outcome::Applied(snapshot) => {
                self.current = snapshot;
                true
            }
            Outcome::Stale { .. } => false,
        }
    }

    pub fn next(&mut self) -> &Arc<ViewSnapshot> {
        let navigation = self.current.navigation().next();
        self.navigate(navigation)
    }

    pub fn previous(&mut self) -> &Arc<ViewSnapshot> {
        let navigation = self.current.navigation().previous();
        self.navigate(navigation)
    }

    pub fn go_to(&mut self, index: usize) -> &Arc<ViewSnapshot> {
        let navigation = self.current.navigation().go_to(index);
        self.navigate(navigation)
    }

    /// Move by `delta` slides, clamped at either end.
    pub fn step(&mut self, delta: isize) -> &Arc<ViewSnapshot> {
        let navigation = self.current.navigation().step(delta);
        self.navigate(navigation)
    }

    /// One-based position text, e.g. `2 / 5`.
    pub fn counter_label(&self) -> String {
        self.current.navigation().label()
    }

    fn navigate(&mut self, navigation: NavigationState) -> &Arc<ViewSnapshot> {
        if navigation != self.current.navigation() {
            self.current = Arc::new(self.current.with_navigation(navigation));
        }
        &self.current
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::with_reconciler(Reconciler::default())
    }
}

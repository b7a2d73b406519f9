use md_slides::{
    Capabilities, Dispatcher, ExternalMarkdownRenderer, Outcome, Prepared, Reconciler,
    RenderError, SettingsLayer,
};
use proptest::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Fails the first call for each fragment in `flaky`, then succeeds.
struct FailsOnce {
    flaky: &'static str,
    failed: AtomicBool,
}

impl ExternalMarkdownRenderer for FailsOnce {
    fn render(&self, fragment: &str) -> Result<String, RenderError> {
        if fragment == self.flaky && !self.failed.swap(true, Ordering::SeqCst) {
            return Err(RenderError::Failed("transient".to_string()));
        }
        Ok(format!("<p>{fragment}</p>"))
    }
}

/// Fails every fragment containing `!`.
struct Loud;

impl ExternalMarkdownRenderer for Loud {
    fn render(&self, fragment: &str) -> Result<String, RenderError> {
        if fragment.contains('!') {
            return Err(RenderError::Failed("loud".to_string()));
        }
        Ok(format!("<p>{fragment}</p>"))
    }
}

/// Counts calls so tests can see which slides were re-rendered.
#[derive(Default)]
struct Counting {
    calls: AtomicUsize,
}

impl ExternalMarkdownRenderer for Counting {
    fn render(&self, fragment: &str) -> Result<String, RenderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("<p>{fragment}</p>"))
    }
}

#[test]
fn empty_document_snapshot() {
    let mut reconciler = Reconciler::default();
    let snapshot = reconciler.reconcile(None, "", &SettingsLayer::default());
    assert_eq!(snapshot.slide_count(), 1);
    assert_eq!(snapshot.rendered().len(), 1);
    assert_eq!(snapshot.navigation().current_index(), 0);
    assert_eq!(snapshot.navigation().slide_count(), 1);
    assert!(snapshot.front_matter().is_none());
}

#[test]
fn identical_input_returns_same_arc() {
    let mut reconciler = Reconciler::default();
    let settings = SettingsLayer::default();
    let text = "---\ntheme: dark\n---\n# A\n---\n# B";
    let first = reconciler.reconcile(None, text, &settings);
    let second = reconciler.reconcile(Some(&first), text, &settings);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.config().theme, "dark");
}

#[test]
fn only_changed_slides_are_rendered() {
    let counting = Arc::new(Counting::default());
    let dispatcher =
        Dispatcher::probe(&Capabilities::none().with_markdown_renderer(counting.clone()));
    let mut reconciler = Reconciler::new(dispatcher);
    let settings = SettingsLayer::default();

    let first = reconciler.reconcile(None, "a\n---\nb\n---\nc", &settings);
    assert_eq!(counting.calls.load(Ordering::SeqCst), 3);

    let second = reconciler.reconcile(Some(&first), "a\n---\nB\n---\nc", &settings);
    assert_eq!(counting.calls.load(Ordering::SeqCst), 4);
    assert_eq!(second.rendered()[1].html, "<p>B</p>");
    assert_eq!(second.rendered()[2], first.rendered()[2]);
}

#[test]
fn failed_slide_is_retried_on_next_edit() {
    let flaky = FailsOnce {
        flaky: "b",
        failed: AtomicBool::new(false),
    };
    let dispatcher = Dispatcher::probe(&Capabilities::none().with_markdown_renderer(Arc::new(flaky)));
    let mut reconciler = Reconciler::new(dispatcher);
    let settings = SettingsLayer::default();

    let first = reconciler.reconcile(None, "a\n---\nb", &settings);
    assert!(first.rendered()[1].is_placeholder());

    let second = reconciler.reconcile(Some(&first), "A\n---\nb", &settings);
    assert_eq!(second.rendered()[0].html, "<p>A</p>");
    assert_eq!(second.rendered()[1].html, "<p>b</p>");
}

#[test]
fn front_matter_only_edit_updates_snapshot() {
    let mut reconciler = Reconciler::default();
    let settings = SettingsLayer::default();
    let first = reconciler.reconcile(None, "---\nnote: aaa\n---\n# A", &settings);
    let second = reconciler.reconcile(Some(&first), "---\nnote: bbb\n---\n# A", &settings);

    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(second.front_matter().unwrap().raw, "note: bbb");
    assert_eq!(second.rendered(), first.rendered());
}

#[test]
fn config_change_rerenders_everything() {
    let counting = Arc::new(Counting::default());
    let dispatcher =
        Dispatcher::probe(&Capabilities::none().with_markdown_renderer(counting.clone()));
    let mut reconciler = Reconciler::new(dispatcher);

    let first = reconciler.reconcile(None, "a\n---\nb", &SettingsLayer::default());
    let large = SettingsLayer {
        font_size: Some(md_slides::FontSizeMode::Large),
        ..Default::default()
    };
    let second = reconciler.reconcile(Some(&first), "a\n---\nb", &large);
    assert_eq!(counting.calls.load(Ordering::SeqCst), 4);
    assert_eq!(second.config().font_size_px(), 20);
}

#[test]
fn render_on_another_thread_then_complete() {
    let mut reconciler = Reconciler::default();
    let settings = SettingsLayer::default();
    let current = reconciler.reconcile(None, "a", &settings);

    let Prepared::Render(pending) = reconciler.prepare(Some(&current), "a\n---\nb", &settings)
    else {
        panic!("text changed");
    };
    let dispatcher = Arc::clone(reconciler.dispatcher());
    let (pending, rendered) = std::thread::spawn(move || {
        let rendered = pending.render(&dispatcher);
        (pending, rendered)
    })
    .join()
    .unwrap();

    let next = reconciler
        .complete(Some(&current), pending, rendered)
        .snapshot()
        .unwrap();
    assert_eq!(next.slide_count(), 2);
    assert!(next.generation() > current.generation());
}

#[test]
fn reverting_text_discards_inflight_render() {
    let mut reconciler = Reconciler::default();
    let settings = SettingsLayer::default();
    let current = reconciler.reconcile(None, "a", &settings);

    let Prepared::Render(pending) = reconciler.prepare(Some(&current), "b", &settings) else {
        panic!("text changed");
    };
    let Prepared::Unchanged(same) = reconciler.prepare(Some(&current), "a", &settings) else {
        panic!("text reverted");
    };
    assert!(Arc::ptr_eq(&same, &current));

    let rendered = pending.render(reconciler.dispatcher());
    let outcome = reconciler.complete(Some(&current), pending, rendered);
    assert!(matches!(outcome, Outcome::Stale { .. }));
}

fn deck() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop::sample::select(vec!["---", "# T", "*x*", "", "- i", "theme: y"]),
        0..16,
    )
    .prop_map(|lines| lines.join("\n"))
}

fn loud_deck() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(
        prop::sample::select(vec!["a", "b!", "c", "d!", ""]).prop_map(String::from),
        1..8,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(proptest_config::cases()))]
    #[test]
    fn prop_partial_render_matches_full_render(before in loud_deck(), after in loud_deck()) {
        let dispatcher = Dispatcher::probe(&Capabilities::none().with_markdown_renderer(Arc::new(Loud)));
        let config = md_slides::EffectiveConfig::default();
        let old_spans = md_slides::segment(&md_slides::join_slides(before.iter().map(String::as_str)));
        let new_spans = md_slides::segment(&md_slides::join_slides(after.iter().map(String::as_str)));

        let old_rendered = dispatcher.render(&old_spans, &config);
        let partial = dispatcher.render_changed(&new_spans, &config, &old_spans, &old_rendered);
        prop_assert_eq!(partial, dispatcher.render(&new_spans, &config));
    }

    #[test]
    fn prop_reconcile_is_idempotent(text in deck()) {
        let mut reconciler = Reconciler::default();
        let settings = SettingsLayer::default();
        let first = reconciler.reconcile(None, &text, &settings);
        let second = reconciler.reconcile(Some(&first), &text, &settings);
        prop_assert!(Arc::ptr_eq(&first, &second));
        prop_assert_eq!(first.rendered().len(), first.slides().len());
    }

    #[test]
    fn prop_navigation_survives_edits(before in deck(), after in deck(), index in 0usize..16) {
        let mut reconciler = Reconciler::default();
        let settings = SettingsLayer::default();
        let first = reconciler.reconcile(None, &before, &settings);
        let moved = Arc::new(first.with_navigation(first.navigation().go_to(index)));
        let next = reconciler.reconcile(Some(&moved), &after, &settings);
        prop_assert!(next.navigation().current_index() < next.slide_count());
        prop_assert_eq!(next.navigation().slide_count(), next.slide_count());
    }
}

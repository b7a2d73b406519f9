use md_slides::{
    Capabilities, Dispatcher, EffectiveConfig, ExternalMarkdownRenderer, ExternalSlideRenderer,
    OutputDelimiter, PLACEHOLDER_HTML, RenderError, RenderedSlide, RendererKind, SlideBlob,
    segment, segment_document,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Fails on any fragment containing `boom`.
struct Picky;

impl ExternalMarkdownRenderer for Picky {
    fn render(&self, fragment: &str) -> Result<String, RenderError> {
        if fragment.contains("boom") {
            return Err(RenderError::Failed("boom".to_string()));
        }
        Ok(format!("<p>{fragment}</p>"))
    }
}

/// Wraps every slide of the composed document in `<section>`.
#[derive(Default)]
struct Sections {
    seen: Mutex<Vec<String>>,
    drop_last: bool,
}

impl ExternalSlideRenderer for Sections {
    fn render(&self, markdown: &str) -> Result<SlideBlob, RenderError> {
        self.seen.lock().unwrap().push(markdown.to_string());
        let mut spans = segment(markdown);
        if self.drop_last {
            spans.pop();
        }
        let html = spans
            .iter()
            .map(|span| format!("<section>{}</section>", span.text))
            .collect::<String>();
        Ok(SlideBlob {
            html,
            css: "section { color: red; }".to_string(),
        })
    }
}

/// Fails every call and counts them.
#[derive(Default)]
struct Down {
    calls: AtomicUsize,
}

impl ExternalSlideRenderer for Down {
    fn render(&self, _markdown: &str) -> Result<SlideBlob, RenderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(RenderError::Unavailable)
    }
}

#[test]
fn failed_span_becomes_placeholder() {
    let dispatcher =
        Dispatcher::probe(&Capabilities::none().with_markdown_renderer(Arc::new(Picky)));
    let spans = segment("one\n---\nboom\n---\nthree");
    let rendered = dispatcher.render(&spans, &EffectiveConfig::default());

    assert_eq!(rendered.len(), 3);
    assert_eq!(rendered[0].html, "<p>one</p>");
    assert_eq!(rendered[1], RenderedSlide::placeholder());
    assert_eq!(rendered[1].html, PLACEHOLDER_HTML);
    assert_eq!(rendered[1].css, None);
    assert_eq!(rendered[2].html, "<p>three</p>");
}

#[test]
fn full_renderer_gets_config_front_matter() {
    let service = Arc::new(Sections::default());
    let dispatcher = Dispatcher::probe(&Capabilities::none().with_slide_renderer(service.clone()));
    assert_eq!(dispatcher.active_kind(), RendererKind::Full);

    let config = EffectiveConfig {
        theme: "gaia".to_string(),
        ..Default::default()
    };
    let rendered = dispatcher.render(&segment("# A\n---\n# B"), &config);
    assert_eq!(
        rendered,
        vec![
            RenderedSlide::new("<section># A</section>", Some("section { color: red; }".into())),
            RenderedSlide::new("<section># B</section>", Some("section { color: red; }".into())),
        ]
    );

    let seen = service.seen.lock().unwrap();
    let composed = segment_document(&seen[0]);
    assert!(composed.front_matter.unwrap().raw.contains("theme: \"gaia\""));
}

#[test]
fn full_renderer_short_output_is_padded() {
    let service = Arc::new(Sections {
        drop_last: true,
        ..Default::default()
    });
    let dispatcher = Dispatcher::probe(&Capabilities::none().with_slide_renderer(service));
    let rendered = dispatcher.render(&segment("a\n---\nb\n---\nc"), &EffectiveConfig::default());
    assert_eq!(rendered.len(), 3);
    assert!(!rendered[1].is_placeholder());
    assert!(rendered[2].is_placeholder());
}

#[test]
fn custom_delimiter_splits_output() {
    struct Divs;
    impl ExternalSlideRenderer for Divs {
        fn render(&self, _markdown: &str) -> Result<SlideBlob, RenderError> {
            Ok(SlideBlob {
                html: "<div class=\"s\">1</div><div class=\"s\">2</div>".to_string(),
                css: String::new(),
            })
        }
    }
    let caps = Capabilities::none()
        .with_slide_renderer(Arc::new(Divs))
        .with_delimiter(OutputDelimiter::new("div"));
    let rendered = Dispatcher::probe(&caps).render(&segment("a\n---\nb"), &EffectiveConfig::default());
    assert_eq!(rendered[1].html, "<div class=\"s\">2</div>");
}

#[test]
fn unusable_backend_is_demoted_once() {
    let down = Arc::new(Down::default());
    let caps = Capabilities::none()
        .with_slide_renderer(down.clone())
        .with_markdown_renderer(Arc::new(Picky));
    let dispatcher = Dispatcher::probe(&caps);
    let config = EffectiveConfig::default();

    let rendered = dispatcher.render(&segment("a\n---\nb"), &config);
    assert_eq!(dispatcher.active_kind(), RendererKind::Plain);
    assert_eq!(rendered[1].html, "<p>b</p>");

    dispatcher.render(&segment("c"), &config);
    assert_eq!(down.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn minimal_is_the_last_resort() {
    let dispatcher = Dispatcher::probe(&Capabilities::none().with_slide_renderer(Arc::new(Down::default())));
    let rendered = dispatcher.render(&segment("# Hi"), &EffectiveConfig::default());
    assert_eq!(dispatcher.active_kind(), RendererKind::Minimal);
    assert_eq!(rendered[0].html, "<h1>Hi</h1>\n");
}

#[cfg(feature = "markdown")]
#[test]
fn pulldown_backend_renders_per_slide() {
    let caps = Capabilities::none().with_markdown_renderer(Arc::new(md_slides::PulldownRenderer));
    let rendered = Dispatcher::probe(&caps).render(&segment("# A\n---\n*b*"), &EffectiveConfig::default());
    assert_eq!(rendered[0].html, "<h1>A</h1>\n");
    assert_eq!(rendered[1].html, "<p><em>b</em></p>\n");
}

#[test]
fn line_breaks_in_settings_keep_slides_aligned() {
    let settings: md_slides::SettingsLayer =
        serde_json::from_str(r#"{"theme":"x\n---\ninjected"}"#).unwrap();
    let config = md_slides::merge(&EffectiveConfig::default(), &settings, None);
    let spans = segment("# A\n---\n# B");

    let composed = segment_document(&md_slides::render::compose_document(&spans, &config));
    assert_eq!(composed.slide_count(), spans.len());

    let dispatcher = Dispatcher::probe(
        &Capabilities::none().with_slide_renderer(Arc::new(Sections::default())),
    );
    let rendered = dispatcher.render(&spans, &config);
    assert_eq!(rendered[0].html, "<section># A</section>");
    assert_eq!(rendered[1].html, "<section># B</section>");
}

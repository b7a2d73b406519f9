//! Standalone deck export.

use crate::config::EffectiveConfig;
use crate::error::Result;
use crate::reconcile::ViewSnapshot;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

pub trait Exporter {
    /// Suggested file extension, without the dot.
    fn extension(&self) -> &'static str;

    fn export(&self, snapshot: &ViewSnapshot) -> String;

    fn export_to(&self, snapshot: &ViewSnapshot, path: &Path) -> Result<()> {
        fs::write(path, self.export(snapshot))?;
        Ok(())
    }
}

/// A self-contained HTML document with one `<section class="slide">` per
/// slide, styled from the effective config plus any renderer CSS.
#[derive(Debug, Clone)]
pub struct HtmlExporter {
    title: String,
}

impl HtmlExporter {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl Default for HtmlExporter {
    fn default() -> Self {
        Self::new("Slides")
    }
}

impl Exporter for HtmlExporter {
    fn extension(&self) -> &'static str {
        "html"
    }

    fn export(&self, snapshot: &ViewSnapshot) -> String {
        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n");
        let _ = writeln!(html, "<title>{}</title>", escape(&self.title));
        let _ = writeln!(html, "<style>\n{}</style>", deck_css(snapshot.config()));

        // A full renderer attaches the same stylesheet to every slide.
        let mut sheets: Vec<&str> = Vec::new();
        for css in snapshot.rendered().iter().filter_map(|s| s.css.as_deref()) {
            if !sheets.contains(&css) {
                sheets.push(css);
            }
        }
        for css in sheets {
            let _ = writeln!(html, "<style>\n{css}\n</style>");
        }

        html.push_str("</head>\n<body>\n<div class=\"deck\">\n");
        for (index, slide) in snapshot.rendered().iter().enumerate() {
            let _ = writeln!(
                html,
                "<section class=\"slide\" data-index=\"{index}\">\n{}\n</section>",
                slide.html.trim_end()
            );
        }
        html.push_str("</div>\n</body>\n</html>\n");
        html
    }
}

/// Stylesheet for the deck container and slides.
pub fn deck_css(config: &EffectiveConfig) -> String {
    let (width, height) = config.aspect_ratio.dimensions();
    format!(
        "body {{ margin: 0; background: #808080; }}\n\
         .deck {{ display: flex; flex-direction: column; align-items: center; gap: 24px; padding: 24px 0; }}\n\
         .slide {{ box-sizing: border-box; width: {width}px; height: {height}px; padding: 48px; overflow: hidden; \
         background: {}; color: {}; font-size: {}px; }}\n",
        config.background_color,
        config.text_color,
        config.font_size_px(),
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

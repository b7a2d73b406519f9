//! Dependency-free fallback renderer.
//!
//! Supports a fixed markdown subset:
//!
//! - `#`, `##`, `###` headings
//! - `**bold**` / `__bold__` and `*italic*` / `_italic_`
//! - unordered list items starting with `-`, `*` or `+`
//! - consecutive lines joined with `<br>`; blank lines end a paragraph
//!
//! Everything else is emitted as escaped text.

use super::{RenderError, RenderedSlide, Renderer, RendererKind, SlideResult};
use crate::config::EffectiveConfig;
use crate::segment::SlideSpan;

#[derive(Debug, Clone, Copy, Default)]
pub struct MinimalRenderer;

impl Renderer for MinimalRenderer {
    fn kind(&self) -> RendererKind {
        RendererKind::Minimal
    }

    fn render(
        &self,
        spans: &[SlideSpan],
        _config: &EffectiveConfig,
    ) -> Result<Vec<SlideResult>, RenderError> {
        Ok(spans
            .iter()
            .map(|span| Ok(RenderedSlide::new(render_minimal(&span.text), None)))
            .collect())
    }
}

pub fn render_minimal(markdown: &str) -> String {
    let mut html = String::new();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut in_list = false;

    for line in markdown.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            flush_paragraph(&mut html, &mut paragraph);
            close_list(&mut html, &mut in_list);
            continue;
        }

        if let Some((level, text)) = heading(trimmed) {
            flush_paragraph(&mut html, &mut paragraph);
            close_list(&mut html, &mut in_list);
            html.push_str(&format!("<h{level}>{}</h{level}>\n", inline(text)));
            continue;
        }

        if let Some(item) = list_item(trimmed) {
            flush_paragraph(&mut html, &mut paragraph);
            if !in_list {
                html.push_str("<ul>\n");
                in_list = true;
            }
            html.push_str(&format!("<li>{}</li>\n", inline(item)));
            continue;
        }

        close_list(&mut html, &mut in_list);
        paragraph.push(trimmed);
    }

    flush_paragraph(&mut html, &mut paragraph);
    close_list(&mut html, &mut in_list);
    html
}

fn flush_paragraph(html: &mut String, paragraph: &mut Vec<&str>) {
    if paragraph.is_empty() {
        return;
    }
    let lines: Vec<String> = paragraph.drain(..).map(inline).collect();
    html.push_str("<p>");
    html.push_str(&lines.join("<br>\n"));
    html.push_str("</p>\n");
}

fn close_list(html: &mut String, in_list: &mut bool) {
    if *in_list {
        html.push_str("</ul>\n");
        *in_list = false;
    }
}

fn heading(line: &str) -> Option<(usize, &str)> {
    let level = line.chars().take_while(|c| *c == '#').count();
    if !(1..=3).contains(&level) {
        return None;
    }
    let rest = &line[level..];
    if rest.is_empty() {
        return Some((level, ""));
    }
    rest.strip_prefix([' ', '\t'])
        .map(|text| (level, text.trim()))
}

fn list_item(line: &str) -> Option<&str> {
    ["- ", "* ", "+ "]
        .iter()
        .find_map(|marker| line.strip_prefix(marker))
        .map(str::trim_start)
}

/// Inline emphasis and escaping for one line.
fn inline(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut previous: Option<char> = None;

    while let Some(c) = rest.chars().next() {
        if let Some((tag, inner, consumed)) = emphasis(rest, previous) {
            out.push_str(&format!("<{tag}>{}</{tag}>", inline(inner)));
            previous = rest[..consumed].chars().next_back();
            rest = &rest[consumed..];
            continue;
        }
        escape_into(&mut out, c);
        previous = Some(c);
        rest = &rest[c.len_utf8()..];
    }
    out
}

/// Match an emphasis run at the start of `text`. Returns the tag, the inner
/// text and the number of bytes consumed.
fn emphasis(text: &str, previous: Option<char>) -> Option<(&'static str, &str, usize)> {
    for (marker, tag) in [("**", "strong"), ("__", "strong"), ("*", "em"), ("_", "em")] {
        let Some(after) = text.strip_prefix(marker) else {
            continue;
        };
        let underscore = marker.starts_with('_');
        // Intraword underscores are literal: snake_case stays as written.
        if underscore && previous.is_some_and(char::is_alphanumeric) {
            return None;
        }
        if after.starts_with(char::is_whitespace) || after.starts_with(marker) {
            continue;
        }
        let Some(close) = find_closing(after, marker) else {
            continue;
        };
        let inner = &after[..close];
        let consumed = marker.len() * 2 + close;
        if underscore && text[consumed..].starts_with(char::is_alphanumeric) {
            continue;
        }
        return Some((tag, inner, consumed));
    }
    None
}

fn find_closing(text: &str, marker: &str) -> Option<usize> {
    let mut from = 0;
    while let Some(found) = text[from..].find(marker) {
        let at = from + found;
        let before = text[..at].chars().next_back();
        if at > 0 && !before.is_some_and(char::is_whitespace) {
            return Some(at);
        }
        from = at + marker.len();
    }
    None
}

fn escape_into(out: &mut String, c: char) {
    match c {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&#39;"),
        _ => out.push(c),
    }
}

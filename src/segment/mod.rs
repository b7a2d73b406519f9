//! Slide segmentation.
//!
//! Splits markdown source into ordered [`SlideSpan`]s. A slide boundary is a
//! line whose trimmed content is exactly `---`. The first `---` ... `---` pair
//! starting the document is front-matter and belongs to no slide. Lines inside
//! fenced code blocks are never boundaries.
//!
//! Segmentation has no invalid input: every string, including the empty one,
//! yields at least one span.

mod lines;

use lines::{Fence, Line, lines_from};

/// The boundary marker, also used when composing documents from spans.
pub const BOUNDARY: &str = "---";

/// Separator inserted between slides when a deck is recomposed from spans.
pub const SLIDE_SEPARATOR: &str = "\n\n---\n\n";

/// One slide's region of the source document.
///
/// `start` and `end` are byte offsets with `&source[start..end] == text`.
/// Blank lines around the slide and the boundary lines themselves are not part
/// of the span.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlideSpan {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

impl SlideSpan {
    fn empty_at(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
            text: String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }
}

/// The leading front-matter block consumed by the config layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontMatter {
    /// Offset of the opening delimiter line.
    pub start: usize,
    /// Offset just past the closing delimiter line, including its newline.
    pub end: usize,
    /// Text between the two delimiter lines.
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segmentation {
    pub front_matter: Option<FrontMatter>,
    pub spans: Vec<SlideSpan>,
}

impl Segmentation {
    pub fn slide_count(&self) -> usize {
        self.spans.len()
    }
}

/// Split `text` into slide spans, excluding any front-matter block.
pub fn segment(text: &str) -> Vec<SlideSpan> {
    segment_document(text).spans
}

/// Split `text` into its front-matter block and slide spans.
pub fn segment_document(text: &str) -> Segmentation {
    let front_matter = split_front_matter(text);
    let body_start = front_matter.as_ref().map_or(0, |fm| fm.end);

    let mut spans = Vec::new();
    let mut region_start = body_start;
    let mut fence: Option<Fence> = None;

    for line in lines_from(text, body_start) {
        if let Some(open) = fence {
            if open.is_closed_by(line.content) {
                fence = None;
            }
            continue;
        }
        if let Some(open) = Fence::open(line.content) {
            fence = Some(open);
            continue;
        }
        if is_boundary(&line) {
            spans.push(span_between(text, region_start, line.start));
            region_start = line.next;
        }
    }
    spans.push(span_between(text, region_start, text.len()));

    Segmentation {
        front_matter,
        spans,
    }
}

/// Detect the front-matter block at the start of `text`.
///
/// Returns `None` when the first line is not a delimiter or when no closing
/// delimiter follows it; an unclosed opening line is an ordinary boundary.
pub fn split_front_matter(text: &str) -> Option<FrontMatter> {
    let offset = if text.starts_with('\u{feff}') {
        '\u{feff}'.len_utf8()
    } else {
        0
    };

    let mut lines = lines_from(text, offset);
    let opening = lines.next()?;
    if !is_boundary(&opening) {
        return None;
    }

    let closing = lines.find(is_boundary)?;
    let raw = text[opening.next..closing.start]
        .strip_suffix('\n')
        .map(|raw| raw.strip_suffix('\r').unwrap_or(raw))
        .unwrap_or(&text[opening.next..closing.start]);

    Some(FrontMatter {
        start: opening.start,
        end: closing.next,
        raw: raw.to_string(),
    })
}

/// Recompose a deck body from slide texts using the canonical separator.
pub fn join_slides<'a, I>(texts: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut output = String::new();
    for (index, text) in texts.into_iter().enumerate() {
        if index > 0 {
            output.push_str(SLIDE_SEPARATOR);
        }
        output.push_str(text);
    }
    output
}

fn is_boundary(line: &Line<'_>) -> bool {
    line.content.trim() == BOUNDARY
}

/// Build the span for the region `text[from..to]`, dropping blank lines at
/// both ends. A region with no content yields an empty span at `from`.
fn span_between(text: &str, from: usize, to: usize) -> SlideSpan {
    let mut start = None;
    let mut end = from;
    for line in lines_from(&text[..to], from) {
        if line.content.trim().is_empty() {
            continue;
        }
        if start.is_none() {
            start = Some(line.start);
        }
        end = line.start + line.content.len();
    }

    match start {
        Some(start) => SlideSpan {
            start,
            end,
            text: text[start..end].to_string(),
        },
        None => SlideSpan::empty_at(from),
    }
}

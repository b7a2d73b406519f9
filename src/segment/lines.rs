//! Offset-tracking line iteration and code fence tracking.

/// A source line without its terminator.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Line<'a> {
    /// Byte offset of the first character.
    pub start: usize,
    /// Line content with `\n` / `\r\n` stripped.
    pub content: &'a str,
    /// Byte offset just past the terminator.
    pub next: usize,
}

/// Iterate the lines of `text[from..]`, reporting offsets into `text`.
pub(crate) fn lines_from(text: &str, from: usize) -> impl Iterator<Item = Line<'_>> {
    let mut offset = from;
    text[from..].split_inclusive('\n').map(move |raw| {
        let start = offset;
        offset += raw.len();
        let content = raw.strip_suffix('\n').unwrap_or(raw);
        let content = content.strip_suffix('\r').unwrap_or(content);
        Line {
            start,
            content,
            next: offset,
        }
    })
}

/// An open fenced code block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Fence {
    marker: char,
    width: usize,
}

impl Fence {
    const MIN_WIDTH: usize = 3;

    pub fn open(content: &str) -> Option<Self> {
        let trimmed = content.trim_start();
        let marker = trimmed.chars().next().filter(|c| *c == '`' || *c == '~')?;
        let width = trimmed.chars().take_while(|c| *c == marker).count();
        (width >= Self::MIN_WIDTH).then_some(Self { marker, width })
    }

    pub fn is_closed_by(&self, content: &str) -> bool {
        let trimmed = content.trim();
        let width = trimmed.chars().take_while(|c| *c == self.marker).count();
        width >= self.width && width == trimmed.chars().count()
    }
}

//! A naive, simple oracle implementation for differential testing.
//!
//! Splits on `\n` only and knows nothing about code fences, byte offsets or
//! byte-order marks. Inputs used against it must avoid all three.

const BOUNDARY: &str = "---";

fn is_boundary(line: &str) -> bool {
    line.trim() == BOUNDARY
}

/// The front-matter body, if the first line opens a block that is closed.
pub fn front_matter(text: &str) -> Option<String> {
    let lines: Vec<&str> = text.split('\n').collect();
    if !is_boundary(lines[0]) {
        return None;
    }
    let close = lines[1..].iter().position(|line| is_boundary(line))? + 1;
    Some(lines[1..close].join("\n"))
}

/// Slide texts in document order.
pub fn slides(text: &str) -> Vec<String> {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut body: &[&str] = &lines;
    if is_boundary(lines[0])
        && let Some(close) = lines[1..].iter().position(|line| is_boundary(line))
    {
        body = &lines[close + 2..];
    }

    let mut slides = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in body {
        if is_boundary(line) {
            slides.push(finish(&current));
            current.clear();
        } else {
            current.push(line);
        }
    }
    slides.push(finish(&current));
    slides
}

fn finish(lines: &[&str]) -> String {
    let first = lines.iter().position(|line| !line.trim().is_empty());
    let last = lines.iter().rposition(|line| !line.trim().is_empty());
    match (first, last) {
        (Some(first), Some(last)) => lines[first..=last].join("\n"),
        _ => String::new(),
    }
}

/// Index after navigating by `deltas`, each step clamped into `0..count`.
pub fn navigate(count: usize, deltas: &[isize]) -> usize {
    let count = count.max(1) as isize;
    let mut index: isize = 0;
    for delta in deltas {
        index += delta;
        if index < 0 {
            index = 0;
        }
        if index >= count {
            index = count - 1;
        }
    }
    index as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slides() {
        assert_eq!(slides("a\n---\n\nb\n"), vec!["a", "b"]);
        assert_eq!(slides(""), vec![""]);
        assert_eq!(slides("---\nx: 1\n---\nbody"), vec!["body"]);
        assert_eq!(front_matter("---\nx: 1\n---\nbody").as_deref(), Some("x: 1"));
    }

    #[test]
    fn test_navigate() {
        assert_eq!(navigate(3, &[1, 1, 1, -1]), 1);
        assert_eq!(navigate(0, &[5]), 0);
    }
}

//! Text helpers shared by the extraction strategies

use scraper::ElementRef;

/// Elements whose text never counts as page content
pub const STRIPPED_ELEMENTS: &[&str] = &["script", "style", "nav", "header", "footer", "aside"];

/// Collapses every whitespace run (newlines included) to one space and trims
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Length in characters, not bytes
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

pub fn is_stripped(name: &str) -> bool {
    STRIPPED_ELEMENTS.contains(&name)
}

/// True when the element sits inside a stripped subtree
pub fn within_stripped(element: ElementRef<'_>) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| is_stripped(ancestor.value().name()))
}

/// Text of an element with stripped subtrees skipped
///
/// Text nodes are trimmed and joined with single spaces, then collapsed.
pub fn visible_text(element: ElementRef<'_>) -> String {
    let mut chunks = Vec::new();
    collect_text(element, &mut chunks);
    collapse_whitespace(&chunks.join(" "))
}

fn collect_text<'a>(element: ElementRef<'a>, chunks: &mut Vec<&'a str>) {
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            if !is_stripped(child_element.value().name()) {
                collect_text(child_element, chunks);
            }
        } else if let Some(text) = child.value().as_text() {
            let text: &'a str = text;
            let text = text.trim();
            if !text.is_empty() {
                chunks.push(text);
            }
        }
    }
}

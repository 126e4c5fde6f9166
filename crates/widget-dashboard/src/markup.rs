//! Widget markup to terminal text.
//!
//! Widget bodies are arbitrary HTML written by anyone with access to the
//! dashboard. The terminal only ever shows their text content: scripts and
//! styles are dropped, block elements and `<br>` break lines, entities are
//! decoded by the HTML parser. The stored markup itself is never modified.

use scraper::{Html, Node};

/// Elements whose start begins a new line of text.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr",
    "li", "main", "nav", "ol", "p", "pre", "section", "table", "tr", "ul",
];

/// Elements whose content is never shown.
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "template", "noscript", "head", "title"];

/// Extracts the visible text of `html` as lines.
///
/// Whitespace inside a line is collapsed to single spaces and empty lines
/// are dropped.
pub fn markup_to_lines(html: &str) -> Vec<String> {
    let fragment = Html::parse_fragment(html);
    let mut lines = Vec::new();
    let mut current = String::new();

    for node in fragment.tree.root().descendants() {
        match node.value() {
            Node::Element(element) if BLOCK_ELEMENTS.contains(&element.name()) => {
                flush_line(&mut current, &mut lines);
            }
            Node::Text(text) => {
                let hidden = node.ancestors().any(|ancestor| {
                    ancestor
                        .value()
                        .as_element()
                        .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
                });
                if hidden {
                    continue;
                }
                for word in text.split_whitespace() {
                    if !current.is_empty() {
                        current.push(' ');
                    }
                    current.push_str(word);
                }
            }
            _ => {}
        }
    }
    flush_line(&mut current, &mut lines);
    lines
}

fn flush_line(current: &mut String, lines: &mut Vec<String>) {
    if !current.is_empty() {
        lines.push(std::mem::take(current));
    }
}

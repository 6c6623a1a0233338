//! Whitespace reindentation of an element tree.
//!
//! Gradle writes its descriptor with one element per line and a fixed
//! indentation step; this module reproduces that layout for a patched tree.

use super::document::Element;

/// Indentation step used by Gradle's metadata writer.
pub const GRADLE_INDENT: &str = "   ";

/// Reindent `root` and its descendants with `space` per nesting level.
///
/// Whitespace-only `text` and `tail` slots are replaced with a newline plus
/// the indentation of the following line; slots holding other content are
/// left alone. An element without children is not modified, and the tail of
/// `root` itself is never touched.
pub fn indent(root: &mut Element, space: &str) {
    if root.children().is_empty() {
        return;
    }
    indent_children(root, 0, space);
}

fn indent_children(element: &mut Element, level: usize, space: &str) {
    let child_indentation = line_break(level + 1, space);

    if is_blank(element.text()) {
        element.set_text(Some(child_indentation.clone()));
    }

    for child in element.children_mut().iter_mut() {
        if !child.children().is_empty() {
            indent_children(child, level + 1, space);
        }
        if is_blank(child.tail()) {
            child.set_tail(Some(child_indentation.clone()));
        }
    }

    // The closing tag sits one level shallower than the children.
    if let Some(last) = element.children_mut().last_mut() {
        if is_blank(last.tail()) {
            last.set_tail(Some(line_break(level, space)));
        }
    }
}

fn line_break(level: usize, space: &str) -> String {
    format!("\n{}", space.repeat(level))
}

fn is_blank(data: Option<&str>) -> bool {
    data.is_none_or(|data| data.trim().is_empty())
}

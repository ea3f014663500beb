//! Docstring rendering — brief + detailed description trees to one string.
//!
//! Mirrors the contract of the upstream description formatter: all element
//! text of the brief node, then, when the detailed node carries any text, a
//! line break followed by its text. An undocumented member renders to `""`,
//! which callers must treat as "skip this member".

use crate::model::DocNode;

pub fn render_docstring(brief: &DocNode, detailed: &DocNode) -> String {
    let mut text = collect_text(brief);
    let detailed_text = collect_text(detailed);
    if !detailed_text.is_empty() {
        text.push('\n');
        text.push_str(&detailed_text);
    }
    text
}

/// Concatenate the text of a node and all its descendants in document order,
/// trimming each piece.
fn collect_text(node: &DocNode) -> String {
    let mut out = String::new();
    append_text(node, &mut out);
    out
}

fn append_text(node: &DocNode, out: &mut String) {
    out.push_str(node.text.trim());
    for child in &node.children {
        append_text(child, out);
    }
}

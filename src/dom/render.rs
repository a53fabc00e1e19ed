//! Arena → markup serialization.

use super::{Document, NodeId, NodeKind};
use crate::utils::html;

/// Write `id` and its subtree into `out`.
pub(super) fn write_node(doc: &Document, id: NodeId, out: &mut String) {
    match doc.kind(id) {
        NodeKind::Document => {
            for child in doc.children(id) {
                write_node(doc, *child, out);
            }
        }
        NodeKind::Doctype(body) => {
            out.push_str("<!");
            out.push_str(body);
            out.push('>');
        }
        NodeKind::Text(text) => out.push_str(text),
        NodeKind::Comment(body) => {
            out.push_str("<!--");
            out.push_str(body);
            out.push_str("-->");
        }
        NodeKind::Element(elem) => {
            out.push('<');
            out.push_str(&elem.tag);
            for (name, value) in &elem.attrs {
                out.push(' ');
                out.push_str(name);
                // Empty values render as bare boolean attributes
                if !value.is_empty() {
                    out.push_str("=\"");
                    out.push_str(&html::escape_attr(value));
                    out.push('"');
                }
            }
            out.push('>');

            if html::is_void_element(&elem.tag) {
                return;
            }

            for child in doc.children(id) {
                write_node(doc, *child, out);
            }

            out.push_str("</");
            out.push_str(&elem.tag);
            out.push('>');
        }
    }
}

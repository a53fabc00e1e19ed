//! Markup → arena conversion.
//!
//! The html5ever tokenizer does the lexing: attribute syntax, character
//! references, and the raw-text bodies of `script` and `style`. Its tokens
//! are built straight into the document arena without the html5ever tree
//! builder, so a fragment is not wrapped in `<html>`/`<body>` and a page
//! keeps the structure it was written with. Whitespace text is kept so
//! reassembled pages keep their formatting.

use std::cell::RefCell;

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};

use super::{Document, Element, NodeId};
use crate::utils::html;

/// Parse `markup` into detached nodes owned by `doc`.
pub(super) fn parse_into(doc: &mut Document, markup: &str) -> Vec<NodeId> {
    let mut roots = Vec::new();

    let (doctype, rest) = split_doctype(markup);
    if let Some(body) = doctype {
        roots.push(doc.create_doctype(body));
    }

    let builder = RefCell::new(ArenaBuilder {
        doc,
        roots,
        open: Vec::new(),
        text: String::new(),
    });
    {
        let input = BufferQueue::default();
        input.push_back(StrTendril::from_slice(rest));
        let tokenizer = Tokenizer::new(ArenaSink(&builder), TokenizerOpts::default());
        let _ = tokenizer.feed(&input);
        tokenizer.end();
    }
    builder.into_inner().finish()
}

/// Split a leading `<!DOCTYPE ...>` off the markup.
///
/// Leading whitespace before the declaration is dropped with it.
fn split_doctype(markup: &str) -> (Option<&str>, &str) {
    let trimmed = markup.trim_start();
    let is_doctype = trimmed
        .get(..9)
        .is_some_and(|head| head.eq_ignore_ascii_case("<!doctype"));
    if !is_doctype {
        return (None, markup);
    }

    match trimmed.find('>') {
        Some(end) => (Some(&trimmed[2..end]), &trimmed[end + 1..]),
        None => (None, markup),
    }
}

/// Tokenizer state to switch to after the start tag of `tag`.
fn raw_kind(tag: &str) -> Option<RawKind> {
    match tag {
        "script" => Some(RawKind::ScriptData),
        "style" => Some(RawKind::Rawtext),
        "title" | "textarea" => Some(RawKind::Rcdata),
        _ => None,
    }
}

/// Builds tokens into the arena.
///
/// `open` is the stack of elements still waiting for their end tag;
/// `roots` collects the top-level nodes in source order.
struct ArenaBuilder<'d> {
    doc: &'d mut Document,
    roots: Vec<NodeId>,
    open: Vec<NodeId>,
    text: String,
}

impl ArenaBuilder<'_> {
    fn append(&mut self, id: NodeId) {
        match self.open.last() {
            Some(&parent) => self.doc.append_child(parent, id),
            None => self.roots.push(id),
        }
    }

    /// Turn buffered character tokens into one text node.
    fn flush_text(&mut self) {
        if self.text.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.text);
        let raw = self
            .open
            .last()
            .and_then(|id| self.doc.tag(*id))
            .is_some_and(html::is_raw_text_element);
        let id = if raw {
            self.doc.create_raw_text(&text)
        } else {
            self.doc.create_text(&text)
        };
        self.append(id);
    }

    fn start_tag(&mut self, tag: Tag) -> TokenSinkResult<()> {
        self.flush_text();

        // Attributes arrive in source order, duplicates already dropped
        let mut elem = Element::new(&*tag.name);
        for attr in &tag.attrs {
            elem.set_attr(&attr.name.local, &attr.value);
        }
        let id = self.doc.create_element_with(elem);
        self.append(id);

        let raw = raw_kind(&tag.name);
        if html::is_void_element(&tag.name) || (tag.self_closing && raw.is_none()) {
            return TokenSinkResult::Continue;
        }
        self.open.push(id);
        match raw {
            Some(kind) => TokenSinkResult::RawData(kind),
            None => TokenSinkResult::Continue,
        }
    }

    /// Close the nearest open element named `name`; stray end tags are dropped.
    fn end_tag(&mut self, name: &str) {
        self.flush_text();
        if let Some(pos) = self
            .open
            .iter()
            .rposition(|id| self.doc.tag(*id) == Some(name))
        {
            self.open.truncate(pos);
        }
    }

    fn comment(&mut self, body: &str) {
        self.flush_text();
        let id = self.doc.create_comment(body);
        self.append(id);
    }

    /// A doctype that did not lead the markup.
    fn doctype(&mut self, name: Option<&str>) {
        self.flush_text();
        let body = match name {
            Some(name) => format!("DOCTYPE {name}"),
            None => "DOCTYPE".to_string(),
        };
        let id = self.doc.create_doctype(&body);
        self.append(id);
    }

    fn finish(mut self) -> Vec<NodeId> {
        self.flush_text();
        self.roots
    }
}

struct ArenaSink<'a, 'd>(&'a RefCell<ArenaBuilder<'d>>);

impl TokenSink for ArenaSink<'_, '_> {
    type Handle = ();

    fn process_token(&self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        let mut builder = self.0.borrow_mut();
        match token {
            Token::TagToken(tag) => match tag.kind {
                TagKind::StartTag => return builder.start_tag(tag),
                TagKind::EndTag => builder.end_tag(&tag.name),
            },
            Token::CharacterTokens(text) => builder.text.push_str(&text),
            Token::CommentToken(body) => builder.comment(&body),
            Token::DoctypeToken(doctype) => builder.doctype(doctype.name.as_deref()),
            _ => {}
        }
        TokenSinkResult::Continue
    }
}

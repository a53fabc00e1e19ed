//! CSS selector parsing and matching.
//!
//! Supported grammar, enough for fragment targets and head lookups:
//!
//! ```text
//! selector  = complex ("," complex)*
//! complex   = compound ((" " | ">") compound)*
//! compound  = ("*" | tag)? ("#id" | ".class" | "[attr]" | "[attr=value]")*
//! ```

use std::fmt;

use thiserror::Error;

use super::{Document, NodeId};

/// Selector syntax error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid selector `{selector}`: {reason}")]
pub struct SelectorError {
    pub selector: String,
    pub reason: String,
}

/// A parsed selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    groups: Vec<Complex>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

/// Compounds joined by combinators, stored left to right.
/// The combinator paired with a compound links it to the one before it.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    parts: Vec<(Combinator, Compound)>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrMatch>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrMatch {
    name: String,
    value: Option<String>,
}

impl Selector {
    /// Parse a selector list.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let mut parser = Parser {
            source: input,
            chars: input.chars().collect(),
            pos: 0,
        };

        let mut groups = vec![parser.complex()?];
        while parser.eat(',') {
            groups.push(parser.complex()?);
        }
        parser.skip_ws();
        if let Some(c) = parser.peek() {
            return Err(parser.error(format!("unexpected `{c}`")));
        }

        Ok(Self {
            source: input.trim().to_string(),
            groups,
        })
    }

    /// Whether element `id` matches any group of this selector.
    pub fn matches(&self, doc: &Document, id: NodeId) -> bool {
        self.groups
            .iter()
            .any(|group| matches_at(doc, id, &group.parts))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

// ============================================================================
// Matching
// ============================================================================

/// Match `parts` right to left with `id` as the subject of the last part.
fn matches_at(doc: &Document, id: NodeId, parts: &[(Combinator, Compound)]) -> bool {
    let Some(((combinator, compound), rest)) = parts.split_last() else {
        return true;
    };
    if !compound.matches(doc, id) {
        return false;
    }
    if rest.is_empty() {
        return true;
    }

    match combinator {
        Combinator::Child => doc
            .parent(id)
            .is_some_and(|parent| matches_at(doc, parent, rest)),
        Combinator::Descendant => {
            let mut ancestor = doc.parent(id);
            while let Some(current) = ancestor {
                if matches_at(doc, current, rest) {
                    return true;
                }
                ancestor = doc.parent(current);
            }
            false
        }
    }
}

impl Compound {
    fn matches(&self, doc: &Document, id: NodeId) -> bool {
        let Some(elem) = doc.element(id) else {
            return false;
        };

        if let Some(tag) = &self.tag
            && !elem.tag.eq_ignore_ascii_case(tag)
        {
            return false;
        }
        if let Some(want) = &self.id
            && elem.attr("id") != Some(want.as_str())
        {
            return false;
        }
        if !self
            .classes
            .iter()
            .all(|class| elem.classes().any(|c| c == class))
        {
            return false;
        }
        self.attrs.iter().all(|attr| match &attr.value {
            Some(value) => elem.attr(&attr.name) == Some(value.as_str()),
            None => elem.has_attr(&attr.name),
        })
    }
}

// ============================================================================
// Parsing
// ============================================================================

struct Parser<'a> {
    source: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    /// Skip whitespace, returning whether any was skipped.
    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    /// Consume `c` (surrounded by optional whitespace) if it comes next.
    fn eat(&mut self, c: char) -> bool {
        let start = self.pos;
        self.skip_ws();
        if self.peek() == Some(c) {
            self.pos += 1;
            self.skip_ws();
            true
        } else {
            self.pos = start;
            false
        }
    }

    fn error(&self, reason: impl Into<String>) -> SelectorError {
        SelectorError {
            selector: self.source.to_string(),
            reason: reason.into(),
        }
    }

    fn complex(&mut self) -> Result<Complex, SelectorError> {
        self.skip_ws();
        let mut parts = vec![(Combinator::Descendant, self.compound()?)];

        loop {
            let had_ws = self.skip_ws();
            let combinator = match self.peek() {
                None | Some(',') => break,
                Some('>') => {
                    self.pos += 1;
                    self.skip_ws();
                    Combinator::Child
                }
                Some(_) if had_ws => Combinator::Descendant,
                Some(c) => return Err(self.error(format!("unexpected `{c}`"))),
            };
            parts.push((combinator, self.compound()?));
        }

        Ok(Complex { parts })
    }

    fn compound(&mut self) -> Result<Compound, SelectorError> {
        let mut compound = Compound::default();
        let start = self.pos;

        match self.peek() {
            Some('*') => {
                self.pos += 1;
            }
            Some(c) if is_ident_char(c) => {
                compound.tag = Some(self.ident()?.to_ascii_lowercase());
            }
            _ => {}
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.pos += 1;
                    compound.id = Some(self.ident()?);
                }
                Some('.') => {
                    self.pos += 1;
                    compound.classes.push(self.ident()?);
                }
                Some('[') => {
                    self.pos += 1;
                    compound.attrs.push(self.attr()?);
                }
                _ => break,
            }
        }

        if self.pos == start {
            return Err(match self.peek() {
                Some(c) => self.error(format!("unexpected `{c}`")),
                None => self.error("expected a selector"),
            });
        }
        Ok(compound)
    }

    fn ident(&mut self) -> Result<String, SelectorError> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.error("expected a name"));
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    /// Parse the inside of `[...]`; the opening bracket is already consumed.
    fn attr(&mut self) -> Result<AttrMatch, SelectorError> {
        self.skip_ws();
        let name = self.ident()?.to_ascii_lowercase();
        self.skip_ws();

        let value = match self.bump() {
            Some(']') => return Ok(AttrMatch { name, value: None }),
            Some('=') => {
                self.skip_ws();
                self.attr_value()?
            }
            Some(c) => return Err(self.error(format!("unexpected `{c}` in attribute"))),
            None => return Err(self.error("unclosed `[`")),
        };

        self.skip_ws();
        match self.bump() {
            Some(']') => Ok(AttrMatch {
                name,
                value: Some(value),
            }),
            _ => Err(self.error("unclosed `[`")),
        }
    }

    fn attr_value(&mut self) -> Result<String, SelectorError> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let mut value = String::new();
                loop {
                    match self.bump() {
                        Some(c) if c == quote => return Ok(value),
                        Some(c) => value.push(c),
                        None => return Err(self.error("unterminated string")),
                    }
                }
            }
            _ => self.ident(),
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = concat!(
        "<html><head><meta name=\"viewport\" content=\"x\"><title>t</title></head>",
        "<body><header id=\"top\" class=\"site dark\"><nav><a>1</a></nav></header>",
        "<main><div data-component=\"/c/card.html\"></div><p class=\"dark\">p</p></main>",
        "</body></html>"
    );

    fn first(doc: &Document, selector: &str) -> Option<String> {
        let id = doc.query_selector(selector).unwrap()?;
        doc.tag(id).map(str::to_string)
    }

    #[test]
    fn test_simple_selectors() {
        let doc = Document::parse(PAGE);
        assert_eq!(first(&doc, "title").as_deref(), Some("title"));
        assert_eq!(first(&doc, "#top").as_deref(), Some("header"));
        assert_eq!(first(&doc, ".dark").as_deref(), Some("header"));
        assert_eq!(first(&doc, "p.dark").as_deref(), Some("p"));
        assert_eq!(first(&doc, "[data-component]").as_deref(), Some("div"));
        assert_eq!(first(&doc, "meta[name=\"viewport\"]").as_deref(), Some("meta"));
        assert_eq!(first(&doc, "meta[name=viewport]").as_deref(), Some("meta"));
        assert_eq!(first(&doc, "meta[name='other']").as_deref(), None);
        assert_eq!(first(&doc, "*").as_deref(), Some("html"));
    }

    #[test]
    fn test_combinators() {
        let doc = Document::parse(PAGE);
        assert_eq!(first(&doc, "header a").as_deref(), Some("a"));
        assert_eq!(first(&doc, "header > nav > a").as_deref(), Some("a"));
        assert_eq!(first(&doc, "header > a").as_deref(), None);
        assert_eq!(first(&doc, "body   main>p").as_deref(), Some("p"));
    }

    #[test]
    fn test_selector_list() {
        let doc = Document::parse(PAGE);
        let all = doc.query_selector_all("p, nav").unwrap();
        let tags: Vec<_> = all.iter().filter_map(|id| doc.tag(*id)).collect();
        // Document order, not list order
        assert_eq!(tags, ["nav", "p"]);
    }

    #[test]
    fn test_compound_requires_every_class() {
        let doc = Document::parse(PAGE);
        assert_eq!(first(&doc, ".site.dark").as_deref(), Some("header"));
        assert_eq!(first(&doc, "p.site.dark").as_deref(), None);
    }

    #[test]
    fn test_invalid_selectors() {
        for bad in ["", "  ", "#", "div[", "a >", "[x=\"y]", "a, ", "div!"] {
            let err = Selector::parse(bad).unwrap_err();
            assert_eq!(err.selector, bad, "selector: {bad:?}");
        }
    }

    #[test]
    fn test_display_keeps_source() {
        let selector = Selector::parse("  main > .card ").unwrap();
        assert_eq!(selector.to_string(), "main > .card");
    }
}

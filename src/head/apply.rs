//! Realizing a head configuration on a parsed document.

use super::{HeadBuilder, HeadError};
use crate::dom::{Document, Element, NodeId};

impl HeadBuilder {
    /// Update the document head in place.
    ///
    /// The viewport meta and the title are located or created and updated.
    /// Everything else is appended as new elements, so applying the same
    /// builder twice duplicates them. Description, keywords, and author are
    /// only emitted by [`render`](Self::render).
    pub fn apply(&self, doc: &mut Document) -> Result<(), HeadError> {
        let head = doc.head().ok_or(HeadError::MissingHead)?;

        let viewport = doc
            .descendant_elements(doc.root())
            .into_iter()
            .find(|id| {
                doc.tag(*id) == Some("meta") && doc.attr(*id, "name") == Some("viewport")
            });
        match viewport {
            Some(meta) => doc.set_attr(meta, "content", self.viewport())?,
            None => {
                append(
                    doc,
                    head,
                    element("meta", [("name", "viewport"), ("content", self.viewport())]),
                );
            }
        }

        if let Some(title) = self.title() {
            let node = match doc.find_tag("title") {
                Some(node) => node,
                None => append(doc, head, Element::new("title")),
            };
            doc.set_text(node, title)?;
        }

        for tag in self.meta_tags() {
            append(
                doc,
                head,
                element(
                    "meta",
                    [(tag.kind.attr(), tag.key.as_str()), ("content", tag.content.as_str())],
                ),
            );
        }

        for sheet in self.stylesheets() {
            let mut link = element(
                "link",
                [
                    ("rel", "stylesheet"),
                    ("href", sheet.href.as_str()),
                    ("media", sheet.media.as_str()),
                ],
            );
            if sheet.crossorigin {
                link.set_attr("crossorigin", "anonymous");
            }
            if let Some(hint) = &sheet.resource_hint {
                link.set_attr("as", hint);
            }
            append(doc, head, link);
        }

        if !self.inline_styles().is_empty() {
            let style = append(doc, head, Element::new("style"));
            doc.set_text(style, &self.inline_styles().join("\n"))?;
        }

        for css in self.utility_styles() {
            let style = append(doc, head, element("style", [("type", "text/tailwindcss")]));
            doc.set_text(style, css)?;
        }

        for script in self.scripts() {
            let mut tag = element("script", [("src", script.src.as_str())]);
            if script.defer {
                tag.set_attr("defer", "");
            }
            if script.is_async {
                tag.set_attr("async", "");
            }
            append(doc, head, tag);
        }

        Ok(())
    }

    /// Replace the document head outright with the serialized markup.
    pub fn replace(&self, doc: &mut Document) -> Result<(), HeadError> {
        let head = doc.head().ok_or(HeadError::MissingHead)?;
        doc.replace_with_html(head, &self.render())?;
        Ok(())
    }
}

fn element<'a>(tag: &str, attrs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Element {
    let mut element = Element::new(tag);
    for (name, value) in attrs {
        element.set_attr(name, value);
    }
    element
}

fn append(doc: &mut Document, parent: NodeId, element: Element) -> NodeId {
    let id = doc.create_element_with(element);
    doc.append_child(parent, id);
    id
}

#[cfg(test)]
mod tests {
    use crate::dom::Document;
    use crate::head::{HeadBuilder, HeadError, Script, Stylesheet};

    const PAGE: &str = concat!(
        "<html><head>",
        "<meta name=\"viewport\" content=\"width=320\">",
        "<title>old</title>",
        "</head><body><p>x</p></body></html>"
    );

    fn head_html(doc: &Document) -> String {
        doc.inner_html(doc.head().unwrap())
    }

    #[test]
    fn test_apply_updates_viewport_and_title_in_place() {
        let mut doc = Document::parse(PAGE);
        HeadBuilder::new().set_title("new").apply(&mut doc).unwrap();

        let metas = doc.query_selector_all("meta[name=viewport]").unwrap();
        assert_eq!(metas.len(), 1);
        assert_eq!(
            doc.attr(metas[0], "content"),
            Some("width=device-width, initial-scale=1.0")
        );
        assert_eq!(doc.query_selector_all("title").unwrap().len(), 1);
        assert_eq!(doc.text_content(doc.find_tag("title").unwrap()), "new");
    }

    #[test]
    fn test_apply_creates_missing_viewport_and_title() {
        let mut doc = Document::parse("<html><head></head><body></body></html>");
        HeadBuilder::new().set_title("a & b").apply(&mut doc).unwrap();

        assert!(doc.query_selector("head > meta[name=viewport]").unwrap().is_some());
        assert!(head_html(&doc).contains("<title>a &amp; b</title>"));
    }

    #[test]
    fn test_apply_without_title_keeps_existing() {
        let mut doc = Document::parse(PAGE);
        HeadBuilder::new().apply(&mut doc).unwrap();
        assert_eq!(doc.text_content(doc.find_tag("title").unwrap()), "old");
    }

    #[test]
    fn test_apply_appends_entries() {
        let mut doc = Document::parse(PAGE);
        HeadBuilder::new()
            .set_description("not applied live")
            .add_open_graph("og:type", "website")
            .add_stylesheet(
                Stylesheet::new("f.css")
                    .with_crossorigin(true)
                    .with_resource_hint("style"),
            )
            .add_inline_style("a {}")
            .add_inline_style("b {}")
            .add_utility_style("@theme {}")
            .add_script(Script::new("a.js").with_defer(true))
            .apply(&mut doc)
            .unwrap();

        let og = doc.query_selector("meta[property=\"og:type\"]").unwrap().unwrap();
        assert_eq!(doc.attr(og, "content"), Some("website"));

        let link = doc.query_selector("link[rel=stylesheet]").unwrap().unwrap();
        assert_eq!(doc.attr(link, "href"), Some("f.css"));
        assert_eq!(doc.attr(link, "media"), Some("all"));
        assert_eq!(doc.attr(link, "crossorigin"), Some("anonymous"));
        assert_eq!(doc.attr(link, "as"), Some("style"));

        let styles = doc.query_selector_all("style").unwrap();
        assert_eq!(styles.len(), 2);
        assert_eq!(doc.inner_html(styles[0]), "a {}\nb {}");
        assert_eq!(doc.attr(styles[1], "type"), Some("text/tailwindcss"));

        let script = doc.query_selector("script").unwrap().unwrap();
        assert!(doc.has_attr(script, "defer"));
        assert!(!doc.has_attr(script, "async"));

        assert!(doc.query_selector("meta[name=description]").unwrap().is_none());
    }

    #[test]
    fn test_apply_twice_duplicates_links() {
        let mut doc = Document::parse(PAGE);
        let head = HeadBuilder::new().add_stylesheet("s.css");

        head.apply(&mut doc).unwrap();
        head.apply(&mut doc).unwrap();

        assert_eq!(doc.query_selector_all("link[href=\"s.css\"]").unwrap().len(), 2);
        assert_eq!(doc.query_selector_all("meta[name=viewport]").unwrap().len(), 1);
    }

    #[test]
    fn test_missing_head() {
        let mut doc = Document::parse("<p>fragment</p>");
        let builder = HeadBuilder::new();
        assert!(matches!(builder.apply(&mut doc), Err(HeadError::MissingHead)));
        assert!(matches!(builder.replace(&mut doc), Err(HeadError::MissingHead)));
    }

    #[test]
    fn test_replace_swaps_head() {
        let mut doc = Document::parse(PAGE);
        HeadBuilder::new().set_title("fresh").replace(&mut doc).unwrap();

        assert_eq!(doc.query_selector_all("head").unwrap().len(), 1);
        assert_eq!(doc.text_content(doc.find_tag("title").unwrap()), "fresh");
        assert!(doc.query_selector("meta[charset]").unwrap().is_some());
        assert!(doc.to_html().contains("<body><p>x</p></body>"));
    }
}

//! Declarative fragment discovery.
//!
//! Elements mark the fragment they want with attributes:
//!
//! ```html
//! <div data-component="/components/nav.html"></div>
//! <div data-component="/components/footer.html" data-target="#footer" data-replace></div>
//! ```
//!
//! `data-target` defaults to the marked element itself; `data-replace` and
//! `data-prepend` are presence flags.

use crate::debug;
use crate::dom::{Document, Page};
use crate::fetch::Fetch;
use crate::loader::{ComponentLoader, Descriptor, LoadOptions, LoadReport, Target};

/// Fragment path attribute (required).
pub const COMPONENT_ATTR: &str = "data-component";
/// Target selector attribute (optional).
pub const TARGET_ATTR: &str = "data-target";
/// Replace flag attribute.
pub const REPLACE_ATTR: &str = "data-replace";
/// Prepend flag attribute.
pub const PREPEND_ATTR: &str = "data-prepend";

/// Collect a load descriptor for every element declaring a fragment.
///
/// Elements with an empty path are skipped.
pub fn discover(doc: &Document) -> Vec<Descriptor> {
    doc.descendant_elements(doc.root())
        .into_iter()
        .filter_map(|id| {
            let path = doc.attr(id, COMPONENT_ATTR).filter(|p| !p.is_empty())?;
            let target = match doc.attr(id, TARGET_ATTR) {
                Some(selector) if !selector.is_empty() => Target::from(selector),
                _ => Target::Node(id),
            };
            let options = LoadOptions {
                replace: doc.has_attr(id, REPLACE_ATTR),
                prepend: doc.has_attr(id, PREPEND_ATTR),
            };
            Some(Descriptor::new(path, target).with_options(options))
        })
        .collect()
}

/// Discover declared fragments in `page` and load them all.
///
/// One element's failure never blocks another; failures are in the report.
pub async fn bootstrap<F: Fetch>(loader: &ComponentLoader<F>, page: &Page) -> LoadReport {
    let descriptors = discover(&page.lock());
    debug!("load"; "found {} declared components", descriptors.len());
    loader.load_components(page, descriptors).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MemoryFetcher;
    use crate::loader::InsertMode;

    const PAGE: &str = concat!(
        "<body>",
        "<div id=\"nav\" data-component=\"/nav.html\"></div>",
        "<section data-component=\"/hero.html\" data-target=\"#slot\" data-prepend></section>",
        "<div id=\"slot\"><p>x</p></div>",
        "<div id=\"foot\" data-component=\"/footer.html\" data-replace data-prepend></div>",
        "<div data-component=\"\"></div>",
        "<div data-component=\"/missing.html\"></div>",
        "</body>"
    );

    fn loader() -> ComponentLoader<MemoryFetcher> {
        ComponentLoader::new(
            MemoryFetcher::new()
                .with("/nav.html", "<nav>n</nav>")
                .with("/hero.html", "<h1>h</h1>")
                .with("/footer.html", "<footer>f</footer>"),
        )
    }

    #[test]
    fn test_discover_maps_attributes() {
        let doc = Document::parse(PAGE);
        let found = discover(&doc);

        let paths: Vec<_> = found.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(
            paths,
            ["/nav.html", "/hero.html", "/footer.html", "/missing.html"]
        );

        let nav = doc.query_selector("#nav").unwrap().unwrap();
        assert_eq!(found[0].target, Target::Node(nav));
        assert_eq!(found[0].options.mode(), InsertMode::Append);

        assert_eq!(found[1].target, Target::Selector("#slot".to_string()));
        assert_eq!(found[1].options.mode(), InsertMode::Prepend);

        assert!(found[2].options.replace && found[2].options.prepend);
        assert_eq!(found[2].options.mode(), InsertMode::Replace);
    }

    #[test]
    fn test_discover_flag_before_component() {
        let doc = Document::parse(concat!(
            "<div data-replace data-component=\"/a.html\"></div>",
            "<div data-prepend data-replace data-component=\"/b.html\" data-target=\"#t\"></div>",
        ));
        let found = discover(&doc);

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].path, "/a.html");
        assert_eq!(found[0].options.mode(), InsertMode::Replace);
        assert_eq!(found[1].path, "/b.html");
        assert!(found[1].options.replace && found[1].options.prepend);
        assert_eq!(found[1].target, Target::Selector("#t".to_string()));
    }

    #[tokio::test]
    async fn test_bootstrap_loads_everything_it_can() {
        let loader = loader();
        let page = Page::parse(PAGE);

        let report = bootstrap(&loader, &page).await;

        assert_eq!(report.len(), 4);
        assert_eq!(report.succeeded(), 3);
        assert_eq!(report.errors().next().map(|e| e.status()), Some(Some(404)));

        let doc = page.lock();
        let inner = |selector: &str| {
            let id = doc.query_selector(selector).unwrap().unwrap();
            doc.inner_html(id)
        };
        assert_eq!(inner("#nav"), "<nav>n</nav>");
        assert_eq!(inner("#slot"), "<h1>h</h1><p>x</p>");
        assert!(doc.query_selector("#foot").unwrap().is_none());
        assert!(doc.to_html().contains("<footer>f</footer>"));
    }

    #[tokio::test]
    async fn test_bootstrap_without_markers() {
        let loader = loader();
        let page = Page::parse("<body><p>static</p></body>");

        let report = bootstrap(&loader, &page).await;

        assert!(report.is_empty());
        assert_eq!(loader.fetcher().total_fetches(), 0);
    }
}

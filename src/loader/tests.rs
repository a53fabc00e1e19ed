//! Loader behavior against an in-memory fragment source.

use super::*;
use crate::dom::Page;
use crate::fetch::MemoryFetcher;

const PAGE: &str = "<body><header id=\"top\"><h1>site</h1></header><main></main></body>";

fn loader() -> ComponentLoader<MemoryFetcher> {
    ComponentLoader::new(
        MemoryFetcher::new()
            .with("/nav.html", "<nav>menu</nav>")
            .with("/banner.html", "<div>banner</div>")
            .with("/footer.html", "<footer>bye</footer>"),
    )
}

fn page() -> Page {
    Page::parse(PAGE)
}

fn inner(page: &Page, selector: &str) -> String {
    let doc = page.lock();
    let id = doc.query_selector(selector).unwrap().unwrap();
    doc.inner_html(id)
}

#[tokio::test]
async fn test_append_is_default() {
    let (loader, page) = (loader(), page());

    let inserted = loader
        .load_component(&page, "/nav.html", "#top", LoadOptions::default())
        .await
        .unwrap();

    assert_eq!(inserted.mode, InsertMode::Append);
    assert!(!inserted.cached);
    assert_eq!(inner(&page, "#top"), "<h1>site</h1><nav>menu</nav>");
}

#[tokio::test]
async fn test_prepend() {
    let (loader, page) = (loader(), page());

    loader
        .load_component(&page, "/nav.html", "#top", LoadOptions::prepend())
        .await
        .unwrap();

    assert_eq!(inner(&page, "#top"), "<nav>menu</nav><h1>site</h1>");
}

#[tokio::test]
async fn test_replace() {
    let (loader, page) = (loader(), page());

    loader
        .load_component(&page, "/nav.html", "#top", LoadOptions::replace())
        .await
        .unwrap();

    assert_eq!(
        page.to_html(),
        "<body><nav>menu</nav><main></main></body>"
    );
}

#[tokio::test]
async fn test_replace_wins_over_prepend() {
    let (loader, page) = (loader(), page());
    let options = LoadOptions {
        replace: true,
        prepend: true,
    };

    let inserted = loader
        .load_component(&page, "/nav.html", "#top", options)
        .await
        .unwrap();

    assert_eq!(inserted.mode, InsertMode::Replace);
    assert!(page.lock().query_selector("#top").unwrap().is_none());
    assert!(page.to_html().contains("<nav>menu</nav><main>"));
}

#[tokio::test]
async fn test_cache_hit_skips_fetch() {
    let (loader, page) = (loader(), page());

    loader
        .load_component(&page, "/footer.html", "main", LoadOptions::default())
        .await
        .unwrap();
    let second = loader
        .load_component(&page, "/footer.html", "main", LoadOptions::default())
        .await
        .unwrap();

    assert!(second.cached);
    assert_eq!(loader.fetcher().fetch_count("/footer.html"), 1);
    assert_eq!(inner(&page, "main"), "<footer>bye</footer><footer>bye</footer>");
}

#[tokio::test]
async fn test_remove_from_cache_refetches() {
    let (loader, page) = (loader(), page());

    loader
        .load_component(&page, "/footer.html", "main", LoadOptions::default())
        .await
        .unwrap();
    loader.remove_from_cache("/footer.html");
    loader.remove_from_cache("/never-loaded.html");
    loader
        .load_component(&page, "/footer.html", "main", LoadOptions::default())
        .await
        .unwrap();

    assert_eq!(loader.fetcher().fetch_count("/footer.html"), 2);
}

#[tokio::test]
async fn test_clear_cache_refetches_everything() {
    let (loader, page) = (loader(), page());

    for path in ["/nav.html", "/footer.html"] {
        loader
            .load_component(&page, path, "main", LoadOptions::default())
            .await
            .unwrap();
    }
    assert_eq!(loader.cache().len(), 2);

    loader.clear_cache();
    assert!(loader.cache().is_empty());

    for path in ["/nav.html", "/footer.html"] {
        loader
            .load_component(&page, path, "main", LoadOptions::default())
            .await
            .unwrap();
    }
    assert_eq!(loader.fetcher().fetch_count("/nav.html"), 2);
    assert_eq!(loader.fetcher().fetch_count("/footer.html"), 2);
}

#[tokio::test]
async fn test_failed_fetch_inserts_nothing() {
    let (loader, page) = (loader(), page());
    let before = page.to_html();

    let err = loader
        .load_component(&page, "/missing.html", "main", LoadOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert_eq!(err.path(), "/missing.html");
    assert_eq!(page.to_html(), before);
    assert!(!loader.cache().contains("/missing.html"));
}

#[tokio::test]
async fn test_missing_target_inserts_nothing() {
    let (loader, page) = (loader(), page());
    let before = page.to_html();

    let err = loader
        .load_component(&page, "/nav.html", "#nowhere", LoadOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, LoadError::TargetNotFound { ref target, .. } if target == "#nowhere"));
    assert_eq!(page.to_html(), before);
    // The fetch still populated the cache
    assert!(loader.cache().contains("/nav.html"));
}

#[tokio::test]
async fn test_invalid_selector_is_an_error() {
    let (loader, page) = (loader(), page());

    let err = loader
        .load_component(&page, "/nav.html", "main >", LoadOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, LoadError::Selector { .. }));
}

#[tokio::test]
async fn test_logged_variant_swallows_errors() {
    let (loader, page) = (loader(), page());

    let missing = loader
        .load_component_logged(&page, "/missing.html", "main", LoadOptions::default())
        .await;
    let found = loader
        .load_component_logged(&page, "/nav.html", "main", LoadOptions::default())
        .await;

    assert!(missing.is_none());
    assert!(found.is_some());
}

#[tokio::test]
async fn test_node_target() {
    let (loader, page) = (loader(), page());
    let main = page.lock().find_tag("main").unwrap();

    loader
        .load_component(&page, "/banner.html", main, LoadOptions::default())
        .await
        .unwrap();

    assert_eq!(inner(&page, "main"), "<div>banner</div>");
}

#[tokio::test]
async fn test_detached_node_target_not_found() {
    let (loader, page) = (loader(), page());
    let top = page.lock().query_selector("#top").unwrap().unwrap();

    loader
        .load_component(&page, "/nav.html", top, LoadOptions::replace())
        .await
        .unwrap();
    let err = loader
        .load_component(&page, "/banner.html", top, LoadOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, LoadError::TargetNotFound { .. }));
}

#[tokio::test]
async fn test_batch_with_missing_target_inserts_the_rest() {
    let (loader, page) = (loader(), page());

    let report = loader
        .load_components(
            &page,
            [
                Descriptor::new("/nav.html", "#top"),
                Descriptor::new("/banner.html", "#does-not-exist"),
                Descriptor::new("/footer.html", "main"),
            ],
        )
        .await;

    assert_eq!(report.len(), 3);
    assert_eq!(report.succeeded(), 2);
    assert!(report.outcomes()[0].1.is_ok());
    assert!(matches!(
        report.outcomes()[1].1,
        Err(LoadError::TargetNotFound { .. })
    ));
    assert!(report.outcomes()[2].1.is_ok());

    assert_eq!(inner(&page, "#top"), "<h1>site</h1><nav>menu</nav>");
    assert_eq!(inner(&page, "main"), "<footer>bye</footer>");
}

#[tokio::test]
async fn test_concurrent_loads_of_same_path_may_both_fetch() {
    let (loader, page) = (loader(), page());

    let report = loader
        .load_components(
            &page,
            [
                Descriptor::new("/nav.html", "main"),
                Descriptor::new("/nav.html", "main"),
            ],
        )
        .await;

    assert!(report.is_success());
    // Both loads missed the cache before either fetch finished
    assert_eq!(loader.fetcher().fetch_count("/nav.html"), 2);
    assert_eq!(loader.cache().len(), 1);
    assert_eq!(inner(&page, "main"), "<nav>menu</nav><nav>menu</nav>");
}

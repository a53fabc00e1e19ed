use super::{HeadBuilder, Script, Stylesheet};

const SITE_TITLE: &str = "AutoMart - 인터넷자동차공매";
const SITE_KEYWORDS: &str = "자동차, 중고차, 차량, AutoMart, 인터넷자동차공매";
const SITE_AUTHOR: &str = "AutoMart Team";

const TAILWIND_BROWSER: &str = "https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4";
const PRETENDARD: &str =
    "https://cdn.jsdelivr.net/gh/orioncactus/pretendard@v1.3.9/dist/web/static/pretendard.min.css";

const FONT_STACK: &str = "Pretendard, -apple-system, BlinkMacSystemFont, system-ui, Roboto, \
    'Helvetica Neue', 'Segoe UI', 'Apple SD Gothic Neo', 'Noto Sans KR', 'Malgun Gothic', \
    'Apple Color Emoji', 'Segoe UI Emoji', 'Segoe UI Symbol', sans-serif";

const SELECT_ARROW: &str = "url(\"data:image/svg+xml,%3Csvg width='12' height='8' \
    viewBox='0 0 12 8' fill='none' xmlns='http://www.w3.org/2000/svg'%3E%3Cpath \
    d='M1 1.5L6 6.5L11 1.5' stroke='%23A10076' stroke-width='1.5' stroke-linecap='round' \
    stroke-linejoin='round'/%3E%3C/svg%3E\")";

const BREAKPOINTS: &str = "@theme {
      --breakpoint-md: 768px;
      --breakpoint-lg: 1024px;
    }";

impl HeadBuilder {
    /// The site's standard head.
    pub fn site_default() -> Self {
        Self::new()
            .set_title(SITE_TITLE)
            .set_keywords(SITE_KEYWORDS)
            .set_author(SITE_AUTHOR)
            .add_script(Script::new(TAILWIND_BROWSER).with_defer(true))
            .add_stylesheet(
                Stylesheet::new(PRETENDARD)
                    .with_crossorigin(true)
                    .with_resource_hint("style"),
            )
            .add_inline_style(base_css())
            .add_utility_style(BREAKPOINTS)
            .add_open_graph("og:title", SITE_TITLE)
            .add_open_graph("og:type", "website")
            .add_twitter_card("twitter:card", "summary_large_image")
            .add_twitter_card("twitter:title", SITE_TITLE)
    }
}

/// Page-wide resets: font stack, no horizontal overflow, plain selects.
fn base_css() -> String {
    let viewport_lock = "overflow-x: hidden !important;
      max-width: 100vw !important;
      width: 100% !important;
      position: relative;";

    format!(
        "html {{
      font-family: {FONT_STACK};
      {viewport_lock}
    }}
    body {{
      font-family: {FONT_STACK};
      {viewport_lock}
    }}
    main, section, article, div {{
      max-width: 100% !important;
      overflow-x: hidden;
    }}
    img, video, iframe {{
      max-width: 100% !important;
      height: auto;
    }}
    select {{
      -webkit-appearance: none;
      -moz-appearance: none;
      appearance: none;
      background: {SELECT_ARROW} no-repeat 95% center;
      background-size: 12px auto;
    }}
    select::-ms-expand {{
      display: none;
    }}
    * {{
      box-sizing: border-box;
    }}"
    )
}

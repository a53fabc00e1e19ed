//! Head serialization.
//!
//! Element order is fixed: charset, viewport, title, description, keywords,
//! author, meta tags, stylesheets, inline styles, utility styles, scripts.

use std::fmt::Write;

use super::HeadBuilder;
use crate::utils::html::{escape, escape_attr};

const INDENT: &str = "    ";

impl HeadBuilder {
    /// Serialize to a complete `<head>...</head>` string.
    ///
    /// Attribute values and the title are escaped; CSS is written as is.
    pub fn render(&self) -> String {
        let mut out = String::from("<head>\n");

        line(&mut out, format_args!("<meta charset=\"UTF-8\">"));
        line(
            &mut out,
            format_args!(
                "<meta name=\"viewport\" content=\"{}\">",
                escape_attr(self.viewport())
            ),
        );

        if let Some(title) = self.title() {
            line(&mut out, format_args!("<title>{}</title>", escape(title)));
        }

        let named = [
            ("description", self.description()),
            ("keywords", self.keywords()),
            ("author", self.author()),
        ];
        for (name, value) in named {
            if let Some(value) = value {
                line(
                    &mut out,
                    format_args!("<meta name=\"{name}\" content=\"{}\">", escape_attr(value)),
                );
            }
        }

        for tag in self.meta_tags() {
            line(
                &mut out,
                format_args!(
                    "<meta {}=\"{}\" content=\"{}\">",
                    tag.kind.attr(),
                    escape_attr(&tag.key),
                    escape_attr(&tag.content)
                ),
            );
        }

        for sheet in self.stylesheets() {
            let mut link = format!(
                "<link rel=\"stylesheet\" href=\"{}\" media=\"{}\"",
                escape_attr(&sheet.href),
                escape_attr(&sheet.media)
            );
            if sheet.crossorigin {
                link.push_str(" crossorigin");
            }
            if let Some(hint) = &sheet.resource_hint {
                let _ = write!(link, " as=\"{}\"", escape_attr(hint));
            }
            link.push('>');
            line(&mut out, format_args!("{link}"));
        }

        if !self.inline_styles().is_empty() {
            line(&mut out, format_args!("<style>"));
            for css in self.inline_styles() {
                line(&mut out, format_args!("  {css}"));
            }
            line(&mut out, format_args!("</style>"));
        }

        for css in self.utility_styles() {
            line(&mut out, format_args!("<style type=\"text/tailwindcss\">"));
            line(&mut out, format_args!("  {css}"));
            line(&mut out, format_args!("</style>"));
        }

        for script in self.scripts() {
            let mut tag = format!("<script src=\"{}\"", escape_attr(&script.src));
            if script.defer {
                tag.push_str(" defer");
            }
            if script.is_async {
                tag.push_str(" async");
            }
            tag.push_str("></script>");
            line(&mut out, format_args!("{tag}"));
        }

        out.push_str("</head>");
        out
    }
}

/// Append one indented line.
fn line(out: &mut String, args: std::fmt::Arguments<'_>) {
    out.push_str(INDENT);
    let _ = out.write_fmt(args);
    out.push('\n');
}

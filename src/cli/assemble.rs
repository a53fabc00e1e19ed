//! Assemble command implementation.
//!
//! Parses a page, loads every fragment it declares, realizes the configured
//! head, and writes the result.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::bootstrap::bootstrap;
use crate::cli::args::AssembleArgs;
use crate::config::{HeadMode, PageConfig};
use crate::dom::Page;
use crate::fetch::Source;
use crate::head::{HeadBuilder, HeadError};
use crate::loader::{ComponentLoader, LoadReport};
use crate::logger::{status_error, status_success};
use crate::{debug, log};

/// Execute assemble command
pub async fn run_assemble(args: &AssembleArgs, config: &PageConfig) -> Result<()> {
    let markup = tokio::fs::read_to_string(&args.input)
        .await
        .with_context(|| format!("failed to read `{}`", args.input.display()))?;
    let page = Page::parse(&markup);

    let base = args.base.as_deref().unwrap_or(&config.fragments.base);
    let source = Source::from_base(base)
        .with_context(|| format!("invalid fragment base `{base}`"))?;
    debug!("load"; "fragment base: {}", base);

    let loader = ComponentLoader::new(source);
    let report = bootstrap(&loader, &page).await;
    report.log();

    let mode = args.head.unwrap_or(config.head.mode);
    let head = realize_head(&page, &config.head.builder(), mode);
    if let Err(err) = &head {
        log!("error"; "head: {}", err);
    }

    write_output(args.output.as_deref(), &page.to_html()).await?;

    let summary = format!(
        "assembled {} ({} of {} components)",
        args.input.display(),
        report.succeeded(),
        report.len()
    );
    match failure_detail(&report, &head) {
        None => status_success(&summary),
        Some(detail) => status_error(&summary, &detail),
    }

    if args.strict && (!report.is_success() || head.is_err()) {
        bail!("assembly of `{}` was incomplete", args.input.display());
    }
    Ok(())
}

/// Realize `head` on the page according to `mode`.
pub fn realize_head(page: &Page, head: &HeadBuilder, mode: HeadMode) -> Result<(), HeadError> {
    let mut doc = page.lock();
    match mode {
        HeadMode::Apply => head.apply(&mut doc),
        HeadMode::Replace => head.replace(&mut doc),
        HeadMode::Skip => Ok(()),
    }
}

/// Detail line for the summary, `None` when nothing failed.
fn failure_detail(report: &LoadReport, head: &Result<(), HeadError>) -> Option<String> {
    let mut parts = Vec::new();
    if report.failed() > 0 {
        parts.push(format!("{} component(s) failed", report.failed()));
    }
    if let Err(err) = head {
        parts.push(format!("head: {err}"));
    }
    (!parts.is_empty()).then(|| parts.join("; "))
}

async fn write_output(output: Option<&Path>, html: &str) -> Result<()> {
    match output {
        Some(path) => tokio::fs::write(path, html)
            .await
            .with_context(|| format!("failed to write `{}`", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(html.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}

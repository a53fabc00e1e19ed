//! Head command implementation.

use std::io::Write;

use anyhow::Result;

use crate::config::PageConfig;

/// Print the serialized head of the configured builder.
pub fn run_head(config: &PageConfig) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", config.head.builder().render())?;
    Ok(())
}

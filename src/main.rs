//! pagekit - fragment loading and head assembly for static pages.

use anyhow::Result;
use clap::{ColorChoice, Parser};

use pagekit::cli::{Cli, Commands, assemble::run_assemble, head::run_head};
use pagekit::config::PageConfig;
use pagekit::logger;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = PageConfig::load(&cli.config)?;

    match &cli.command {
        Commands::Assemble { args } => run_assemble(args, &config).await,
        Commands::Head => run_head(&config),
    }
}

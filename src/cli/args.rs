//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{CONFIG_FILE, HeadMode};

/// Assemble static pages from HTML fragments and a configured head
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path
    #[arg(short = 'C', long, default_value = CONFIG_FILE, value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Load declared fragments into a page and realize its head
    #[command(visible_alias = "a")]
    Assemble {
        #[command(flatten)]
        args: AssembleArgs,
    },

    /// Print the configured head markup
    Head,
}

/// Assemble command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct AssembleArgs {
    /// Page to assemble
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub input: PathBuf,

    /// Write the assembled page here instead of stdout
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Fragment base (directory or http(s) URL), overrides `fragments.base`
    #[arg(short, long)]
    pub base: Option<String>,

    /// How to realize the head, overrides `head.mode`
    #[arg(long, value_enum)]
    pub head: Option<HeadMode>,

    /// Exit with an error if any fragment or the head fails
    #[arg(long)]
    pub strict: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_assemble() {
        let cli = Cli::try_parse_from([
            "pagekit", "-v", "assemble", "index.html", "-o", "out.html", "--head", "replace",
            "--strict",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from(CONFIG_FILE));
        let Commands::Assemble { args } = cli.command else {
            panic!("expected assemble");
        };
        assert_eq!(args.input, PathBuf::from("index.html"));
        assert_eq!(args.output, Some(PathBuf::from("out.html")));
        assert_eq!(args.head, Some(HeadMode::Replace));
        assert!(args.base.is_none());
        assert!(args.strict);
    }

    #[test]
    fn test_parse_head_with_config() {
        let cli = Cli::try_parse_from(["pagekit", "-C", "site/pagekit.toml", "head"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("site/pagekit.toml"));
        assert!(matches!(cli.command, Commands::Head));
    }
}

//! Command line interface definition

use arcade_types::{ColorChoice, TitleKey};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// arcade - download, update and launch catalog games
#[derive(Parser)]
#[command(name = "arcade")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Download, update and launch games from a remote catalog")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging to <data dir>/logs/
    #[arg(long, global = true)]
    pub debug: bool,

    /// Color output control
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorChoice>,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// List catalog titles and their install state
    #[command(alias = "ls")]
    List,

    /// Install or update a title if needed, then launch it
    Play {
        /// Title id, or catalog position with --index
        title: String,

        /// Treat TITLE as a zero-based catalog position
        #[arg(long)]
        index: bool,
    },

    /// Show installed titles and running pipelines
    Status,

    /// Delete an installed title
    #[command(alias = "rm")]
    Remove {
        /// Title id
        title: String,
    },

    /// Keep the catalog fresh and read play requests from stdin
    Serve,
}

/// Build the play key for `title`
pub fn title_key(title: &str, index: bool) -> Result<TitleKey, String> {
    if index {
        title
            .parse::<usize>()
            .map(TitleKey::Index)
            .map_err(|_| format!("'{title}' is not a catalog position"))
    } else {
        Ok(TitleKey::Id(title.to_string()))
    }
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
    fn test_title_key() {
        assert_eq!(title_key("g1", false), Ok(TitleKey::Id("g1".into())));
        assert_eq!(title_key("3", true), Ok(TitleKey::Index(3)));
        assert!(title_key("g1", true).is_err());
    }

    #[test]
    fn test_play_index_flag() {
        let cli = Cli::try_parse_from(["arcade", "--json", "play", "2", "--index"]).unwrap();
        assert!(cli.global.json);
        match cli.command {
            Commands::Play { title, index } => {
                assert_eq!(title, "2");
                assert!(index);
            }
            _ => panic!("expected play"),
        }
    }
}

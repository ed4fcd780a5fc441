use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::render::Mode;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    /// Path to a configuration file. If omitted, `wiki-gh.toml` is searched for
    /// in the current directory and its ancestors.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Replace every prefixed wiki link in a page with the content it points at.
    Augment {
        /// Path or http(s) URL of the page to augment.
        page: String,
        /// Where to write the augmented page. Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Render with this mode for this run only, ignoring the stored preference.
        #[arg(short, long, value_parser = parse_mode)]
        mode: Option<Mode>,
    },
    /// Inspect and change the stored render mode.
    #[command(subcommand)]
    Mode(ModeSubcommand),
}

#[derive(Debug, Subcommand)]
pub enum ModeSubcommand {
    /// Print the mode that will be used for the given origin.
    Get {
        #[arg(long, default_value = crate::common::FILE_ORIGIN)]
        origin: String,
    },
    /// Store a mode for the given origin.
    Set {
        #[arg(value_parser = parse_mode)]
        mode: Mode,
        #[arg(long, default_value = crate::common::FILE_ORIGIN)]
        origin: String,
    },
    /// Store the opposite of the current mode. Takes effect on the next `augment`.
    Toggle {
        #[arg(long, default_value = crate::common::FILE_ORIGIN)]
        origin: String,
    },
}

fn parse_mode(s: &str) -> Result<Mode, String> {
    Mode::parse(s).ok_or_else(|| format!("unknown mode \"{s}\" (expected \"html\" or \"markdown\")"))
}

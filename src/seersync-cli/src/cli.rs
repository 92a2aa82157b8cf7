//! CLI argument definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "seersync")]
#[command(about = "Mirror versioned game configuration assets", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the named segments inside a packed container
    #[command(visible_alias = "s")]
    Scan {
        /// Path to the container file
        input: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Extract a container into normalized XML files
    #[command(visible_alias = "x")]
    Extract {
        /// Path to the container file
        input: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        /// Write raw segment bytes without decoding
        #[arg(long)]
        raw: bool,
    },

    /// Decode a single object-stream payload to XML
    #[command(visible_alias = "d")]
    Decode {
        /// Path to the payload (deflate-compressed or raw)
        input: PathBuf,

        /// Symbol used for handler dispatch (defaults to the file stem)
        #[arg(short, long)]
        symbol: Option<String>,

        /// Print the normalized tree as JSON instead of XML
        #[arg(long)]
        json: bool,
    },

    /// Check remote versions and mirror platforms that changed
    Sync {
        /// Root directory of the mirror tree
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// Platforms to mirror
        #[arg(short, long, value_enum, default_values_t = vec![PlatformKind::Flash, PlatformKind::Html5])]
        platform: Vec<PlatformKind>,

        /// Mirror even when the local version is current
        #[arg(long)]
        force: bool,

        /// Only report whether updates are available
        #[arg(long)]
        check: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlatformKind {
    Flash,
    Html5,
}

impl std::fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlatformKind::Flash => write!(f, "flash"),
            PlatformKind::Html5 => write!(f, "html5"),
        }
    }
}

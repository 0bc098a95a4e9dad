//! Command line for Greenwave.
//!
//! The application is interactive; the flags only shape where state
//! lives and what the map credential form starts with.

use std::path::PathBuf;

use clap::Parser;

/// Greenwave — emergency vehicle signal override demo.
#[derive(Debug, Parser)]
#[command(name = "greenwave")]
pub struct Cli {
    /// Application root directory (default: ~/.greenwave).
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Prefill the map credential form. The form still has to be
    /// submitted; no map calls happen until then.
    #[arg(long)]
    pub map_key: Option<String>,
}

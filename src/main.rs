mod cli;
mod config;
mod logging;
mod map;
mod model;
mod notify;
mod registry;
mod storage;
mod tui;

use std::process;

use clap::Parser;

use cli::Cli;
use config::Config;
use storage::Storage;

fn main() {
    let args = Cli::parse();

    let root = args.root.or_else(Storage::default_root).unwrap_or_else(|| {
        eprintln!("Could not determine home directory.");
        process::exit(1);
    });

    let storage = match Storage::new(root) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to initialize storage: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = logging::init(storage.root()) {
        eprintln!("Failed to open the log file: {e}");
        process::exit(1);
    }

    let config = match Config::load(storage.root()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            process::exit(1);
        }
    };
    let map_key = args.map_key.or(config.map_api_key);

    if let Err(e) = tui::run(&storage, map_key) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

//! Log setup.
//!
//! The terminal belongs to the UI, so diagnostics go to a log file
//! under the application root. `RUST_LOG` filters as usual; the
//! default level is `info`.

use std::{fs, io, path::Path, sync::Arc};

use tracing_subscriber::EnvFilter;

pub fn init(root: &Path) -> io::Result<()> {
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(root.join("greenwave.log"))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

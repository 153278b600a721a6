//! Logging setup shared by the Murmur binaries.

use std::{fs::OpenOptions, io, path::Path, sync::Mutex};

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Build the filter: `RUST_LOG` wins, otherwise `<crate>=<level>` plus `warn` for the rest.
fn build_filter(bin_name: &str, default_level: &str) -> EnvFilter {
    let crate_target = bin_name.replace('-', "_");
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,{crate_target}={default_level}")))
}

/// Initialize tracing to stdout.
///
/// # Arguments
///
/// * `bin_name` - Binary name, used as the default filter target
/// * `default_level` - Level used when `RUST_LOG` is not set
pub fn setup_logger(bin_name: &str, default_level: &str) {
    tracing_subscriber::registry()
        .with(build_filter(bin_name, default_level))
        .with(fmt::layer().with_target(true))
        .init();
}

/// Initialize tracing to an append-only log file.
///
/// Used by programs that own the terminal, where stdout logging would corrupt the screen.
pub fn setup_file_logger(bin_name: &str, default_level: &str, path: &Path) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::registry()
        .with(build_filter(bin_name, default_level))
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

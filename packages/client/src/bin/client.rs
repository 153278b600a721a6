//! Murmur terminal chat client.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin murmur-client -- --name alice
//! ```

use clap::Parser;
use murmur_client::ClientArgs;
use murmur_shared::logger::setup_file_logger;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = ClientArgs::parse();

    // Initialize tracing; the terminal belongs to the UI
    if let Err(e) = setup_file_logger(env!("CARGO_BIN_NAME"), "debug", &args.log_file) {
        eprintln!("Failed to open log file {}: {}", args.log_file.display(), e);
        std::process::exit(1);
    }

    if let Err(e) = murmur_client::run_client(args).await {
        tracing::error!("Client error: {}", e);
        eprintln!("Client error: {e}");
        std::process::exit(1);
    }
}

//! Murmur relay server.
//!
//! Receives chat and typing events from clients and relays them to the lobby.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin murmur-server -- --port 4000
//! ```

use std::net::{IpAddr, SocketAddr};

use clap::Parser;
use murmur_server::{ServerConfig, domain::entity::DEFAULT_LOBBY_CAPACITY};
use murmur_shared::logger::setup_logger;

#[derive(Debug, Parser)]
#[command(name = "murmur-server", version, about = "Murmur chat relay server")]
struct Args {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port to listen on
    #[arg(short, long, default_value_t = 4000)]
    port: u16,

    /// Maximum simultaneous connections
    #[arg(long, default_value_t = DEFAULT_LOBBY_CAPACITY)]
    capacity: usize,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let config = ServerConfig {
        addr: SocketAddr::new(args.host, args.port),
        capacity: args.capacity,
    };

    if let Err(e) = murmur_server::run_server(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

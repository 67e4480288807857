//! WebRTC signaling and presence relay server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin tsunagi-server
//! cargo run --bin tsunagi-server -- --host 127.0.0.1 --port 3000
//! PORT=8080 HOSTNAME=edge-1 cargo run --bin tsunagi-server
//! ```

use std::sync::Arc;

use clap::Parser;
use tsunagi_server::ui::{AppState, Server, ServerConfig};
use tsunagi_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "tsunagi-server")]
#[command(about = "WebRTC signaling and presence relay", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value = "3000")]
    port: u16,

    /// Host name reported by `GET /hostname`
    #[arg(long, env = "HOSTNAME", default_value = "unknown-host")]
    hostname: String,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    // Registry, dispatcher and use cases
    let state = AppState::in_memory(Arc::new(SystemClock), args.hostname);

    let config = ServerConfig {
        host: args.host,
        port: args.port,
    };
    if let Err(e) = Server::new(state, config).run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

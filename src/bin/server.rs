//! hashbase Server Binary
//!
//! Starts the TCP server for hashbase.

use clap::Parser;
use hashbase::{Config, Context, Server};
use tracing_subscriber::{fmt, EnvFilter};

/// hashbase Server
#[derive(Parser, Debug)]
#[command(name = "hashbase-server")]
#[command(about = "Minimal in-memory key-value server")]
#[command(version)]
struct Args {
    /// TCP port to listen on
    #[arg(short, long, default_value = "5555")]
    port: u16,

    /// Interface to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Listen backlog
    #[arg(long, default_value = "256")]
    backlog: i32,

    /// Number of key slots in the store
    #[arg(short, long, default_value = "512")]
    capacity: usize,

    /// Maximum concurrent connections
    #[arg(short, long, default_value = "1024")]
    max_connections: usize,

    /// Close connections idle for this many seconds (0 = never)
    #[arg(long, default_value = "300")]
    idle_timeout: u64,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hashbase=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("hashbase v{} (pid {})", hashbase::VERSION, std::process::id());

    // Build config from args
    let config = Config::builder()
        .host(&args.host)
        .port(args.port)
        .backlog(args.backlog)
        .store_capacity(args.capacity)
        .max_connections(args.max_connections)
        .read_timeout_ms(args.idle_timeout.saturating_mul(1000))
        .build();

    let context = match Context::new(config) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let server = match Server::bind(context) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to start listener: {}", e);
            std::process::exit(1);
        }
    };

    // Ctrl+C / SIGTERM trigger a graceful shutdown
    let shutdown = server.shutdown_handle();
    if let Err(e) = ctrlc::set_handler(move || {
        tracing::info!("Received shutdown signal, closing hashbase...");
        shutdown.shutdown();
    }) {
        tracing::warn!("Could not install signal handler: {}", e);
    }

    tracing::info!("Waiting for incoming connections...");

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}

#![cfg(feature = "server")]

use clap::Parser;
use pairchat::config::Config;
use pairchat::server::telemetry::{init_telemetry, shutdown_telemetry};
use pairchat::server::{create_chat_route, AppState};
use std::net::IpAddr;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "server", version, about = "Anonymous one-on-one chat server")]
struct Cli {
    /// Address to bind to
    #[arg(long)]
    host: Option<IpAddr>,

    /// Port to listen on
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Largest accepted WebSocket frame, in bytes
    #[arg(long)]
    max_frame_bytes: Option<usize>,

    /// Frames buffered per connection before sends to it are dropped
    #[arg(long)]
    outbound_queue: Option<usize>,

    /// Log filter directives (overridden by RUST_LOG)
    #[arg(long)]
    log: Option<String>,

    /// Export traces to Jaeger
    #[arg(long)]
    telemetry: bool,

    /// Jaeger collector endpoint
    #[arg(long)]
    jaeger_endpoint: Option<String>,
}

impl Cli {
    fn apply(self, mut config: Config) -> Config {
        if let Some(host) = self.host {
            config.bind_address.set_ip(host);
        }
        if let Some(port) = self.port {
            config.bind_address.set_port(port);
        }
        if let Some(max_frame_bytes) = self.max_frame_bytes {
            config.max_frame_bytes = max_frame_bytes;
        }
        if let Some(outbound_queue) = self.outbound_queue {
            config.outbound_queue = outbound_queue.max(1);
        }
        if let Some(log) = self.log {
            config.log_filter = log;
        }
        if self.telemetry {
            config.enable_telemetry = true;
        }
        if let Some(endpoint) = self.jaeger_endpoint {
            config.jaeger_endpoint = endpoint;
        }
        config
    }
}

#[tokio::main]
pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().apply(Config::from_env());
    init_telemetry(&config)?;

    let state = AppState::new(config.clone());
    let app = create_chat_route(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;
    info!(address = %config.bind_address, "Chat server listening");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = ?e, "Failed to listen for shutdown signal");
            }
        })
        .await
    {
        error!(error = ?e, "Server error");
    }

    info!("Shutting down");
    shutdown_telemetry(&config);
    Ok(())
}

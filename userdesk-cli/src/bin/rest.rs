//! REST-only entry point: the gateway without the interactive front-ends.

use clap::Parser;
use std::error::Error;
use std::net::SocketAddr;
use std::path::Path;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt};
use userdesk_core::config::AppConfig;
use userdesk_core::server;

#[derive(Parser)]
#[command(name = "userdesk-rest", about = "userdesk REST gateway")]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<String>,

    /// Bind address, overriding `[rest].bind`
    #[arg(long)]
    addr: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    init_tracing();
    info!("Starting userdesk REST gateway");

    let config_path = args.config.as_deref().map(Path::new);
    let mut config = AppConfig::load(config_path)?;
    if let Some(addr) = args.addr {
        config.rest.bind = addr.to_string();
    }
    debug!(provider = %config.default_provider, model = %config.model, bind = %config.rest.bind, "Configuration loaded");

    server::run_gateway(&config).await?;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .init();
}

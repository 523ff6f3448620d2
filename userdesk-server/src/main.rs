//! Stdio entry point for the user-record server.
//!
//! stdout carries protocol traffic only; logs go to stderr.

use clap::Parser;
use std::error::Error;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};
use userdesk_server::randomuser::DEFAULT_ENDPOINT;
use userdesk_server::{ServerSettings, UserDeskService, serve};

#[derive(Parser, Debug)]
#[command(name = "userdesk-server", version, about = "User-record MCP server over stdio")]
struct Args {
    /// Directory holding users.json; also the only directory file:// reads may touch
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Random user generator endpoint
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    random_user_endpoint: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let args = Args::parse();

    tokio::fs::create_dir_all(&args.data_dir).await?;
    let settings = ServerSettings::new(args.data_dir).with_random_user_endpoint(args.random_user_endpoint);
    info!(
        data_dir = %settings.data_dir.display(),
        endpoint = %settings.random_user_endpoint,
        "Starting userdesk-server"
    );

    let service = UserDeskService::new(&settings);
    serve(service, tokio::io::stdin(), tokio::io::stdout()).await?;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

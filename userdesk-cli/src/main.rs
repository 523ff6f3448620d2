mod cli;
mod menu;
mod smoke;

use clap::Parser;
use cli::{Cli, RunMode};
use serde_json::json;
use std::error::Error;
use std::path::Path;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt};
use userdesk_core::config::AppConfig;
use userdesk_core::model::ProviderFactory;
use userdesk_core::server::{self, AppContext};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.mode);
    info!(mode = ?cli.mode, "Starting userdesk");

    let config_path = cli.config.as_deref().map(Path::new);
    let mut config = AppConfig::load(config_path)?;
    debug!(provider = %config.default_provider, model = %config.model, "Configuration loaded");

    match cli.mode {
        RunMode::Rest => {
            if let Some(addr) = cli.addr {
                config.rest.bind = addr.to_string();
            }
            server::run_gateway(&config).await?;
        }
        RunMode::Menu => {
            let context = connect(&config).await?;
            let result = menu::run(&context).await;
            context.session().close().await;
            result?;
        }
        RunMode::Query => {
            let query = cli.query.join(" ").trim().to_string();
            if query.is_empty() {
                return Err("query text required: userdesk --mode query \"<text>\"".into());
            }
            let context = connect(&config).await?;
            let result = context.agent().run(query).await;
            context.session().close().await;
            let outcome = result.map_err(|err| err.user_message())?;
            let output = json!({
                "response": outcome.outcome.text(),
                "outcome": outcome.outcome.kind(),
                "exchanges": outcome.exchanges,
                "tool_calls": outcome.tool_calls,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        RunMode::Smoke => {
            let context = connect(&config).await?;
            println!("[ok] handshake with {}", config.server.name);
            let result = smoke::run(context.session().as_ref()).await;
            context.session().close().await;
            match result {
                Ok(report) => {
                    for step in &report.steps {
                        println!("[ok] {step}");
                    }
                    println!("Smoke test passed.");
                }
                Err(err) => {
                    println!("[failed] {err}");
                    return Err(err.into());
                }
            }
        }
    }

    info!("userdesk finished");
    Ok(())
}

async fn connect(config: &AppConfig) -> Result<AppContext, Box<dyn Error>> {
    let provider = ProviderFactory::create(config.active_provider()?);
    let context = AppContext::connect(config, provider).await?;
    info!(
        server = %config.server.name,
        tools = context.tools().len(),
        "Backend session established"
    );
    Ok(context)
}

/// The menu owns the terminal, so it stays quiet unless `RUST_LOG` asks otherwise.
fn init_tracing(mode: RunMode) {
    let fallback = if mode == RunMode::Menu { "off" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();
}

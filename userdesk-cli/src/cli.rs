use std::net::SocketAddr;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "userdesk",
    version,
    about = "Talk to the user-record server through a function-calling model"
)]
pub struct Cli {
    /// Configuration file (defaults to config/client.toml)
    #[arg(long, short)]
    pub config: Option<String>,
    #[arg(long, short, value_enum, default_value_t = RunMode::Menu)]
    pub mode: RunMode,
    /// REST bind address, overriding `[rest].bind`
    #[arg(long)]
    pub addr: Option<SocketAddr>,
    /// Query text for `--mode query`
    #[arg()]
    pub query: Vec<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum RunMode {
    /// Interactive menu over stdin
    Menu,
    /// Answer one query and print the result as JSON
    Query,
    /// Exercise every backend capability once and verify the results
    Smoke,
    /// REST gateway
    Rest,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_menu_mode() {
        let cli = Cli::parse_from(["userdesk"]);
        assert_eq!(cli.mode, RunMode::Menu);
        assert!(cli.query.is_empty());
    }

    #[test]
    fn query_words_are_collected() {
        let cli = Cli::parse_from(["userdesk", "--mode", "query", "how", "many", "users?"]);
        assert_eq!(cli.mode, RunMode::Query);
        assert_eq!(cli.query.join(" "), "how many users?");
    }
}

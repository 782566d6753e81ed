mod ai;
mod config;
mod server;

use anyhow::Result;
use std::env;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,mailgen=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_usage() {
    eprintln!(
        r#"mailgen - AI email condense & reply web service

Usage: mailgen [command]

Commands:
    (none)      Start the web server
    help        Show this help message

Configuration file: ~/.config/mailgen/config.toml
Environment:        OPENROUTER_API_KEY
"#
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        Some("help") | Some("--help") | Some("-h") => {
            print_usage();
            Ok(())
        }
        Some(cmd) => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            std::process::exit(1);
        }
        None => {
            setup_logging();

            let config = Config::load()?;
            server::run_server(config).await
        }
    }
}

use std::io::IsTerminal;

use benchflux::config::{normalize_flag_args, Cli, Config};
use benchflux::influx::{HttpClient, HttpConfig};
use benchflux::{error, pipeline, USER_AGENT};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn tracing_init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("benchflux=warn"));
    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_init();

    let cli = Cli::parse_from(normalize_flag_args(std::env::args()));
    let config = Config::from_cli(cli).with_env_overrides(|key| std::env::var(key).ok());

    let result = pipeline::run(&config, |config| {
        HttpClient::new(HttpConfig::new(config.url.as_str(), USER_AGENT))
    })
    .await;

    if let Err(e) = result {
        tracing::debug!(error = ?e, "run failed");
        // Reported regardless of the log filter.
        eprintln!("benchflux: {}", e);
        eprintln!("benchflux: {}", error::user_friendly_message(&e));
        std::process::exit(1);
    }
}

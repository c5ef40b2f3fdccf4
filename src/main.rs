use practime::commands::Cli;
use std::env;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = if env::var("PRACTIME_DEBUG").is_ok() {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // stdout carries the host protocol in `serve` mode
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    Cli::menu().await
}

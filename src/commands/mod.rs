pub mod init;
pub mod reset;
pub mod serve;
pub mod stats;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configure which pages are tracked")]
    Init(init::InitArgs),
    #[command(about = "Run the background core over stdin/stdout")]
    Serve,
    #[command(about = "Show practice time and click counts")]
    Stats(stats::StatsArgs),
    #[command(about = "Reset today's time and click counts")]
    ResetToday,
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Serve => serve::cmd().await,
            Commands::Stats(args) => stats::cmd(args).await,
            Commands::ResetToday => reset::cmd().await,
        }
    }
}

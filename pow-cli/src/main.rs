//! pow CLI - reconciled multi-model snow forecasts for ski resorts.

use clap::Parser;
use log::debug;

#[derive(Parser)]
#[command(
    name = "pow-cli",
    version,
    about = "Ski resort snow forecasts reconciled across weather models"
)]
struct Cli {
    #[command(subcommand)]
    command: pow_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    debug!("pow-cli {}", env!("CARGO_PKG_VERSION"));
    pow_cmd::run(cli.command).await
}

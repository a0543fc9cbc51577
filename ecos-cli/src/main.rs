//! ECOS CLI - render Bank of Korea key statistics as tables and charts.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "ecos-cli",
    version,
    about = "Bank of Korea ECOS key statistics dashboard"
)]
struct Cli {
    #[command(subcommand)]
    command: ecos_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    ecos_cmd::run(cli.command).await
}

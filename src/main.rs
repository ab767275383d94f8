use clap::Parser;
use dotenvy::dotenv;
use schooldesk::cli::{self, Cli, Settings};
use schooldesk_observability::init_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let cli = Cli::parse();
    cli::run(cli, Settings::from_env()).await
}

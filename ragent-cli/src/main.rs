use clap::Parser;
use ragent_cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    ragent_cli::run(Cli::parse()).await
}

use clap::Parser;
use g2p_backend::{config::Cli, server::serve};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().unwrap_or_default();
    let Cli { config, log_dir } = Cli::parse();

    serve(config, log_dir).await
}

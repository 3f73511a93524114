//! House price service - Main Entry Point

use clap::Parser;
use house_price::cli::{cmd_inspect, cmd_predict, cmd_serve, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "house_price=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve { port, host, model }) => {
            cmd_serve(host, port, model).await?;
        }
        Some(Commands::Predict { model, input }) => {
            cmd_predict(&model, &input)?;
        }
        Some(Commands::Inspect { model }) => {
            cmd_inspect(&model)?;
        }
        None => {
            cmd_serve(None, None, None).await?;
        }
    }

    Ok(())
}

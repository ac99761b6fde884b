use pulse_runner::FeedRuntime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_help() {
    eprintln!(
        r#"Pulse - live market data feed

USAGE:
    pulse [OPTIONS]

OPTIONS:
    --config <PATH>     Load configuration from JSON file
    --help              Print this help message

ENVIRONMENT VARIABLES:
    RUST_LOG            Log level filter

EXAMPLES:
    # Run against the default endpoints
    pulse

    # Run with a config file
    pulse --config feed.json
"#
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pulse=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--config" | "-c" => {
                i += 1;
                if i >= args.len() {
                    anyhow::bail!("--config requires a path argument");
                }
                config_path = Some(args[i].clone());
            }
            other => {
                anyhow::bail!("Unknown argument: {}", other);
            }
        }
        i += 1;
    }

    let runtime = match config_path {
        Some(path) => FeedRuntime::from_file(path)?,
        None => FeedRuntime::new()?,
    };

    runtime.start().await;
    tracing::info!("Feed running, press ctrl-c to stop");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");
    runtime.shutdown();

    Ok(())
}

use naughty_nice::cli::{Cli, Command};
use naughty_nice::config::Settings;
use naughty_nice::load;
use naughty_nice::server::start_server;

use clap::Parser;
use tracing::{error, Level};
use tracing_subscriber::EnvFilter;

fn init_tracing(level: Level) {
    // RUST_LOG, when set, wins over the configured trace level.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    match Cli::parse().command() {
        Command::Serve(args) => {
            let settings = Settings::load(&args)?;
            init_tracing(settings.get_trace_level());

            if let Err(e) = start_server(settings).await {
                error!("{e}");
                return Err(e.into());
            }
        }
        Command::Load(args) => {
            init_tracing(Level::INFO);

            let report = load::run(&args).await?;
            println!("{report}");
        }
    }

    Ok(())
}

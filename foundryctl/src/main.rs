use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Instrument;
use tracing_subscriber::{
    EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

mod movies;

#[derive(Parser)]
#[command(
    name = "foundryctl",
    version,
    about = "Catalog a video library: naming, kits, groups and resolutions"
)]
struct Cli {
    /// Log filter (e.g. `debug`, `foundry::probe=trace`). Overrides RUST_LOG.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Movie library commands
    Movies {
        #[command(subcommand)]
        action: MoviesAction,
    },
}

#[derive(Subcommand)]
enum MoviesAction {
    /// List all movies in the given directory and print a report
    List(movies::ListArgs),
}

fn init_tracing(log_level: Option<&str>) {
    let filter = match log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "warn".into()),
    };
    // stdout carries the report; logs go to stderr.
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    // Error level keeps the span enabled under the default `warn` filter.
    let run_id = format!("run.id.{}", uuid::Uuid::new_v4());
    let span = tracing::error_span!("run", id = %run_id);

    match cli.command {
        Command::Movies {
            action: MoviesAction::List(args),
        } => movies::list(args).instrument(span).await,
    }
}

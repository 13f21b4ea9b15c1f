use crate::recommend::{run_recommend, RecommendArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use scholar_match::config::AppConfig;
use scholar_match::error::AppError;
use scholar_match::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "Scholarship Match",
    about = "Serve or run scholarship recommendations from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Rank scholarships for one user from local profile and catalog files
    Recommend(RecommendArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Recommend(args) => recommend(args, AppConfig::load()?),
    }
}

fn recommend(args: RecommendArgs, config: AppConfig) -> Result<(), AppError> {
    telemetry::init_stderr(&config.telemetry)?;
    run_recommend(args, config.recommendations.default_limit)
}

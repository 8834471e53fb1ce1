use crate::demo::{run_demo, run_suggest, DemoArgs, SuggestArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use truevibe::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "TrueVibe Scorecards",
    about = "Run and demonstrate the influencer scorecard engine from the command line",
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
    /// Score a sample campaign end to end and print the results
    Demo(DemoArgs),
    /// Print pre-fill slider values for a set of influencer metrics
    Suggest(SuggestArgs),
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
        Command::Demo(args) => run_demo(args),
        Command::Suggest(args) => run_suggest(args),
    }
}

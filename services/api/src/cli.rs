use crate::demo::{run_demo, run_review_report, DemoArgs, ReviewReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use scorecard_ai::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Performance Scorecard Service",
    about = "Run the balanced-scorecard performance service and its reporting tools",
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
    /// Generate a period review from a legacy sheet export
    Review {
        #[command(subcommand)]
        command: ReviewCommand,
    },
    /// Run an end-to-end CLI demo covering submissions, reviews, and awards
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum ReviewCommand {
    /// Synthesize a quarterly or yearly review for one employee
    Report(ReviewReportArgs),
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
        Command::Review {
            command: ReviewCommand::Report(args),
        } => run_review_report(args),
        Command::Demo(args) => run_demo(args),
    }
}

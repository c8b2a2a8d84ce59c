use crate::commands::{
    run_contributions, run_dashboard, run_leaderboard, run_notify, ContributionsCommand,
    DashboardArgs, LeaderboardArgs, NotifyCommand,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use content_tracker::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "content-tracker",
    about = "Track team content contributions and send the monthly reminders",
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
    /// Print employee cards and team progress for a month
    Dashboard(DashboardArgs),
    /// Print the yearly leaderboard
    Leaderboard(LeaderboardArgs),
    /// Run a scheduled e-mail job
    Notify {
        #[command(subcommand)]
        command: NotifyCommand,
    },
    /// Add, remove, export, or import contributions
    Contributions {
        #[command(subcommand)]
        command: ContributionsCommand,
    },
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
        Command::Dashboard(args) => run_dashboard(args),
        Command::Leaderboard(args) => run_leaderboard(args),
        Command::Notify { command } => run_notify(command),
        Command::Contributions { command } => run_contributions(command),
    }
}

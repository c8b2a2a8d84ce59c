use crate::infra::{parse_date, parse_kind, parse_month, parse_status, ContributionStore};
use chrono::{Datelike, Local, NaiveDate};
use clap::{Args, Subcommand};
use content_tracker::config::AppConfig;
use content_tracker::error::AppError;
use content_tracker::notifications::{JobOutcome, NotificationJobs, ScheduledRun, TracingMailer};
use content_tracker::telemetry;
use content_tracker::tracker::contributions::{
    read_contributions, write_contributions, ContributionRepository, ContributionService,
};
use content_tracker::tracker::stats::{Standings, StatsService};
use content_tracker::tracker::{
    ContributionId, ContributionKind, ContributionStatus, EmployeeId, MonthKey, NewContribution,
    Roster,
};
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct StoreArgs {
    /// SQLite database file (defaults to TRACKER_DATABASE_PATH, then a seeded
    /// in-memory store)
    #[arg(long)]
    pub(crate) database: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct DashboardArgs {
    /// Month to report (YYYY-MM). Defaults to the current month.
    #[arg(long, value_parser = parse_month)]
    pub(crate) month: Option<MonthKey>,
    #[command(flatten)]
    pub(crate) store: StoreArgs,
}

#[derive(Args, Debug)]
pub(crate) struct LeaderboardArgs {
    /// Year to rank. Defaults to the current year.
    #[arg(long)]
    pub(crate) year: Option<i32>,
    #[command(flatten)]
    pub(crate) store: StoreArgs,
}

#[derive(Subcommand, Debug)]
pub(crate) enum NotifyCommand {
    /// Send the personal reminders (first and last Tuesday)
    Reminder(NotifyArgs),
    /// Send the team status report (first Tuesday)
    TeamStatus(NotifyArgs),
}

#[derive(Args, Debug)]
pub(crate) struct NotifyArgs {
    /// Send even when the date is outside the schedule
    #[arg(long)]
    pub(crate) force: bool,
    /// Only send to this address
    #[arg(long)]
    pub(crate) email: Option<String>,
    /// Evaluate the schedule for this date (YYYY-MM-DD) instead of today
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    #[command(flatten)]
    pub(crate) store: StoreArgs,
}

#[derive(Subcommand, Debug)]
pub(crate) enum ContributionsCommand {
    /// Record a contribution
    Add(AddArgs),
    /// Delete a contribution by id
    Remove {
        id: String,
        #[command(flatten)]
        store: StoreArgs,
    },
    /// Write every contribution as CSV (stdout unless --output is given)
    Export {
        #[arg(long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        store: StoreArgs,
    },
    /// Load contributions from a CSV file
    Import {
        input: PathBuf,
        #[command(flatten)]
        store: StoreArgs,
    },
}

#[derive(Args, Debug)]
pub(crate) struct AddArgs {
    /// Roster id of the author
    #[arg(long)]
    pub(crate) employee: u32,
    #[arg(long)]
    pub(crate) title: String,
    /// insight, customer_story, or other
    #[arg(long = "type", value_parser = parse_kind, default_value = "insight")]
    pub(crate) kind: ContributionKind,
    /// draft, in_review, or published
    #[arg(long, value_parser = parse_status, default_value = "draft")]
    pub(crate) status: ContributionStatus,
    /// Contribution date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) date: Option<NaiveDate>,
    #[command(flatten)]
    pub(crate) store: StoreArgs,
}

fn open_store(args: StoreArgs, config: &AppConfig) -> Result<Arc<ContributionStore>, AppError> {
    let path = args.database.or_else(|| config.storage.database_path.clone());
    let store = ContributionStore::open(path.as_deref())?;
    if !store.is_persistent() {
        eprintln!("note: no database configured, using sample data; changes are not saved");
    }
    Ok(Arc::new(store))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub(crate) fn run_dashboard(args: DashboardArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let store = open_store(args.store, &config)?;
    let month = args.month.unwrap_or_else(|| MonthKey::from_date(today()));
    let stats = StatsService::new(store, Arc::new(Roster::team()));
    let view = stats.dashboard(month)?;

    println!("Content dashboard: {} {}", view.team.month_label, month.year());
    println!(
        "Team: {} / {} published ({}%)",
        view.team.progress.published, view.team.progress.goal, view.team.progress.percent
    );
    println!(
        "\n{:<12} {:<12} {:>9} {:>10} {:>7}",
        "Name", "Role", "Delivered", "Published", "Streak"
    );
    for card in &view.employees {
        println!(
            "{:<12} {:<12} {:>5} / {} {:>10} {:>7}",
            card.name, card.role, card.delivered, card.target, card.published, card.streak
        );
    }
    Ok(())
}

pub(crate) fn run_leaderboard(args: LeaderboardArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let store = open_store(args.store, &config)?;
    let today = today();
    let year = args.year.unwrap_or(today.year());
    let stats = StatsService::new(store, Arc::new(Roster::team()));
    let view = stats.leaderboard(year, today)?;

    println!("Leaderboard {year}");
    for entry in &view.entries {
        println!("{:>3}. {:<12} {}", entry.rank, entry.name, entry.published);
    }
    match &view.standings {
        Standings::NoPublications => println!("\nNo publications yet."),
        Standings::Tied { published, leaders } => {
            let names: Vec<&str> = leaders.iter().map(|e| e.name.as_str()).collect();
            println!("\nTied at {published}: {}", names.join(", "));
        }
        Standings::Podium { entries } => {
            if let Some(leader) = entries.first() {
                println!("\nLeader: {} with {}", leader.name, leader.published);
            }
        }
    }
    for comeback in &view.comebacks {
        println!(
            "Comeback: {} after {} months",
            comeback.name, comeback.months_away
        );
    }
    Ok(())
}

pub(crate) fn run_notify(command: NotifyCommand) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let (args, team_status) = match command {
        NotifyCommand::Reminder(args) => (args, false),
        NotifyCommand::TeamStatus(args) => (args, true),
    };
    let store = open_store(args.store, &config)?;
    let jobs = NotificationJobs::new(
        store,
        Arc::new(TracingMailer),
        Arc::new(Roster::team()),
        config.mail.clone(),
    );
    let run = ScheduledRun {
        force: args.force,
        email: args.email,
        today: args.today.unwrap_or_else(today),
    };

    let outcome = if team_status {
        jobs.send_team_status(&run)?
    } else {
        jobs.send_reminders(&run)?
    };

    println!("{}", outcome.message());
    if let JobOutcome::Dispatched { deliveries, .. } = &outcome {
        for delivery in deliveries {
            match &delivery.error {
                None => println!("  sent   {}", delivery.email),
                Some(error) => println!("  failed {} ({error})", delivery.email),
            }
        }
    }
    Ok(())
}

pub(crate) fn run_contributions(command: ContributionsCommand) -> Result<(), AppError> {
    let config = AppConfig::load()?;

    match command {
        ContributionsCommand::Add(args) => {
            let store = open_store(args.store, &config)?;
            let service = ContributionService::new(
                store,
                Arc::new(TracingMailer),
                Arc::new(Roster::team()),
                config.mail.clone(),
            );
            let saved = service.create(
                NewContribution {
                    id: None,
                    employee_id: EmployeeId(args.employee),
                    title: args.title,
                    kind: args.kind,
                    status: args.status,
                    date: args.date,
                },
                today(),
            )?;
            println!(
                "recorded {} ({}, {}, {})",
                saved.id,
                saved.kind.label(),
                saved.status.label(),
                saved.date
            );
        }
        ContributionsCommand::Remove { id, store } => {
            let store = open_store(store, &config)?;
            let id = ContributionId(id);
            store.delete(&id)?;
            println!("deleted {id}");
        }
        ContributionsCommand::Export { output, store } => {
            let store = open_store(store, &config)?;
            let contributions = store.list()?;
            match output {
                Some(path) => {
                    write_contributions(BufWriter::new(File::create(&path)?), &contributions)?;
                    eprintln!("exported {} contributions to {}", contributions.len(), path.display());
                }
                None => write_contributions(io::stdout().lock(), &contributions)?,
            }
        }
        ContributionsCommand::Import { input, store } => {
            let store = open_store(store, &config)?;
            let roster = Roster::team();
            let contributions = read_contributions(BufReader::new(File::open(&input)?))?;
            if let Some(stranger) = contributions
                .iter()
                .find(|c| roster.get(c.employee_id).is_none())
            {
                return Err(AppError::InvalidInput(format!(
                    "employee {} in {} is not on the roster",
                    stranger.employee_id,
                    input.display()
                )));
            }
            let total = store.insert_all(contributions)?;
            println!("imported {total} contributions");
        }
    }
    Ok(())
}

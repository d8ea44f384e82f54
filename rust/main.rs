use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use workdate::json::JSON;
use workdate::scheduling::{
    create_preferred_calendar, parse_date, Algorithm, DateRoll, ScheduleConfiguration,
    ScheduleSettings, WorkdaySpec,
};

/// Find the next valid business date under a recurring schedule.
#[derive(Parser)]
#[command(name = "workdate", version, about)]
struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the next valid date as YYYY-MM-DD.
    Next(NextArgs),
    /// Print a month of the work calendar.
    Show(ShowArgs),
}

/// Options describing the schedule, layered over an optional JSON settings file.
#[derive(Args)]
struct ScheduleArgs {
    /// Path to a JSON settings file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Standard workdays: a preset name or Sunday=0 ordinals, e.g. "1,2,3,4,5".
    #[arg(short, long)]
    workdays: Option<WorkdaySpec>,

    /// Preferred workdays as Sunday=0 ordinals.
    #[arg(short, long, value_delimiter = ',')]
    preferred: Vec<u8>,

    /// Preferred days of the month.
    #[arg(long, value_delimiter = ',')]
    preferred_days: Vec<u32>,

    /// Months the preferred days apply to. Every month if omitted.
    #[arg(long, value_delimiter = ',', requires = "preferred_days")]
    preferred_months: Vec<u32>,

    /// An excluded date, YYYY-MM-DD. May be repeated.
    #[arg(short = 'x', long)]
    exclude: Vec<String>,

    /// Search algorithm, e.g. "closest-preferred-workday".
    #[arg(short, long)]
    algorithm: Option<Algorithm>,
}

#[derive(Args)]
struct NextArgs {
    #[command(flatten)]
    schedule: ScheduleArgs,

    /// Reference date to search from. Defaults to today.
    #[arg(long)]
    from: Option<String>,

    /// Earliest date a closest search may return. Defaults to the reference date.
    #[arg(long)]
    earliest: Option<String>,
}

#[derive(Args)]
struct ShowArgs {
    #[command(flatten)]
    schedule: ScheduleArgs,

    #[arg(long)]
    year: i32,

    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: u32,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

/// `RUST_LOG` overrides the verbosity flag if set.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("workdate={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Next(args) => {
            let config = build_configuration(&args.schedule)?;
            let from = args.from.as_deref().map(parse_date).transpose()?;
            let earliest = args.earliest.as_deref().map(parse_date).transpose()?;
            println!("{}", config.next_as_string(from, earliest)?);
        }
        Command::Show(args) => {
            let config = build_configuration(&args.schedule)?;
            print!("{}", config.calendar().print_month(args.year, args.month));
        }
    }
    Ok(())
}

fn build_configuration(args: &ScheduleArgs) -> Result<ScheduleConfiguration> {
    let mut settings = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading settings file {}", path.display()))?;
            ScheduleSettings::from_json(&text)
                .with_context(|| format!("parsing settings file {}", path.display()))?
        }
        None => ScheduleSettings::default(),
    };

    if let Some(workdays) = &args.workdays {
        settings.workdays = workdays.clone();
    }
    if !args.preferred.is_empty() {
        settings.preferred_workdays = Some(args.preferred.clone());
    }
    if !args.preferred_days.is_empty() {
        let months: Vec<u32> = if args.preferred_months.is_empty() {
            (1..=12).collect()
        } else {
            args.preferred_months.clone()
        };
        settings.preferred_calendar = Some(create_preferred_calendar(&args.preferred_days, &months));
    }
    if !args.exclude.is_empty() {
        settings
            .excluded_dates
            .get_or_insert_with(Vec::new)
            .extend(args.exclude.iter().cloned());
    }
    if let Some(algorithm) = args.algorithm {
        settings.algorithm = algorithm;
    }

    info!(algorithm = %settings.algorithm, "Building schedule");
    Ok(settings.build()?)
}

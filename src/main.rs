mod handlers;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use folga::engine::config::Config;
use folga::engine::error::FolgaError;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Default rest length when no end date is given.
const DEFAULT_REST_DAYS: u32 = 12;

#[derive(Parser)]
#[command(name = "folga", version, about = "Rest-leave cycle tracker for field workers")]
struct Cli {
    /// Path to the state database
    #[arg(long, global = true, env = "FOLGA_DB")]
    db: Option<PathBuf>,
    /// IANA time zone used to compute today's date
    #[arg(long, global = true, env = "FOLGA_TZ")]
    tz: Option<String>,
    /// Pin today's date (YYYY-MM-DD)
    #[arg(long, global = true, env = "FOLGA_TODAY")]
    today: Option<String>,
    /// Projection window for open-ended work spans: fixed or widening
    #[arg(long, global = true, env = "FOLGA_WINDOW")]
    window: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Clone)]
enum Commands {
    /// Initialize the folga database
    Init,
    /// Register a new worker
    Hire {
        name: String,
        #[arg(long, short = 'r')]
        role: Option<String>,
    },
    /// Record a rest interval for a worker
    Rest {
        /// Worker ID or exact name
        worker: String,
        /// First rest day (YYYY-MM-DD)
        start: String,
        /// Last rest day (YYYY-MM-DD); defaults to START + DAYS - 1
        end: Option<String>,
        #[arg(long, short = 'd', default_value_t = DEFAULT_REST_DAYS)]
        days: u32,
    },
    /// Move a rest interval to new dates
    Move {
        id: i64,
        start: String,
        end: Option<String>,
        #[arg(long, short = 'd', default_value_t = DEFAULT_REST_DAYS)]
        days: u32,
    },
    /// Delete a rest interval
    Cancel { id: String },
    /// Archive a worker (by ID or exact name)
    Archive { worker: String },
    /// Restore an archived worker (by ID or exact name)
    Restore { worker: String },
    /// Bring cached cycle anchors up to date
    Reconcile,
    /// Show the cycle status of every active worker
    Board {
        #[arg(long)]
        json: bool,
    },
    /// Print calendar resources as JSON
    Resources,
    /// Print calendar events as JSON
    Events {
        /// Only events of this worker
        #[arg(long, short = 'w')]
        worker: Option<String>,
        /// Allow approximate worker names
        #[arg(long)]
        fuzzy: bool,
        /// Omit rest events
        #[arg(long)]
        no_rest: bool,
        /// Omit projected work events
        #[arg(long)]
        no_work: bool,
    },
    /// List archived workers
    Archived {
        #[arg(long)]
        json: bool,
    },
    /// Explain a worker's cycle and rest history
    Why {
        worker: String,
        /// Allow approximate worker names
        #[arg(long)]
        fuzzy: bool,
    },
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            exit_code_for(&err)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Not-found errors exit with 2, bad input with 3, everything else with 1.
fn exit_code_for(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<FolgaError>() {
        Some(e) if e.is_not_found() => ExitCode::from(2),
        Some(e) if e.is_invalid_input() => ExitCode::from(3),
        _ => ExitCode::FAILURE,
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::from_raw(
        cli.db,
        cli.tz.as_deref(),
        cli.today.as_deref(),
        cli.window.as_deref(),
    )?;
    tracing::debug!(db = %config.db_path.display(), tz = %config.timezone, window = %config.window, "configuration loaded");

    match cli.command {
        Commands::Init
        | Commands::Hire { .. }
        | Commands::Rest { .. }
        | Commands::Move { .. }
        | Commands::Cancel { .. }
        | Commands::Archive { .. }
        | Commands::Restore { .. }
        | Commands::Reconcile => dispatch_write_ops(&config, cli.command),
        Commands::Board { .. }
        | Commands::Resources
        | Commands::Events { .. }
        | Commands::Archived { .. }
        | Commands::Why { .. } => dispatch_read_ops(&config, cli.command),
    }
}

fn dispatch_write_ops(config: &Config, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Init => handlers::init::handle(config),
        Commands::Hire { name, role } => handlers::hire::handle(config, &name, role.as_deref()),
        Commands::Rest {
            worker,
            start,
            end,
            days,
        } => handlers::rest::handle(config, &worker, &start, end.as_deref(), days),
        Commands::Move {
            id,
            start,
            end,
            days,
        } => handlers::move_rest::handle(config, id, &start, end.as_deref(), days),
        Commands::Cancel { id } => handlers::cancel::handle(config, &id),
        Commands::Archive { worker } => handlers::archive::handle(config, &worker, false),
        Commands::Restore { worker } => handlers::archive::handle(config, &worker, true),
        Commands::Reconcile => handlers::reconcile::handle(config),
        _ => unreachable!("Invalid write command dispatch"),
    }
}

fn dispatch_read_ops(config: &Config, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Board { json } => handlers::board::handle(config, json),
        Commands::Resources => handlers::resources::handle(config),
        Commands::Events {
            worker,
            fuzzy,
            no_rest,
            no_work,
        } => handlers::events::handle(config, worker.as_deref(), fuzzy, !no_rest, !no_work),
        Commands::Archived { json } => handlers::archived::handle(config, json),
        Commands::Why { worker, fuzzy } => handlers::why::handle(config, &worker, fuzzy),
        _ => unreachable!("Invalid read command dispatch"),
    }
}

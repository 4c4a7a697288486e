//! Student attendance CLI.
//!
//! # Responsibility
//! - Gate every command behind the login check.
//! - Resolve configuration, start logging and open the database.
//! - Dispatch subcommands to core services and render their results.

mod commands;
mod output;

use anyhow::{bail, Context as _, Result};
use attendance_core::config::{DB_PATH_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV};
use attendance_core::{
    init_logging, open_db, Authenticator, CoreConfig, Credentials, StaticCredentials,
};
use clap::{Parser, Subcommand};
use log::{info, warn};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "attendance")]
#[command(version, about = "Student attendance tracker", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = output::OutputFormat::Table)]
    format: output::OutputFormat,

    /// Suppress confirmation messages
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Database file
    #[arg(long, env = DB_PATH_ENV, global = true)]
    db: Option<PathBuf>,

    /// Log directory
    #[arg(long, env = LOG_DIR_ENV, global = true)]
    log_dir: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error
    #[arg(long, env = LOG_LEVEL_ENV, global = true)]
    log_level: Option<String>,

    /// Login username
    #[arg(long, env = "ATTENDANCE_USER", global = true)]
    user: Option<String>,

    /// Login password
    #[arg(long, env = "ATTENDANCE_PASSWORD", hide_env_values = true, global = true)]
    password: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the student roster
    Student {
        #[command(subcommand)]
        action: commands::student::StudentAction,
    },

    /// Mark and correct attendance
    Attendance {
        #[command(subcommand)]
        action: commands::attendance::AttendanceAction,
    },

    /// Generate attendance reports
    Report {
        #[command(subcommand)]
        action: commands::report::ReportAction,
    },

    /// Export a table to CSV or xlsx
    Export(commands::export::ExportArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = CoreConfig::from_env();
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(log_dir) = cli.log_dir {
        config.log_dir = log_dir;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    if let Err(err) = init_logging(&config.log_level, &config.log_dir) {
        if !cli.quiet {
            eprintln!("warning: file logging disabled: {err}");
        }
    }

    let credentials = Credentials::new(
        cli.user.unwrap_or_default(),
        cli.password.unwrap_or_default(),
    );
    if !StaticCredentials::default().authenticate(&credentials) {
        warn!("event=cli_login module=cli status=rejected");
        bail!("login failed: pass valid --user and --password (or ATTENDANCE_USER / ATTENDANCE_PASSWORD)");
    }

    let conn = open_db(&config.db_path)
        .with_context(|| format!("cannot open database `{}`", config.db_path.display()))?;
    info!("event=cli_start module=cli status=ok");

    let ctx = commands::Context {
        conn,
        format: cli.format,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Student { action } => commands::student::execute(&ctx, action),
        Commands::Attendance { action } => commands::attendance::execute(&ctx, action),
        Commands::Report { action } => commands::report::execute(&ctx, action),
        Commands::Export(args) => commands::export::execute(&ctx, args),
    }
}

//! entrance CLI: the command-line front end for registration, exams and results.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use entrance_core::config::{load_config_from, EntranceConfig};
use entrance_core::Role;

mod commands;
mod console;
mod prompt;

#[derive(Parser)]
#[command(name = "entrance", version, about = "Student entrance-exam manager")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Student record file (overrides the config)
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,

    /// Acting role: admin, examiner, or student:<id>
    #[arg(long, global = true, default_value = "admin")]
    role: Role,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter config and an empty student store
    Init,

    /// Register a new student (missing fields are prompted for)
    Register {
        #[arg(long)]
        id: Option<u32>,
        #[arg(long)]
        name: Option<String>,
        /// Date of birth, free text
        #[arg(long)]
        dob: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        guardian_name: Option<String>,
        #[arg(long)]
        guardian_phone: Option<String>,
    },

    /// Edit a student's details (prompts for each field when no flag is given)
    Modify {
        id: u32,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        dob: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        guardian_name: Option<String>,
        #[arg(long)]
        guardian_phone: Option<String>,
    },

    /// List every registered student
    List {
        /// Print the records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Find students by id or name
    Search {
        /// Name to look for (case-insensitive)
        query: Option<String>,

        /// Look up a single id instead of a name
        #[arg(long, conflicts_with = "query")]
        id: Option<u32>,

        /// Match names containing the query letters in order
        #[arg(long)]
        fuzzy: bool,
    },

    /// Look up a student by the QR payload on their admit card
    CheckIn {
        payload: String,
    },

    /// Sit the entrance exam; answers are read one per line from stdin
    Exam {
        id: u32,

        /// Seed for the question order
        #[arg(long)]
        seed: Option<u64>,

        /// Start without asking for confirmation
        #[arg(long, short)]
        yes: bool,
    },

    /// Show one student's result and rank
    Result {
        id: u32,
    },

    /// Show the merit list
    Rankings {
        /// Page to show (1-based)
        #[arg(long, default_value = "1")]
        page: usize,

        /// Only students at or above the pass mark
        #[arg(long)]
        passed: bool,

        /// Write the whole list to a file instead of printing a page
        #[arg(long, value_enum)]
        export: Option<ExportFormat>,

        /// Export path (default: timestamped file in the output directory)
        #[arg(long, requires = "export")]
        output: Option<PathBuf>,
    },

    /// Clear a student's exam result so they can sit it again
    ResetExam {
        id: u32,

        #[arg(long, short)]
        yes: bool,
    },

    /// Correct the stored mark of an examined student
    SetMark {
        id: u32,
        #[arg(allow_negative_numbers = true)]
        mark: f64,
    },

    /// Export all students to CSV
    Export {
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Copy the record file to a timestamped backup
    Backup {
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Write the exam summary report
    Report {
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("entrance=info".parse().context("bad log directive")?);

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

fn load(cli_config: Option<&Path>, data_file: Option<PathBuf>) -> Result<EntranceConfig> {
    let mut config = load_config_from(cli_config)?;
    if let Some(path) = data_file {
        config.data_file = path;
    }
    Ok(config)
}

fn run(cli: Cli) -> Result<()> {
    let config = load(cli.config.as_deref(), cli.data_file)?;
    init_tracing(config.log_file.as_deref())?;
    let ctx = commands::Context::new(config, cli.role);

    match cli.command {
        Commands::Init => commands::init::execute(&ctx),
        Commands::Register {
            id,
            name,
            dob,
            address,
            phone,
            email,
            guardian_name,
            guardian_phone,
        } => commands::register::execute(
            &ctx,
            commands::register::Fields {
                id,
                name,
                dob,
                address,
                phone,
                email,
                guardian_name,
                guardian_phone,
            },
        ),
        Commands::Modify {
            id,
            name,
            dob,
            address,
            phone,
            email,
            guardian_name,
            guardian_phone,
        } => commands::modify::execute(
            &ctx,
            id,
            entrance_core::StudentChanges {
                name,
                date_of_birth: dob,
                address,
                phone,
                email,
                guardian_name,
                guardian_phone,
            },
        ),
        Commands::List { json } => commands::list::execute(&ctx, json),
        Commands::Search { query, id, fuzzy } => commands::search::execute(&ctx, query, id, fuzzy),
        Commands::CheckIn { payload } => commands::search::check_in(&ctx, &payload),
        Commands::Exam { id, seed, yes } => commands::exam::execute(&ctx, id, seed, yes),
        Commands::Result { id } => commands::result::execute(&ctx, id),
        Commands::Rankings {
            page,
            passed,
            export,
            output,
        } => {
            let export = export.map(|f| match f {
                ExportFormat::Text => entrance_report::rankings::RankingsFormat::Text,
                ExportFormat::Json => entrance_report::rankings::RankingsFormat::Json,
            });
            commands::rankings::execute(&ctx, page, passed, export, output)
        }
        Commands::ResetExam { id, yes } => commands::admin::reset_exam(&ctx, id, yes),
        Commands::SetMark { id, mark } => commands::admin::set_mark(&ctx, id, mark),
        Commands::Export { output } => commands::export::csv(&ctx, output),
        Commands::Backup { output } => commands::export::backup(&ctx, output),
        Commands::Report { output } => commands::export::report(&ctx, output),
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

//! `pdgitems` command line entry point.
//!
//! # Responsibility
//! - Parse flags, layer them over the TOML configuration, and dispatch to
//!   core use-cases.
//! - Map failures to a non-zero exit code with one error line.

use std::error::Error;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use pdgitems_core::audit::{audit_masses, write_mass_audit_csv, MassAuditRow};
use pdgitems_core::inspect::render_inspection;
use pdgitems_core::{
    core_version, default_log_level, init_logging, load_config, open_db, LogTarget,
    ParticleCatalog, ParticleSummary, PdgId, ReportConfig, ReportService, SqliteItemStore,
};

mod args;
use args::{Cli, Commands};

type CliResult<T> = Result<T, Box<dyn Error>>;

const STDERR_LOG_LEVEL: &str = "warn";

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(message) = setup_logging(&cli) {
        eprintln!("[ERROR] {message}");
        return ExitCode::FAILURE;
    }

    info!(
        "event=cli_start module=cli status=ok core_version={}",
        core_version()
    );
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_exit module=cli status=error error={err}");
            eprintln!("[ERROR] {err}");
            ExitCode::FAILURE
        }
    }
}

fn setup_logging(cli: &Cli) -> Result<(), String> {
    match &cli.log_dir {
        Some(dir) => init_logging(
            cli.log_level.as_deref().unwrap_or(default_log_level()),
            LogTarget::Directory(dir.clone()),
        ),
        None => init_logging(
            cli.log_level.as_deref().unwrap_or(STDERR_LOG_LEVEL),
            LogTarget::Stderr,
        ),
    }
}

fn build_config(cli: &Cli) -> CliResult<ReportConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ReportConfig::default(),
    };
    if let Some(policy) = cli.policy {
        config.resolve_policy = policy.into();
    }
    if let Some(grouping) = cli.grouping {
        config.grouping = grouping.into();
    }
    if let Some(edition) = &cli.edition {
        config.edition = Some(edition.clone());
    }
    Ok(config)
}

fn run(cli: Cli) -> CliResult<()> {
    let config = build_config(&cli)?;
    let conn = open_db(&cli.db)?;
    let store = SqliteItemStore::try_new(&conn)?;
    let service = ReportService::new(&store, config);

    match cli.command {
        Commands::Printouts { out_dir } => {
            let written = service.write_printouts(&out_dir)?;
            println!("wrote {} files to {}", written.len(), out_dir.display());
        }
        Commands::Resolve { name } => {
            let resolution = service.resolve_item(&name)?;
            let pdgids: Vec<String> = resolution.pdgids.iter().map(ToString::to_string).collect();
            println!("{name}: {} ({})", pdgids.join(" "), resolution.source);
        }
        Commands::Inspect { pdgid } => {
            let inspection = service.inspect(&PdgId::new(pdgid))?;
            print!("{}", render_inspection(&inspection));
        }
        Commands::Particle {
            name,
            mcid,
            case_sensitive,
        } => {
            let catalog = ParticleCatalog::try_new(&conn, service.edition()?)?;
            let pdgid = match (name, mcid) {
                (Some(name), _) => catalog.by_name(&name, case_sensitive)?,
                (None, Some(mcid)) => catalog.by_mcid(mcid)?,
                (None, None) => return Err("particle needs --name or --mcid".into()),
            };
            print_particle(&catalog.summary(&pdgid)?);
        }
        Commands::AuditMasses { output } => {
            let catalog = ParticleCatalog::try_new(&conn, service.edition()?)?;
            let rows = audit_masses(&catalog)?;
            write_audit(&rows, output.as_deref())?;
        }
    }
    Ok(())
}

fn print_particle(summary: &ParticleSummary) {
    let mass = match summary.mass_gev {
        Some(mass) => format!("{mass} GeV"),
        None => "no mass".to_string(),
    };
    println!(
        "{} {}: {mass}",
        summary.pdgid,
        summary.description.as_deref().unwrap_or("-")
    );
}

fn write_audit(rows: &[MassAuditRow], output: Option<&Path>) -> CliResult<()> {
    match output {
        Some(path) => write_mass_audit_csv(rows, BufWriter::new(File::create(path)?))?,
        None => write_mass_audit_csv(rows, io::stdout().lock())?,
    }
    Ok(())
}

//! `registrar` entry-point: loads configuration and the registry snapshot,
//! runs one command and writes the snapshot back when it changed.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, fmt};

use registrar::config::{LogFormat, RegistrarSettings};
use registrar::domain::{EnrollmentService, Error, StandingReviewService};
use registrar::inbound::cli::{Cli, Command, Report, evaluate_grades, execute};
use registrar::outbound::{RegistrySnapshot, TracingNotifier};

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let settings = RegistrarSettings::load_from_iter([OsString::from("registrar")])
        .map_err(|err| eyre!("failed to load configuration: {err}"))?;
    init_tracing(settings.log_format()?);

    let report = match &cli.command {
        Command::Gpa { grades, semester } => {
            evaluate_grades(grades, *semester).map_err(domain_failure)?
        }
        command => {
            let runtime = Builder::new_current_thread()
                .enable_all()
                .build()
                .wrap_err("failed to build registrar runtime")?;
            let snapshot_path = cli
                .snapshot
                .clone()
                .unwrap_or_else(|| settings.snapshot_path());
            runtime.block_on(run_against_snapshot(command, &snapshot_path))?
        }
    };

    print!("{report}");
    Ok(())
}

async fn run_against_snapshot(command: &Command, snapshot_path: &Path) -> Result<Report> {
    let snapshot = RegistrySnapshot::load(snapshot_path)?;
    let directories = snapshot.into_directories();

    let enrollment = EnrollmentService::new(
        Arc::clone(&directories.students),
        Arc::clone(&directories.courses),
        Arc::new(TracingNotifier),
        Arc::new(DefaultClock),
    );
    let standing = StandingReviewService::new(Arc::clone(&directories.students));

    let report = execute(command, &enrollment, &standing)
        .await
        .map_err(domain_failure)?;

    if command.mutates_registry() {
        RegistrySnapshot::capture(&directories).save(snapshot_path)?;
        debug!(path = %snapshot_path.display(), "snapshot written");
    }
    Ok(report)
}

fn domain_failure(err: Error) -> color_eyre::eyre::Report {
    eyre!("{}: {}", err.code(), err.message())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    let result = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
    if let Err(e) = result {
        warn!(error = %e, "tracing init failed");
    }
}

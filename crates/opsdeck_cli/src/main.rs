//! `opsdeck` server entry point.
//!
//! # Responsibility
//! - Parse configuration, start logging, open the store.
//! - Optionally reset and seed the store, then serve HTTP until Ctrl-C.

mod config;

use clap::Parser;
use config::Args;
use log::{error, info};
use opsdeck_core::{
    core_version, default_log_level, init_logging, seed_all, EntityKind, EntityRepository,
    EntityStore,
};
use opsdeck_server::state::now_ms;
use opsdeck_server::{serve, AppState};
use std::error::Error;
use std::process::ExitCode;
use tokio::net::TcpListener;

type BoxedError = Box<dyn Error + Send + Sync>;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=startup module=cli status=error error={err}");
            eprintln!("opsdeck: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), BoxedError> {
    let log_dir = args.resolved_log_dir()?;
    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| default_log_level().to_string());
    init_logging(&level, &log_dir)?;
    info!(
        "event=startup module=cli status=start version={} bind={}",
        core_version(),
        args.bind
    );

    let mut store = match &args.db_path {
        Some(path) => EntityStore::open(path)?,
        None => EntityStore::open_in_memory()?,
    };
    if args.reset {
        store.reset()?;
    }
    if args.seed {
        seed_if_empty(&store)?;
    }

    let state = AppState::new(store, args.server_settings()).await;
    let listener = TcpListener::bind(args.bind).await?;
    serve(listener, state).await?;
    Ok(())
}

/// Seeds only a store without records; a populated store is left alone.
fn seed_if_empty(store: &EntityStore) -> Result<(), BoxedError> {
    let repo = store.repo();
    let mut existing = 0;
    for kind in EntityKind::ALL {
        existing += repo.count(kind)?;
    }
    if existing > 0 {
        info!("event=seed module=cli status=skipped existing_records={existing}");
        return Ok(());
    }

    let report = seed_all(&repo, now_ms())?;
    info!(
        "event=seed module=cli status=ok inserted={}",
        report.total()
    );
    Ok(())
}

//! Ingestion daemon entry point.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use maktaba_core::fetch::{
    ArchiveOrg, FetchClient, GoogleBooks, LibraryOfCongress, OpenLibrary, RetryConfig, WorldCat,
    YouTube,
};
use maktaba_core::generate::{BookGenerator, EducationGenerator, HadithGenerator};
use maktaba_core::{
    ContentStore, Database, Scheduler, Settings, SqliteStore, TaskGenerator, persistence_worker,
    pipeline,
};
use tokio::sync::watch;
use tracing::{debug, info};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Provider credentials and tunables may live in a .env file
    dotenvy::dotenv().ok();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");
    info!("Maktaba ingestion starting");

    let mut settings = Settings::from_env()?;
    apply_overrides(&mut settings, &args);

    let db_path: PathBuf = settings.database_path.clone();
    let db = Database::new(&db_path).await?;
    let store: Arc<dyn ContentStore> = Arc::new(SqliteStore::new(db.clone()));
    info!(db = %db_path.display(), "document store connected");

    let retry = RetryConfig::new(settings.max_retries, settings.retry_delay());
    let client = FetchClient::new(settings.request_timeout(), retry)?;

    let generators: Vec<Arc<dyn TaskGenerator>> = vec![
        Arc::new(BookGenerator::new(
            GoogleBooks::new(client.clone(), settings.google_books_api_key.clone()),
            OpenLibrary::new(client.clone()),
            WorldCat::new(client.clone(), settings.worldcat_key.clone()),
            LibraryOfCongress::new(client.clone(), settings.loc_api_key.clone()),
            ArchiveOrg::new(client.clone()),
        )),
        Arc::new(EducationGenerator::new(YouTube::new(
            client.clone(),
            settings.youtube_api_key.clone(),
        ))),
        Arc::new(HadithGenerator::new(ArchiveOrg::new(client))),
    ];

    let (queue, receiver) = pipeline::bounded(settings.queue_capacity);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let mut worker_handles = Vec::with_capacity(settings.num_workers);
    for i in 0..settings.num_workers {
        worker_handles.push(tokio::spawn(persistence_worker(
            format!("worker-{i}"),
            receiver.clone(),
            Arc::clone(&store),
            shutdown_rx.clone(),
        )));
    }

    // Ctrl-C flips the shutdown signal and closes the queue so every
    // suspend point in generators and workers observes it.
    let signal_queue = queue.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            let _ = shutdown_tx.send(true);
            signal_queue.close();
        }
    });

    let scheduler = Scheduler::new(generators, queue.clone(), settings.cycle_interval());

    if args.once {
        scheduler.run_once(shutdown_rx).await;
        // Let the workers drain what the single cycle produced.
        queue.close();
    } else {
        scheduler.run(shutdown_rx).await;
        queue.close();
    }

    for handle in worker_handles {
        let _ = handle.await;
    }

    db.close().await;
    info!("Maktaba ingestion stopped");
    Ok(())
}

/// CLI flags override environment-derived settings.
fn apply_overrides(settings: &mut Settings, args: &Args) {
    if let Some(db) = &args.db {
        settings.database_path.clone_from(db);
    }
    if let Some(workers) = args.workers {
        settings.num_workers = workers;
    }
    if let Some(minutes) = args.cycle_minutes {
        settings.cycle_wait_minutes = minutes;
    }
    if let Some(capacity) = args.queue_capacity {
        settings.queue_capacity = capacity;
    }
}

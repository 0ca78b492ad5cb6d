//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Aggregate books, lessons, and religious audio into a unified store.
///
/// The daemon runs ingestion cycles forever: every cycle queries all
/// configured content providers, normalizes and de-duplicates the results,
/// and persists new items. Provider credentials come from the environment
/// (or a .env file).
#[derive(Parser, Debug)]
#[command(name = "maktaba-ingest")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// SQLite database path (overrides DATABASE_PATH)
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Number of persistence workers (overrides NUM_WORKERS)
    #[arg(short = 'w', long, value_parser = clap::value_parser!(usize))]
    pub workers: Option<usize>,

    /// Minutes to sleep between cycles (overrides CYCLE_WAIT_MINUTES)
    #[arg(long)]
    pub cycle_minutes: Option<u64>,

    /// Work queue capacity (overrides QUEUE_CAPACITY)
    #[arg(long)]
    pub queue_capacity: Option<usize>,

    /// Run a single ingestion cycle, drain the queue, and exit
    #[arg(long)]
    pub once: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_args_parses_successfully() {
        let args = Args::try_parse_from(["maktaba-ingest"]).unwrap();
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
        assert!(!args.once);
        assert!(args.db.is_none());
        assert!(args.workers.is_none());
    }

    #[test]
    fn test_cli_overrides_parse() {
        let args = Args::try_parse_from([
            "maktaba-ingest",
            "--db",
            "/tmp/m.db",
            "-w",
            "8",
            "--cycle-minutes",
            "15",
            "--once",
            "-vv",
        ])
        .unwrap();
        assert_eq!(args.db.unwrap(), PathBuf::from("/tmp/m.db"));
        assert_eq!(args.workers, Some(8));
        assert_eq!(args.cycle_minutes, Some(15));
        assert!(args.once);
        assert_eq!(args.verbose, 2);
    }
}

//! Feige - CLI
//!
//! Small demos of the timer and lock utilities.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossbeam::channel;
use feige::util::config::{self, FeigeConfig};
use feige::util::logger::{self, LogLevel};
use feige::{timer, BlockTimer, LockOptions, ReadWriteLock, NAME, VERSION};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::info;

/// Concurrency and ergonomics utilities
#[derive(Parser, Debug)]
#[command(name = "feige")]
#[command(version = VERSION)]
#[command(about = NAME, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Config file (defaults to ~/.config/feige/config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Schedule a timer and report each fire
    Timer {
        /// Interval in seconds
        #[arg(short, long, default_value_t = 0.5)]
        interval: f64,

        /// Repeat until `count` fires
        #[arg(short, long)]
        repeats: bool,

        /// Number of fires to wait for when repeating
        #[arg(short = 'n', long, default_value_t = 3)]
        count: usize,
    },

    /// Hammer a lock-guarded counter from several threads
    Lock {
        /// Writer threads
        #[arg(short, long, default_value_t = 4)]
        writers: usize,

        /// Increments per writer
        #[arg(short, long, default_value_t = 1000)]
        increments: u64,
    },

    /// Print version information
    Version,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => config::load_config_from(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => config::load_user_config().context("Failed to load user config")?,
    };

    let level = if args.verbose {
        LogLevel::Debug
    } else {
        config.log.level
    };
    logger::init_with_level(level);
    config.apply();

    match args.command {
        Commands::Timer {
            interval,
            repeats,
            count,
        } => run_timer(&config, interval, repeats, count),
        Commands::Lock {
            writers,
            increments,
        } => run_lock(writers, increments),
        Commands::Version => {
            println!("{} {}", NAME, VERSION);
            Ok(())
        }
    }
}

fn run_timer(
    config: &FeigeConfig,
    interval: f64,
    repeats: bool,
    count: usize,
) -> Result<()> {
    let interval = timer::seconds(interval);
    let wanted = if repeats { count.max(1) } else { 1 };
    let (tx, rx) = channel::unbounded();
    let started = Instant::now();

    let timer = BlockTimer::builder(interval)
        .repeats(repeats)
        .queue(config.timer.queue())
        .schedule(move |timer| {
            info!(
                "{} {} after {:?}",
                if timer.repeats() {
                    "repeating timer"
                } else {
                    "once timer"
                },
                timer.id(),
                started.elapsed()
            );
            let _ = tx.send(());
        });

    // Generous bound so a stuck driver does not hang the demo.
    let deadline = interval
        .saturating_mul(u32::try_from(wanted).unwrap_or(u32::MAX))
        .saturating_add(Duration::from_secs(5));
    for fired in 1..=wanted {
        rx.recv_timeout(deadline)
            .with_context(|| format!("Timer stopped after {} of {} fires", fired - 1, wanted))?;
    }
    timer.cancel();

    println!("{} fired {} time(s) in {:?}", timer.id(), wanted, started.elapsed());
    Ok(())
}

fn run_lock(
    writers: usize,
    increments: u64,
) -> Result<()> {
    let counter = Arc::new(ReadWriteLock::with_options(
        0u64,
        LockOptions::new().label("counter"),
    ));
    let started = Instant::now();

    let handles: Vec<_> = (0..writers)
        .map(|_| {
            let counter = counter.clone();
            thread::spawn(move || {
                for _ in 0..increments {
                    counter.mutate(|n| *n += 1);
                }
            })
        })
        .collect();

    for handle in handles {
        handle
            .join()
            .map_err(|_| anyhow::anyhow!("writer thread panicked"))?;
    }

    while !counter.is_settled() {
        thread::sleep(Duration::from_millis(1));
    }

    let total = counter.read();
    info!(lock = counter.label(), total, "settled after {:?}", started.elapsed());
    println!("{} = {}", counter.label(), total);
    Ok(())
}

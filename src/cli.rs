//! Command-line interface components.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::pin::pin;
use tracing::{debug, info, warn};

use crate::config::{CompressionAlgorithm, ProcessorConfig};
use crate::constants::DEFAULT_COMPRESSION;
use crate::error::NordicError;
use crate::models::ProcessingStats;
use crate::processor::BulletinProcessor;

#[derive(Parser, Debug)]
#[command(name = "nordic-processor")]
#[command(about = "Convert Nordic-format seismic bulletins to a flat Parquet table")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Path to the bulletin file
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Output Parquet file (defaults to the input with a .parquet extension)
    #[arg(short, long, value_name = "OUT")]
    pub output: Option<PathBuf>,

    /// Enable verbose logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Number of event blocks parsed concurrently (defaults to the CPU count)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Parquet compression algorithm (snappy, zstd, lz4, none)
    #[arg(long, default_value = DEFAULT_COMPRESSION)]
    pub compression: String,

    /// Do not compare declared station counts with the station tables
    #[arg(long)]
    pub no_station_check: bool,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl Args {
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "warn"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }

    /// Build the processing configuration from the defaults and the flags
    pub fn to_config(&self) -> Result<ProcessorConfig> {
        let compression: CompressionAlgorithm = self
            .compression
            .parse()
            .context("Invalid --compression value")?;

        let mut config = ProcessorConfig::default().with_compression(compression);
        if let Some(workers) = self.workers {
            config = config.with_workers(workers);
        }
        if self.no_station_check {
            config = config.without_station_check();
        }
        if self.no_progress || self.quiet {
            config = config.without_progress();
        }

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

/// Set up structured logging based on CLI arguments
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("nordic_processor={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .init();

    debug!("Logging initialized at level: {}", log_level);
}

/// Run the conversion described by the arguments
pub async fn run(args: Args) -> Result<ProcessingStats> {
    setup_logging(&args);
    debug!("Command line arguments: {:?}", args);

    let config = args.to_config()?;
    info!(
        "Processing {} with {} workers",
        args.input.display(),
        config.workers
    );

    let processor = BulletinProcessor::new(args.input.clone(), args.output.clone())
        .with_context(|| format!("Cannot open bulletin {}", args.input.display()))?
        .with_config(config);

    processor
        .process()
        .await
        .with_context(|| format!("Failed to process {}", args.input.display()))
}

/// Drive `work` to completion unless `shutdown` resolves first
///
/// A shutdown listener that fails is logged and the work keeps running.
pub async fn run_until_shutdown<T>(
    work: impl Future<Output = Result<T>>,
    shutdown: impl Future<Output = std::io::Result<()>>,
) -> Result<T> {
    let mut work = pin!(work);

    tokio::select! {
        result = &mut work => result,
        signal = shutdown => match signal {
            Ok(()) => {
                eprintln!("\nReceived CTRL+C, shutting down gracefully...");
                Err(NordicError::ProcessingInterrupted {
                    reason: "Processing interrupted by user".to_string(),
                }
                .into())
            }
            Err(e) => {
                warn!("Cannot listen for CTRL+C, continuing without it: {}", e);
                work.await
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_args(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_minimal_arguments() {
        let args = parse_args(&["nordic-processor", "bulletin.txt"]);
        assert_eq!(args.input, PathBuf::from("bulletin.txt"));
        assert_eq!(args.output, None);
        assert_eq!(args.get_log_level(), "info");

        let config = args.to_config().unwrap();
        assert!(config.parser.check_station_count);
        assert!(config.show_progress);
        assert_eq!(config.compression, CompressionAlgorithm::Snappy);
    }

    #[test]
    fn test_all_flags() {
        let args = parse_args(&[
            "nordic-processor",
            "bulletin.txt",
            "-o",
            "out.parquet",
            "-vv",
            "--workers",
            "3",
            "--compression",
            "zstd",
            "--no-station-check",
            "--no-progress",
        ]);
        assert_eq!(args.output, Some(PathBuf::from("out.parquet")));
        assert_eq!(args.get_log_level(), "trace");

        let config = args.to_config().unwrap();
        assert_eq!(config.workers, 3);
        assert_eq!(config.compression, CompressionAlgorithm::Zstd);
        assert!(!config.parser.check_station_count);
        assert!(!config.show_progress);
    }

    #[test]
    fn test_quiet_hides_progress() {
        let args = parse_args(&["nordic-processor", "bulletin.txt", "-q"]);
        assert_eq!(args.get_log_level(), "warn");
        assert!(!args.to_config().unwrap().show_progress);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let args = parse_args(&["nordic-processor", "b.txt", "--compression", "brotli"]);
        assert!(args.to_config().is_err());

        let args = parse_args(&["nordic-processor", "b.txt", "--workers", "0"]);
        assert!(args.to_config().is_err());

        assert!(Args::try_parse_from(["nordic-processor"]).is_err());
        assert!(Args::try_parse_from(["nordic-processor", "b.txt", "-v", "-q"]).is_err());
    }

    #[tokio::test]
    async fn test_shutdown_interrupts_work() {
        let work = std::future::pending::<Result<u32>>();
        let result = run_until_shutdown(work, async { Ok(()) }).await;

        let error = result.unwrap_err();
        assert!(matches!(
            error.downcast_ref::<NordicError>(),
            Some(NordicError::ProcessingInterrupted { .. })
        ));
    }

    #[tokio::test]
    async fn test_failed_shutdown_listener_keeps_working() {
        let work = async {
            tokio::task::yield_now().await;
            Ok(7)
        };
        let shutdown = async { Err(std::io::Error::other("no signal handler")) };
        let result = run_until_shutdown(work, shutdown).await;

        assert_eq!(result.unwrap(), 7);
    }
}

use std::path::PathBuf;

use clap::Parser;
use tracing::{debug, error, info};

use super::{ChunkingArgs, Command};
use crate::{
    prelude::*,
    scanner::{CodebaseScanner, ScannerConfig, default_max_in_flight},
    storage::{JsonlStorage, ShardMode},
    utils::{DEFAULT_TEST_PATTERN, GroupingStrategy, TestFileFilter},
};

pub const DEFAULT_OUTPUT_FILE: &str = "code_and_bdd_chunks.jsonl";
pub const DEFAULT_OUTPUT_DIR: &str = "chunks";

#[derive(Debug, Parser, Clone)]
pub struct Scan {
    /// Path to the codebase root
    #[arg(short, long, env = "CHUNKWRIGHT_ROOT")]
    root: PathBuf,

    /// Output file, or output directory when grouping
    #[arg(short, long, env = "CHUNKWRIGHT_OUTPUT")]
    output: Option<PathBuf>,

    /// Split output into one file per group
    #[arg(long, value_enum, default_value_t = GroupingStrategy::None)]
    group_by: GroupingStrategy,

    /// Skip files whose name matches --test-pattern
    #[arg(long)]
    exclude_tests: bool,

    /// File name pattern (regex) identifying test files
    #[arg(long, default_value = DEFAULT_TEST_PATTERN)]
    test_pattern: String,

    /// Files extracted or buffered at once before they are written
    #[arg(short, long, default_value_t = default_max_in_flight())]
    jobs: usize,

    #[command(flatten)]
    chunking: ChunkingArgs,
}

impl Scan {
    fn shard_mode(&self) -> ShardMode {
        match self.group_by {
            GroupingStrategy::None => ShardMode::Single(
                self.output.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_FILE)),
            ),
            _ => ShardMode::PerGroup(
                self.output.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            ),
        }
    }

    fn scanner_config(&self) -> Result<ScannerConfig> {
        let test_filter = if self.exclude_tests {
            info!("Excluding test files matching {}", self.test_pattern);
            Some(TestFileFilter::new(&self.test_pattern)?)
        } else {
            None
        };

        Ok(ScannerConfig {
            chunker: self.chunking.chunker_options()?,
            grouping: self.group_by,
            test_filter,
            lossy: self.chunking.lossy,
            max_in_flight: self.jobs,
        })
    }
}

impl Command for Scan {
    async fn execute(&self) -> Result<()> {
        if !self.root.exists() {
            error!("Path does not exist: {}", self.root.display());
            return Err(NotFound(self.root.clone()));
        }

        let config = self.scanner_config()?;
        let mode = self.shard_mode();

        info!("Scanning codebase at {}", self.root.display());
        match &mode {
            ShardMode::Single(path) => info!("Writing chunks to {}", path.display()),
            ShardMode::PerGroup(dir) => {
                info!("Writing {:?} shards to {}", self.group_by, dir.display())
            },
        }

        let storage = JsonlStorage::new(mode).await?;
        let mut scanner = CodebaseScanner::new(storage, config);

        let outcome = scanner.scan_codebase(&self.root).await;

        match outcome {
            Ok(results) => {
                info!("Scan completed successfully");
                info!("Chunked {} files", results.files_scanned);
                info!("Wrote {} chunks", results.chunks_written);
                if results.files_skipped > 0 {
                    info!("Skipped {} test files", results.files_skipped);
                }
                if results.files_failed > 0 || results.spans_dropped > 0 {
                    info!(
                        "{} files failed, {} unterminated bodies dropped",
                        results.files_failed, results.spans_dropped
                    );
                }
                for path in scanner.into_storage().shard_paths() {
                    debug!("Output written to {}", path.display());
                }
                Ok(())
            },
            Err(e) => {
                error!("Scan failed: {}", e);
                Err(ScanFailed)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Scan {
        Scan::try_parse_from(std::iter::once("scan").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_default_output_is_single_file() {
        let scan = parse(&["--root", "src"]);

        assert_eq!(scan.shard_mode(), ShardMode::Single(PathBuf::from(DEFAULT_OUTPUT_FILE)));
        assert!(scan.scanner_config().unwrap().test_filter.is_none());
    }

    #[test]
    fn test_grouped_output_is_directory() {
        let scan = parse(&["--root", "src", "--group-by", "top-level-dir", "-o", "out"]);

        assert_eq!(scan.shard_mode(), ShardMode::PerGroup(PathBuf::from("out")));
    }

    #[test]
    fn test_jobs_bound_in_flight_files() {
        assert_eq!(parse(&["--root", "src", "-j", "3"]).scanner_config().unwrap().max_in_flight, 3);
        assert_eq!(
            parse(&["--root", "src"]).scanner_config().unwrap().max_in_flight,
            default_max_in_flight()
        );
    }

    #[test]
    fn test_invalid_test_pattern() {
        let scan = parse(&["--root", "src", "--exclude-tests", "--test-pattern", "("]);

        assert!(matches!(scan.scanner_config(), Err(PatternError(_))));
    }

    #[test]
    fn test_empty_marker_rejected() {
        let scan = parse(&["--root", "src", "--marker", "  "]);

        assert!(matches!(scan.scanner_config(), Err(InvalidArgument(_))));
    }
}

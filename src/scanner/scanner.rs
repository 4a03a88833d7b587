use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use indicatif::ProgressStyle;
use tokio::task::JoinSet;
use tracing::{Instrument, Span, debug, info, info_span, trace, warn};
use tracing_indicatif::span_ext::IndicatifSpanExt;
use walkdir::WalkDir;

use super::results::ScanResults;
use crate::{
    chunking::{ChunkerOptions, Extraction, extract_chunks},
    prelude::*,
    storage::Storage,
    utils::{GroupingStrategy, TestFileFilter, parsers::SourceFormat},
};

#[derive(Debug, Clone)]
pub struct ScannerConfig {
    pub chunker: ChunkerOptions,
    pub grouping: GroupingStrategy,
    /// Files matching this filter are not extracted
    pub test_filter: Option<TestFileFilter>,
    /// Replace malformed UTF-8 instead of failing the file
    pub lossy: bool,
    /// Upper bound on files being extracted or buffered before they are written
    pub max_in_flight: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            chunker: ChunkerOptions::default(),
            grouping: GroupingStrategy::default(),
            test_filter: None,
            lossy: false,
            max_in_flight: default_max_in_flight(),
        }
    }
}

/// Twice the available cores, so storage writes overlap with extraction
pub fn default_max_in_flight() -> usize {
    std::thread::available_parallelism().map_or(4, |n| n.get() * 2)
}

pub struct CodebaseScanner<S>
where
    S: Storage,
{
    storage: S,
    config: Arc<ScannerConfig>,
}

impl<S> CodebaseScanner<S>
where
    S: Storage,
{
    pub fn new(storage: S, config: ScannerConfig) -> Self {
        Self {
            storage,
            config: Arc::new(config),
        }
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    pub async fn scan_codebase(&mut self, root: &Path) -> Result<ScanResults> {
        if !root.exists() {
            return Err(NotFound(root.to_path_buf()));
        }

        let mut results = ScanResults::default();
        let files = self.collect_files(root, &mut results);
        info!("Found {} files to chunk under {}", files.len(), root.display());

        let span = info_span!("scan");
        span.pb_set_style(
            &ProgressStyle::with_template("{spinner} [{elapsed}] {bar:40} {pos}/{len} files")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        span.pb_set_length(files.len() as u64);

        self.extract_and_store(root, files, &mut results)
            .instrument(span)
            .await?;

        self.storage.finish().await?;

        info!("Extracted {} chunks from codebase", results.chunks_written);

        Ok(results)
    }

    fn collect_files(&self, root: &Path, results: &mut ScanResults) -> Vec<(PathBuf, SourceFormat)> {
        let mut files = Vec::new();

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                },
            };
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            let Some(format) = SourceFormat::from_path(path) else {
                continue;
            };

            if let Some(filter) = &self.config.test_filter {
                if filter.is_test_file(path) {
                    results.files_skipped += 1;
                    continue;
                }
            }

            files.push((path.to_path_buf(), format));
        }

        files
    }

    /// Extract files on the blocking pool and hand them to storage in traversal order.
    ///
    /// At most `max_in_flight` files are running or waiting for an earlier file to finish, so
    /// memory stays bounded however large the tree is.
    async fn extract_and_store(
        &mut self,
        root: &Path,
        files: Vec<(PathBuf, SourceFormat)>,
        results: &mut ScanResults,
    ) -> Result<()> {
        let window = self.config.max_in_flight.max(1);
        let mut files = files.into_iter().enumerate();
        let mut tasks = JoinSet::new();
        let mut pending = BTreeMap::new();
        let mut next = 0;

        loop {
            while tasks.len() + pending.len() < window {
                let Some((index, (path, format))) = files.next() else {
                    break;
                };
                let config = Arc::clone(&self.config);
                tasks.spawn_blocking(move || {
                    let outcome = process_file(&path, format, &config);
                    (index, path, outcome)
                });
            }

            let Some(joined) = tasks.join_next().await else {
                break;
            };
            let (index, path, outcome) = joined?;
            Span::current().pb_inc(1);
            pending.insert(index, (path, outcome));

            while let Some((path, outcome)) = pending.remove(&next) {
                self.store_outcome(root, &path, outcome, results).await?;
                next += 1;
            }
        }

        Ok(())
    }

    async fn store_outcome(
        &mut self,
        root: &Path,
        path: &Path,
        outcome: Result<Extraction>,
        results: &mut ScanResults,
    ) -> Result<()> {
        let extraction = match outcome {
            Ok(extraction) => extraction,
            Err(e) => {
                warn!("Failed to chunk {}: {}", path.display(), e);
                results.files_failed += 1;
                return Ok(());
            },
        };

        results.files_scanned += 1;
        results.spans_dropped += extraction.dropped.len();

        if extraction.chunks.is_empty() {
            debug!("No chunks found in {}", path.display());
            return Ok(());
        }

        let group = self.config.grouping.group_key(root, path);
        self.storage.store_chunks(group.as_deref(), &extraction.chunks).await?;
        results.chunks_written += extraction.chunks.len();

        Ok(())
    }
}

/// Extract a single file, picking the extractor from its extension
pub fn extract_file(path: &Path, config: &ScannerConfig) -> Result<Extraction> {
    let format = SourceFormat::from_path(path).ok_or_else(|| UnsupportedFormat(path.to_path_buf()))?;
    process_file(path, format, config)
}

fn process_file(path: &Path, format: SourceFormat, config: &ScannerConfig) -> Result<Extraction> {
    trace!("Chunking {} as {}", path.display(), format);
    let text = decode(path, fs::read(path)?, config.lossy)?;
    let source = path.display().to_string();

    Ok(extract_chunks(format, &text, &source, &config.chunker))
}

fn decode(path: &Path, bytes: Vec<u8>, lossy: bool) -> Result<String> {
    if lossy {
        return Ok(String::from_utf8_lossy(&bytes).into_owned());
    }

    String::from_utf8(bytes).map_err(|e| Decode {
        path: path.to_path_buf(),
        source: e.utf8_error(),
    })
}

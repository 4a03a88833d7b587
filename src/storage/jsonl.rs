use std::{
    collections::{HashMap, hash_map::Entry},
    path::{Path, PathBuf},
};

use tokio::{
    fs::{self, File},
    io::{AsyncWriteExt, BufWriter},
};
use tracing::{debug, info};

use super::client::Storage;
use crate::{chunking::ChunkRecord, prelude::*, utils::ROOT_GROUP};

pub const SHARD_EXTENSION: &str = "jsonl";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShardMode {
    /// All records go to this file
    Single(PathBuf),

    /// One `<group>.jsonl` file per group inside this directory
    PerGroup(PathBuf),
}

struct Shard {
    path: PathBuf,
    writer: BufWriter<File>,
}

/// Line-delimited JSON sink, one record per line
pub struct JsonlStorage {
    mode: ShardMode,
    shards: HashMap<String, Shard>,
    written: usize,
}

impl JsonlStorage {
    pub async fn new(mode: ShardMode) -> Result<Self> {
        let mut storage = Self {
            mode,
            shards: HashMap::new(),
            written: 0,
        };

        match storage.mode.clone() {
            ShardMode::Single(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    create_dir(parent).await?;
                }
                // An empty run still leaves an (empty) output file behind
                storage.shard(None).await?;
            },
            ShardMode::PerGroup(dir) => create_dir(&dir).await?,
        }

        Ok(storage)
    }

    /// Paths of every file opened so far
    pub fn shard_paths(&self) -> Vec<&Path> {
        let mut paths: Vec<_> = self.shards.values().map(|s| s.path.as_path()).collect();
        paths.sort();
        paths
    }

    fn shard_key(&self, group: Option<&str>) -> String {
        match self.mode {
            ShardMode::Single(_) => String::new(),
            ShardMode::PerGroup(_) => group.unwrap_or(ROOT_GROUP).to_string(),
        }
    }

    fn shard_path(&self, key: &str) -> PathBuf {
        match &self.mode {
            ShardMode::Single(path) => path.clone(),
            ShardMode::PerGroup(dir) => dir.join(f!("{key}.{SHARD_EXTENSION}")),
        }
    }

    async fn shard(&mut self, group: Option<&str>) -> Result<&mut Shard> {
        let key = self.shard_key(group);
        let path = self.shard_path(&key);

        let shard = match self.shards.entry(key) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                debug!("Opening output shard {}", path.display());
                let file = File::create(&path)
                    .await
                    .map_err(|source| StorageError {
                        path: path.clone(),
                        source,
                    })?;
                entry.insert(Shard {
                    path,
                    writer: BufWriter::new(file),
                })
            },
        };

        Ok(shard)
    }
}

impl Storage for JsonlStorage {
    async fn store_chunks(&mut self, group: Option<&str>, chunks: &[ChunkRecord]) -> Result<()> {
        if chunks.is_empty() {
            return Ok(());
        }

        let shard = self.shard(group).await?;

        for chunk in chunks {
            let mut line = serde_json::to_vec(chunk)?;
            line.push(b'\n');

            shard
                .writer
                .write_all(&line)
                .await
                .map_err(|source| StorageError {
                    path: shard.path.clone(),
                    source,
                })?;
        }

        self.written += chunks.len();
        Ok(())
    }

    async fn finish(&mut self) -> Result<()> {
        for shard in self.shards.values_mut() {
            shard.writer.flush().await.map_err(|source| StorageError {
                path: shard.path.clone(),
                source,
            })?;
        }

        info!(
            "Wrote {} records to {} file(s)",
            self.written,
            self.shards.len()
        );
        Ok(())
    }
}

async fn create_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).await.map_err(|source| StorageError {
        path: dir.to_path_buf(),
        source,
    })
}

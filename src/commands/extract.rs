use std::{
    io::{self, Write},
    path::PathBuf,
};

use clap::Parser;
use tracing::info;

use super::{ChunkingArgs, Command};
use crate::{
    prelude::*,
    scanner::{ScannerConfig, extract_file},
};

#[derive(Debug, Parser, Clone)]
pub struct Extract {
    /// File to chunk (.java or .feature)
    path: PathBuf,

    #[command(flatten)]
    chunking: ChunkingArgs,
}

impl Command for Extract {
    async fn execute(&self) -> Result<()> {
        if !self.path.exists() {
            return Err(NotFound(self.path.clone()));
        }

        let config = ScannerConfig {
            chunker: self.chunking.chunker_options()?,
            lossy: self.chunking.lossy,
            ..Default::default()
        };

        let extraction = extract_file(&self.path, &config)?;

        let mut stdout = io::stdout().lock();
        for chunk in &extraction.chunks {
            serde_json::to_writer(&mut stdout, chunk)?;
            writeln!(stdout)?;
        }

        info!(
            "{} chunks, {} dropped spans",
            extraction.chunks.len(),
            extraction.dropped.len()
        );

        Ok(())
    }
}

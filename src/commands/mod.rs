mod extract;
mod scan;

use clap::{Args as ClapArgs, Parser, Subcommand};
use extract::Extract;
use scan::Scan;

use crate::{
    chunking::{BraceMode, ChunkerOptions, DEFAULT_MARKER, MethodOptions, ScenarioOptions},
    prelude::*,
};

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Walk a directory and write every chunk to JSONL
    Scan(Scan),
    /// Print the chunks of a single file
    Extract(Extract),
}

/// Split Java methods and Gherkin scenarios into JSONL records for indexing
#[derive(Parser, Debug)]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// Options shared by every command that runs the extractors
#[derive(ClapArgs, Debug, Clone)]
pub struct ChunkingArgs {
    /// How braces inside literals and comments are treated
    #[arg(long, value_enum, default_value_t = BraceMode::LiteralAware)]
    brace_mode: BraceMode,

    /// Skip methods whose body is empty
    #[arg(long)]
    drop_empty_bodies: bool,

    /// Keyword that opens a scenario section
    #[arg(long, default_value = DEFAULT_MARKER)]
    marker: String,

    /// Replace malformed UTF-8 instead of failing the file
    #[arg(long)]
    lossy: bool,
}

impl ChunkingArgs {
    pub fn chunker_options(&self) -> Result<ChunkerOptions> {
        let marker = self.marker.trim();
        if marker.is_empty() {
            return Err(InvalidArgument(String::from("Scenario marker must not be empty")));
        }

        Ok(ChunkerOptions {
            methods: MethodOptions {
                brace_mode: self.brace_mode,
                drop_empty_bodies: self.drop_empty_bodies,
            },
            scenarios: ScenarioOptions {
                marker: marker.to_string(),
            },
        })
    }
}

pub trait Command {
    async fn execute(&self) -> Result<()>;
}

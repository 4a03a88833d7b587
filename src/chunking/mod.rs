mod delimiters;
mod methods;
mod scenarios;
mod signature;
mod types;

pub use delimiters::BraceMode;
pub use methods::MethodOptions;
pub use scenarios::{DEFAULT_MARKER, ScenarioOptions};
pub use types::{ChunkKind, ChunkRecord, Extraction};

use methods::extract_methods;
use scenarios::segment_scenarios;

use crate::utils::parsers::SourceFormat;

#[derive(Debug, Clone, Default)]
pub struct ChunkerOptions {
    pub methods: MethodOptions,
    pub scenarios: ScenarioOptions,
}

/// Run the extractor matching the file's structural family
pub fn extract_chunks(
    format: SourceFormat,
    text: &str,
    source: &str,
    options: &ChunkerOptions,
) -> Extraction {
    match format.kind() {
        ChunkKind::Code => extract_methods(text, source, &options.methods),
        ChunkKind::BehaviorScenario => segment_scenarios(text, source, &options.scenarios),
    }
}

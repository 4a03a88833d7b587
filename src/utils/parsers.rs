use std::path::Path;

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::chunking::ChunkKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum SourceFormat {
    #[serde(rename = "java")]
    Java,

    #[serde(rename = "feature")]
    Feature,
}

serde_plain::derive_fromstr_from_deserialize!(SourceFormat);

impl SourceFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()?.to_str()?.parse().ok()
    }

    pub fn kind(&self) -> ChunkKind {
        match self {
            Self::Java => ChunkKind::Code,
            Self::Feature => ChunkKind::BehaviorScenario,
        }
    }
}

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum ChunkKind {
    #[serde(rename = "code")]
    #[strum(serialize = "code")]
    Code,

    #[serde(rename = "bdd")]
    #[strum(serialize = "bdd")]
    BehaviorScenario,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChunkType {
    Method,
    Scenario,
}

/// One extracted unit, serialized as a single JSONL line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRecord {
    pub source: String,

    #[serde(rename = "type")]
    pub kind: ChunkKind,

    pub chunk_type: ChunkType,

    /// Enclosing type name; only set for code chunks.
    #[serde(rename = "class_name", skip_serializing_if = "Option::is_none", default)]
    pub container: Option<String>,

    pub name: String,

    pub content: String,
}

impl ChunkRecord {
    pub fn method(source: &str, container: &str, name: &str, content: &str) -> Self {
        Self {
            source: source.to_string(),
            kind: ChunkKind::Code,
            chunk_type: ChunkType::Method,
            container: Some(container.to_string()),
            name: name.to_string(),
            content: content.trim().to_string(),
        }
    }

    pub fn scenario(source: &str, name: &str, content: &str) -> Self {
        Self {
            source: source.to_string(),
            kind: ChunkKind::BehaviorScenario,
            chunk_type: ChunkType::Scenario,
            container: None,
            name: name.to_string(),
            content: content.trim().to_string(),
        }
    }
}

/// Records extracted from one file plus the spans that were dropped on the way.
#[derive(Debug, Default)]
pub struct Extraction {
    pub chunks: Vec<ChunkRecord>,
    pub dropped: Vec<Error>,
}

impl Extraction {
    pub(crate) fn push(&mut self, chunk: ChunkRecord) {
        // Empty extractions are never emitted
        if !chunk.content.is_empty() && !chunk.name.is_empty() {
            self.chunks.push(chunk);
        }
    }
}

pub mod parsers;

use std::path::{Component, Path};

use clap::ValueEnum;
use itertools::Itertools;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::prelude::*;

/// Group of files directly under the root. Encoded directory names never start with the separator.
pub const ROOT_GROUP: &str = "_root";

/// Joins flattened directory components
pub const GROUP_SEPARATOR: &str = "_";

pub const DEFAULT_TEST_PATTERN: &str = r"(Test|Tests|IT)\.java$";

/// How output records are partitioned into shard files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupingStrategy {
    /// Everything goes to a single file
    #[default]
    None,

    /// One shard per directory directly below the root
    TopLevelDir,

    /// One shard per directory, with the relative path flattened into the name
    FlattenedRelativeDir,
}

impl GroupingStrategy {
    /// Shard name for a file, or `None` when output is not grouped.
    ///
    /// Directory names are percent-escaped for `%` and the separator, so distinct directories
    /// always get distinct keys: `a_b/` becomes `a%5Fb` while `a/b/` becomes `a_b`.
    pub fn group_key(&self, root: &Path, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(root).unwrap_or(path);
        let mut dirs = relative
            .parent()
            .into_iter()
            .flat_map(Path::components)
            .filter_map(|c| match c {
                Component::Normal(name) => Some(escape_component(&name.to_string_lossy())),
                _ => None,
            });

        let key = match self {
            Self::None => return None,
            Self::TopLevelDir => dirs.next(),
            Self::FlattenedRelativeDir => Some(dirs.join(GROUP_SEPARATOR)).filter(|k| !k.is_empty()),
        };

        Some(key.unwrap_or_else(|| ROOT_GROUP.to_string()))
    }
}

fn escape_component(name: &str) -> String {
    name.replace('%', "%25").replace(GROUP_SEPARATOR, "%5F")
}

/// Matches file names that belong to tests
#[derive(Debug, Clone)]
pub struct TestFileFilter {
    pattern: Regex,
}

impl TestFileFilter {
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    pub fn is_test_file(&self, path: &Path) -> bool {
        let is_test = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| self.pattern.is_match(name));

        if is_test {
            debug!("Excluding test file {}", path.display());
        }

        is_test
    }
}

impl Default for TestFileFilter {
    fn default() -> Self {
        Self {
            pattern: Regex::new(DEFAULT_TEST_PATTERN).expect("default test pattern is valid"),
        }
    }
}

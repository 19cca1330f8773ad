//! Engine configuration
//!
//! Every [`Algebra`](crate::Algebra) owns an [`EngineConfig`]. The settings
//! only change how results are computed (parallel fan-out, memoization,
//! cache lifetime), never the results themselves.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::Result;

/// Lifetime of the pairwise fusion memo table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoScope {
    /// A fresh table for every top-level multi-factor call
    #[default]
    Call,
    /// One table shared by every call made through the same algebra
    Algebra,
}

/// Tuning knobs for the representation engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Evaluate the pairwise products of one `apply` call on the rayon pool
    pub parallel: bool,

    /// Minimum number of term pairs before parallel fan-out is used
    pub parallel_threshold: usize,

    /// Memoize pairwise fusion products inside multi-factor reductions
    pub memoize_fusion: bool,

    /// Lifetime of the memo table
    pub memo_scope: MemoScope,

    /// Multiplier on the alcove fold bound before giving up; 0 caps
    /// folding at `rank + 1` steps
    pub alcove_fold_slack: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            parallel_threshold: 4,
            memoize_fusion: true,
            memo_scope: MemoScope::Call,
            alcove_fold_slack: 4,
        }
    }
}

impl EngineConfig {
    /// Single-threaded, unmemoized configuration
    pub fn serial() -> Self {
        Self {
            parallel: false,
            memoize_fusion: false,
            ..Default::default()
        }
    }

    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Save the configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

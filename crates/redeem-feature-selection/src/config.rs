use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::SelectionError;

/// Parameters of an incremental selection run.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SelectionConfig {
    /// A feature set is relevant when its score is strictly above this value.
    pub threshold: f64,

    /// Largest combination size tested. Must be at least 1.
    pub max_size: usize,

    pub remove_redundant: bool,

    /// Score cache size. `None` uses `n_features ^ max_size`.
    pub cache_capacity: Option<usize>,

    /// Score the combinations of a tier on the rayon thread pool.
    ///
    /// The redundancy pass still runs in order after its larger subsets are
    /// scored in parallel. Subsets the ordered pass would skip get scored
    /// too, so an expensive scorer may be called more often than in
    /// sequential mode. The result is the same either way.
    pub parallel: bool,
}

impl SelectionConfig {
    pub fn new(threshold: f64, max_size: usize) -> Self {
        Self {
            threshold,
            max_size,
            ..Self::default()
        }
    }

    pub fn with_remove_redundant(mut self, remove_redundant: bool) -> Self {
        self.remove_redundant = remove_redundant;
        self
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = Some(capacity);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_size == 0 {
            return Err(SelectionError::InvalidMaxSize(self.max_size).into());
        }
        if !self.threshold.is_finite() {
            return Err(SelectionError::InvalidThreshold(self.threshold).into());
        }
        if let Some(capacity) = self.cache_capacity {
            if capacity == 0 {
                return Err(SelectionError::InvalidCacheCapacity(capacity).into());
            }
        }
        Ok(())
    }

    /// Cache capacity for a run over `n_features` candidates.
    ///
    /// Without an explicit override this is `n_features ^ max_size`, an
    /// upper bound on the number of distinct sets a run can query. The
    /// result saturates on overflow and is never below 1.
    pub fn cache_capacity_for(&self, n_features: usize) -> usize {
        match self.cache_capacity {
            Some(capacity) => capacity.max(1),
            None => {
                let exp = u32::try_from(self.max_size).unwrap_or(u32::MAX);
                n_features.saturating_pow(exp).max(1)
            }
        }
    }
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            max_size: 1,
            remove_redundant: false,
            cache_capacity: None,
            parallel: false,
        }
    }
}

/// Read a JSON selection config from disk and validate it.
pub fn load_selection_config<P: AsRef<Path>>(path: P) -> Result<SelectionConfig> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
    let config: SelectionConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid config: {}", path.as_ref().display()))?;
    Ok(config)
}

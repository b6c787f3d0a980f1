//! Configuration for huf-compress

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{HufError, HufResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HufConfig {
    /// Capacity of the buffered reader/writer wrapped around files.
    pub buffer_size: usize,
    /// Largest accepted input, in bytes. Bounded by the 4-byte `total_chars` field.
    pub max_input_size: u64,
    /// Starting capacity of the working tree arena; 0 means "one slot per leaf".
    pub initial_tree_capacity: usize,
}

impl Default for HufConfig {
    fn default() -> Self {
        Self {
            buffer_size: 64 * 1024,
            max_input_size: u32::MAX as u64,
            initial_tree_capacity: 0,
        }
    }
}

impl HufConfig {
    /// Load a JSON config file. Missing fields fall back to defaults.
    pub fn load(path: &Path) -> HufResult<Self> {
        let text = fs::read_to_string(path)?;
        let config: HufConfig = serde_json::from_str(&text).map_err(|e| {
            HufError::InvalidParameter(format!("config {}: {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> HufResult<()> {
        if self.buffer_size == 0 {
            return Err(HufError::InvalidParameter(
                "buffer_size must be greater than zero".into(),
            ));
        }
        if self.max_input_size > u32::MAX as u64 {
            return Err(HufError::InvalidParameter(format!(
                "max_input_size {} exceeds the format limit of {} bytes",
                self.max_input_size,
                u32::MAX
            )));
        }
        Ok(())
    }
}

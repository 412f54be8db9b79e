//! # Engine Configuration
//!
//! Capacity settings consumed once, when an [`crate::EngineContext`] is
//! built. Missing keys fall back to the defaults in
//! [`tessera_shared::constants`].
//!
//! ```toml
//! max_entity_count = 10000
//! gpu_buffer_bytes = 33554432
//! cpu_buffer_bytes = 8388608
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tessera_shared::{
    BUFFER_VIEW_ALIGNMENT, DEFAULT_CPU_BUFFER_BYTES, DEFAULT_GPU_BUFFER_BYTES,
    DEFAULT_MAX_ENTITY_COUNT,
};

use crate::error::{StorageError, StorageResult};

/// Arena and registry capacities.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Rows reserved per component type; also the entity limit.
    pub max_entity_count: usize,
    /// Size of the GPU buffer in bytes.
    pub gpu_buffer_bytes: usize,
    /// Size of the CPU buffer in bytes.
    pub cpu_buffer_bytes: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_entity_count: DEFAULT_MAX_ENTITY_COUNT,
            gpu_buffer_bytes: DEFAULT_GPU_BUFFER_BYTES,
            cpu_buffer_bytes: DEFAULT_CPU_BUFFER_BYTES,
        }
    }
}

impl EngineConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidConfig`] on malformed TOML or invalid values.
    pub fn from_toml_str(text: &str) -> StorageResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| StorageError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidConfig`] if the file cannot be read or is invalid.
    pub fn from_toml_file(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| StorageError::InvalidConfig(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Checks that every capacity is usable.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidConfig`] naming the first bad value.
    pub fn validate(&self) -> StorageResult<()> {
        if self.max_entity_count == 0 {
            return Err(StorageError::InvalidConfig(
                "max_entity_count must be greater than zero".into(),
            ));
        }
        if u32::try_from(self.max_entity_count).is_err() {
            return Err(StorageError::InvalidConfig(format!(
                "max_entity_count {} does not fit entity ids",
                self.max_entity_count
            )));
        }
        for (name, bytes) in [
            ("gpu_buffer_bytes", self.gpu_buffer_bytes),
            ("cpu_buffer_bytes", self.cpu_buffer_bytes),
        ] {
            if bytes == 0 || bytes % BUFFER_VIEW_ALIGNMENT != 0 {
                return Err(StorageError::InvalidConfig(format!(
                    "{name} must be a positive multiple of {BUFFER_VIEW_ALIGNMENT}, got {bytes}"
                )));
            }
        }
        Ok(())
    }
}

use super::report::positive;
use crate::error::{ConfigValidationError, ValidationResult};
use crate::keys::{ConfigKey, config_keys};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;

/// External property keys of the state persistence domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SerializationKey {
    Enabled,
    FilePath,
    AutosaveInterval,
    MaxSnapshots,
}

config_keys!(SerializationKey, "state", {
    Enabled => "state.enabled",
    FilePath => "state.file.path",
    AutosaveInterval => "state.autosave.interval",
    MaxSnapshots => "state.max.snapshots",
});

/// Parameters governing periodic snapshots of engine state.
///
/// Intervals and the file path are validated even when persistence is
/// disabled, so toggling `enabled` never turns a stored config invalid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SerializationConfig {
    enabled: bool,
    file_path: Utf8PathBuf,
    save_interval: i32,
    max_snapshots: i32,
}

impl SerializationConfig {
    pub fn builder() -> SerializationConfigBuilder {
        SerializationConfigBuilder::default()
    }

    pub fn new(
        enabled: bool,
        file_path: impl Into<Utf8PathBuf>,
        save_interval: i32,
        max_snapshots: i32,
    ) -> ValidationResult<Self> {
        Self::validated(SerializationConfigBuilder {
            enabled,
            file_path: Some(file_path.into()),
            save_interval,
            max_snapshots,
        })
    }

    fn validated(staged: SerializationConfigBuilder) -> ValidationResult<Self> {
        positive(
            SerializationKey::AutosaveInterval,
            "Save interval",
            i64::from(staged.save_interval),
        )?;
        positive(
            SerializationKey::MaxSnapshots,
            "Max snapshots",
            i64::from(staged.max_snapshots),
        )?;
        let file_path = staged.file_path.ok_or_else(|| {
            ConfigValidationError::new(SerializationKey::FilePath.as_str(), "File path is not set")
        })?;
        if file_path.as_str().is_empty() {
            return Err(ConfigValidationError::new(
                SerializationKey::FilePath.as_str(),
                "File path cannot be empty",
            ));
        }

        tracing::debug!(
            domain = SerializationKey::DOMAIN,
            enabled = staged.enabled,
            file = %file_path,
            "state persistence configuration built"
        );

        Ok(Self {
            enabled: staged.enabled,
            file_path,
            save_interval: staged.save_interval,
            max_snapshots: staged.max_snapshots,
        })
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn file_path(&self) -> &Utf8Path {
        &self.file_path
    }

    /// Interval between automatic snapshots, in engine ticks.
    pub fn save_interval(&self) -> i32 {
        self.save_interval
    }

    pub fn max_snapshots(&self) -> i32 {
        self.max_snapshots
    }
}

/// Fluent, single-use builder for [`SerializationConfig`].
#[derive(Debug, Clone, Default)]
pub struct SerializationConfigBuilder {
    enabled: bool,
    file_path: Option<Utf8PathBuf>,
    save_interval: i32,
    max_snapshots: i32,
}

impl SerializationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn file_path(mut self, file_path: impl Into<Utf8PathBuf>) -> Self {
        self.file_path = Some(file_path.into());
        self
    }

    pub fn save_interval(mut self, save_interval: i32) -> Self {
        self.save_interval = save_interval;
        self
    }

    pub fn max_snapshots(mut self, max_snapshots: i32) -> Self {
        self.max_snapshots = max_snapshots;
        self
    }

    pub fn build(self) -> ValidationResult<SerializationConfig> {
        SerializationConfig::validated(self)
    }
}

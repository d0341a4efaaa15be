use super::ApplicationMode;
use crate::error::{ConfigValidationError, ValidationResult};
use crate::keys::{ConfigKey, config_keys};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// `MAJOR.MINOR.PATCH` made of ASCII digit runs. Leading zeros are allowed.
static VERSION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+$").expect("Invalid version regex"));

/// External property keys of the application domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApplicationKey {
    Name,
    Version,
    Mode,
    Interactive,
}

config_keys!(ApplicationKey, "app", {
    Name => "app.name",
    Version => "app.version",
    Mode => "app.mode",
    Interactive => "app.interactive",
});

/// Process identity and run mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationConfig {
    name: String,
    version: String,
    mode: ApplicationMode,
    interactive: bool,
}

impl ApplicationConfig {
    pub fn builder() -> ApplicationConfigBuilder {
        ApplicationConfigBuilder::default()
    }

    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        mode: ApplicationMode,
        interactive: bool,
    ) -> ValidationResult<Self> {
        Self::validated(ApplicationConfigBuilder {
            name: name.into(),
            version: version.into(),
            mode: Some(mode),
            interactive,
        })
    }

    fn validated(staged: ApplicationConfigBuilder) -> ValidationResult<Self> {
        if staged.name.is_empty() {
            return Err(ConfigValidationError::new(
                ApplicationKey::Name.as_str(),
                "Name cannot be empty",
            ));
        }
        if staged.version.is_empty() {
            return Err(ConfigValidationError::new(
                ApplicationKey::Version.as_str(),
                "Version cannot be empty",
            ));
        }
        if !VERSION_PATTERN.is_match(&staged.version) {
            return Err(ConfigValidationError::new(
                ApplicationKey::Version.as_str(),
                format!(
                    "Version must look like MAJOR.MINOR.PATCH, got '{}'",
                    staged.version
                ),
            ));
        }
        let mode = staged.mode.ok_or_else(|| {
            ConfigValidationError::new(ApplicationKey::Mode.as_str(), "Mode is not set")
        })?;

        tracing::debug!(
            domain = ApplicationKey::DOMAIN,
            name = %staged.name,
            version = %staged.version,
            %mode,
            "application configuration built"
        );

        Ok(Self {
            name: staged.name,
            version: staged.version,
            mode,
            interactive: staged.interactive,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn mode(&self) -> ApplicationMode {
        self.mode
    }

    pub fn interactive(&self) -> bool {
        self.interactive
    }

    pub fn is_dev(&self) -> bool {
        self.mode == ApplicationMode::Dev
    }
}

/// Fluent, single-use builder for [`ApplicationConfig`].
#[derive(Debug, Clone, Default)]
pub struct ApplicationConfigBuilder {
    name: String,
    version: String,
    mode: Option<ApplicationMode>,
    interactive: bool,
}

impl ApplicationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn mode(mut self, mode: ApplicationMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn build(self) -> ValidationResult<ApplicationConfig> {
        ApplicationConfig::validated(self)
    }
}

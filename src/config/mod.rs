use crate::error::LoadError;
use crate::filter::FilterStrategy;
use crate::keys::ConfigKey;
use crate::models::{
    AnalysisConfig, AnalysisConfigBuilder, AnalysisKey, ApplicationConfig,
    ApplicationConfigBuilder, ApplicationKey, ReportConfig, ReportConfigBuilder, ReportKey,
    ScanConfig, ScanConfigBuilder, ScanKey, SerializationConfig, SerializationConfigBuilder,
    SerializationKey,
};
use camino::{Utf8Path, Utf8PathBuf};
use config::{Config, ConfigError, Environment, File, FileFormat, Value, ValueKind};
use serde::Serialize;
use std::str::FromStr;

/// Loader turning external property sources into validated configs.
///
/// The loader is an ordinary value: construct it from the sources you want
/// and hand it to whoever needs configuration. Keys follow the registries in
/// [`crate::models`] (`scan.root.dir`, `report.max.rows`, ...). In structured
/// files each dot opens a nested table:
///
/// ```yaml
/// scan:
///   root:
///     dir: /srv/data
///   allowed:
///     extensions: rs,toml
/// ```
///
/// A key without a value leaves the builder default in place, so a missing
/// mandatory field is reported by the config's own validation.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    source: Config,
}

/// Every domain loaded from a single source.
#[derive(Debug, Clone, Serialize)]
pub struct LoadedConfig {
    pub application: ApplicationConfig,
    pub scan: ScanConfig,
    pub analysis: AnalysisConfig,
    pub report: ReportConfig,
    pub state: SerializationConfig,
}

impl ConfigLoader {
    /// Load a configuration file. The format (YAML, TOML, JSON, ...) is
    /// picked from the file extension.
    pub fn from_file<P: AsRef<Utf8Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let source = Config::builder()
            .add_source(File::from(path.as_std_path()).required(true))
            .build()?;

        tracing::info!("Loaded configuration from {}", path);
        Ok(Self { source })
    }

    /// Load a configuration file and overlay environment variables.
    ///
    /// With prefix `FSCAN`, `FSCAN_SCAN_MAX_DEPTH=3` overrides
    /// `scan.max.depth`. Environment values win over the file.
    pub fn from_file_with_env<P: AsRef<Utf8Path>>(path: P, prefix: &str) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let source = Config::builder()
            .add_source(File::from(path.as_std_path()).required(true))
            .add_source(environment(prefix))
            .build()?;

        tracing::info!("Loaded configuration from {} with {}_* overrides", path, prefix);
        Ok(Self { source })
    }

    /// Load configuration from YAML text.
    pub fn from_yaml_str(contents: &str) -> Result<Self, LoadError> {
        let source = Config::builder()
            .add_source(File::from_str(contents, FileFormat::Yaml))
            .build()?;
        Ok(Self { source })
    }

    /// Wrap an already assembled [`config::Config`].
    pub fn from_config(source: Config) -> Self {
        Self { source }
    }

    /// Whether `key` has a value in any source.
    pub fn contains(&self, key: &str) -> bool {
        self.source.get::<Value>(key).is_ok()
    }

    pub fn scan_builder(&self) -> Result<ScanConfigBuilder, LoadError> {
        let mut builder = ScanConfig::builder();
        if let Some(root) = self.string(ScanKey::RootDir)? {
            builder = builder.root_directory(Utf8PathBuf::from(root));
        }
        if let Some(follow) = self.bool(ScanKey::FollowSymlinks)? {
            builder = builder.follow_symlinks(follow);
        }
        if let Some(depth) = self.i32(ScanKey::MaxDepth)? {
            builder = builder.max_depth(depth);
        }
        if let Some(extensions) = self.list(ScanKey::AllowedExtensions)? {
            builder = builder.allowed_extensions(extensions);
        }
        if let Some(size) = self.i64(ScanKey::MaxFileSizeBytes)? {
            builder = builder.max_file_size_bytes(size);
        }
        Ok(builder)
    }

    pub fn load_scan(&self) -> Result<ScanConfig, LoadError> {
        Ok(self.scan_builder()?.build()?)
    }

    pub fn analysis_builder(&self) -> Result<AnalysisConfigBuilder, LoadError> {
        let mut builder = AnalysisConfig::builder();
        if let Some(enable) = self.bool(AnalysisKey::SizeAnalysis)? {
            builder = builder.enable_size_analysis(enable);
        }
        if let Some(enable) = self.bool(AnalysisKey::ExtensionAnalysis)? {
            builder = builder.enable_extensions_analysis(enable);
        }
        if let Some(order) = self.parsed(AnalysisKey::SortOrder)? {
            builder = builder.sort_order(order);
        }
        if let Some(strategy) = self.parsed::<FilterStrategy, _>(AnalysisKey::Strategy)? {
            builder = builder.shared_file_filter(strategy.into_filter());
        }
        if let Some(format) = self.parsed(AnalysisKey::ReportFormat)? {
            builder = builder.report_format(format);
        }
        if let Some(size) = self.i64(AnalysisKey::BufferSize)? {
            builder = builder.buffer_size(size);
        }
        if let Some(charset) = self.parsed(AnalysisKey::Charset)? {
            builder = builder.charset(charset);
        }
        if let Some(limit) = self.i32(AnalysisKey::ResultLimit)? {
            builder = builder.result_limit(limit);
        }
        Ok(builder)
    }

    pub fn load_analysis(&self) -> Result<AnalysisConfig, LoadError> {
        Ok(self.analysis_builder()?.build()?)
    }

    pub fn report_builder(&self) -> Result<ReportConfigBuilder, LoadError> {
        let mut builder = ReportConfig::builder();
        if let Some(path) = self.string(ReportKey::OutputPath)? {
            builder = builder.output_path(Utf8PathBuf::from(path));
        }
        if let Some(append) = self.bool(ReportKey::AppendMode)? {
            builder = builder.append_mode(append);
        }
        if let Some(format) = self.parsed(ReportKey::Format)? {
            builder = builder.report_format(format);
        }
        if let Some(size) = self.i64(ReportKey::BufferSize)? {
            builder = builder.buffer_size(size);
        }
        if let Some(charset) = self.parsed(ReportKey::Charset)? {
            builder = builder.charset(charset);
        }
        if let Some(headers) = self.bool(ReportKey::IncludeHeaders)? {
            builder = builder.include_headers(headers);
        }
        if let Some(interval) = self.i32(ReportKey::FlushInterval)? {
            builder = builder.flush_interval(interval);
        }
        if let Some(rows) = self.i32(ReportKey::MaxRows)? {
            builder = builder.max_rows(rows);
        }
        Ok(builder)
    }

    pub fn load_report(&self) -> Result<ReportConfig, LoadError> {
        Ok(self.report_builder()?.build()?)
    }

    pub fn serialization_builder(&self) -> Result<SerializationConfigBuilder, LoadError> {
        let mut builder = SerializationConfig::builder();
        if let Some(enabled) = self.bool(SerializationKey::Enabled)? {
            builder = builder.enabled(enabled);
        }
        if let Some(path) = self.string(SerializationKey::FilePath)? {
            builder = builder.file_path(Utf8PathBuf::from(path));
        }
        if let Some(interval) = self.i32(SerializationKey::AutosaveInterval)? {
            builder = builder.save_interval(interval);
        }
        if let Some(snapshots) = self.i32(SerializationKey::MaxSnapshots)? {
            builder = builder.max_snapshots(snapshots);
        }
        Ok(builder)
    }

    pub fn load_serialization(&self) -> Result<SerializationConfig, LoadError> {
        Ok(self.serialization_builder()?.build()?)
    }

    pub fn application_builder(&self) -> Result<ApplicationConfigBuilder, LoadError> {
        let mut builder = ApplicationConfig::builder();
        if let Some(name) = self.string(ApplicationKey::Name)? {
            builder = builder.name(name);
        }
        if let Some(version) = self.string(ApplicationKey::Version)? {
            builder = builder.version(version);
        }
        if let Some(mode) = self.parsed(ApplicationKey::Mode)? {
            builder = builder.mode(mode);
        }
        if let Some(interactive) = self.bool(ApplicationKey::Interactive)? {
            builder = builder.interactive(interactive);
        }
        Ok(builder)
    }

    pub fn load_application(&self) -> Result<ApplicationConfig, LoadError> {
        Ok(self.application_builder()?.build()?)
    }

    /// Load every domain, stopping at the first failure.
    pub fn load_all(&self) -> Result<LoadedConfig, LoadError> {
        Ok(LoadedConfig {
            application: self.load_application()?,
            scan: self.load_scan()?,
            analysis: self.load_analysis()?,
            report: self.load_report()?,
            state: self.load_serialization()?,
        })
    }

    /// Read `key` with `read`, mapping "not found" to `None` and conversion
    /// failures to [`LoadError::InvalidValue`].
    fn lookup<K, T>(
        &self,
        key: K,
        read: impl FnOnce(&Config, &str) -> Result<T, ConfigError>,
    ) -> Result<Option<T>, LoadError>
    where
        K: ConfigKey,
    {
        match read(&self.source, key.as_str()) {
            Ok(value) => Ok(Some(value)),
            Err(ConfigError::NotFound(_)) => {
                tracing::debug!("No value for {}, using builder default", key.as_str());
                Ok(None)
            }
            Err(e) => Err(LoadError::invalid(key.as_str(), e.to_string())),
        }
    }

    fn string<K: ConfigKey>(&self, key: K) -> Result<Option<String>, LoadError> {
        self.lookup(key, |c, k| c.get_string(k))
    }

    fn bool<K: ConfigKey>(&self, key: K) -> Result<Option<bool>, LoadError> {
        self.lookup(key, |c, k| c.get_bool(k))
    }

    /// Integers must be written as integers. Fractional numbers are rejected
    /// rather than rounded, and text must parse as a whole number.
    fn i64<K: ConfigKey>(&self, key: K) -> Result<Option<i64>, LoadError> {
        let Some(value) = self.lookup(key, |c, k| c.get::<Value>(k))? else {
            return Ok(None);
        };
        let number = match &value.kind {
            ValueKind::I64(n) => Ok(*n),
            ValueKind::I128(_) | ValueKind::U64(_) | ValueKind::U128(_) => {
                value.clone().into_int().map_err(|e| e.to_string())
            }
            ValueKind::String(raw) => raw
                .trim()
                .parse::<i64>()
                .map_err(|_| format!("'{raw}' is not an integer")),
            _ => Err(format!("expected an integer, got {value}")),
        };
        number
            .map(Some)
            .map_err(|reason| LoadError::invalid(key.as_str(), reason))
    }

    fn i32<K: ConfigKey>(&self, key: K) -> Result<Option<i32>, LoadError> {
        match self.i64(key)? {
            Some(value) => i32::try_from(value).map(Some).map_err(|_| {
                LoadError::invalid(key.as_str(), format!("{value} is out of range"))
            }),
            None => Ok(None),
        }
    }

    fn parsed<T, K>(&self, key: K) -> Result<Option<T>, LoadError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
        K: ConfigKey,
    {
        match self.string(key)? {
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|e: T::Err| LoadError::invalid(key.as_str(), e.to_string())),
            None => Ok(None),
        }
    }

    /// Lists may be written natively or as a comma separated string. Items
    /// are trimmed but empty items are kept for validation to report.
    fn list<K: ConfigKey>(&self, key: K) -> Result<Option<Vec<String>>, LoadError> {
        match self.source.get_array(key.as_str()) {
            Ok(values) => values
                .into_iter()
                .map(|value| value.into_string().map(|s| s.trim().to_string()))
                .collect::<Result<Vec<_>, _>>()
                .map(Some)
                .map_err(|e| LoadError::invalid(key.as_str(), e.to_string())),
            Err(ConfigError::NotFound(_)) => {
                tracing::debug!("No value for {}, using builder default", key.as_str());
                Ok(None)
            }
            Err(_) => Ok(self.string(key)?.map(|raw| {
                raw.split(',').map(|item| item.trim().to_string()).collect()
            })),
        }
    }
}

fn environment(prefix: &str) -> Environment {
    Environment::with_prefix(prefix)
        .prefix_separator("_")
        .separator("_")
}

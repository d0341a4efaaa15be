use crate::error::{ConfigValidationError, ValidationResult};
use crate::filter::ExtensionFilter;
use crate::keys::{ConfigKey, config_keys};
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexSet;
use serde::Serialize;
use std::fs;

/// Largest accepted `max_file_size_bytes`: 10 GiB.
pub const MAX_FILE_SIZE_LIMIT: i64 = 10 * 1024 * 1024 * 1024;

/// `max_depth` value meaning "descend without limit".
pub const UNLIMITED_DEPTH: i32 = -1;

/// External property keys of the scan domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanKey {
    RootDir,
    FollowSymlinks,
    MaxDepth,
    /// Comma separated list, or a list in structured sources.
    AllowedExtensions,
    MaxFileSizeBytes,
}

config_keys!(ScanKey, "scan", {
    RootDir => "scan.root.dir",
    FollowSymlinks => "scan.follow.symlinks",
    MaxDepth => "scan.max.depth",
    AllowedExtensions => "scan.allowed.extensions",
    MaxFileSizeBytes => "scan.max.file.size.bytes",
});

/// Parameters governing a file-system walk.
///
/// The root directory is checked for existence, type and readability when the
/// value is constructed. That check is point-in-time: the directory may be gone
/// by the time a scanner consumes the config.
///
/// Allowed extensions are stored lower-cased, without a leading dot, in
/// insertion order. Values written with a dot (`.txt`) are rejected rather than
/// stripped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanConfig {
    root_directory: Utf8PathBuf,
    follow_symlinks: bool,
    max_depth: i32,
    allowed_extensions: IndexSet<String>,
    max_file_size_bytes: i64,
}

impl ScanConfig {
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    /// Validate and construct a scan configuration.
    pub fn new<P, I, S>(
        root_directory: P,
        follow_symlinks: bool,
        max_depth: i32,
        allowed_extensions: I,
        max_file_size_bytes: i64,
    ) -> ValidationResult<Self>
    where
        P: Into<Utf8PathBuf>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::validated(
            Some(root_directory.into()),
            follow_symlinks,
            max_depth,
            Some(allowed_extensions.into_iter().map(Into::into).collect()),
            max_file_size_bytes,
        )
    }

    fn validated(
        root_directory: Option<Utf8PathBuf>,
        follow_symlinks: bool,
        max_depth: i32,
        allowed_extensions: Option<Vec<String>>,
        max_file_size_bytes: i64,
    ) -> ValidationResult<Self> {
        let root_directory = root_directory.ok_or_else(|| {
            ConfigValidationError::new(ScanKey::RootDir.as_str(), "Root directory is not set")
        })?;
        check_root_directory(&root_directory)?;

        if max_depth < UNLIMITED_DEPTH {
            return Err(ConfigValidationError::new(
                ScanKey::MaxDepth.as_str(),
                format!("Max depth must be >= 0 or equal to -1 (no depth limit), got {max_depth}"),
            ));
        }
        if max_file_size_bytes < 0 {
            return Err(ConfigValidationError::new(
                ScanKey::MaxFileSizeBytes.as_str(),
                format!("Max file size cannot be negative, got {max_file_size_bytes}"),
            ));
        }
        if max_file_size_bytes > MAX_FILE_SIZE_LIMIT {
            return Err(ConfigValidationError::new(
                ScanKey::MaxFileSizeBytes.as_str(),
                format!(
                    "Max file size cannot be greater than 10 GiB ({MAX_FILE_SIZE_LIMIT} bytes), got {max_file_size_bytes}"
                ),
            ));
        }

        let allowed_extensions = normalize_extensions(allowed_extensions)?;

        tracing::debug!(
            domain = ScanKey::DOMAIN,
            root = %root_directory,
            extensions = allowed_extensions.len(),
            "scan configuration built"
        );

        Ok(Self {
            root_directory,
            follow_symlinks,
            max_depth,
            allowed_extensions,
            max_file_size_bytes,
        })
    }

    pub fn root_directory(&self) -> &Utf8Path {
        &self.root_directory
    }

    pub fn follow_symlinks(&self) -> bool {
        self.follow_symlinks
    }

    /// Maximum traversal depth; [`UNLIMITED_DEPTH`] means no limit.
    pub fn max_depth(&self) -> i32 {
        self.max_depth
    }

    /// Depth limit as an option, `None` when unlimited.
    pub fn depth_limit(&self) -> Option<usize> {
        usize::try_from(self.max_depth).ok()
    }

    /// Normalized extensions. The set is only reachable through a shared
    /// borrow, so holders cannot alter the config through it.
    pub fn allowed_extensions(&self) -> &IndexSet<String> {
        &self.allowed_extensions
    }

    /// Case-insensitive membership test for an extension given without a dot.
    pub fn allows_extension(&self, extension: &str) -> bool {
        self.allowed_extensions
            .contains(extension.to_lowercase().as_str())
    }

    pub fn max_file_size_bytes(&self) -> i64 {
        self.max_file_size_bytes
    }

    /// Whether a file of `size` bytes falls within the configured limit.
    pub fn accepts_size(&self, size: u64) -> bool {
        u64::try_from(self.max_file_size_bytes).is_ok_and(|max| size <= max)
    }

    /// File filter accepting exactly the allowed extensions.
    pub fn extension_filter(&self) -> ExtensionFilter {
        ExtensionFilter::from_normalized(self.allowed_extensions.clone())
    }
}

fn check_root_directory(root: &Utf8Path) -> ValidationResult<()> {
    let key = ScanKey::RootDir.as_str();
    let shown = std::path::absolute(root)
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| root.to_string());

    let metadata = match fs::metadata(root) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigValidationError::new(
                key,
                format!("Root directory doesn't exist: {shown}"),
            ));
        }
        Err(e) => {
            return Err(ConfigValidationError::new(
                key,
                format!("Root directory cannot be accessed: {shown} ({e})"),
            ));
        }
    };

    if !metadata.is_dir() {
        return Err(ConfigValidationError::new(
            key,
            format!("Root directory is not a directory: {shown}"),
        ));
    }

    if let Err(e) = fs::read_dir(root) {
        return Err(ConfigValidationError::new(
            key,
            format!("Root directory is not readable: {shown} ({e})"),
        ));
    }

    Ok(())
}

fn normalize_extensions(extensions: Option<Vec<String>>) -> ValidationResult<IndexSet<String>> {
    let key = ScanKey::AllowedExtensions.as_str();
    let extensions = extensions
        .ok_or_else(|| ConfigValidationError::new(key, "Allowed extensions are not set"))?;
    if extensions.is_empty() {
        return Err(ConfigValidationError::new(
            key,
            "Allowed extensions must not be empty",
        ));
    }

    let mut normalized = IndexSet::with_capacity(extensions.len());
    for ext in extensions {
        if ext.trim().is_empty() {
            return Err(ConfigValidationError::new(key, "Extension must not be blank"));
        }
        if ext.starts_with('.') {
            return Err(ConfigValidationError::new(
                key,
                format!("Extension must not start with '.': {ext}"),
            ));
        }
        normalized.insert(ext.to_lowercase());
    }
    Ok(normalized)
}

/// Fluent, single-use builder for [`ScanConfig`].
///
/// Performs no checks of its own; everything is validated by [`build`](Self::build).
/// Unset fields keep their zero values (`false`, `0`, no root, no extensions).
#[derive(Debug, Clone, Default)]
pub struct ScanConfigBuilder {
    root_directory: Option<Utf8PathBuf>,
    follow_symlinks: bool,
    max_depth: i32,
    allowed_extensions: Option<Vec<String>>,
    max_file_size_bytes: i64,
}

impl ScanConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root_directory(mut self, root_directory: impl Into<Utf8PathBuf>) -> Self {
        self.root_directory = Some(root_directory.into());
        self
    }

    pub fn follow_symlinks(mut self, follow_symlinks: bool) -> Self {
        self.follow_symlinks = follow_symlinks;
        self
    }

    pub fn max_depth(mut self, max_depth: i32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn allowed_extensions<I, S>(mut self, allowed_extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_extensions = Some(allowed_extensions.into_iter().map(Into::into).collect());
        self
    }

    pub fn max_file_size_bytes(mut self, max_file_size_bytes: i64) -> Self {
        self.max_file_size_bytes = max_file_size_bytes;
        self
    }

    pub fn build(self) -> ValidationResult<ScanConfig> {
        ScanConfig::validated(
            self.root_directory,
            self.follow_symlinks,
            self.max_depth,
            self.allowed_extensions,
            self.max_file_size_bytes,
        )
    }
}

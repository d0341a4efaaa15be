// fscan - configuration model for the fscan file scanning, analysis and reporting tool
//
// This is the library crate containing the validated config domains, their
// builders and key registries, the file filter library and the loader.
// The binary crate (main.rs) provides a small CLI to check config files.

pub mod config;
pub mod error;
pub mod filter;
pub mod keys;
pub mod logging;
pub mod models;

// Re-export commonly used types for convenience
pub use crate::config::{ConfigLoader, LoadedConfig};
pub use error::{ConfigValidationError, LoadError};
pub use filter::{FileFilter, FileFilterExt, FilterStrategy, SharedFilter};
pub use keys::ConfigKey;
pub use models::{
    AnalysisConfig, AnalysisSortOrder, ApplicationConfig, ApplicationMode, Charset, ReportConfig,
    ReportFormat, ScanConfig, SerializationConfig,
};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

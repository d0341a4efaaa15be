//! Configuration domains of the fscan tool.
//!
//! Each domain has three parts:
//! - an immutable config value whose constructor is its validator
//! - a fluent, single-use builder staging fields before [`build()`](ScanConfigBuilder::build)
//! - a key enum naming the external property key of every field
//!
//! | Domain | Config | Builder | Keys |
//! |---|---|---|---|
//! | scan | [`ScanConfig`] | [`ScanConfigBuilder`] | [`ScanKey`] |
//! | analysis | [`AnalysisConfig`] | [`AnalysisConfigBuilder`] | [`AnalysisKey`] |
//! | report | [`ReportConfig`] | [`ReportConfigBuilder`] | [`ReportKey`] |
//! | state | [`SerializationConfig`] | [`SerializationConfigBuilder`] | [`SerializationKey`] |
//! | app | [`ApplicationConfig`] | [`ApplicationConfigBuilder`] | [`ApplicationKey`] |
//!
//! # Validation
//!
//! Checks run in a fixed order and the first violation is returned as a
//! [`ConfigValidationError`](crate::error::ConfigValidationError). Errors are
//! never aggregated.
//!
//! # Thread Safety
//!
//! Built configs are immutable and `Send + Sync`. Builders are plain values
//! consumed by `build()`; sharing one between threads is the caller's concern.

pub mod analysis;
pub mod application;
pub mod enums;
pub mod report;
pub mod scan;
pub mod serialization;

pub use analysis::{AnalysisConfig, AnalysisConfigBuilder, AnalysisKey};
pub use application::{ApplicationConfig, ApplicationConfigBuilder, ApplicationKey};
pub use enums::{AnalysisSortOrder, ApplicationMode, Charset, ParseEnumError, ReportFormat};
pub use report::{ReportConfig, ReportConfigBuilder, ReportKey};
pub use scan::{MAX_FILE_SIZE_LIMIT, ScanConfig, ScanConfigBuilder, ScanKey, UNLIMITED_DEPTH};
pub use serialization::{SerializationConfig, SerializationConfigBuilder, SerializationKey};

use super::{AnalysisSortOrder, Charset, ReportFormat};
use crate::error::{ConfigValidationError, ValidationResult};
use crate::filter::{FileFilter, SharedFilter};
use crate::keys::{ConfigKey, config_keys};
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// External property keys of the analysis domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisKey {
    SizeAnalysis,
    ExtensionAnalysis,
    SortOrder,
    /// Parsed by [`FilterStrategy`](crate::filter::FilterStrategy).
    Strategy,
    ReportFormat,
    BufferSize,
    Charset,
    ResultLimit,
}

config_keys!(AnalysisKey, "analysis", {
    SizeAnalysis => "analysis.enable.size.analysis",
    ExtensionAnalysis => "analysis.enable.extensions.analysis",
    SortOrder => "analysis.sort.order",
    Strategy => "analysis.strategy",
    ReportFormat => "analysis.report.format",
    BufferSize => "analysis.buffer.size",
    Charset => "analysis.charset",
    ResultLimit => "analysis.result.limit",
});

/// Parameters governing the metrics computed over scanned files.
///
/// A `result_limit` of zero is legal and means the analysis yields no rows.
#[derive(Clone, Serialize)]
pub struct AnalysisConfig {
    enable_size_analysis: bool,
    enable_extensions_analysis: bool,
    sort_order: AnalysisSortOrder,
    #[serde(serialize_with = "serialize_filter")]
    file_filter: SharedFilter,
    report_format: ReportFormat,
    buffer_size: i64,
    charset: Charset,
    result_limit: i32,
}

fn serialize_filter<S: Serializer>(filter: &SharedFilter, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&filter.describe())
}

impl fmt::Debug for AnalysisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisConfig")
            .field("enable_size_analysis", &self.enable_size_analysis)
            .field("enable_extensions_analysis", &self.enable_extensions_analysis)
            .field("sort_order", &self.sort_order)
            .field("file_filter", &self.file_filter.describe())
            .field("report_format", &self.report_format)
            .field("buffer_size", &self.buffer_size)
            .field("charset", &self.charset)
            .field("result_limit", &self.result_limit)
            .finish()
    }
}

impl AnalysisConfig {
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    #[allow(clippy::too_many_arguments)]
    pub fn new(
        enable_size_analysis: bool,
        enable_extensions_analysis: bool,
        sort_order: AnalysisSortOrder,
        file_filter: SharedFilter,
        report_format: ReportFormat,
        buffer_size: i64,
        charset: Charset,
        result_limit: i32,
    ) -> ValidationResult<Self> {
        AnalysisConfigBuilder {
            enable_size_analysis,
            enable_extensions_analysis,
            sort_order: Some(sort_order),
            file_filter: Some(file_filter),
            report_format: Some(report_format),
            buffer_size,
            charset: Some(charset),
            result_limit,
        }
        .build()
    }

    fn validated(staged: AnalysisConfigBuilder) -> ValidationResult<Self> {
        let sort_order = staged.sort_order.ok_or_else(|| {
            ConfigValidationError::new(AnalysisKey::SortOrder.as_str(), "Sort order is not set")
        })?;
        let file_filter = staged.file_filter.ok_or_else(|| {
            ConfigValidationError::new(AnalysisKey::Strategy.as_str(), "File filter strategy is not set")
        })?;
        let report_format = staged.report_format.ok_or_else(|| {
            ConfigValidationError::new(AnalysisKey::ReportFormat.as_str(), "Report format is not set")
        })?;
        if staged.result_limit < 0 {
            return Err(ConfigValidationError::new(
                AnalysisKey::ResultLimit.as_str(),
                format!("Result limit cannot be negative, got {}", staged.result_limit),
            ));
        }
        if staged.buffer_size <= 0 {
            return Err(ConfigValidationError::new(
                AnalysisKey::BufferSize.as_str(),
                format!("Buffer size must be positive, got {}", staged.buffer_size),
            ));
        }
        let charset = staged.charset.ok_or_else(|| {
            ConfigValidationError::new(AnalysisKey::Charset.as_str(), "Charset is not set")
        })?;

        tracing::debug!(
            domain = AnalysisKey::DOMAIN,
            filter = %file_filter.describe(),
            %report_format,
            "analysis configuration built"
        );

        Ok(Self {
            enable_size_analysis: staged.enable_size_analysis,
            enable_extensions_analysis: staged.enable_extensions_analysis,
            sort_order,
            file_filter,
            report_format,
            buffer_size: staged.buffer_size,
            charset,
            result_limit: staged.result_limit,
        })
    }

    pub fn enable_size_analysis(&self) -> bool {
        self.enable_size_analysis
    }

    pub fn enable_extensions_analysis(&self) -> bool {
        self.enable_extensions_analysis
    }

    pub fn sort_order(&self) -> AnalysisSortOrder {
        self.sort_order
    }

    pub fn file_filter(&self) -> &SharedFilter {
        &self.file_filter
    }

    /// Runs the configured filter against `path`.
    pub fn includes(&self, path: &Path) -> bool {
        self.file_filter.accept(path)
    }

    pub fn report_format(&self) -> ReportFormat {
        self.report_format
    }

    pub fn buffer_size(&self) -> i64 {
        self.buffer_size
    }

    pub fn charset(&self) -> Charset {
        self.charset
    }

    pub fn result_limit(&self) -> i32 {
        self.result_limit
    }
}

/// Fluent, single-use builder for [`AnalysisConfig`].
#[derive(Clone, Default)]
pub struct AnalysisConfigBuilder {
    enable_size_analysis: bool,
    enable_extensions_analysis: bool,
    sort_order: Option<AnalysisSortOrder>,
    file_filter: Option<SharedFilter>,
    report_format: Option<ReportFormat>,
    buffer_size: i64,
    charset: Option<Charset>,
    result_limit: i32,
}

impl fmt::Debug for AnalysisConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisConfigBuilder")
            .field("sort_order", &self.sort_order)
            .field(
                "file_filter",
                &self.file_filter.as_ref().map(|filter| filter.describe()),
            )
            .field("report_format", &self.report_format)
            .field("buffer_size", &self.buffer_size)
            .field("charset", &self.charset)
            .field("result_limit", &self.result_limit)
            .finish_non_exhaustive()
    }
}

impl AnalysisConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enable_size_analysis(mut self, enable: bool) -> Self {
        self.enable_size_analysis = enable;
        self
    }

    pub fn enable_extensions_analysis(mut self, enable: bool) -> Self {
        self.enable_extensions_analysis = enable;
        self
    }

    pub fn sort_order(mut self, sort_order: AnalysisSortOrder) -> Self {
        self.sort_order = Some(sort_order);
        self
    }

    pub fn file_filter<F: FileFilter + 'static>(mut self, filter: F) -> Self {
        self.file_filter = Some(Arc::new(filter));
        self
    }

    /// Like [`file_filter`](Self::file_filter) for a filter that is already shared.
    pub fn shared_file_filter(mut self, filter: SharedFilter) -> Self {
        self.file_filter = Some(filter);
        self
    }

    pub fn report_format(mut self, report_format: ReportFormat) -> Self {
        self.report_format = Some(report_format);
        self
    }

    pub fn buffer_size(mut self, buffer_size: i64) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn charset(mut self, charset: Charset) -> Self {
        self.charset = Some(charset);
        self
    }

    pub fn result_limit(mut self, result_limit: i32) -> Self {
        self.result_limit = result_limit;
        self
    }

    pub fn build(self) -> ValidationResult<AnalysisConfig> {
        AnalysisConfig::validated(self)
    }
}

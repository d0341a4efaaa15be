use super::{Charset, ReportFormat};
use crate::error::{ConfigValidationError, ValidationResult};
use crate::keys::{ConfigKey, config_keys};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;

/// External property keys of the report domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKey {
    OutputPath,
    AppendMode,
    Format,
    BufferSize,
    Charset,
    IncludeHeaders,
    FlushInterval,
    MaxRows,
}

config_keys!(ReportKey, "report", {
    OutputPath => "report.output.path",
    AppendMode => "report.append.mode",
    Format => "report.format",
    BufferSize => "report.buffer.size",
    Charset => "report.charset",
    IncludeHeaders => "report.include.headers",
    FlushInterval => "report.flush.interval",
    MaxRows => "report.max.rows",
});

/// Parameters governing how results are written to disk.
///
/// The output path is not required to exist; only its textual form is checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportConfig {
    output_path: Utf8PathBuf,
    append_mode: bool,
    report_format: ReportFormat,
    buffer_size: i64,
    charset: Charset,
    include_headers: bool,
    flush_interval: i32,
    max_rows: i32,
}

impl ReportConfig {
    pub fn builder() -> ReportConfigBuilder {
        ReportConfigBuilder::default()
    }

    #[allow(clippy::too_many_arguments)]
    pub fn new(
        output_path: impl Into<Utf8PathBuf>,
        append_mode: bool,
        report_format: ReportFormat,
        buffer_size: i64,
        charset: Charset,
        include_headers: bool,
        flush_interval: i32,
        max_rows: i32,
    ) -> ValidationResult<Self> {
        Self::validated(ReportConfigBuilder {
            output_path: Some(output_path.into()),
            append_mode,
            report_format: Some(report_format),
            buffer_size,
            charset: Some(charset),
            include_headers,
            flush_interval,
            max_rows,
        })
    }

    fn validated(staged: ReportConfigBuilder) -> ValidationResult<Self> {
        let output_path = staged.output_path.ok_or_else(|| {
            ConfigValidationError::new(ReportKey::OutputPath.as_str(), "Output path is not set")
        })?;
        let report_format = staged.report_format.ok_or_else(|| {
            ConfigValidationError::new(ReportKey::Format.as_str(), "Report format is not set")
        })?;
        if output_path.as_str().is_empty() {
            return Err(ConfigValidationError::new(
                ReportKey::OutputPath.as_str(),
                "Output path cannot be empty",
            ));
        }
        positive(ReportKey::BufferSize, "Buffer size", staged.buffer_size)?;
        let charset = staged.charset.ok_or_else(|| {
            ConfigValidationError::new(ReportKey::Charset.as_str(), "Charset is not set")
        })?;
        positive(ReportKey::FlushInterval, "Flush interval", i64::from(staged.flush_interval))?;
        positive(ReportKey::MaxRows, "Max rows", i64::from(staged.max_rows))?;

        tracing::debug!(
            domain = ReportKey::DOMAIN,
            output = %output_path,
            %report_format,
            "report configuration built"
        );

        Ok(Self {
            output_path,
            append_mode: staged.append_mode,
            report_format,
            buffer_size: staged.buffer_size,
            charset,
            include_headers: staged.include_headers,
            flush_interval: staged.flush_interval,
            max_rows: staged.max_rows,
        })
    }

    pub fn output_path(&self) -> &Utf8Path {
        &self.output_path
    }

    pub fn append_mode(&self) -> bool {
        self.append_mode
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

    pub fn include_headers(&self) -> bool {
        self.include_headers
    }

    /// Rows written between two flushes.
    pub fn flush_interval(&self) -> i32 {
        self.flush_interval
    }

    pub fn max_rows(&self) -> i32 {
        self.max_rows
    }
}

pub(crate) fn positive(key: impl ConfigKey, label: &str, value: i64) -> ValidationResult<()> {
    if value <= 0 {
        return Err(ConfigValidationError::new(
            key.as_str(),
            format!("{label} must be positive, got {value}"),
        ));
    }
    Ok(())
}

/// Fluent, single-use builder for [`ReportConfig`].
#[derive(Debug, Clone, Default)]
pub struct ReportConfigBuilder {
    output_path: Option<Utf8PathBuf>,
    append_mode: bool,
    report_format: Option<ReportFormat>,
    buffer_size: i64,
    charset: Option<Charset>,
    include_headers: bool,
    flush_interval: i32,
    max_rows: i32,
}

impl ReportConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output_path(mut self, output_path: impl Into<Utf8PathBuf>) -> Self {
        self.output_path = Some(output_path.into());
        self
    }

    pub fn append_mode(mut self, append_mode: bool) -> Self {
        self.append_mode = append_mode;
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

    pub fn include_headers(mut self, include_headers: bool) -> Self {
        self.include_headers = include_headers;
        self
    }

    pub fn flush_interval(mut self, flush_interval: i32) -> Self {
        self.flush_interval = flush_interval;
        self
    }

    pub fn max_rows(mut self, max_rows: i32) -> Self {
        self.max_rows = max_rows;
        self
    }

    pub fn build(self) -> ValidationResult<ReportConfig> {
        ReportConfig::validated(self)
    }
}

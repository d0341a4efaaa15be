//! Property-based tests for builder round trips and normalization

use camino::Utf8PathBuf;
use fscan::models::{MAX_FILE_SIZE_LIMIT, UNLIMITED_DEPTH};
use fscan::{
    ApplicationConfig, ApplicationMode, Charset, ReportConfig, ReportFormat, ScanConfig,
    SerializationConfig,
};
use proptest::prelude::*;
use tempfile::TempDir;

fn format_strategy() -> impl Strategy<Value = ReportFormat> {
    prop_oneof![Just(ReportFormat::Txt), Just(ReportFormat::Csv)]
}

fn charset_strategy() -> impl Strategy<Value = Charset> {
    prop_oneof![
        Just(Charset::Utf8),
        Just(Charset::UsAscii),
        Just(Charset::Iso8859_1),
        Just(Charset::Utf16),
        Just(Charset::Utf16Be),
        Just(Charset::Utf16Le),
    ]
}

proptest! {
    #[test]
    fn scan_round_trip(
        follow in any::<bool>(),
        depth in UNLIMITED_DEPTH..1000,
        size in 0..=MAX_FILE_SIZE_LIMIT,
        exts in prop::collection::vec("[a-zA-Z0-9]{1,6}", 1..8),
    ) {
        let temp_dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();

        let config = ScanConfig::builder()
            .root_directory(&root)
            .follow_symlinks(follow)
            .max_depth(depth)
            .allowed_extensions(exts.clone())
            .max_file_size_bytes(size)
            .build()
            .unwrap();

        prop_assert_eq!(config.root_directory(), root.as_path());
        prop_assert_eq!(config.follow_symlinks(), follow);
        prop_assert_eq!(config.max_depth(), depth);
        prop_assert_eq!(config.max_file_size_bytes(), size);
        for ext in &exts {
            prop_assert!(config.allowed_extensions().contains(ext.to_lowercase().as_str()));
        }
        for stored in config.allowed_extensions() {
            prop_assert_eq!(stored, &stored.to_lowercase());
        }
    }

    #[test]
    fn scan_rejects_dotted_extensions(ext in "\\.[a-z]{1,5}") {
        let temp_dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();

        let err = ScanConfig::builder()
            .root_directory(&root)
            .allowed_extensions(["rs".to_string(), ext])
            .build()
            .unwrap_err();
        prop_assert_eq!(err.key(), "scan.allowed.extensions");
    }

    #[test]
    fn scan_rejects_out_of_range_size(size in prop_oneof![i64::MIN..0, (MAX_FILE_SIZE_LIMIT + 1)..=i64::MAX]) {
        let temp_dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();

        let err = ScanConfig::builder()
            .root_directory(&root)
            .allowed_extensions(["rs"])
            .max_file_size_bytes(size)
            .build()
            .unwrap_err();
        prop_assert_eq!(err.key(), "scan.max.file.size.bytes");
    }

    #[test]
    fn report_round_trip(
        path in "[a-z]{1,8}/[a-z]{1,8}\\.(txt|csv)",
        append in any::<bool>(),
        format in format_strategy(),
        buffer in 1i64..=i64::MAX,
        charset in charset_strategy(),
        headers in any::<bool>(),
        flush in 1i32..=i32::MAX,
        rows in 1i32..=i32::MAX,
    ) {
        let config = ReportConfig::builder()
            .output_path(path.as_str())
            .append_mode(append)
            .report_format(format)
            .buffer_size(buffer)
            .charset(charset)
            .include_headers(headers)
            .flush_interval(flush)
            .max_rows(rows)
            .build()
            .unwrap();

        prop_assert_eq!(config.output_path().as_str(), path.as_str());
        prop_assert_eq!(config.append_mode(), append);
        prop_assert_eq!(config.report_format(), format);
        prop_assert_eq!(config.buffer_size(), buffer);
        prop_assert_eq!(config.charset(), charset);
        prop_assert_eq!(config.include_headers(), headers);
        prop_assert_eq!(config.flush_interval(), flush);
        prop_assert_eq!(config.max_rows(), rows);
    }

    #[test]
    fn serialization_round_trip(
        enabled in any::<bool>(),
        path in "[a-z]{1,12}\\.bin",
        interval in 1i32..=i32::MAX,
        snapshots in 1i32..=i32::MAX,
    ) {
        let config = SerializationConfig::new(enabled, path.as_str(), interval, snapshots).unwrap();
        prop_assert_eq!(config.enabled(), enabled);
        prop_assert_eq!(config.file_path().as_str(), path.as_str());
        prop_assert_eq!(config.save_interval(), interval);
        prop_assert_eq!(config.max_snapshots(), snapshots);
    }

    #[test]
    fn version_pattern_accepts_digit_triples(
        major in "[0-9]{1,4}",
        minor in "[0-9]{1,4}",
        patch in "[0-9]{1,4}",
    ) {
        let version = format!("{major}.{minor}.{patch}");
        let config = ApplicationConfig::new("fscan", version.clone(), ApplicationMode::Prod, false).unwrap();
        prop_assert_eq!(config.version(), version.as_str());
    }
}

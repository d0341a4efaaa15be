//! Pluggable inclusion tests over file-system paths.
//!
//! [`AnalysisConfig`](crate::models::AnalysisConfig) only needs *some* filter;
//! this module ships the common ones and the combinators to compose them:
//!
//! - [`AcceptAll`]: includes every path
//! - [`ExtensionFilter`]: includes paths whose extension is in a set
//! - [`FnFilter`]: wraps an arbitrary closure
//! - [`Not`], [`And`], [`Or`]: logical composition (see [`FileFilterExt`])
//!
//! [`FilterStrategy`] is the textual form used by the `analysis.strategy`
//! property.

use indexmap::IndexSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

/// Decides, per path, whether a file takes part in analysis.
#[cfg_attr(test, mockall::automock)]
pub trait FileFilter: Send + Sync {
    fn accept(&self, path: &Path) -> bool;

    /// Short human readable description, used in logs and rendered configs.
    fn describe(&self) -> String;
}

/// Reference-counted filter as stored in configs.
pub type SharedFilter = Arc<dyn FileFilter>;

impl<F: FileFilter + ?Sized> FileFilter for Arc<F> {
    fn accept(&self, path: &Path) -> bool {
        (**self).accept(path)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl<F: FileFilter + ?Sized> FileFilter for Box<F> {
    fn accept(&self, path: &Path) -> bool {
        (**self).accept(path)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Includes every path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AcceptAll;

impl FileFilter for AcceptAll {
    fn accept(&self, _path: &Path) -> bool {
        true
    }

    fn describe(&self) -> String {
        "all".to_string()
    }
}

/// Includes paths whose final extension is in the set (case-insensitive).
/// Paths without an extension are excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionFilter {
    extensions: IndexSet<String>,
}

impl ExtensionFilter {
    /// Build from raw extensions. Leading dots are tolerated here, unlike in
    /// [`ScanConfig`](crate::models::ScanConfig), and values are lower-cased.
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim().trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        Self { extensions }
    }

    pub(crate) fn from_normalized(extensions: IndexSet<String>) -> Self {
        Self { extensions }
    }

    pub fn extensions(&self) -> &IndexSet<String> {
        &self.extensions
    }
}

impl FileFilter for ExtensionFilter {
    fn accept(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.contains(ext.to_lowercase().as_str()))
    }

    fn describe(&self) -> String {
        let list: Vec<&str> = self.extensions.iter().map(String::as_str).collect();
        format!("extensions:{}", list.join(","))
    }
}

/// Adapts a closure into a [`FileFilter`].
pub struct FnFilter<F> {
    label: String,
    predicate: F,
}

impl<F> FnFilter<F>
where
    F: Fn(&Path) -> bool + Send + Sync,
{
    pub fn new(label: impl Into<String>, predicate: F) -> Self {
        Self {
            label: label.into(),
            predicate,
        }
    }
}

impl<F> fmt::Debug for FnFilter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnFilter")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl<F> FileFilter for FnFilter<F>
where
    F: Fn(&Path) -> bool + Send + Sync,
{
    fn accept(&self, path: &Path) -> bool {
        (self.predicate)(path)
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}

/// Inverts the wrapped filter.
#[derive(Debug, Clone)]
pub struct Not<F>(pub F);

impl<F: FileFilter> FileFilter for Not<F> {
    fn accept(&self, path: &Path) -> bool {
        !self.0.accept(path)
    }

    fn describe(&self) -> String {
        format!("not({})", self.0.describe())
    }
}

/// Includes a path only if both filters do. The right side is not consulted
/// when the left side rejects.
#[derive(Debug, Clone)]
pub struct And<A, B>(pub A, pub B);

impl<A: FileFilter, B: FileFilter> FileFilter for And<A, B> {
    fn accept(&self, path: &Path) -> bool {
        self.0.accept(path) && self.1.accept(path)
    }

    fn describe(&self) -> String {
        format!("and({}, {})", self.0.describe(), self.1.describe())
    }
}

/// Includes a path if either filter does. The right side is not consulted
/// when the left side accepts.
#[derive(Debug, Clone)]
pub struct Or<A, B>(pub A, pub B);

impl<A: FileFilter, B: FileFilter> FileFilter for Or<A, B> {
    fn accept(&self, path: &Path) -> bool {
        self.0.accept(path) || self.1.accept(path)
    }

    fn describe(&self) -> String {
        format!("or({}, {})", self.0.describe(), self.1.describe())
    }
}

/// Combinators available on every sized filter.
pub trait FileFilterExt: FileFilter + Sized {
    fn and<B: FileFilter>(self, other: B) -> And<Self, B> {
        And(self, other)
    }

    fn or<B: FileFilter>(self, other: B) -> Or<Self, B> {
        Or(self, other)
    }

    fn not(self) -> Not<Self> {
        Not(self)
    }

    fn shared(self) -> SharedFilter
    where
        Self: 'static,
    {
        Arc::new(self)
    }
}

impl<F: FileFilter + Sized> FileFilterExt for F {}

/// Filter selection as written under `analysis.strategy`.
///
/// Accepted forms: `all` (or `accept-all`), `none`, and
/// `extensions:<ext>[,<ext>...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterStrategy {
    AcceptAll,
    RejectAll,
    Extensions(Vec<String>),
}

/// Error returned for an unrecognised `analysis.strategy` value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown filter strategy '{0}', expected 'all', 'none' or 'extensions:<list>'")]
pub struct ParseStrategyError(String);

impl FilterStrategy {
    pub fn into_filter(self) -> SharedFilter {
        match self {
            Self::AcceptAll => AcceptAll.shared(),
            Self::RejectAll => AcceptAll.not().shared(),
            Self::Extensions(exts) => ExtensionFilter::new(exts).shared(),
        }
    }
}

impl FromStr for FilterStrategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (name, args) = match trimmed.split_once(':') {
            Some((name, args)) => (name.trim(), Some(args)),
            None => (trimmed, None),
        };

        match (name.to_ascii_lowercase().as_str(), args) {
            ("all" | "accept-all", None) => Ok(Self::AcceptAll),
            ("none", None) => Ok(Self::RejectAll),
            ("extensions", Some(list)) => {
                let exts: Vec<String> = list
                    .split(',')
                    .map(str::trim)
                    .filter(|ext| !ext.is_empty())
                    .map(str::to_string)
                    .collect();
                if exts.is_empty() {
                    return Err(ParseStrategyError(s.to_string()));
                }
                Ok(Self::Extensions(exts))
            }
            _ => Err(ParseStrategyError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_all() {
        assert!(AcceptAll.accept(Path::new("anything")));
        assert!(AcceptAll.accept(Path::new("/tmp/x.bin")));
    }

    #[test]
    fn test_extension_filter_is_case_insensitive() {
        let filter = ExtensionFilter::new([".RS", "toml"]);
        assert!(filter.accept(Path::new("src/lib.rs")));
        assert!(filter.accept(Path::new("Cargo.TOML")));
        assert!(!filter.accept(Path::new("README.md")));
        assert!(!filter.accept(Path::new("Makefile")));
        assert_eq!(filter.describe(), "extensions:rs,toml");
    }

    #[test]
    fn test_combinators() {
        let rust = ExtensionFilter::new(["rs"]);
        let not_tests = FnFilter::new("not-tests", |p: &Path| {
            !p.components().any(|c| c.as_os_str() == "tests")
        });

        let filter = rust.clone().and(not_tests);
        assert!(filter.accept(Path::new("src/main.rs")));
        assert!(!filter.accept(Path::new("tests/it.rs")));
        assert_eq!(filter.describe(), "and(extensions:rs, not-tests)");

        let either = rust.or(ExtensionFilter::new(["md"]));
        assert!(either.accept(Path::new("README.md")));

        let inverted = ExtensionFilter::new(["log"]).not();
        assert!(!inverted.accept(Path::new("debug.log")));
        assert!(inverted.accept(Path::new("main.rs")));
    }

    #[test]
    fn test_and_short_circuits() {
        let mut left = MockFileFilter::new();
        left.expect_accept().times(1).return_const(false);
        let mut right = MockFileFilter::new();
        right.expect_accept().times(0);

        assert!(!And(left, right).accept(Path::new("a.rs")));
    }

    #[test]
    fn test_or_short_circuits() {
        let mut left = MockFileFilter::new();
        left.expect_accept().times(1).return_const(true);
        let mut right = MockFileFilter::new();
        right.expect_accept().times(0);

        assert!(Or(left, right).accept(Path::new("a.rs")));
    }

    #[test]
    fn test_shared_filter_delegates() {
        let shared: SharedFilter = ExtensionFilter::new(["csv"]).shared();
        let cloned = Arc::clone(&shared);
        assert!(cloned.accept(Path::new("out.csv")));
        assert_eq!(shared.describe(), "extensions:csv");
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("all".parse::<FilterStrategy>().unwrap(), FilterStrategy::AcceptAll);
        assert_eq!(
            "Accept-All".parse::<FilterStrategy>().unwrap(),
            FilterStrategy::AcceptAll
        );
        assert_eq!("none".parse::<FilterStrategy>().unwrap(), FilterStrategy::RejectAll);
        assert_eq!(
            "extensions: rs, toml".parse::<FilterStrategy>().unwrap(),
            FilterStrategy::Extensions(vec!["rs".to_string(), "toml".to_string()])
        );
        assert!("extensions:".parse::<FilterStrategy>().is_err());
        assert!("glob:*.rs".parse::<FilterStrategy>().is_err());
        assert!("all:rs".parse::<FilterStrategy>().is_err());
    }

    #[test]
    fn test_strategy_into_filter() {
        let reject = FilterStrategy::RejectAll.into_filter();
        assert!(!reject.accept(Path::new("a.rs")));
        assert_eq!(reject.describe(), "not(all)");

        let exts = FilterStrategy::Extensions(vec!["rs".into()]).into_filter();
        assert!(exts.accept(Path::new("lib.rs")));
    }
}

//! External property key registries.
//!
//! Each config domain owns a closed enum of its fields (see
//! [`ScanKey`](crate::models::ScanKey), [`AnalysisKey`](crate::models::AnalysisKey),
//! [`ReportKey`](crate::models::ReportKey),
//! [`SerializationKey`](crate::models::SerializationKey) and
//! [`ApplicationKey`](crate::models::ApplicationKey)). The literal strings are
//! an external compatibility surface: property files and environment
//! variables are written against them, so they must never be renamed.
//!
//! Registries only hand out keys. Parsing raw values is the job of
//! [`ConfigLoader`](crate::config::ConfigLoader).

/// A static, read-only mapping from a domain field to its external key.
pub trait ConfigKey: Copy + Eq + std::fmt::Debug + 'static {
    /// Short domain label used in logs and CLI output (`scan`, `report`, ...).
    const DOMAIN: &'static str;

    /// Every key of the domain, in declaration order.
    fn all() -> &'static [Self];

    /// The literal property key, e.g. `scan.root.dir`.
    fn as_str(self) -> &'static str;

    /// Reverse lookup from a literal key.
    fn from_key(key: &str) -> Option<Self> {
        Self::all().iter().copied().find(|k| k.as_str() == key)
    }
}

/// Implements [`ConfigKey`] and `Display` for a key enum from a
/// `Variant => "literal"` table.
macro_rules! config_keys {
    ($name:ident, $domain:literal, { $($variant:ident => $key:literal),+ $(,)? }) => {
        impl $crate::keys::ConfigKey for $name {
            const DOMAIN: &'static str = $domain;

            fn all() -> &'static [Self] {
                &[$($name::$variant),+]
            }

            fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $key),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::keys::ConfigKey::as_str(*self))
            }
        }
    };
}

pub(crate) use config_keys;

use serde::{Deserialize, Serialize};

use crate::table::OptFlag;

/// One virtual-host definition.
///
/// Records are produced by [`crate::parse`] or built fluently via the
/// methods in [`crate::builder`]. Identity is the `server_name`, compared
/// case-insensitively; the original casing is preserved on write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VHost {
    pub server_name: String,
    /// Whether the block is active. A disabled block is written with every
    /// line comment-prefixed; the flag itself never appears in the text.
    pub enabled: bool,
    pub document_root: String,
    /// Listening port. `None` means the default (80), which is omitted
    /// from the rendered text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Additional names sharing this block, in appearance order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub server_alias: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_handler_404: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compress_settings: Option<CompressSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_rewrite: Option<UrlRewrite>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl: Option<SslSettings>,
    #[serde(default, skip_serializing_if = "Optimizations::is_empty")]
    pub optimizations: Optimizations,
}

/// Static-compression settings (`compress.*` directives).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressSettings {
    pub enabled: bool,
    pub cache_dir: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub file_types: Vec<String>,
}

/// `url.rewrite-if-not-file` rule set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlRewrite {
    pub enabled: bool,
    pub rules: Vec<RewriteRule>,
}

/// One rewrite rule: `"pattern" => "replacement"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteRule {
    pub pattern: String,
    pub replacement: String,
}

/// TLS settings (`ssl.*` directives). Rendered only when `engine` is on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SslSettings {
    pub engine: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_file: Option<String>,
}

/// High-level optimization flags.
///
/// Each set flag expands to a fixed directive bundle at render time; see
/// [`OptFlag::bundle`]. `compress` and `gzip` share one bundle and are
/// kept as distinct flags for compatibility with existing files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Optimizations {
    pub compress: bool,
    pub cache: bool,
    pub expires: bool,
    pub etag: bool,
    pub static_cache: bool,
    pub proxy_cache: bool,
    pub gzip: bool,
    pub keepalive: bool,
}

impl Optimizations {
    /// True when no flag is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !(self.compress
            || self.cache
            || self.expires
            || self.etag
            || self.static_cache
            || self.proxy_cache
            || self.gzip
            || self.keepalive)
    }

    /// Read one flag.
    #[must_use]
    pub const fn contains(&self, flag: OptFlag) -> bool {
        match flag {
            OptFlag::Compress => self.compress,
            OptFlag::Cache => self.cache,
            OptFlag::Expires => self.expires,
            OptFlag::Etag => self.etag,
            OptFlag::StaticCache => self.static_cache,
            OptFlag::ProxyCache => self.proxy_cache,
            OptFlag::Gzip => self.gzip,
            OptFlag::Keepalive => self.keepalive,
        }
    }

    /// Set or clear one flag.
    pub const fn set(&mut self, flag: OptFlag, value: bool) {
        match flag {
            OptFlag::Compress => self.compress = value,
            OptFlag::Cache => self.cache = value,
            OptFlag::Expires => self.expires = value,
            OptFlag::Etag => self.etag = value,
            OptFlag::StaticCache => self.static_cache = value,
            OptFlag::ProxyCache => self.proxy_cache = value,
            OptFlag::Gzip => self.gzip = value,
            OptFlag::Keepalive => self.keepalive = value,
        }
    }
}

impl VHost {
    /// Compare against another host name, case-insensitively.
    #[must_use]
    pub fn matches_name(&self, name: &str) -> bool {
        self.server_name.to_lowercase() == name.to_lowercase()
    }
}

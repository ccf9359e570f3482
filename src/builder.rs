use crate::table::OptFlag;
use crate::vhost::{
    CompressSettings, Optimizations, RewriteRule, SslSettings, UrlRewrite, VHost,
};

impl VHost {
    /// Create an enabled vhost with the two required fields.
    #[must_use]
    pub fn new(server_name: &str, document_root: &str) -> Self {
        Self {
            server_name: server_name.to_string(),
            enabled: true,
            document_root: document_root.to_string(),
            port: None,
            server_alias: Vec::new(),
            error_handler_404: None,
            compress_settings: None,
            url_rewrite: None,
            ssl: None,
            optimizations: Optimizations::default(),
        }
    }

    /// Mark the vhost disabled (written comment-prefixed).
    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Set the listening port. 80 is the default and is normalized away.
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = if port == 80 { None } else { Some(port) };
        self
    }

    /// Add an alias name sharing this block.
    #[must_use]
    pub fn alias(mut self, alias: &str) -> Self {
        self.server_alias.push(alias.to_string());
        self
    }

    /// Set the 404 fallback document.
    #[must_use]
    pub fn error_handler_404(mut self, path: &str) -> Self {
        self.error_handler_404 = Some(path.to_string());
        self
    }

    /// Enable static compression with a cache directory and file types.
    #[must_use]
    pub fn compression(mut self, cache_dir: &str, file_types: &[&str]) -> Self {
        self.compress_settings = Some(CompressSettings {
            enabled: true,
            cache_dir: cache_dir.to_string(),
            file_types: file_types.iter().map(|t| (*t).to_string()).collect(),
        });
        self
    }

    /// Append a `url.rewrite-if-not-file` rule, enabling rewriting.
    #[must_use]
    pub fn rewrite_rule(mut self, pattern: &str, replacement: &str) -> Self {
        let rewrite = self.url_rewrite.get_or_insert_with(|| UrlRewrite {
            enabled: true,
            rules: Vec::new(),
        });
        rewrite.enabled = true;
        rewrite.rules.push(RewriteRule {
            pattern: pattern.to_string(),
            replacement: replacement.to_string(),
        });
        self
    }

    /// Enable TLS with a certificate and key file.
    #[must_use]
    pub fn ssl(mut self, cert_file: &str, key_file: &str) -> Self {
        self.ssl = Some(SslSettings {
            engine: true,
            cert_file: Some(cert_file.to_string()),
            key_file: Some(key_file.to_string()),
        });
        self
    }

    /// Turn on one optimization flag.
    #[must_use]
    pub const fn optimization(mut self, flag: OptFlag) -> Self {
        self.optimizations.set(flag, true);
        self
    }
}

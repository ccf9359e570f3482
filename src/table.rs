//! The directive table shared by the parser and the generator.
//!
//! Every mapping between a textual directive and a structured field lives
//! here as data: the ordered prefix table consumed by the parser, the
//! directive name constants consumed by the generator, and the fixed
//! expansion bundles behind the optimization flags. Keeping both
//! directions in one module is what stops them drifting apart.

/// Token opening a host block: `$HTTP["host"] == "name" {`.
pub const HOST_PREDICATE: &str = "$HTTP[\"host\"]";

pub const DOCUMENT_ROOT: &str = "server.document-root";
pub const PORT: &str = "server.port";
pub const SERVER_NAME: &str = "server.name";
pub const ERROR_HANDLER_404: &str = "server.error-handler-404";
pub const COMPRESS_CACHE_DIR: &str = "compress.cache-dir";
pub const COMPRESS_FILETYPE: &str = "compress.filetype";
pub const URL_REWRITE: &str = "url.rewrite-if-not-file";
pub const SSL_ENGINE: &str = "ssl.engine";
pub const SSL_PEMFILE: &str = "ssl.pemfile";
pub const SSL_KEYFILE: &str = "ssl.keyfile";

/// What a recognized directive line updates on the pending record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldAction {
    DocumentRoot,
    Port,
    /// `server.name`: the quoted value is the name plus its aliases.
    NameList,
    ErrorHandler404,
    CompressCacheDir,
    CompressFiletype,
    RewriteRules,
    SslEngine,
    SslPemfile,
    SslKeyfile,
    /// Legacy low-level directive that marks an optimization flag.
    Flag(OptFlag),
}

/// Ordered prefix table. The parser tries entries top to bottom and the
/// first matching prefix wins, so entry order is part of the format.
pub(crate) const PARSE_TABLE: &[(&str, FieldAction)] = &[
    (DOCUMENT_ROOT, FieldAction::DocumentRoot),
    (PORT, FieldAction::Port),
    (SERVER_NAME, FieldAction::NameList),
    (ERROR_HANDLER_404, FieldAction::ErrorHandler404),
    (COMPRESS_CACHE_DIR, FieldAction::CompressCacheDir),
    (COMPRESS_FILETYPE, FieldAction::CompressFiletype),
    (URL_REWRITE, FieldAction::RewriteRules),
    (SSL_ENGINE, FieldAction::SslEngine),
    (SSL_PEMFILE, FieldAction::SslPemfile),
    (SSL_KEYFILE, FieldAction::SslKeyfile),
    ("server.stat-cache-engine", FieldAction::Flag(OptFlag::Cache)),
    ("expire.url", FieldAction::Flag(OptFlag::Expires)),
    ("etag.use-inode", FieldAction::Flag(OptFlag::Etag)),
    ("proxy-cache.enable", FieldAction::Flag(OptFlag::ProxyCache)),
    (
        "server.max-keep-alive-requests",
        FieldAction::Flag(OptFlag::Keepalive),
    ),
];

/// Find the action for a comment-stripped directive line.
pub(crate) fn match_directive(line: &str) -> Option<FieldAction> {
    PARSE_TABLE
        .iter()
        .find(|(prefix, _)| line.starts_with(prefix))
        .map(|&(_, action)| action)
}

/// High-level optimization flag.
///
/// Flags expand to fixed directive bundles at render time. `Compress` and
/// `Gzip` expand to the same bundle, as do `Cache` and `StaticCache`;
/// setting both flags of a pair emits the bundle twice. That duplication
/// matches the files already in the field and is deliberately not
/// deduplicated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptFlag {
    Compress,
    Cache,
    Expires,
    Etag,
    StaticCache,
    ProxyCache,
    Gzip,
    Keepalive,
}

/// Bundle shared by `Compress` and `Gzip`.
const COMPRESS_BUNDLE: &[&str] = &[
    r#"compress.cache-dir = "/var/cache/lighttpd/compress/""#,
    "compress.filetype = (",
    r#"  "text/plain","#,
    r#"  "text/html","#,
    r#"  "text/javascript","#,
    r#"  "text/css","#,
    r#"  "text/xml","#,
    r#"  "application/javascript","#,
    r#"  "application/json""#,
    ")",
];

/// Bundle shared by `Cache` and `StaticCache`.
const CACHE_BUNDLE: &[&str] = &[
    r#"server.stat-cache-engine = "simple""#,
    r#"static-file.etags = "enable""#,
];

const EXPIRES_BUNDLE: &[&str] = &[
    "expire.url = (",
    r#"  "\.(gif|jpg|jpeg|png|ico|webp)$" => "access plus 1 month","#,
    r#"  "\.(css|js)$" => "access plus 1 week","#,
    r#"  "\.(woff|woff2|ttf|eot|otf)$" => "access plus 1 month""#,
    ")",
];

const ETAG_BUNDLE: &[&str] = &[
    r#"etag.use-inode = "enable""#,
    r#"etag.use-mtime = "enable""#,
    r#"etag.use-size = "enable""#,
];

const PROXY_CACHE_BUNDLE: &[&str] = &[
    r#"proxy-cache.enable = "enable""#,
    r#"proxy-cache.cache-dir = "/var/cache/lighttpd/proxy/""#,
    "proxy-cache.max-age = 3600",
];

const KEEPALIVE_BUNDLE: &[&str] = &[
    "server.max-keep-alive-requests = 100",
    "server.max-keep-alive-idle = 30",
];

impl OptFlag {
    /// Every flag, in render order.
    pub const ALL: [Self; 8] = [
        Self::Compress,
        Self::Cache,
        Self::Expires,
        Self::Etag,
        Self::StaticCache,
        Self::ProxyCache,
        Self::Gzip,
        Self::Keepalive,
    ];

    /// Directive lines this flag expands to.
    ///
    /// Lines are relative to the block body: the generator adds the block
    /// indent (and the comment prefix for disabled blocks); any leading
    /// spaces baked into a line are nesting inside a parenthesized list.
    #[must_use]
    pub const fn bundle(self) -> &'static [&'static str] {
        match self {
            Self::Compress | Self::Gzip => COMPRESS_BUNDLE,
            Self::Cache | Self::StaticCache => CACHE_BUNDLE,
            Self::Expires => EXPIRES_BUNDLE,
            Self::Etag => ETAG_BUNDLE,
            Self::ProxyCache => PROXY_CACHE_BUNDLE,
            Self::Keepalive => KEEPALIVE_BUNDLE,
        }
    }
}

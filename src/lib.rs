//! Parser, generator, and builder for lighttpd virtual-host blocks.
//!
//! Models the `$HTTP["host"] == "name" { ... }` subset of lighttpd
//! configuration as typed records, with tools to parse them from a
//! shared config file, build them programmatically, and render them
//! back to canonical text. A block is disabled by comment-prefixing
//! every one of its lines; the parser folds that convention into an
//! `enabled` flag and the generator reapplies it on write.
//!
//! # Quick start
//!
//! ## Parse and re-render a vhost file
//!
//! ```
//! use vhostfile_rs::{parse, render};
//!
//! let input = "$HTTP[\"host\"] == \"a.com\" {\n  server.document-root = \"/var/www/a\"\n}\n";
//! let vhosts = parse(input);
//! assert_eq!(vhosts[0].server_name, "a.com");
//! assert!(vhosts[0].enabled);
//! assert_eq!(render(&vhosts), input);
//! ```
//!
//! ## Build a vhost programmatically
//!
//! ```
//! use vhostfile_rs::{OptFlag, VHost, render};
//!
//! let vhost = VHost::new("example.com", "/var/www/example")
//!     .alias("www.example.com")
//!     .optimization(OptFlag::Expires);
//!
//! let text = render(&[vhost]);
//! assert!(text.contains("server.name = \"example.com www.example.com\""));
//! assert!(text.contains("expire.url"));
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod builder;
pub mod generator;
pub mod parser;
pub mod store;
pub mod table;
pub mod vhost;

pub use generator::{render, render_block};
pub use parser::parse;
pub use store::{DEFAULT_CONF_PATH, VHostStore};
pub use table::OptFlag;
pub use vhost::{
    CompressSettings, Optimizations, RewriteRule, SslSettings, UrlRewrite, VHost,
};

/// Errors surfaced by the persistence layer.
///
/// Parsing and rendering are total; only file access can fail.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File unreadable or unwritable.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

//! Serializes vhost records back into canonical configuration text.
//!
//! Output is normalized to two-space indentation regardless of what the
//! source file looked like. A disabled record has every line of its
//! block, nested list lines included, prefixed with `# `; the enabled
//! flag itself never appears in the text.

use std::fmt::Write as _;

use crate::table::{
    COMPRESS_CACHE_DIR, COMPRESS_FILETYPE, DOCUMENT_ROOT, ERROR_HANDLER_404, HOST_PREDICATE,
    OptFlag, PORT, SERVER_NAME, SSL_ENGINE, SSL_KEYFILE, SSL_PEMFILE, URL_REWRITE,
};
use crate::vhost::VHost;

/// Port omitted from the rendered text.
const DEFAULT_PORT: u16 = 80;

/// Render a record list into file text.
///
/// Pure and total. Blocks are separated by one blank line; an empty list
/// renders to the empty string.
#[must_use]
pub fn render(vhosts: &[VHost]) -> String {
    let blocks: Vec<String> = vhosts.iter().map(render_block).collect();
    blocks.join("\n")
}

/// Render a single record as one block, trailing newline included.
#[must_use]
pub fn render_block(vhost: &VHost) -> String {
    let mut out = String::new();
    let prefix = if vhost.enabled { "" } else { "# " };

    let _ = writeln!(
        out,
        "{prefix}{HOST_PREDICATE} == \"{}\" {{",
        vhost.server_name
    );
    let _ = writeln!(
        out,
        "{prefix}  {DOCUMENT_ROOT} = \"{}\"",
        vhost.document_root
    );

    if let Some(port) = vhost.port
        && port != DEFAULT_PORT
    {
        let _ = writeln!(out, "{prefix}  {PORT} = {port}");
    }

    if !vhost.server_alias.is_empty() {
        let mut names = vhost.server_name.clone();
        for alias in &vhost.server_alias {
            names.push(' ');
            names.push_str(alias);
        }
        let _ = writeln!(out, "{prefix}  {SERVER_NAME} = \"{names}\"");
    }

    if let Some(handler) = &vhost.error_handler_404 {
        let _ = writeln!(out, "{prefix}  {ERROR_HANDLER_404} = \"{handler}\"");
    }

    if let Some(compress) = &vhost.compress_settings
        && compress.enabled
    {
        let _ = writeln!(
            out,
            "{prefix}  {COMPRESS_CACHE_DIR} = \"{}\"",
            compress.cache_dir
        );
        if !compress.file_types.is_empty() {
            let _ = writeln!(out, "{prefix}  {COMPRESS_FILETYPE} = (");
            write_quoted_list(&mut out, prefix, &compress.file_types, |t| {
                format!("\"{t}\"")
            });
            let _ = writeln!(out, "{prefix}  )");
        }
    }

    if let Some(rewrite) = &vhost.url_rewrite
        && rewrite.enabled
        && !rewrite.rules.is_empty()
    {
        let _ = writeln!(out, "{prefix}  {URL_REWRITE} = (");
        write_quoted_list(&mut out, prefix, &rewrite.rules, |rule| {
            format!("\"{}\" => \"{}\"", rule.pattern, rule.replacement)
        });
        let _ = writeln!(out, "{prefix}  )");
    }

    if let Some(ssl) = &vhost.ssl
        && ssl.engine
    {
        let _ = writeln!(out, "{prefix}  {SSL_ENGINE} = \"enable\"");
        if let Some(cert) = &ssl.cert_file {
            let _ = writeln!(out, "{prefix}  {SSL_PEMFILE} = \"{cert}\"");
        }
        if let Some(key) = &ssl.key_file {
            let _ = writeln!(out, "{prefix}  {SSL_KEYFILE} = \"{key}\"");
        }
    }

    // Optimization expansions, in fixed flag order. Compress and gzip
    // share one bundle; both set means it is emitted twice, matching the
    // files this format grew up with.
    for flag in OptFlag::ALL {
        if vhost.optimizations.contains(flag) {
            for line in flag.bundle() {
                let _ = writeln!(out, "{prefix}  {line}");
            }
        }
    }

    let _ = writeln!(out, "{prefix}}}");
    out
}

/// Write list elements at list indent, comma-terminated except the last.
fn write_quoted_list<T>(out: &mut String, prefix: &str, items: &[T], fmt: impl Fn(&T) -> String) {
    for (i, item) in items.iter().enumerate() {
        let comma = if i + 1 == items.len() { "" } else { "," };
        let _ = writeln!(out, "{prefix}    {}{comma}", fmt(item));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vhost::{CompressSettings, RewriteRule, SslSettings, UrlRewrite};

    #[test]
    fn minimal_block_with_default_port() {
        let vhost = VHost::new("a.com", "/var/www/a");
        assert_eq!(
            render(&[vhost]),
            "$HTTP[\"host\"] == \"a.com\" {\n  server.document-root = \"/var/www/a\"\n}\n"
        );
    }

    #[test]
    fn non_default_port_is_emitted() {
        let vhost = VHost::new("a.com", "/srv").port(8080);
        assert!(render(&[vhost]).contains("  server.port = 8080\n"));
    }

    #[test]
    fn default_port_is_omitted() {
        let mut vhost = VHost::new("a.com", "/srv");
        vhost.port = Some(80);
        assert!(!render(&[vhost]).contains("server.port"));
    }

    #[test]
    fn disabled_block_prefixes_every_line() {
        let vhost = VHost::new("a.com", "/srv")
            .rewrite_rule("^/(.*)$", "/index.php/$1")
            .disabled();
        let text = render(&[vhost]);
        for line in text.lines() {
            assert!(line.starts_with("# "), "line not commented: {line:?}");
        }
    }

    #[test]
    fn alias_line_leads_with_server_name() {
        let vhost = VHost::new("a.com", "/srv").alias("www.a.com").alias("b.com");
        assert!(render(&[vhost]).contains("  server.name = \"a.com www.a.com b.com\"\n"));
    }

    #[test]
    fn compress_list_has_trailing_commas_except_last() {
        let vhost = VHost {
            compress_settings: Some(CompressSettings {
                enabled: true,
                cache_dir: "/var/cache/lighttpd/compress/".to_string(),
                file_types: vec!["text/css".to_string(), "text/html".to_string()],
            }),
            ..VHost::new("a.com", "/srv")
        };
        let text = render(&[vhost]);
        assert!(text.contains(
            "  compress.filetype = (\n    \"text/css\",\n    \"text/html\"\n  )\n"
        ));
    }

    #[test]
    fn disabled_compression_settings_are_not_emitted() {
        let vhost = VHost {
            compress_settings: Some(CompressSettings {
                enabled: false,
                cache_dir: "/tmp".to_string(),
                file_types: vec!["text/css".to_string()],
            }),
            ..VHost::new("a.com", "/srv")
        };
        assert!(!render(&[vhost]).contains("compress."));
    }

    #[test]
    fn rewrite_block_renders_rule_pairs() {
        let vhost = VHost {
            url_rewrite: Some(UrlRewrite {
                enabled: true,
                rules: vec![
                    RewriteRule {
                        pattern: "^/api/(.*)$".to_string(),
                        replacement: "/api.php/$1".to_string(),
                    },
                    RewriteRule {
                        pattern: "^/(.*)$".to_string(),
                        replacement: "/index.php/$1".to_string(),
                    },
                ],
            }),
            ..VHost::new("a.com", "/srv")
        };
        let text = render(&[vhost]);
        assert!(text.contains("    \"^/api/(.*)$\" => \"/api.php/$1\",\n"));
        assert!(text.contains("    \"^/(.*)$\" => \"/index.php/$1\"\n"));
    }

    #[test]
    fn ssl_block_only_when_engine_on() {
        let off = VHost {
            ssl: Some(SslSettings {
                engine: false,
                cert_file: Some("/etc/ssl/a.pem".to_string()),
                key_file: None,
            }),
            ..VHost::new("a.com", "/srv")
        };
        assert!(!render(&[off]).contains("ssl."));

        let on = VHost::new("a.com", "/srv").ssl("/etc/ssl/a.pem", "/etc/ssl/a.key");
        let text = render(&[on]);
        assert!(text.contains("  ssl.engine = \"enable\"\n"));
        assert!(text.contains("  ssl.pemfile = \"/etc/ssl/a.pem\"\n"));
        assert!(text.contains("  ssl.keyfile = \"/etc/ssl/a.key\"\n"));
    }

    #[test]
    fn compress_and_gzip_emit_the_bundle_twice() {
        let vhost = VHost::new("a.com", "/srv")
            .optimization(OptFlag::Compress)
            .optimization(OptFlag::Gzip);
        let text = render(&[vhost]);
        assert_eq!(text.matches("compress.cache-dir").count(), 2);
    }

    #[test]
    fn blocks_are_separated_by_one_blank_line() {
        let text = render(&[VHost::new("a.com", "/srv/a"), VHost::new("b.com", "/srv/b")]);
        assert!(text.contains("}\n\n$HTTP[\"host\"] == \"b.com\""));
        assert!(!text.contains("}\n\n\n"));
    }

    #[test]
    fn empty_list_renders_to_empty_string() {
        assert_eq!(render(&[]), "");
    }
}

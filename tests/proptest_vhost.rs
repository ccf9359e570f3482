//! Property-based tests with proptest.
//!
//! Generate random vhost records, render them, parse the text back, and
//! check the round trip. Optimization flags are generated only for the
//! flags with parse-side detection; compress/gzip/staticCache alias into
//! other fields by design and have dedicated non-generative tests.

use proptest::prelude::*;
use vhostfile_rs::{
    CompressSettings, OptFlag, Optimizations, RewriteRule, SslSettings, UrlRewrite, VHost,
    parse, render,
};

/// Host name: safe DNS-ish labels.
fn host_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{1,10}\\.(com|org|net|io)".prop_map(|s| s)
}

/// Absolute filesystem path without quotes or whitespace.
fn fs_path() -> impl Strategy<Value = String> {
    "(/[a-z][a-z0-9_-]{0,8}){1,4}".prop_map(|s| s)
}

/// Port that is not the implicit default.
fn non_default_port() -> impl Strategy<Value = Option<u16>> {
    prop_oneof![
        3 => Just(None),
        1 => (1024u16..=9999).prop_filter("not the default", |p| *p != 80).prop_map(Some),
    ]
}

fn aliases() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(host_name(), 0..=3)
}

/// MIME-ish type token.
fn file_type() -> impl Strategy<Value = String> {
    "(text|application)/[a-z]{2,10}".prop_map(|s| s)
}

fn compress_settings() -> impl Strategy<Value = Option<CompressSettings>> {
    prop_oneof![
        2 => Just(None),
        1 => (fs_path(), prop::collection::vec(file_type(), 0..=4)).prop_map(|(cache_dir, file_types)| {
            Some(CompressSettings {
                enabled: true,
                cache_dir,
                file_types,
            })
        }),
    ]
}

/// Rewrite pattern: quote-free regex text. Grouping parens are core
/// regex syntax and must survive the quoted list body unscathed.
fn rewrite_pattern() -> impl Strategy<Value = String> {
    prop_oneof![
        "\\^/[a-z/.*$-]{1,12}",
        "[a-z]{1,8}".prop_map(|seg| format!("^/{seg}/(.*)$")),
        ("[a-z]{1,6}", "[a-z]{1,6}").prop_map(|(a, b)| format!("^/({a}|{b})/.*$")),
    ]
}

fn rewrite_rule() -> impl Strategy<Value = RewriteRule> {
    (rewrite_pattern(), fs_path()).prop_map(|(pattern, replacement)| RewriteRule {
        pattern,
        replacement,
    })
}

fn url_rewrite() -> impl Strategy<Value = Option<UrlRewrite>> {
    prop_oneof![
        2 => Just(None),
        1 => prop::collection::vec(rewrite_rule(), 1..=3).prop_map(|rules| {
            Some(UrlRewrite {
                enabled: true,
                rules,
            })
        }),
    ]
}

fn ssl_settings() -> impl Strategy<Value = Option<SslSettings>> {
    prop_oneof![
        2 => Just(None),
        1 => (fs_path(), fs_path()).prop_map(|(cert, key)| {
            Some(SslSettings {
                engine: true,
                cert_file: Some(cert),
                key_file: Some(key),
            })
        }),
    ]
}

/// Only the flags the parser can recover from rendered text.
fn reparse_detectable_flags() -> impl Strategy<Value = Optimizations> {
    (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(cache, expires, etag, proxy_cache, keepalive)| {
            let mut opt = Optimizations::default();
            opt.set(OptFlag::Cache, cache);
            opt.set(OptFlag::Expires, expires);
            opt.set(OptFlag::Etag, etag);
            opt.set(OptFlag::ProxyCache, proxy_cache);
            opt.set(OptFlag::Keepalive, keepalive);
            opt
        },
    )
}

prop_compose! {
    fn vhost()(
        server_name in host_name(),
        enabled in any::<bool>(),
        document_root in fs_path(),
        port in non_default_port(),
        server_alias in aliases(),
        error_handler_404 in prop::option::of(fs_path()),
        compress_settings in compress_settings(),
        url_rewrite in url_rewrite(),
        ssl in ssl_settings(),
        optimizations in reparse_detectable_flags(),
    ) -> VHost {
        let mut vhost = VHost {
            server_name: server_name.clone(),
            enabled,
            document_root,
            port,
            server_alias,
            error_handler_404,
            compress_settings,
            url_rewrite,
            ssl,
            optimizations,
        };
        // The alias line folds the server name back in on parse.
        vhost.server_alias.retain(|alias| alias != &server_name);
        vhost
    }
}

fn vhost_list() -> impl Strategy<Value = Vec<VHost>> {
    prop::collection::vec(vhost(), 0..=4)
}

proptest! {
    /// Rendering a record and parsing it back recovers every field.
    #[test]
    fn record_fields_survive_roundtrip(vhost in vhost()) {
        let rendered = render(std::slice::from_ref(&vhost));
        let parsed = parse(&rendered);
        prop_assert_eq!(parsed.len(), 1);
        prop_assert_eq!(&parsed[0], &vhost, "rendered:\n{}", rendered);
    }

    /// Render-parse-render is textually stable for record lists.
    #[test]
    fn render_is_idempotent(vhosts in vhost_list()) {
        let first = render(&vhosts);
        let second = render(&parse(&first));
        prop_assert_eq!(&first, &second);
        let third = render(&parse(&second));
        prop_assert_eq!(&second, &third);
    }

    /// Record count and order are preserved.
    #[test]
    fn collection_order_is_preserved(vhosts in vhost_list()) {
        let parsed = parse(&render(&vhosts));
        let expected: Vec<_> = vhosts.iter().map(|v| &v.server_name).collect();
        let actual: Vec<_> = parsed.iter().map(|v| &v.server_name).collect();
        prop_assert_eq!(expected, actual);
    }
}

//! Line-oriented state machine that turns vhost file text into records.
//!
//! The scanner is deliberately tolerant: a predicate line without a
//! parsable quoted name keeps an empty `server_name` (logged, not
//! thrown), an unterminated block is finalized at end of input, and any
//! line that matches no entry in the directive table is dropped. Nothing
//! in here returns an error; malformed content degrades, it never aborts.

use tracing::warn;

use crate::table::{self, FieldAction, HOST_PREDICATE};
use crate::vhost::{
    CompressSettings, Optimizations, RewriteRule, SslSettings, UrlRewrite, VHost,
};

/// Parse vhost file text into an ordered list of records.
///
/// Deterministic and total: malformed input yields fewer or partial
/// records, never an error.
#[must_use]
pub fn parse(input: &str) -> Vec<VHost> {
    let mut parser = Parser::default();
    for raw in input.lines() {
        parser.line(raw);
    }
    parser.finish()
}

/// Which list-valued directive a continuation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    FileTypes,
    RewriteRules,
}

/// Open parenthesized list spanning multiple physical lines.
#[derive(Debug)]
struct OpenList {
    kind: ListKind,
    body: String,
}

/// Accumulation state for the block currently being scanned.
#[derive(Debug, Default)]
struct Pending {
    server_name: String,
    enabled: bool,
    document_root: String,
    port: Option<u16>,
    server_alias: Vec<String>,
    error_handler_404: Option<String>,
    compress_enabled: bool,
    compress_cache_dir: String,
    compress_file_types: Vec<String>,
    rewrite_enabled: bool,
    rewrite_rules: Vec<RewriteRule>,
    ssl_engine: Option<bool>,
    ssl_cert_file: Option<String>,
    ssl_key_file: Option<String>,
    optimizations: Optimizations,
    list: Option<OpenList>,
}

#[derive(Debug, Default)]
struct Parser {
    records: Vec<VHost>,
    current: Option<Pending>,
}

impl Parser {
    fn line(&mut self, raw: &str) {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return;
        }

        if is_host_predicate(trimmed) {
            self.finish_record();
            self.start_record(trimmed);
            return;
        }

        let Some(pending) = self.current.as_mut() else {
            // Text outside any block is not ours to model.
            return;
        };

        let stripped = strip_comment(trimmed);

        if let Some(list) = pending.list.take() {
            match feed_list(list, stripped) {
                ListStep::Open(list) => {
                    pending.list = Some(list);
                }
                ListStep::Closed(list) => {
                    apply_list(pending, &list);
                }
                // A closing brace ends the list and the block at once.
                ListStep::EndOfBlock(list) => {
                    apply_list(pending, &list);
                    self.finish_record();
                }
            }
            return;
        }

        if let Some(action) = table::match_directive(stripped) {
            apply_directive(pending, action, stripped);
        }

        if stripped == "}" {
            self.finish_record();
        }
    }

    fn start_record(&mut self, trimmed: &str) {
        let server_name = predicate_name(trimmed).map_or_else(
            || {
                warn!(line = trimmed, "failed to parse hostname from predicate");
                String::new()
            },
            str::to_string,
        );

        self.current = Some(Pending {
            server_name,
            enabled: !trimmed.starts_with('#'),
            ..Pending::default()
        });
    }

    fn finish_record(&mut self) {
        let Some(mut pending) = self.current.take() else {
            return;
        };

        // Unterminated list at block end: keep what was collected.
        if let Some(list) = pending.list.take() {
            apply_list(&mut pending, &list);
        }

        let compress_settings = (!pending.compress_cache_dir.is_empty()
            || !pending.compress_file_types.is_empty())
        .then(|| CompressSettings {
            enabled: pending.compress_enabled,
            cache_dir: pending.compress_cache_dir,
            file_types: pending.compress_file_types,
        });

        let url_rewrite = (!pending.rewrite_rules.is_empty()).then(|| UrlRewrite {
            enabled: pending.rewrite_enabled,
            rules: pending.rewrite_rules,
        });

        let ssl = (pending.ssl_engine.is_some()
            || pending.ssl_cert_file.is_some()
            || pending.ssl_key_file.is_some())
        .then(|| SslSettings {
            engine: pending.ssl_engine.unwrap_or(false),
            cert_file: pending.ssl_cert_file,
            key_file: pending.ssl_key_file,
        });

        self.records.push(VHost {
            server_name: pending.server_name,
            enabled: pending.enabled,
            document_root: pending.document_root,
            port: pending.port,
            server_alias: pending.server_alias,
            error_handler_404: pending.error_handler_404,
            compress_settings,
            url_rewrite,
            ssl,
            optimizations: pending.optimizations,
        });
    }

    fn finish(mut self) -> Vec<VHost> {
        // Missing closing brace at end of input: finalize anyway.
        self.finish_record();
        self.records
    }
}

fn apply_directive(pending: &mut Pending, action: FieldAction, line: &str) {
    match action {
        FieldAction::DocumentRoot => {
            pending.document_root = first_quoted(line).unwrap_or_default().to_string();
        }
        FieldAction::Port => {
            pending.port = Some(parse_port(line));
        }
        FieldAction::NameList => {
            let names = first_quoted(line).unwrap_or_default();
            pending.server_alias = names
                .split_whitespace()
                .filter(|name| *name != pending.server_name)
                .map(str::to_string)
                .collect();
        }
        FieldAction::ErrorHandler404 => {
            pending.error_handler_404 = Some(first_quoted(line).unwrap_or_default().to_string());
        }
        FieldAction::CompressCacheDir => {
            pending.compress_enabled = true;
            pending.compress_cache_dir = first_quoted(line).unwrap_or_default().to_string();
        }
        FieldAction::CompressFiletype => {
            pending.compress_enabled = true;
            start_or_apply_list(pending, ListKind::FileTypes, line);
        }
        FieldAction::RewriteRules => {
            pending.rewrite_enabled = true;
            start_or_apply_list(pending, ListKind::RewriteRules, line);
        }
        FieldAction::SslEngine => {
            pending.ssl_engine = Some(first_quoted(line) == Some("enable"));
        }
        FieldAction::SslPemfile => {
            pending.ssl_cert_file = Some(first_quoted(line).unwrap_or_default().to_string());
        }
        FieldAction::SslKeyfile => {
            pending.ssl_key_file = Some(first_quoted(line).unwrap_or_default().to_string());
        }
        FieldAction::Flag(flag) => {
            pending.optimizations.set(flag, true);
        }
    }
}

/// Handle the value of a list-valued directive. A complete `( ... )` on
/// the key line is applied immediately; an opening parenthesis without
/// its closing one switches the scanner into list-continuation mode.
fn start_or_apply_list(pending: &mut Pending, kind: ListKind, line: &str) {
    let Some(open) = line.find('(') else {
        return;
    };
    let rest = &line[open + 1..];

    if let Some(close) = closing_paren(rest) {
        let list = OpenList {
            kind,
            body: rest[..close].to_string(),
        };
        apply_list(pending, &list);
    } else {
        pending.list = Some(OpenList {
            kind,
            body: rest.to_string(),
        });
    }
}

enum ListStep {
    Open(OpenList),
    Closed(OpenList),
    EndOfBlock(OpenList),
}

fn feed_list(mut list: OpenList, stripped: &str) -> ListStep {
    if stripped == "}" {
        return ListStep::EndOfBlock(list);
    }
    list.body.push(' ');
    if let Some(close) = closing_paren(stripped) {
        list.body.push_str(&stripped[..close]);
        return ListStep::Closed(list);
    }
    list.body.push_str(stripped);
    ListStep::Open(list)
}

/// Position of the `)` that terminates the list, if this text has one.
/// Rewrite patterns are regexes, so a `)` inside a quoted element (a
/// grouping paren in `"^/(.*)$"`, say) must not count; only a `)` after
/// the last `"` closes the list.
fn closing_paren(text: &str) -> Option<usize> {
    let after_quotes = text.rfind('"').map_or(0, |quote| quote + 1);
    text[after_quotes..].find(')').map(|i| after_quotes + i)
}

fn apply_list(pending: &mut Pending, list: &OpenList) {
    match list.kind {
        ListKind::FileTypes => {
            pending.compress_file_types = parse_file_types(&list.body);
        }
        ListKind::RewriteRules => {
            pending.rewrite_rules.extend(parse_rewrite_rules(&list.body));
        }
    }
}

/// A line opens a host block when, after an optional comment marker and
/// whitespace, it starts with the host predicate token (case-sensitive).
fn is_host_predicate(trimmed: &str) -> bool {
    let rest = trimmed.strip_prefix('#').unwrap_or(trimmed).trim_start();
    rest.starts_with(HOST_PREDICATE)
}

/// Extract the host name from a predicate line: the first non-empty
/// quoted string after `==`.
fn predicate_name(trimmed: &str) -> Option<&str> {
    let idx = trimmed.find(HOST_PREDICATE)?;
    let rest = trimmed[idx + HOST_PREDICATE.len()..].trim_start();
    let rest = rest.strip_prefix("==")?.trim_start();
    let rest = rest.strip_prefix('"')?;
    let end = rest.find('"')?;
    if end == 0 { None } else { Some(&rest[..end]) }
}

/// Strip one leading comment marker plus any following whitespace. Every
/// line of a disabled block carries the marker, so this is reversible.
fn strip_comment(trimmed: &str) -> &str {
    trimmed.strip_prefix('#').map_or(trimmed, str::trim_start)
}

/// First non-empty double-quoted substring of a line.
fn first_quoted(mut line: &str) -> Option<&str> {
    while let Some((content, rest)) = next_quoted(line) {
        if !content.is_empty() {
            return Some(content);
        }
        line = rest;
    }
    None
}

/// Next double-quoted substring (possibly empty) and the text after it.
fn next_quoted(line: &str) -> Option<(&str, &str)> {
    let start = line.find('"')?;
    let rest = &line[start + 1..];
    let end = rest.find('"')?;
    Some((&rest[..end], &rest[end + 1..]))
}

/// Digit run after the first `=`; anything unparsable falls back to 80.
fn parse_port(line: &str) -> u16 {
    line.split_once('=').map_or(80, |(_, value)| {
        let digits: String = value
            .trim_start()
            .chars()
            .take_while(char::is_ascii_digit)
            .collect();
        digits.parse().unwrap_or(80)
    })
}

/// Comma-separated quoted elements; quote characters are stripped and
/// empty elements dropped.
fn parse_file_types(body: &str) -> Vec<String> {
    body.split(',')
        .map(|part| part.trim().replace(['"', '\''], ""))
        .filter(|part| !part.is_empty())
        .collect()
}

/// Every `"pattern" => "replacement"` pairing in the list body, in order.
fn parse_rewrite_rules(body: &str) -> Vec<RewriteRule> {
    let mut rules = Vec::new();
    let mut rest = body;

    while let Some((pattern, tail)) = next_quoted(rest) {
        rest = tail;
        if pattern.is_empty() {
            continue;
        }
        let Some(after_arrow) = rest.trim_start().strip_prefix("=>") else {
            continue;
        };
        let after_arrow = after_arrow.trim_start();
        if !after_arrow.starts_with('"') {
            continue;
        }
        if let Some((replacement, tail)) = next_quoted(after_arrow) {
            if !replacement.is_empty() {
                rules.push(RewriteRule {
                    pattern: pattern.to_string(),
                    replacement: replacement.to_string(),
                });
                rest = tail;
            }
        }
    }

    rules
}

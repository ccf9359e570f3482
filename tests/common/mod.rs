#![allow(dead_code)]

use vhostfile_rs::{VHost, parse, render};

/// Parse then render, asserting the output reproduces the input.
pub fn roundtrip(input: &str) {
    let vhosts = parse(input);
    let output = render(&vhosts);
    assert_eq!(
        output, input,
        "round-trip mismatch:\n--- expected ---\n{input}\n--- got ---\n{output}"
    );
}

/// Render a record, parse it back, assert field-level equality.
pub fn assert_record_roundtrip(original: &VHost) {
    let rendered = render(std::slice::from_ref(original));
    let parsed = parse(&rendered);
    assert_eq!(parsed.len(), 1, "expected one record from:\n{rendered}");
    assert_eq!(
        &parsed[0], original,
        "record mismatch\n--- rendered ---\n{rendered}"
    );
}

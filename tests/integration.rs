use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn dochooks(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dochooks"))
        .current_dir(dir)
        .args(args)
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn toc_rewrites_then_is_stable() {
    let dir = TempDir::new().unwrap();
    let doc = dir.path().join("doc.md");
    fs::write(
        &doc,
        "# Header\n\n<!-- toc -->\n\n<!-- tocstop -->\n\n## Section\n\n### More\n\n",
    )
    .unwrap();

    let first = dochooks(dir.path(), &["toc", "doc.md"]);
    assert!(first.status.success(), "toc failed: {}", stderr(&first));
    let synced = fs::read_to_string(&doc).unwrap();
    assert!(
        synced.contains(
            "<!-- toc -->\n\n## Table of contents\n\n-   [Section](#section)\n    -   [More](#more)\n\n<!-- tocstop -->"
        ),
        "{synced}"
    );

    let second = dochooks(dir.path(), &["toc", "doc.md"]);
    assert!(second.status.success());
    assert_eq!(fs::read_to_string(&doc).unwrap(), synced);
}

#[test]
fn toc_missing_stop_fails_and_continues() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.md"), "# A\n\n<!-- toc -->\n").unwrap();
    fs::write(dir.path().join("b.md"), "# B\n\n<!-- toc --><!-- tocstop -->\n\n## Usage\n").unwrap();

    let output = dochooks(dir.path(), &["toc", "a.md", "b.md"]);
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("Error in `a.md`: Missing tocstop"), "{err}");
    assert!(err.contains("fix: add `<!-- tocstop -->`"), "{err}");
    assert!(fs::read_to_string(dir.path().join("b.md")).unwrap().contains("-   [Usage](#usage)"));
}

#[test]
fn toc_skips_non_markdown_files() {
    let dir = TempDir::new().unwrap();
    let script = dir.path().join("notes.txt");
    fs::write(&script, "<!-- toc -->\n").unwrap();

    let output = dochooks(dir.path(), &["toc", "notes.txt"]);
    assert!(output.status.success());
    assert_eq!(fs::read_to_string(&script).unwrap(), "<!-- toc -->\n");
}

#[test]
fn links_report_broken_anchor_and_file() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("doc.md"),
        "# Doc\n\n[ok](#doc)\n\n[test](#nonexistent)\n\n[gone](missing.md)\n\n[web](http://foo.com)\n",
    )
    .unwrap();

    let output = dochooks(dir.path(), &["links", "--repo-root", ".", "doc.md"]);
    assert_eq!(output.status.code(), Some(1));
    let lines: Vec<String> = stdout(&output).lines().map(String::from).collect();
    assert_eq!(
        lines,
        [
            "doc.md:5: [test](#nonexistent): Link points at a non-existent anchor.",
            "doc.md:7: [gone](missing.md): Link points at a non-existent file.",
        ]
    );
}

#[test]
fn links_rooted_paths_resolve_from_repo_root() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("docs")).unwrap();
    fs::write(dir.path().join("test.md"), "# Test\n\n## Foo\n").unwrap();
    fs::write(dir.path().join("docs/guide.md"), "# Guide\n\n[ok](/test.md#foo)\n[bad](/test.md#bar)\n").unwrap();

    let output = dochooks(dir.path(), &["links", "--repo-root", ".", "docs"]);
    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.contains("[bad](/test.md#bar): Link points at a non-existent anchor."), "{out}");
    assert!(!out.contains("[ok]"), "{out}");
}

#[test]
fn links_anchors_only_ignores_missing_files() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("doc.md"), "# Doc\n\n[gone](missing.md)\n").unwrap();

    let output = dochooks(dir.path(), &["links", "--repo-root", ".", "--anchors-only", "doc.md"]);
    assert!(output.status.success(), "{}", stdout(&output));
}

#[test]
fn links_json_format() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("doc.md"), "# Doc\n\n[host](//example.com/page)\n").unwrap();

    let output = dochooks(dir.path(), &["links", "--repo-root", ".", "--format", "json", "doc.md"]);
    assert_eq!(output.status.code(), Some(1));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report.as_array().map(Vec::len), Some(1));
    assert_eq!(report[0]["line_number"], 3);
    assert_eq!(report[0]["label"], "host");
    assert_eq!(report[0]["message"], "Link is missing a scheme, such as https://.");
}

#[test]
fn copyright_missing_and_present() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bad.py"), "print('hi')\n").unwrap();
    fs::write(dir.path().join("good.sh"), "#!/bin/sh\n# Copyright 2019 Example\n").unwrap();

    let output = dochooks(
        dir.path(),
        &["copyright", "--copyright", "Copyright YYYY Example", "bad.py", "good.sh"],
    );
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("Missing copyright in bad.py:"), "{err}");
    assert!(err.contains("__copyright__ = \"\"\"\nCopyright "), "{err}");
    assert!(!err.contains("good.sh"), "{err}");
}

#[test]
fn copyright_template_from_config() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".dochooks.toml"), "copyright = \"Copyright YYYY Example\"\n").unwrap();
    fs::write(dir.path().join("main.rs"), "// Copyright 2020 Example\nfn main() {}\n").unwrap();

    let output = dochooks(dir.path(), &["copyright", "main.rs"]);
    assert!(output.status.success(), "{}", stderr(&output));
}

#[test]
fn doc_style_rewrites_words() {
    let dir = TempDir::new().unwrap();
    let doc = dir.path().join("doc.md");
    fs::write(&doc, "# Options\n\nPros and cons, e.g. speed.\n").unwrap();

    let output = dochooks(dir.path(), &["doc-style", "doc.md"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        fs::read_to_string(&doc).unwrap(),
        "# Options\n\nAdvantages and disadvantages, for example speed.\n"
    );
}

#[test]
fn doc_style_unbalanced_markers_leave_file_alone() {
    let dir = TempDir::new().unwrap();
    let doc = dir.path().join("doc.md");
    let content = "Cons\n<!-- google-doc-style-ignore -->\nCons\n";
    fs::write(&doc, content).unwrap();

    let output = dochooks(dir.path(), &["doc-style", "doc.md"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Error in `doc.md`"));
    assert_eq!(fs::read_to_string(&doc).unwrap(), content);
}

#[test]
fn config_excludes_paths() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("vendor")).unwrap();
    fs::write(dir.path().join(".dochooks.toml"), "exclude = [\"vendor/\"]\n").unwrap();
    fs::write(dir.path().join("vendor/doc.md"), "[test](#nonexistent)\n").unwrap();

    let output = dochooks(dir.path(), &["links", "--repo-root", ".", "vendor/doc.md"]);
    assert!(output.status.success(), "{}", stdout(&output));
}

#[test]
fn malformed_config_is_fatal() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".dochooks.toml"), "include = [").unwrap();
    fs::write(dir.path().join("doc.md"), "# Doc\n").unwrap();

    let output = dochooks(dir.path(), &["toc", "doc.md"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Invalid Config"));
}

#[test]
fn links_violation_before_unreadable_target_still_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("doc.md"), "# Doc\n\n[a](#nope)\n\n[b](blob.bin#x)\n").unwrap();
    fs::write(dir.path().join("blob.bin"), [0xff, 0xfe, 0x00, 0x01]).unwrap();

    let output = dochooks(dir.path(), &["links", "--repo-root", ".", "doc.md"]);
    assert_eq!(output.status.code(), Some(1));
    let lines: Vec<String> = stdout(&output).lines().map(String::from).collect();
    assert_eq!(
        lines,
        [
            "doc.md:3: [a](#nope): Link points at a non-existent anchor.",
            "doc.md:5: [b](blob.bin#x): Link points at a file that cannot be read.",
        ]
    );
}

#[test]
fn non_utf8_markdown_is_skipped_by_every_markdown_command() {
    let bytes = [b'#', b' ', 0xff, 0xfe, b'\n', b'<', b'!', b'-', b'-', b' ', b't', b'o', b'c'];
    for command in ["toc", "links", "doc-style"] {
        let dir = TempDir::new().unwrap();
        let doc = dir.path().join("latin1.md");
        fs::write(&doc, bytes).unwrap();

        let mut args = vec![command, "latin1.md"];
        if command == "links" {
            args.extend(["--repo-root", "."]);
        }
        let output = dochooks(dir.path(), &args);
        assert!(output.status.success(), "{command}: {}", stderr(&output));
        assert_eq!(fs::read(&doc).unwrap(), bytes, "{command} modified the file");
        assert!(stderr(&output).contains("skipping latin1.md"), "{command}: {}", stderr(&output));
    }
}

#[test]
fn commands_require_paths() {
    let dir = TempDir::new().unwrap();
    for command in ["toc", "links", "copyright", "doc-style"] {
        let output = dochooks(dir.path(), &[command]);
        assert!(!output.status.success(), "{command} ran without paths");
    }
}

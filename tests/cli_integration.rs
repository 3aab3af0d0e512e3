//! End-to-end tests of the texanno binary.

#![cfg(feature = "cli")]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn texanno() -> Command {
    let mut cmd = Command::cargo_bin("texanno").unwrap();
    for var in [
        "TEXANNO_TAGS",
        "TEXANNO_BOUNDARY",
        "TEXANNO_IGNORE_ENDPOINTS",
        "TEXANNO_WHOLE_FILE",
        "TEXANNO_PREVIEW_WIDTH",
        "TEXANNO_TOKENIZER",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

struct Fixture {
    dir: TempDir,
    text: PathBuf,
    ana: PathBuf,
    ben: PathBuf,
}

fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let text = write(dir.path(), "doc.tex", "Let G be a group. Then G has an identity.");
    let ana = write(
        dir.path(),
        "ana.json",
        r#"[
            {"id": "b", "start": 0, "end": 0, "tag": "begin annotation"},
            {"id": "d", "start": 11, "end": 16, "tag": "definition", "text": "group"},
            {"id": "t", "start": 18, "end": 40, "tag": "theorem", "text": "Then G has an identity"},
            {"id": "e", "start": 41, "end": 41, "tag": "end annotation"}
        ]"#,
    );
    let ben = write(
        dir.path(),
        "ben.json",
        r#"{"annotations": [
            {"annoid": "b", "start": 0, "end": 0, "tag": "begin annotation"},
            {"annoid": "d", "start": 11, "end": 16, "tag": "definition", "text": "group"},
            {"annoid": "e", "start": 41, "end": 41, "tag": "end annotation"}
        ]}"#,
    );
    Fixture { dir, text, ana, ben }
}

#[test]
fn test_export_human() {
    let f = fixture();
    texanno()
        .args(["export", "-t"])
        .arg(&f.text)
        .arg("-a")
        .arg(&f.ana)
        .assert()
        .success()
        .stdout(predicate::str::contains("# window 0..41 (41 positions)"))
        .stdout(predicate::str::contains("\"g\"\tB-definition"))
        .stdout(predicate::str::contains("\"T\"\tB-theorem"));
}

#[test]
fn test_export_inclusive_boundary_keeps_window_end() {
    let dir = TempDir::new().unwrap();
    let text = write(dir.path(), "short.tex", "ABCDE");
    let annos = write(
        dir.path(),
        "short.json",
        r#"[{"id": "d", "start": 0, "end": 4, "tag": "definition"}]"#,
    );
    texanno()
        .args(["export", "--boundary", "inclusive", "-t"])
        .arg(&text)
        .arg("-a")
        .arg(&annos)
        .assert()
        .success()
        .stdout(predicate::str::contains("(5 positions)"))
        .stdout(predicate::str::contains("\"E\"\tI-definition"));
}

#[test]
fn test_export_warns_on_out_of_range_annotation() {
    let dir = TempDir::new().unwrap();
    let text = write(dir.path(), "short.tex", "ABCDE");
    let annos = write(
        dir.path(),
        "long.json",
        r#"[{"id": "d", "start": 2, "end": 9, "tag": "definition"}]"#,
    );
    texanno()
        .args(["export", "-t"])
        .arg(&text)
        .arg("-a")
        .arg(&annos)
        .assert()
        .success()
        .stdout(predicate::str::contains("(3 positions)"))
        .stderr(predicate::str::contains("Span end 9 exceeds text length 5"));
}

#[test]
fn test_export_json_to_file_with_word_tokens() {
    let f = fixture();
    let out = f.dir.path().join("export.json");
    texanno()
        .args(["export", "--tokens", "words", "--format", "json", "-t"])
        .arg(&f.text)
        .arg("-a")
        .arg(&f.ana)
        .arg("-o")
        .arg(&out)
        .assert()
        .success();

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    let tags = json["iob_tags"].as_array().unwrap();
    let group = tags.iter().find(|t| t[0] == "group").unwrap();
    assert_eq!(group[1], serde_json::json!(["B-definition"]));
    assert_eq!(json["annotations"].as_array().unwrap().len(), 4);
}

#[test]
fn test_diff_lists_unshared() {
    let f = fixture();
    texanno()
        .args(["diff", "-t"])
        .arg(&f.text)
        .arg("-a")
        .arg(&f.ana)
        .arg("-a")
        .arg(&f.ben)
        .assert()
        .success()
        .stdout(predicate::str::contains("(1 not shared)"))
        .stdout(predicate::str::contains("(theorem:18-40)"))
        .stdout(predicate::str::contains("(0 not shared)"));
}

#[test]
fn test_diff_requires_two_sets() {
    let f = fixture();
    texanno()
        .args(["diff", "-t"])
        .arg(&f.text)
        .arg("-a")
        .arg(&f.ana)
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least two"));
}

#[test]
fn test_score_json() {
    let f = fixture();
    let output = texanno()
        .args(["score", "--format", "json", "--tag", "definition", "--tag", "theorem", "-t"])
        .arg(&f.text)
        .arg("--system")
        .arg(&f.ben)
        .arg("--reference")
        .arg(&f.ana)
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["precision"], 0.5);
    assert_eq!(report["counts"]["reference_only"], 1);
    assert_eq!(report["diff_lines"][0]["sign"], "-");
}

#[test]
fn test_score_human_summary() {
    let f = fixture();
    texanno()
        .args(["score", "-t"])
        .arg(&f.text)
        .arg("--system")
        .arg(&f.ana)
        .arg("--reference")
        .arg(&f.ana)
        .assert()
        .success()
        .stdout(predicate::str::contains("F1:        100.0%"));
}

#[test]
fn test_score_empty_reference_fails() {
    let f = fixture();
    let empty = write(f.dir.path(), "empty.json", "[]");
    texanno()
        .args(["score", "-t"])
        .arg(&f.text)
        .arg("--system")
        .arg(&f.ana)
        .arg("--reference")
        .arg(&empty)
        .assert()
        .failure()
        .stderr(predicate::str::contains("annotation set is empty"));
}

#[test]
fn test_config_file_and_env() {
    let f = fixture();
    let cfg = write(f.dir.path(), "texanno.toml", "tags = [\"proof\"]\npreview_width = 20\n");
    texanno()
        .arg("config")
        .arg("-c")
        .arg(&cfg)
        .assert()
        .success()
        .stdout(predicate::str::contains("preview_width = 20"))
        .stdout(predicate::str::contains("\"proof\""));

    texanno()
        .args(["config", "--format", "json"])
        .env("TEXANNO_BOUNDARY", "inclusive")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"inclusive\""));
}

#[test]
fn test_missing_input_reports_error() {
    texanno()
        .args(["export", "-t", "/nonexistent/doc.tex", "-a", "/nonexistent/a.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ERROR"));
}

#[test]
fn test_completions() {
    texanno()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("texanno"));
}

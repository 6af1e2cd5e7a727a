// ABOUTME: Integration tests for the cetd CLI binary.
// ABOUTME: Runs the binary against temporary HTML files and checks the tag:text output.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cetd_cmd() -> Command {
    Command::cargo_bin("cetd").unwrap()
}

#[test]
fn prints_tag_and_text_lines() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = temp_dir.path().join("page.html");
    let prose = "A quiet paragraph of plain prose that carries the whole page. ".repeat(5);
    fs::write(
        &html_path,
        format!(
            "<html><body><nav><a href='/'>Home</a></nav><div><p>{}</p></div></body></html>",
            prose.trim()
        ),
    )
    .unwrap();

    cetd_cmd()
        .arg(&html_path)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("p:A quiet paragraph"))
        .stdout(predicate::str::contains("Home").not());
}

#[test]
fn empty_page_prints_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = temp_dir.path().join("empty.html");
    fs::write(&html_path, "<html><body></body></html>").unwrap();

    cetd_cmd()
        .arg(&html_path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn empty_file_prints_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = temp_dir.path().join("blank.html");
    fs::write(&html_path, "").unwrap();

    cetd_cmd()
        .arg(&html_path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn missing_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    cetd_cmd()
        .arg(temp_dir.path().join("nope.html"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("error reading file"));
}

#[test]
fn requires_a_path() {
    cetd_cmd().assert().failure();
}

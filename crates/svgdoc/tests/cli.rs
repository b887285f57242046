use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const DRAWING: &str = r#"<svg xmlns="http://www.w3.org/2000/svg">
    <rect class="a" width="10"/>
    <circle class="b" r="5"/>
    <g class="a" width="9"><text>hi</text></g>
</svg>"#;

/// The first `class="a"` element as printed by `find`
const RECT: &str = r#"<rect xmlns="http://www.w3.org/2000/svg" class="a" width="10"/>"#;

/// Runs svgdoc in the directory, isolated from the user's configuration
fn svgdoc(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("svgdoc").unwrap();
    cmd.current_dir(dir).env("XDG_CONFIG_HOME", dir.join("config"));
    cmd
}

fn workspace() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("drawing.svg"), DRAWING).unwrap();
    dir
}

#[test]
fn format_to_stdout() {
    let dir = workspace();
    svgdoc(dir.path())
        .args(["format", "drawing.svg", "--no-prolog"])
        .assert()
        .success()
        .stdout(
            r#"<svg xmlns="http://www.w3.org/2000/svg"><rect class="a" width="10"/><circle class="b" r="5"/><g class="a" width="9"><text>hi</text></g></svg>
"#,
        );

    svgdoc(dir.path())
        .args(["format", "drawing.svg", "--pretty"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<svg",
        ))
        .stdout(predicate::str::contains("\n  <g class=\"a\" width=\"9\">\n    <text>hi</text>\n  </g>\n"));
}

#[test]
fn format_compressed() {
    let dir = workspace();
    svgdoc(dir.path())
        .args(["format", "drawing.svg", "-o", "out/drawing.svgz"])
        .assert()
        .success()
        .stdout("");

    let compressed = std::fs::read(dir.path().join("out/drawing.svgz")).unwrap();
    assert_eq!(&compressed[..2], &[0x1f, 0x8b]);

    svgdoc(dir.path())
        .args(["format", "out", "--no-prolog"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"<circle class="b" r="5"/>"#));
}

#[test]
fn format_directory() {
    let dir = workspace();
    std::fs::write(dir.path().join("other.svg"), "<svg/>").unwrap();
    std::fs::write(dir.path().join("notes.txt"), "not a drawing").unwrap();
    std::fs::create_dir(dir.path().join("formatted")).unwrap();

    svgdoc(dir.path())
        .args(["format", ".", "-o", "formatted"])
        .assert()
        .success();
    assert_eq!(
        std::fs::read_to_string(dir.path().join("formatted/other.svg")).unwrap(),
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<svg/>"
    );
    assert!(dir.path().join("formatted/drawing.svg").exists());
    assert!(!dir.path().join("formatted/notes.txt").exists());

    svgdoc(dir.path())
        .args(["format", ".", "-o", "single.svg"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("requires the output to be a directory"));
}

#[test]
fn configuration() {
    let dir = workspace();
    std::fs::write(
        dir.path().join("svgdocrc.json"),
        r#"{ "format": { "prolog": false } }"#,
    )
    .unwrap();
    svgdoc(dir.path())
        .args(["format", "drawing.svg"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<svg"));

    std::fs::write(dir.path().join("svgdocrc.json"), "{ format").unwrap();
    svgdoc(dir.path())
        .args(["format", "drawing.svg"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be parsed"));
}

#[test]
fn find() {
    let dir = workspace();
    svgdoc(dir.path())
        .args(["find", "drawing.svg", "--attribute", "class", "--value", "a"])
        .assert()
        .success()
        .stdout(format!(
            "{RECT}\n{}\n",
            r#"<g xmlns="http://www.w3.org/2000/svg" class="a" width="9"><text>hi</text></g>"#
        ));

    svgdoc(dir.path())
        .args(["find", "drawing.svg", "-a", "class", "-v", "a", "--first"])
        .assert()
        .success()
        .stdout(format!("{RECT}\n"));

    svgdoc(dir.path())
        .args(["find", "drawing.svg", "-a", "width", "-v", "9", "-c", ">"])
        .assert()
        .success()
        .stdout(format!("{RECT}\n"));

    svgdoc(dir.path())
        .args(["find", "drawing.svg", "-a", "id", "-v", "missing"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn missing_input() {
    let dir = workspace();
    svgdoc(dir.path())
        .args(["find", "missing.svg", "-a", "id", "-v", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read missing.svg"));
    svgdoc(dir.path())
        .args(["format", "missing.svg"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn export_without_rasterizers() {
    let dir = workspace();
    let empty = dir.path().join("bin");
    std::fs::create_dir(&empty).unwrap();
    svgdoc(dir.path())
        .env("PATH", &empty)
        .args(["export", "drawing.svg", "-o", "drawing.png", "--engine", "inkscape"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to export drawing.svg"))
        .stderr(predicate::str::contains("failed to run rasterizer"));
    assert!(!dir.path().join("drawing.png").exists());
}

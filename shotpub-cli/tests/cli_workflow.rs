//! Runs the shotpub binary against a throwaway project.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

struct Workspace {
    temp: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let workspace = Self {
            temp: TempDir::new().unwrap(),
        };
        let config = format!(
            "[registrar]\nledger = {}\n\n[logging]\ndirectory = {}\nlevel = warn\n",
            workspace.path("ledger.json").display(),
            workspace.path("logs").display()
        );
        fs::write(workspace.config_path(), config).unwrap();
        workspace
    }

    fn path(&self, relative: &str) -> PathBuf {
        self.temp.path().join(relative)
    }

    fn config_path(&self) -> PathBuf {
        self.path("config.ini")
    }

    fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_shotpub"))
            .env("HOME", self.temp.path())
            .env_remove("RUST_LOG")
            .arg("--config")
            .arg(self.config_path())
            .args(args)
            .output()
            .unwrap()
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn parse_prints_detected_version() {
    let ws = Workspace::new();
    let output = ws.run(&["parse", "/proj/scenes/shot010.v012.mb"]);

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Prefix:     shot010"), "{}", text);
    assert!(text.contains("Version:    12 (3 digits)"), "{}", text);
}

#[test]
fn publish_then_republish_collides() {
    let ws = Workspace::new();
    let scene = ws.write("demo/scenes/shot010.v002.ma", "scene");

    let first = ws.run(&["publish", "--session", arg(&scene), "-m", "blocking"]);
    assert!(first.status.success(), "{}", stdout(&first));
    assert!(ws.path("demo/scenes/publishes/shot010.v002.ma").is_file());
    assert!(!ws.path("demo/publishes").exists());
    // work file was versioned up after publishing
    assert!(ws.path("demo/scenes/shot010.v003.ma").is_file());

    let second = ws.run(&["publish", "--session", arg(&scene)]);
    assert_eq!(second.status.code(), Some(1));
    let text = stdout(&second);
    assert!(text.contains("validation failed"), "{}", text);
    assert!(text.contains("already exists"), "{}", text);
    assert_eq!(
        fs::read_to_string(ws.path("demo/scenes/publishes/shot010.v002.ma")).unwrap(),
        "scene"
    );
}

#[test]
fn records_lists_published_files() {
    let ws = Workspace::new();
    let scene = ws.write("demo/scenes/shot010.v003.ma", "scene");
    assert!(ws
        .run(&["publish", "--session", arg(&scene)])
        .status
        .success());

    let output = ws.run(&["records", "--name", "shot010.ma"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("shot010.ma"), "{}", text);
    assert!(text.contains("active"), "{}", text);
}

#[test]
fn dry_run_copies_nothing() {
    let ws = Workspace::new();
    let scene = ws.write("demo/scenes/shot010.v001.ma", "scene");

    let output = ws.run(&["publish", "--session", arg(&scene), "--dry-run"]);
    assert!(output.status.success(), "{}", stdout(&output));
    assert!(stdout(&output).contains("Dry run"));
    assert!(!ws.path("demo/scenes/publishes").exists());
    assert!(!ws.path("ledger.json").exists());
}

#[test]
fn version_up_saves_next_version() {
    let ws = Workspace::new();
    let work = ws.write("work/comp.v004.nk", "script");

    let output = ws.run(&["version-up", "--host", "nuke", arg(&work)]);
    assert!(output.status.success(), "{}", stdout(&output));
    assert!(stdout(&output).contains("comp.v005.nk"));
    assert_eq!(
        fs::read_to_string(ws.path("work/comp.v005.nk")).unwrap(),
        "script"
    );
}

#[test]
fn next_version_scans_folder() {
    let ws = Workspace::new();
    ws.write("pub/plate.v001.exr", "");
    ws.write("pub/plate.v007.exr", "");

    let output = ws.run(&[
        "next-version",
        arg(&ws.path("pub")),
        "--prefix",
        "plate",
        "--ext",
        "exr",
    ]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "8");
}

#[test]
fn next_version_matches_extension_case() {
    let ws = Workspace::new();
    ws.write("pub/plate.v001.EXR", "");
    ws.write("pub/plate.v005.exr", "");

    let output = ws.run(&[
        "next-version",
        arg(&ws.path("pub")),
        "--prefix",
        "plate",
        "--ext",
        "EXR",
    ]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "2");
}

#[test]
fn resolve_honours_layout_override() {
    let ws = Workspace::new();
    let source = ws.write("shots/shot010.v002.ma", "scene");

    let output = ws.run(&["resolve", arg(&source), "--layout", "nested"]);
    assert!(output.status.success(), "{}", stdout(&output));
    let text = stdout(&output);
    assert!(text.contains("v001"), "{}", text);
}

#[test]
fn config_init_writes_file() {
    let ws = Workspace::new();
    fs::remove_file(ws.config_path()).unwrap();

    let output = ws.run(&["config", "init"]);
    assert!(output.status.success());
    let written = fs::read_to_string(ws.config_path()).unwrap();
    assert!(written.contains("[publish]"));

    let show = ws.run(&["config", "show"]);
    assert!(stdout(&show).contains("layout"));
}

#[test]
fn invalid_config_is_reported() {
    let ws = Workspace::new();
    fs::write(ws.config_path(), "[publish]\nlayout = tree\n").unwrap();

    let output = ws.run(&["parse", "a.v001.ma"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Configuration error"));
}

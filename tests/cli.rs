use assert_cmd::Command;
use predicates::str::contains;
use std::fs;
use tempfile::TempDir;

const POINTERS_JSON: &str = r#"{
    "entries": [
        { "module": "GameAssembly.dll", "base_offset": "0x1C2A3B0", "offsets": ["0xB8", "0x0", "0x40"] }
    ]
}"#;

fn cmd() -> Command {
    Command::cargo_bin("phasmowatch").unwrap()
}

fn pointer_dir() -> TempDir {
    let dir = TempDir::new().expect("create temp dir");
    fs::write(dir.path().join("pointers.json"), POINTERS_JSON).expect("write pointer file");
    dir
}

#[test]
fn help_mentions_pointer_file() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("--pointers"))
        .stdout(contains("Phasmophobia"));
}

#[test]
fn version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn missing_pointer_file_fails() {
    let dir = TempDir::new().unwrap();
    cmd()
        .current_dir(dir.path())
        .args(["--once", "--no-clear"])
        .assert()
        .failure()
        .stderr(contains("cannot read pointer file"));
}

#[test]
fn empty_cheat_table_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("pointers.xml"), "<CheatTable/>").unwrap();

    cmd()
        .current_dir(dir.path())
        .arg("--once")
        .assert()
        .failure()
        .stderr(contains("no valid pointer entries"));
}

#[test]
fn absent_process_is_fatal() {
    let dir = pointer_dir();
    cmd()
        .current_dir(dir.path())
        .args([
            "--pointers",
            "pointers.json",
            "--process",
            "phasmowatch-no-such-game.exe",
            "--once",
            "--no-color",
            "--no-clear",
        ])
        .assert()
        .code(2)
        .stderr(contains("phasmowatch-no-such-game.exe is not running"));
}

#[test]
fn waiting_for_absent_process_reports_status() {
    let dir = pointer_dir();
    cmd()
        .current_dir(dir.path())
        .args([
            "-f",
            "pointers.json",
            "-p",
            "phasmowatch-no-such-game.exe",
            "--wait",
            "--cycles",
            "1",
            "--no-color",
            "--no-clear",
        ])
        .assert()
        .success()
        .stdout(contains("Game not running... waiting for phasmowatch-no-such-game.exe"))
        .stdout(contains("Goodbye"));
}

#[test]
fn zero_cycles_rejected() {
    cmd()
        .args(["--cycles", "0"])
        .assert()
        .failure()
        .stderr(contains("--cycles must be at least 1"));
}

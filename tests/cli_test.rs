use assert_cmd::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// A `huf` command running inside `work_dir`, so relative paths land there.
fn huf_cmd(work_dir: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("huf");
    cmd.current_dir(work_dir.path());
    cmd.env_remove("RUST_LOG");
    cmd
}

fn stdout_json(cmd: &mut Command) -> serde_json::Value {
    let assert = cmd.assert().success();
    serde_json::from_slice(&assert.get_output().stdout).unwrap()
}

// ============================================================================
// Happy path tests
// ============================================================================

#[test]
fn version_flag() {
    cargo_bin_cmd!("huf")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("huf"));
}

#[test]
fn compress_then_decompress() {
    let tmp = TempDir::new().unwrap();
    let data = b"it was the best of times, it was the worst of times".repeat(20);
    fs::write(tmp.path().join("plain.txt"), &data).unwrap();

    huf_cmd(&tmp)
        .args(["-c", "plain.txt", "plain.huf"])
        .assert()
        .success();
    let packed = fs::metadata(tmp.path().join("plain.huf")).unwrap().len();
    assert!(packed < data.len() as u64);

    huf_cmd(&tmp)
        .args(["-d", "plain.huf", "plain.out"])
        .assert()
        .success();
    assert_eq!(fs::read(tmp.path().join("plain.out")).unwrap(), data);
}

#[test]
fn json_report() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("in"), b"aaab").unwrap();

    let report = stdout_json(huf_cmd(&tmp).args(["-c", "--json", "in", "in.huf"]));
    assert_eq!(report["original_size"], 4);
    assert_eq!(report["tree_size"], 3);
    assert_eq!(report["compressed_size"], 22);

    let report = stdout_json(huf_cmd(&tmp).args(["-d", "--json", "in.huf", "in.out"]));
    assert_eq!(report["original_size"], 4);
}

#[test]
fn inspect_prints_tree() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("in"), b"aaab").unwrap();
    huf_cmd(&tmp).args(["-c", "in", "in.huf"]).assert().success();

    let dump = stdout_json(huf_cmd(&tmp).args(["-i", "in.huf"]));
    assert_eq!(dump["header"]["total_chars"], 4);
    assert_eq!(dump["root"], 2);
    assert_eq!(dump["nodes"].as_array().unwrap().len(), 3);
    assert_eq!(dump["payload_bytes"], 1);
}

#[test]
fn inspect_writes_output_file() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("in"), b"hello").unwrap();
    huf_cmd(&tmp).args(["-c", "in", "in.huf"]).assert().success();
    huf_cmd(&tmp)
        .args(["-i", "in.huf", "dump.json"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let text = fs::read_to_string(tmp.path().join("dump.json")).unwrap();
    let dump: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(dump["header"]["tree_size"], 7);
}

#[test]
fn config_file_is_applied() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("huf.json"), r#"{ "max_input_size": 3 }"#).unwrap();
    fs::write(tmp.path().join("in"), b"four").unwrap();

    huf_cmd(&tmp)
        .args(["-c", "--config", "huf.json", "in", "in.huf"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("max_input_size"));
}

// ============================================================================
// Error path tests
// ============================================================================

#[test]
fn empty_input_is_rejected() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("empty"), b"").unwrap();

    huf_cmd(&tmp)
        .args(["-c", "empty", "empty.huf"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("error:"));
    assert_eq!(fs::metadata(tmp.path().join("empty.huf")).unwrap().len(), 0);
}

#[test]
fn malformed_tree_size_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let bad = [4, 0, 0, 0, 1, 0, b'a', 0xFF, 0xFF, 0xFF, 0xFF, 0];
    fs::write(tmp.path().join("bad.huf"), bad).unwrap();

    huf_cmd(&tmp)
        .args(["-d", "bad.huf", "bad.out"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("invalid resource"));
    assert_eq!(fs::metadata(tmp.path().join("bad.out")).unwrap().len(), 0);
}

#[test]
fn truncated_file_is_rejected() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("short.huf"), [4, 0, 0]).unwrap();

    huf_cmd(&tmp)
        .args(["-d", "short.huf", "short.out"])
        .assert()
        .code(7)
        .stderr(predicate::str::contains("unexpected end of input"));
}

#[test]
fn failed_decompress_leaves_empty_output() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("in"), b"some text to damage later".repeat(4)).unwrap();
    huf_cmd(&tmp).args(["-c", "in", "in.huf"]).assert().success();

    let mut packed = fs::read(tmp.path().join("in.huf")).unwrap();
    packed.truncate(packed.len() - 3);
    fs::write(tmp.path().join("in.huf"), packed).unwrap();
    fs::write(tmp.path().join("in.out"), b"stale contents").unwrap();

    huf_cmd(&tmp)
        .args(["-d", "in.huf", "in.out"])
        .assert()
        .code(7);
    assert_eq!(fs::metadata(tmp.path().join("in.out")).unwrap().len(), 0);
}

#[test]
fn missing_input_is_file_access_error() {
    let tmp = TempDir::new().unwrap();
    huf_cmd(&tmp)
        .args(["-c", "nope", "out"])
        .assert()
        .code(6)
        .stderr(predicate::str::contains("cannot open nope"));
}

#[test]
fn unknown_option_exit_code() {
    let tmp = TempDir::new().unwrap();
    huf_cmd(&tmp).args(["-z", "a", "b"]).assert().code(8);
    huf_cmd(&tmp).args(["-c", "-d", "a", "b"]).assert().code(8);
}

#[test]
fn missing_arguments_exit_code() {
    let tmp = TempDir::new().unwrap();
    huf_cmd(&tmp).args(["a", "b"]).assert().code(5);
    huf_cmd(&tmp).args(["in.txt"]).assert().code(5);
    huf_cmd(&tmp)
        .args(["-c", "in.txt"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("required"));
}

#[test]
fn verbose_quiet_conflict() {
    cargo_bin_cmd!("huf")
        .args(["--verbose", "--quiet", "-c", "a", "b"])
        .assert()
        .code(8)
        .stderr(predicate::str::contains("cannot be used with"));
}

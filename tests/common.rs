use assert_cmd::{cargo::cargo_bin_cmd, Command};
use std::path::Path;

pub fn cairn() -> Command {
    let mut cmd = cargo_bin_cmd!("cairn");
    cmd.env_remove("CAIRN_DATA_DIR")
        .env_remove("RUST_LOG")
        .env_remove("CAIRN_LOG");
    cmd
}

/// `cairn` pointed at `dir`
#[allow(dead_code)]
pub fn cairn_in(dir: &Path) -> Command {
    let mut cmd = cairn();
    cmd.arg("--data-dir").arg(dir);
    cmd
}

/// Append content and return the new node id
#[allow(dead_code)]
pub fn append(dir: &Path, content: &str) -> String {
    let output = cairn_in(dir)
        .args(["append", content])
        .output()
        .expect("run cairn append");
    assert!(output.status.success(), "append failed: {:?}", output);
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

#[allow(dead_code)]
pub fn json_stdout(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().expect("run cairn");
    assert!(output.status.success(), "command failed: {:?}", output);
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

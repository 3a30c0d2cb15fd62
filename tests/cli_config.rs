use std::fs;
use std::process::Command;

use tempfile::tempdir;

fn run(dir: &std::path::Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_plugin-sdk"))
        .current_dir(dir)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn test_missing_config_flag_fails() {
    let dir = tempdir().unwrap();

    let output = run(dir.path(), &["build", "--no-pull"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--config"), "stderr:\n{}", stderr);
}

#[test]
fn test_missing_config_file_fails() {
    let dir = tempdir().unwrap();

    let output = run(dir.path(), &["pull", "--config", "acme"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("config.toml"), "stderr:\n{}", stderr);
}

#[test]
fn test_unknown_config_name_fails_before_work() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("config.toml"),
        "[configs.acme]\ncustomer_id = \"acme\"\n",
    )
    .unwrap();

    let output = run(dir.path(), &["watch", "--config", "acme.prod"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("does not exist"), "stderr:\n{}", stderr);
}

#[test]
fn test_unknown_keys_are_reported_as_warnings() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("config.toml"),
        r#"
[configs.acme]
customer_id = "acme"
community_id = "acmecommunity"
plugin_id = "plug"
hostname = "acme.example.com"
sync_to_remote = false
auto_comit = false
"#,
    )
    .unwrap();

    let output = run(dir.path(), &["clean", "--config", "acme", "--color", "never"]);

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("auto_comit"), "stderr:\n{}", stderr);
    assert!(stderr.contains("Did you mean 'auto_commit'?"), "stderr:\n{}", stderr);
}

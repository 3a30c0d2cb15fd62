use std::process::Command;

#[test]
fn test_help_lists_commands() {
    let bin = env!("CARGO_BIN_EXE_plugin-sdk");

    let output = Command::new(bin).arg("--help").output().unwrap();

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["watch", "build", "pull", "clean"] {
        assert!(
            stdout.contains(command),
            "help output should list '{}'; got:\n{}",
            command,
            stdout
        );
    }
}

#[test]
fn test_build_help_mentions_no_pull() {
    let bin = env!("CARGO_BIN_EXE_plugin-sdk");

    let output = Command::new(bin).args(["build", "--help"]).output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--no-pull"));
    assert!(stdout.contains("--config"));
}

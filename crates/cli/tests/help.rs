use assert_cmd::Command;

#[test]
fn help_lists_the_subcommands() {
    let output = Command::cargo_bin("libris")
        .unwrap()
        .arg("--help")
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout).to_string();
    assert!(stdout.contains("serve"));
    assert!(stdout.contains("demo"));
}

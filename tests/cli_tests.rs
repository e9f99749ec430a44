use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::{TempDir, tempdir};

mod common;
use common::TEST_IMEI;

/// Writes a configuration that drives the fake tool with no delay and no
/// network check, plus a command set, into a fresh directory.
fn setup_run_dir(commands: &str) -> TempDir {
    let dir = tempdir().unwrap();
    let script = common::write_fake_tool(dir.path());
    let config = format!(
        r#"
language = "en"
log_file = "runner.log"

[tool]
command = "sh '{}'"
invoke_timeout_secs = 10

[schedule]
command_delay_ms = 0

[network]
enabled = false
"#,
        script.display()
    );
    fs::write(dir.path().join("OtaRunner.toml"), config).unwrap();
    fs::write(dir.path().join("commands.toml"), commands).unwrap();
    dir
}

fn files_with_suffix(dir: &Path, suffix: &str) -> Vec<String> {
    fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(suffix))
        .collect()
}

fn runner() -> Command {
    let mut cmd = Command::cargo_bin("ota-cmd-runner").unwrap();
    cmd.env_remove("OTA_LOG");
    cmd
}

/// A complete run writes the HTML report and the transcript next to the
/// command set and exits successfully.
///
/// 完整运行会在命令集旁边写入 HTML 报告和调用记录，并成功退出。
#[cfg(unix)]
#[test]
fn test_successful_run_writes_artifacts() {
    let dir = setup_run_dir(
        r#"
[[commands]]
command = "GET STATUS"
expected_response = "OK"

[[commands]]
command = "OFFLINE"
expected_response = "OK"
"#,
    );

    runner()
        .current_dir(dir.path())
        .args(["--lang", "en", "run", "-f", "commands.toml", "-i", TEST_IMEI, "-t", "Alex"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Firmware version: RSW9.8.7"))
        .stdout(predicate::str::contains("Completed"))
        .stdout(predicate::str::contains("Executed:   2"))
        .stdout(predicate::str::contains("Error:   1"));

    let reports = files_with_suffix(dir.path(), ".html");
    assert_eq!(reports.len(), 1);
    assert!(reports[0].starts_with(&format!("{TEST_IMEI}_OTA_Cmd_TestResult_")));

    let logs = files_with_suffix(dir.path(), ".txt");
    assert_eq!(logs.len(), 1);
    assert!(logs[0].starts_with(&format!("{TEST_IMEI}_OTA_Cmd_Test_Logs_")));
    let transcript = fs::read_to_string(dir.path().join(&logs[0])).unwrap();
    assert!(transcript.contains("Response: OK"));
    assert!(transcript.contains("operation failed"));

    let html = fs::read_to_string(dir.path().join(&reports[0])).unwrap();
    assert!(html.contains("Alex"));
    assert!(html.contains("RSW9.8.7"));

    let log = fs::read_to_string(dir.path().join("runner.log")).unwrap();
    assert!(log.contains("Run started"));
}

#[test]
fn test_invalid_imei_is_rejected() {
    let dir = setup_run_dir("commands = []");

    runner()
        .current_dir(dir.path())
        .args(["run", "-f", "commands.toml", "-i", "12345", "-t", "Alex"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("IMEI must be a 15-digit integer value"));

    assert!(files_with_suffix(dir.path(), ".html").is_empty());
}

#[test]
fn test_imei_with_surrounding_whitespace_is_rejected() {
    let dir = setup_run_dir("commands = []");

    runner()
        .current_dir(dir.path())
        .args(["run", "-f", "commands.toml", "-i", &format!(" {TEST_IMEI} "), "-t", "Alex"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("IMEI must be a 15-digit integer value"));
}

#[test]
fn test_blank_tester_is_rejected() {
    let dir = setup_run_dir("commands = []");

    runner()
        .current_dir(dir.path())
        .args(["run", "-f", "commands.toml", "-i", TEST_IMEI, "-t", "  "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("please enter the tester name"));
}

#[test]
fn test_missing_command_file_is_rejected() {
    let dir = setup_run_dir("commands = []");

    runner()
        .current_dir(dir.path())
        .args(["run", "-f", "nope.toml", "-i", TEST_IMEI, "-t", "Alex"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("command file not found"));
}

#[test]
fn test_missing_explicit_config_is_an_error() {
    let dir = setup_run_dir("commands = []");

    runner()
        .current_dir(dir.path())
        .args([
            "--lang", "en", "run", "-c", "other.toml", "-f", "commands.toml", "-i", TEST_IMEI, "-t", "Alex",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration file"));
}

#[test]
fn test_unreachable_network_refuses_to_start() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("OtaRunner.toml"),
        r#"
log_file = "runner.log"

[tool]
command = "definitely-not-a-real-tool-xyz"

[network]
url = "http://127.0.0.1:9/"
attempts = 1
timeout_secs = 2
"#,
    )
    .unwrap();
    fs::write(dir.path().join("commands.toml"), "commands = []").unwrap();

    runner()
        .current_dir(dir.path())
        .args(["--lang", "en", "run", "-f", "commands.toml", "-i", TEST_IMEI, "-t", "Alex"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No network connection"));

    assert!(files_with_suffix(dir.path(), ".txt").is_empty());
}

#[test]
fn test_init_writes_usable_files() {
    let dir = tempdir().unwrap();

    runner()
        .current_dir(dir.path())
        .args(["--lang", "en", "init", "--non-interactive"])
        .assert()
        .success();

    let config = ota_cmd_runner::config::load_runner_config(&dir.path().join("OtaRunner.toml")).unwrap();
    assert_eq!(config.language, "en");
    let commands =
        ota_cmd_runner::config::load_command_set(&dir.path().join("Sample_Commands.toml")).unwrap();
    assert!(!commands.is_empty());
    assert_eq!(commands[0].ordinal, 1);
}

#[test]
fn test_non_interactive_init_keeps_existing_files() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("OtaRunner.toml");
    let custom = "[tool]\ncommand = \"my-custom-tool --flag\"\n";
    fs::write(&config_path, custom).unwrap();

    runner()
        .current_dir(dir.path())
        .args(["--lang", "en", "init", "--non-interactive"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Kept existing file"));

    assert_eq!(fs::read_to_string(&config_path).unwrap(), custom);
    // The missing sample command set is still written.
    assert!(dir.path().join("Sample_Commands.toml").is_file());
}

/// A terminal Ctrl-C reaches the whole foreground process group. The command
/// in flight must finish normally and the run stop at the next boundary.
///
/// 终端的 Ctrl-C 会发送给整个前台进程组。正在执行的命令必须正常完成，
/// 运行在下一个边界处停止。
#[cfg(unix)]
#[test]
fn test_interrupt_lets_current_command_finish() {
    use std::os::unix::process::CommandExt;
    use std::process::Stdio;
    use std::time::Duration;

    let dir = setup_run_dir(
        r#"
[[commands]]
command = "SLOW"
expected_response = "OK"

[[commands]]
command = "GET STATUS"
expected_response = "OK"
"#,
    );

    // Lead a fresh process group, like a shell job in the foreground.
    let mut child = Command::new(assert_cmd::cargo::cargo_bin("ota-cmd-runner"))
        .current_dir(dir.path())
        .args(["--lang", "en", "run", "-f", "commands.toml", "-i", TEST_IMEI, "-t", "Alex"])
        .env_remove("OTA_LOG")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .process_group(0)
        .spawn()
        .unwrap();

    std::thread::sleep(Duration::from_millis(1500));
    let status = Command::new("sh")
        .arg("-c")
        .arg(format!("kill -INT -{}", child.id()))
        .status()
        .unwrap();
    assert!(status.success());

    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Abort requested"));
    assert!(stdout.contains("Aborted by user"));

    let reports = files_with_suffix(dir.path(), ".html");
    assert_eq!(reports.len(), 1);
    let html = fs::read_to_string(dir.path().join(&reports[0])).unwrap();
    assert!(html.contains("status-cell status-Passed"));
    assert!(!html.contains("status-cell status-Failed"));
    assert!(!html.contains("GET STATUS"));
}

#[test]
fn test_help_lists_subcommands() {
    runner()
        .args(["--lang", "en", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("init"));
}

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::TempDir;

fn pb_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("pb");
    path
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    let config_content = format!(
        r#"[storage]
path = "{}/data/phonebook.json"

[log]
capacity = 50
"#,
        root.display()
    );

    let config_path = config_dir.join("pb.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn snapshot_path(tmp: &TempDir) -> PathBuf {
    tmp.path().join("data").join("phonebook.json")
}

fn run_pb(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    run_pb_with_input(config_path, args, "")
}

fn run_pb_with_input(config_path: &Path, args: &[&str], input: &str) -> (String, String, bool) {
    let binary = pb_binary();
    let mut child = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .current_dir(config_path.parent().unwrap())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap_or_else(|e| panic!("Failed to run pb binary at {:?}: {}", binary, e));

    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

fn read_snapshot(tmp: &TempDir) -> serde_json::Value {
    let text = fs::read_to_string(snapshot_path(tmp)).unwrap();
    serde_json::from_str(&text).unwrap()
}

#[test]
fn test_init_creates_snapshot() {
    let (tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_pb(&config_path, &["init"]);
    assert!(success, "init failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("initialized"));

    let snapshot = read_snapshot(&tmp);
    assert_eq!(snapshot["admins"][0]["username"], "admin");
    assert_eq!(snapshot["members"][0]["member_id"], 101);
    assert_eq!(snapshot["members"][0]["contacts"][0]["name"], "Dad");
}

#[test]
fn test_init_idempotent() {
    let (tmp, config_path) = setup_test_env();

    let (_, _, success1) = run_pb(&config_path, &["init"]);
    assert!(success1, "First init failed");
    let (_, _, success2) = run_pb(&config_path, &["init"]);
    assert!(success2, "Second init failed (not idempotent)");

    let snapshot = read_snapshot(&tmp);
    assert_eq!(snapshot["admins"].as_array().unwrap().len(), 1);
    assert_eq!(snapshot["members"].as_array().unwrap().len(), 1);
}

#[test]
fn test_members_lists_seeded_account() {
    let (_tmp, config_path) = setup_test_env();

    run_pb(&config_path, &["init"]);
    let (stdout, _, success) = run_pb(&config_path, &["members"]);
    assert!(success);
    assert!(stdout.contains("student"));
    assert!(stdout.contains("student@example.com"));
}

#[test]
fn test_log_shows_seed_message() {
    let (_tmp, config_path) = setup_test_env();

    run_pb(&config_path, &["init"]);
    let (stdout, _, success) = run_pb(&config_path, &["log"]);
    assert!(success);
    assert!(stdout.contains("System initialized with sample data."));
}

#[test]
fn test_passwd_hash() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_pb(&config_path, &["passwd-hash", "abc"]);
    assert!(success);
    assert_eq!(
        stdout.trim(),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

#[test]
fn test_missing_config_uses_defaults() {
    let tmp = TempDir::new().unwrap();
    let config_path = tmp.path().join("absent.toml");

    let (stdout, stderr, success) = run_pb(&config_path, &["init"]);
    assert!(success, "stdout={}, stderr={}", stdout, stderr);
    assert!(tmp.path().join("data").join("phonebook.json").exists());

    let (stdout, _, success) = run_pb(&config_path, &["members"]);
    assert!(success);
    assert!(stdout.contains("student"));
}

#[test]
fn test_read_only_commands_do_not_write() {
    let (tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_pb(&config_path, &["members"]);
    assert!(success);
    assert!(stdout.contains("No members."));

    let (_, _, success) = run_pb(&config_path, &["log"]);
    assert!(success);
    assert!(!snapshot_path(&tmp).exists());
}

#[test]
fn test_invalid_config_fails() {
    let tmp = TempDir::new().unwrap();
    let config_path = tmp.path().join("pb.toml");
    fs::write(&config_path, "[log]\ncapacity = 0\n").unwrap();

    let (_, stderr, success) = run_pb(&config_path, &["members"]);
    assert!(!success);
    assert!(stderr.contains("log.capacity"));
}

#[test]
fn test_menu_session_persists_contact() {
    let (tmp, config_path) = setup_test_env();

    // login, add contact, view it through search, log out, exit
    let script = "1\nstudent\n123\n2\nMom\n090222\nmom@example.com\nHome\n\n9\nmom\n0\n3\n";
    let (stdout, stderr, success) = run_pb_with_input(&config_path, &[], script);
    assert!(success, "menu failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("Added contact 2: Mom"));
    assert!(stdout.contains("Goodbye."));

    let snapshot = read_snapshot(&tmp);
    let contacts = snapshot["members"][0]["contacts"].as_array().unwrap();
    assert_eq!(contacts.len(), 2);
    assert_eq!(contacts[1]["phone"], "090222");
    assert!(contacts[1]["last_viewed_at"].is_string());

    let logs: Vec<&str> = snapshot["logs"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|l| l.as_str())
        .collect();
    assert!(logs.iter().any(|l| l.ends_with("Member 'student' logged in.")));
    assert!(logs.last().unwrap().ends_with("System shutdown."));
}

#[test]
fn test_menu_rejects_locked_member() {
    let (_tmp, config_path) = setup_test_env();

    run_pb(&config_path, &["init"]);
    let lock = "2\nadmin\n123456\n4\n101\n0\n3\n";
    let (stdout, _, success) = run_pb_with_input(&config_path, &["menu"], lock);
    assert!(success);
    assert!(stdout.contains("Member student locked."));

    let login = "1\nstudent\n123\n3\n";
    let (stdout, _, success) = run_pb_with_input(&config_path, &[], login);
    assert!(success);
    assert!(stdout.contains("Login failed"));
}

#[test]
fn test_corrupt_snapshot_is_preserved() {
    let (tmp, config_path) = setup_test_env();

    let path = snapshot_path(&tmp);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let original = r#"{"members":[{"member_id":101,"username":"x"}]}"#;
    fs::write(&path, original).unwrap();

    // Listing leaves the file untouched.
    let (stdout, stderr, success) = run_pb(&config_path, &["members"]);
    assert!(success, "stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("No members."));
    assert_eq!(fs::read_to_string(&path).unwrap(), original);

    // A writing command moves it aside before seeding.
    let (stdout, stderr, success) = run_pb(&config_path, &["init"]);
    assert!(success, "stdout={}, stderr={}", stdout, stderr);
    let moved = tmp.path().join("data").join("phonebook.json.corrupt");
    assert_eq!(fs::read_to_string(moved).unwrap(), original);
    assert_eq!(read_snapshot(&tmp)["members"][0]["username"], "student");
}

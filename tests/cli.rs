use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SCRIPT: &str = r#"
[[pages]]
scale = 2.0
width = 1000.0
height = 1400.0

[[steps]]
action = "arm"
shape = "rectangle"

[[steps]]
action = "down"
page = 0
x = 100.0
y = 100.0

[[steps]]
action = "up"
page = 0
x = 300.0
y = 200.0
"#;

fn pagemark_cmd(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pagemark").expect("binary exists");
    cmd.env("XDG_CONFIG_HOME", config_home.path());
    cmd
}

#[test]
fn pagemark_help_prints_usage() {
    let temp = TempDir::new().unwrap();
    pagemark_cmd(&temp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Replay pointer sessions against the document annotation core",
        ));
}

#[test]
fn script_is_required() {
    let temp = TempDir::new().unwrap();
    pagemark_cmd(&temp)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "required arguments were not provided",
        ));
}

#[test]
fn replay_prints_json_report() {
    let temp = TempDir::new().unwrap();
    let script = temp.path().join("session.toml");
    std::fs::write(&script, SCRIPT).unwrap();

    let output = pagemark_cmd(&temp).arg(&script).output().unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["commits"][0]["id"], "a1");
    assert_eq!(report["commits"][0]["geometry"]["type"], "rect");
    assert_eq!(report["commits"][0]["geometry"]["width"], 100.0);
    assert_eq!(report["live_previews"], 0);
    let ops: Vec<&str> = report["surface"]
        .as_array()
        .unwrap()
        .iter()
        .map(|op| op["op"].as_str().unwrap())
        .collect();
    assert_eq!(ops, ["show_preview", "update_preview", "promote_preview"]);
}

#[test]
fn explicit_config_is_applied() {
    let temp = TempDir::new().unwrap();
    let script = temp.path().join("session.toml");
    std::fs::write(&script, SCRIPT).unwrap();
    let config = temp.path().join("custom.toml");
    std::fs::write(&config, "[drawing]\ndefault_color = \"green\"\n").unwrap();

    pagemark_cmd(&temp)
        .arg("--config")
        .arg(&config)
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"stroke_color\":\"green\""));
}

#[test]
fn invalid_script_fails_with_context() {
    let temp = TempDir::new().unwrap();
    let script = temp.path().join("broken.toml");
    std::fs::write(&script, "pages = []\n").unwrap();

    pagemark_cmd(&temp)
        .arg(&script)
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least one page is required"));
}

#[test]
fn init_config_writes_default_file() {
    let temp = TempDir::new().unwrap();

    pagemark_cmd(&temp)
        .arg("--init-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote default config"));

    let written = temp.path().join("pagemark").join("config.toml");
    assert!(written.exists());

    pagemark_cmd(&temp)
        .arg("--init-config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn schema_dump_lists_sections() {
    Command::cargo_bin("dump_config_schema")
        .expect("binary exists")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"interaction\""))
        .stdout(predicate::str::contains("\"commit\""));
}

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SETTINGS: [&str; 9] = [
    "HEDERA_ACCOUNT_ID",
    "HEDERA_PRIVATE_KEY",
    "HEDERA_KEY_TYPE",
    "HEDERA_PUBLIC_KEY",
    "HEDERA_NETWORK_TYPE",
    "HEDERA_MIRROR_NODE_URL",
    "OPENAI_API_KEY",
    "OPENAI_BASE_URL",
    "OPENAI_MODEL",
];

/// Command isolated from the caller's environment and `.env`
fn hedera_agent(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("hedera-agent").unwrap();
    cmd.current_dir(dir).env_remove("HEDERA_AGENT_CONFIG");
    for key in SETTINGS {
        cmd.env_remove(key);
    }
    cmd.arg("--config").arg(dir.join("config.yaml"));
    cmd
}

#[test]
fn test_actions_lists_catalogue() {
    let dir = TempDir::new().unwrap();
    hedera_agent(dir.path())
        .arg("actions")
        .assert()
        .success()
        .stdout(predicate::str::contains("Hedera - Hedera blockchain integration plugin"))
        .stdout(predicate::str::contains("HEDERA_HBAR_BALANCE"))
        .stdout(predicate::str::contains("HEDERA_SET_SPENDING_APPROVAL"));
}

#[test]
fn test_check_reports_missing_settings() {
    let dir = TempDir::new().unwrap();
    hedera_agent(dir.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Missing settings: HEDERA_PRIVATE_KEY, HEDERA_ACCOUNT_ID, HEDERA_NETWORK_TYPE",
        ));
}

#[test]
fn test_check_accepts_env_settings() {
    let dir = TempDir::new().unwrap();
    hedera_agent(dir.path())
        .arg("check")
        .env("HEDERA_ACCOUNT_ID", "0.0.1001")
        .env("HEDERA_PRIVATE_KEY", "11".repeat(32))
        .env("HEDERA_KEY_TYPE", "ECDSA")
        .env("HEDERA_NETWORK_TYPE", "testnet")
        .assert()
        .success()
        .stdout(predicate::str::contains("Settings OK: account 0.0.1001 on testnet"));
}

#[test]
fn test_config_init_then_show_redacts_key() {
    let dir = TempDir::new().unwrap();
    hedera_agent(dir.path())
        .args(["config", "init"])
        .assert()
        .success();
    assert!(dir.path().join("config.yaml").exists());

    hedera_agent(dir.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("use --force to overwrite"));

    hedera_agent(dir.path())
        .args(["config", "show", "--json"])
        .env("HEDERA_PRIVATE_KEY", "11".repeat(32))
        .assert()
        .success()
        .stdout(predicate::str::contains("<redacted>"))
        .stdout(predicate::str::contains("1111").not());
}

#[test]
fn test_run_unknown_action() {
    let dir = TempDir::new().unwrap();
    hedera_agent(dir.path())
        .args(["run", "--action", "LAUNCH_ROCKET", "go"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown action 'LAUNCH_ROCKET'"));
}

#[test]
fn test_dotenv_settings_are_loaded() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(".env"),
        format!(
            "HEDERA_ACCOUNT_ID=0.0.2002\nHEDERA_PRIVATE_KEY={}\nHEDERA_KEY_TYPE=ED25519\nHEDERA_NETWORK_TYPE=previewnet\n",
            "22".repeat(32)
        ),
    )
    .unwrap();

    hedera_agent(dir.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("account 0.0.2002 on previewnet"));
}

#![deny(clippy::all, clippy::pedantic)]

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use httpmock::MockServer;
use predicates::str::contains;
use tempfile::TempDir;

fn config_dir(api_path: &str) -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    let body = serde_json::json!({
        "AccessToken": "cli-token",
        "SecretKey": "cli-secret",
        "ApiPath": api_path,
        "ContentLanguage": "en",
    });
    fs::write(dir.path().join("cbot.json"), body.to_string()).expect("write config");
    dir
}

fn cli(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("cbot-cli"));
    cmd.env("CBOT_CONFIG_DIR", dir)
        .env_remove("RUST_LOG")
        .env_remove("CBOT_LOG_LEVEL")
        .env_remove("CBOT_LOG_JSON");
    cmd
}

#[test]
fn list_bots_text_end_to_end() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("GET")
            .path("/v1/bots")
            .query_param("properties", "created,last_modified,creator")
            .header("access-token", "cli-token")
            .header("secret-key", "cli-secret")
            .header("content-language", "ja");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"code":200,"bots":[{"id":"b1","name":"n1","description":"d1","created":"c1","last_modified":"m1","creator":"u1"},{"id":"b2","name":"n2","description":"d2","created":"c2","last_modified":"m2","creator":"u2"}]}"#);
    });

    let dir = config_dir(&server.url("/v1/"));
    let assert = cli(dir.path())
        .args(["-l", "-f", "text"])
        .assert()
        .success();

    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    assert_eq!(
        output,
        "id\tname\tdescription\tcreated\tlast_modified\tcreator\n\
         b1\tn1\td1\tc1\tm1\tu1\n\
         b2\tn2\td2\tc2\tm2\tu2\n"
    );
    mock.assert();
}

#[test]
fn execute_bot_prints_response_body() {
    let server = MockServer::start();
    let raw = r#"{"code":202,"job_id":"j1","bot_id":"b1","bot_name":"n","status":2}"#;
    let mock = server.mock(|when, then| {
        when.method("POST")
            .path("/v1/bots/b1/jobs")
            .json_body(serde_json::json!({
                "timeout_time": 10,
                "callback_endpoint": "",
                "callback_tries": 0,
                "input": {"city": "tokyo"}
            }));
        then.status(200).body(raw);
    });

    let dir = config_dir(&server.url("/v1"));
    cli(dir.path())
        .args(["-i", "city:tokyo", "-t", "10", "b1"])
        .assert()
        .success()
        .stdout(format!("{raw}\n"));
    mock.assert();
}

#[test]
fn unauthorized_code_exits_with_status_one() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("DELETE").path("/v1/jobs/j1");
        then.status(401).body(r#"{"code":401}"#);
    });

    let dir = config_dir(&server.url("/v1"));
    cli(dir.path())
        .args(["-a", "j1"])
        .assert()
        .code(1)
        .stderr(contains("Check your access token and key."));
}

#[test]
fn bad_input_never_reaches_server() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.any_request();
        then.status(200).body(r#"{"code":200}"#);
    });

    let dir = config_dir(&server.url("/v1"));
    cli(dir.path())
        .args(["-i", "key1:value1:extra", "b1"])
        .assert()
        .code(1)
        .stderr(contains("invalidate format parameter. Ex: key:value"));
    mock.assert_hits(0);
}

#[test]
fn display_profile_reads_config() {
    let dir = config_dir("https://api.example.com/v1");
    cli(dir.path())
        .arg("-p")
        .assert()
        .success()
        .stdout(contains("Access Token : cli-token"))
        .stdout(contains("API Path     : https://api.example.com/v1"));
}

#[test]
fn missing_config_runs_setup_first() {
    let dir = TempDir::new().expect("tempdir");
    let config = dir.path().join(".cbot");

    cli(&config)
        .arg("-p")
        .write_stdin("new-token\nnew-secret\nhttps://api.example.com/\n")
        .assert()
        .success()
        .stdout(contains("Input your Access Token:"))
        .stdout(contains("Access Token : new-token"));

    let saved = fs::read_to_string(config.join("cbot.json")).expect("config written");
    assert!(saved.contains("\"AccessToken\": \"new-token\""));
}

#[test]
fn canceled_setup_writes_no_file() {
    let dir = TempDir::new().expect("tempdir");
    let config = dir.path().join(".cbot");

    cli(&config)
        .arg("-l")
        .write_stdin("only-token\n")
        .assert()
        .code(1)
        .stderr(contains("config file create failed. setup canceled"));

    assert!(!config.join("cbot.json").exists());
}

#[test]
fn no_action_prints_usage() {
    let dir = config_dir("https://api.example.com/v1");
    cli(dir.path())
        .assert()
        .code(1)
        .stderr(contains("Usage: cbot-cli [OPTION]... [BOT_ID]"));
}

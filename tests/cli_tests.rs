//! Integration tests for CLI

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::JoinHandle;
use tempfile::TempDir;

/// Serve canned responses for a fixed number of requests on a random local
/// port, routing by request target. The handle yields the observed targets.
fn serve_api(
    expected_requests: usize,
    route: impl Fn(&str) -> (u16, String) + Send + 'static,
) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock api");
    let addr = listener.local_addr().expect("local addr");
    let handle = std::thread::spawn(move || {
        let mut targets = Vec::new();
        for _ in 0..expected_requests {
            let (mut stream, _) = listener.accept().expect("accept");
            let mut buf = [0u8; 8192];
            let mut request = String::new();
            loop {
                let n = stream.read(&mut buf).expect("read request");
                request.push_str(&String::from_utf8_lossy(&buf[..n]));
                if n == 0 || request.contains("\r\n\r\n") {
                    break;
                }
            }
            let target = request
                .lines()
                .next()
                .and_then(|line| line.split_whitespace().nth(1))
                .unwrap_or("/")
                .to_string();
            let (status, body) = route(&target);
            let reason = match status {
                200 => "OK",
                404 => "Not Found",
                500 => "Internal Server Error",
                _ => "Status",
            };
            let reply = format!(
                "HTTP/1.1 {status} {reason}\r\n\
                 Content-Type: application/json\r\n\
                 X-RateLimit-Remaining: 41\r\n\
                 Content-Length: {}\r\n\
                 Connection: close\r\n\r\n{}",
                body.len(),
                body
            );
            stream.write_all(reply.as_bytes()).expect("write response");
            targets.push(target);
        }
        targets
    });
    (format!("http://{addr}"), handle)
}

fn page_param(target: &str) -> u32 {
    target
        .split(['?', '&'])
        .find_map(|part| part.strip_prefix("page="))
        .and_then(|num| num.parse().ok())
        .unwrap_or(1)
}

fn issue(number: u64, state: &str) -> serde_json::Value {
    let closed_at =
        if state == "closed" { json!("2024-01-11T00:00:00Z") } else { json!(null) };
    json!({
        "number": number,
        "title": format!("Issue {number}"),
        "state": state,
        "user": {"login": "alice"},
        "labels": [{"name": "bug"}],
        "comments": 2,
        "body": "Some body text",
        "created_at": "2024-01-01T00:00:00Z",
        "closed_at": closed_at,
        "html_url": format!("https://github.com/octo/demo/issues/{number}")
    })
}

fn pull(number: u64) -> serde_json::Value {
    json!({
        "number": number,
        "title": format!("feat: change {number}"),
        "state": "open",
        "user": {"login": "bob"},
        "labels": [],
        "comments": 0,
        "body": "",
        "draft": false,
        "created_at": "2024-02-01T00:00:00Z",
        "closed_at": null,
        "merged_at": null,
        "html_url": format!("https://github.com/octo/demo/pull/{number}")
    })
}

/// Working directory with a settings file pointing at octo/demo, tuned so
/// tests never sleep.
fn settings_dir(extra: &str) -> TempDir {
    let dir = TempDir::new().expect("temp settings dir");
    fs::write(
        dir.path().join("repo-pulse.toml"),
        format!("repo = \"octo/demo\"\nthrottle_ms = 0\nretry_backoff_ms = 0\n{extra}"),
    )
    .expect("write settings");
    dir
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("repo-pulse"));
    cmd.arg("--version");
    cmd.assert().success().stdout(predicate::str::contains("repo-pulse"));
}

#[test]
fn test_cli_help() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("repo-pulse"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("GitHub repository activity"))
        .stdout(predicate::str::contains("issues"))
        .stdout(predicate::str::contains("pulls"))
        .stdout(predicate::str::contains("summary"))
        .stdout(predicate::str::contains("values"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_issues_requires_a_repo() {
    let empty = TempDir::new().expect("temp cwd");
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("repo-pulse"));
    cmd.arg("issues");
    cmd.current_dir(empty.path());
    cmd.env_remove("GITHUB_TOKEN").env_remove("GITHUB_API_URL");
    cmd.assert().failure().stderr(predicate::str::contains("No repository given"));
}

#[test]
fn test_rejects_invalid_repo_slug() {
    let empty = TempDir::new().expect("temp cwd");
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("repo-pulse"));
    cmd.args(["issues", "not-a-slug"]);
    cmd.current_dir(empty.path());
    cmd.env_remove("GITHUB_TOKEN").env_remove("GITHUB_API_URL");
    cmd.assert().failure().stderr(predicate::str::contains("Invalid repository"));
}

#[test]
fn test_rejects_unknown_format() {
    let empty = TempDir::new().expect("temp cwd");
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("repo-pulse"));
    cmd.args(["issues", "octo/demo", "--format", "xml"]);
    cmd.current_dir(empty.path());
    cmd.env_remove("GITHUB_TOKEN").env_remove("GITHUB_API_URL");
    cmd.assert().failure().stderr(predicate::str::contains("invalid format"));
}

#[test]
fn test_issues_end_to_end_against_mock_api() {
    let (url, handle) = serve_api(3, |target| {
        let body = match page_param(target) {
            1 => json!([issue(1, "open"), issue(2, "closed"), issue(3, "open")]),
            2 => json!([issue(4, "open"), issue(5, "closed"), issue(6, "open")]),
            _ => json!([issue(7, "closed")]),
        };
        (200, body.to_string())
    });

    let dir = settings_dir("page_size = 3\n");
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("repo-pulse"));
    cmd.args(["issues", "--api-url", &url]);
    cmd.current_dir(dir.path());
    cmd.env_remove("GITHUB_TOKEN").env_remove("GITHUB_API_URL");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Repository: octo/demo"))
        .stdout(predicate::str::contains("Analysis: issues"))
        .stdout(predicate::str::contains("Pages fetched: 3"))
        .stdout(predicate::str::contains("API quota remaining: 41"))
        .stdout(predicate::str::contains("issues analyzed: 7"))
        .stdout(predicate::str::contains("open: 4"))
        .stdout(predicate::str::contains("closed: 3"))
        .stdout(predicate::str::contains("average days to close: 10.0"))
        .stdout(predicate::str::contains("bug: 7"));

    let targets = handle.join().expect("server thread");
    assert_eq!(targets.len(), 3);
    assert!(targets[0].starts_with("/repos/octo/demo/issues?"));
    assert!(targets[0].contains("state=all"));
    assert!(targets[0].contains("per_page=3"));
    assert!(targets[0].contains("page=1"));
    assert!(targets[2].contains("page=3"));
}

#[test]
fn test_issues_salvages_partial_results_on_server_errors() {
    let (url, handle) = serve_api(2, |target| match page_param(target) {
        1 => (200, json!([issue(1, "open"), issue(2, "open")]).to_string()),
        _ => (500, "boom".to_string()),
    });

    let dir = settings_dir("page_size = 2\nretry_attempts = 1\n");
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("repo-pulse"));
    cmd.args(["issues", "--api-url", &url]);
    cmd.current_dir(dir.path());
    cmd.env_remove("GITHUB_TOKEN").env_remove("GITHUB_API_URL");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Partial results"))
        .stdout(predicate::str::contains("Pages fetched: 1"))
        .stdout(predicate::str::contains("issues analyzed: 2"))
        .stderr(predicate::str::contains("reporting on partial data"));

    let targets = handle.join().expect("server thread");
    assert_eq!(targets.len(), 2);
}

#[test]
fn test_markdown_report_written_to_file() {
    let (url, handle) = serve_api(1, |_| (200, json!([issue(1, "open")]).to_string()));

    let dir = settings_dir("");
    let report_path = dir.path().join("report.md");
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("repo-pulse"));
    cmd.args([
        "issues",
        "--api-url",
        &url,
        "--format",
        "markdown",
        "--output",
        report_path.to_str().expect("utf8 path"),
    ]);
    cmd.current_dir(dir.path());
    cmd.env_remove("GITHUB_TOKEN").env_remove("GITHUB_API_URL");
    cmd.assert().success().stdout(predicate::str::contains("Wrote "));

    let report = fs::read_to_string(&report_path).expect("read report");
    assert!(report.starts_with("# Issues report for octo/demo"));
    assert!(report.contains("| [1]("));
    handle.join().expect("server thread");
}

#[test]
fn test_json_report_omits_timestamp_when_asked() {
    let (url, handle) = serve_api(1, |_| (200, json!([issue(1, "open")]).to_string()));

    let dir = settings_dir("");
    let report_path = dir.path().join("report.json");
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("repo-pulse"));
    cmd.args([
        "issues",
        "--api-url",
        &url,
        "--format",
        "json",
        "--no-timestamp",
        "--output",
        report_path.to_str().expect("utf8 path"),
    ]);
    cmd.current_dir(dir.path());
    cmd.env_remove("GITHUB_TOKEN").env_remove("GITHUB_API_URL");
    cmd.assert().success();

    let doc: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).expect("read report"))
            .expect("parse report json");
    assert_eq!(doc.get("schema_version").and_then(|v| v.as_str()), Some("1.0.0"));
    assert!(doc.get("generated_at").is_none());
    assert_eq!(doc.get("kind").and_then(|v| v.as_str()), Some("issues"));
    assert_eq!(doc.get("repo").and_then(|v| v.as_str()), Some("octo/demo"));
    assert_eq!(doc["items"][0]["number"], 1);
    handle.join().expect("server thread");
}

#[test]
fn test_summary_fetches_both_endpoints() {
    let (url, handle) = serve_api(2, |target| {
        if target.starts_with("/repos/octo/demo/pulls") {
            (200, json!([pull(10)]).to_string())
        } else {
            (200, json!([issue(1, "open"), issue(2, "closed")]).to_string())
        }
    });

    let dir = settings_dir("");
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("repo-pulse"));
    cmd.args(["summary", "--api-url", &url]);
    cmd.current_dir(dir.path());
    cmd.env_remove("GITHUB_TOKEN").env_remove("GITHUB_API_URL");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Summary for octo/demo"))
        .stdout(predicate::str::contains("Analysis: issues"))
        .stdout(predicate::str::contains("issues analyzed: 2"))
        .stdout(predicate::str::contains("Analysis: pulls"))
        .stdout(predicate::str::contains("pull requests analyzed: 1"));

    let targets = handle.join().expect("server thread");
    assert_eq!(targets.len(), 2);
    let issues_seen = targets.iter().filter(|t| t.contains("/issues")).count();
    let pulls_seen = targets.iter().filter(|t| t.contains("/pulls")).count();
    assert_eq!((issues_seen, pulls_seen), (1, 1));
}

#[test]
fn test_summary_json_carries_both_reports() {
    let (url, handle) = serve_api(2, |target| {
        if target.starts_with("/repos/octo/demo/pulls") {
            (200, json!([pull(10)]).to_string())
        } else {
            (200, json!([issue(1, "open")]).to_string())
        }
    });

    let dir = settings_dir("");
    let out_path = dir.path().join("summary.json");
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("repo-pulse"));
    cmd.args([
        "summary",
        "--api-url",
        &url,
        "--format",
        "json",
        "--no-timestamp",
        "--output",
        out_path.to_str().expect("utf8 path"),
    ]);
    cmd.current_dir(dir.path());
    cmd.env_remove("GITHUB_TOKEN").env_remove("GITHUB_API_URL");
    cmd.assert().success();

    let doc: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out_path).expect("read summary"))
            .expect("parse summary json");
    assert_eq!(doc.get("repo").and_then(|v| v.as_str()), Some("octo/demo"));
    assert!(doc.get("generated_at").is_none());
    assert_eq!(doc["issues"]["kind"], "issues");
    assert_eq!(doc["pulls"]["kind"], "pulls");
    handle.join().expect("server thread");
}

fn write_values_fixture(dir: &TempDir) {
    fs::write(
        dir.path().join("values.yaml"),
        "app:\n  name: demo\n  replicas: 1\nimage:\n  repository: ghcr.io/octo/demo\n  tag: latest\nfeatures: [alpha, beta]\n",
    )
    .expect("write base layer");
    fs::create_dir_all(dir.path().join("versions/2.0")).expect("mkdir versions");
    fs::write(
        dir.path().join("versions/2.0/values.yaml"),
        "image:\n  tag: 2.0.1\nfeatures: [gamma]\n",
    )
    .expect("write version layer");
    fs::create_dir_all(dir.path().join("environments/prod")).expect("mkdir environments");
    fs::write(
        dir.path().join("environments/prod/values.yaml"),
        "app:\n  replicas: 5\ndebug: false\n",
    )
    .expect("write environment layer");
}

#[test]
fn test_values_merges_three_layers() {
    let dir = TempDir::new().expect("temp values dir");
    write_values_fixture(&dir);

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("repo-pulse"));
    cmd.args([
        "values",
        "--dir",
        dir.path().to_str().expect("utf8 path"),
        "--version",
        "2.0",
        "--env",
        "prod",
    ]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("name: demo"))
        .stdout(predicate::str::contains("replicas: 5"))
        .stdout(predicate::str::contains("tag: 2.0.1"))
        .stdout(predicate::str::contains("- gamma"))
        .stdout(predicate::str::contains("debug: false"))
        // Lists replace wholesale; nothing from the base list survives.
        .stdout(predicate::str::contains("alpha").not());
}

#[test]
fn test_values_get_prints_bare_scalars() {
    let dir = TempDir::new().expect("temp values dir");
    write_values_fixture(&dir);

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("repo-pulse"));
    cmd.args([
        "values",
        "--dir",
        dir.path().to_str().expect("utf8 path"),
        "--version",
        "2.0",
        "--get",
        "image.tag",
    ]);
    cmd.assert().success().stdout("2.0.1\n");

    let mut replicas_cmd = Command::new(assert_cmd::cargo::cargo_bin!("repo-pulse"));
    replicas_cmd.args([
        "values",
        "--dir",
        dir.path().to_str().expect("utf8 path"),
        "--get",
        "app.replicas",
    ]);
    replicas_cmd.assert().success().stdout("1\n");
}

#[test]
fn test_values_get_falls_back_to_default() {
    let dir = TempDir::new().expect("temp values dir");
    write_values_fixture(&dir);

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("repo-pulse"));
    cmd.args([
        "values",
        "--dir",
        dir.path().to_str().expect("utf8 path"),
        "--get",
        "service.port",
        "--default",
        "8080",
    ]);
    cmd.assert().success().stdout("8080\n");

    let mut missing_cmd = Command::new(assert_cmd::cargo::cargo_bin!("repo-pulse"));
    missing_cmd.args([
        "values",
        "--dir",
        dir.path().to_str().expect("utf8 path"),
        "--get",
        "service.port",
    ]);
    missing_cmd.assert().failure().stderr(predicate::str::contains("No value at"));
}

#[test]
fn test_values_json_output() {
    let dir = TempDir::new().expect("temp values dir");
    write_values_fixture(&dir);

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("repo-pulse"));
    cmd.args([
        "values",
        "--dir",
        dir.path().to_str().expect("utf8 path"),
        "--env",
        "prod",
        "--format",
        "json",
    ]);
    let output = cmd.assert().success().get_output().stdout.clone();
    let doc: serde_json::Value =
        serde_json::from_slice(&output).expect("parse values json");
    assert_eq!(doc["app"]["replicas"], 5);
    assert_eq!(doc["image"]["tag"], "latest");
    assert_eq!(doc["debug"], false);
}

#[test]
fn test_values_reports_malformed_yaml() {
    let dir = TempDir::new().expect("temp values dir");
    fs::write(dir.path().join("values.yaml"), "app: [unclosed\n").expect("write broken layer");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("repo-pulse"));
    cmd.args(["values", "--dir", dir.path().to_str().expect("utf8 path")]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid YAML"))
        .stderr(predicate::str::contains("values.yaml"));
}

#[test]
fn test_completions_generate_bash() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("repo-pulse"));
    cmd.args(["completions", "bash"]);
    cmd.assert().success().stdout(predicate::str::contains("repo-pulse"));
}

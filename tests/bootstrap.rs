#![cfg(feature = "cli")]

use std::process::{Command, Output};

use httptest::{matchers::*, responders::*, Expectation, Server};

fn vespa(args: &[&str]) -> Output {
    let home = tempfile::tempdir().unwrap();
    Command::new(env!("CARGO_BIN_EXE_vespa"))
        .args(args)
        .env("VESPA_CLI_HOME", home.path())
        .output()
        .unwrap()
}

#[test]
fn test_success_exits_zero() {
    let output = vespa(&["version"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(String::from_utf8(output.stdout).unwrap(), format!("vespa version {}\n", env!("CARGO_PKG_VERSION")));
    assert!(output.stderr.is_empty());
}

#[test]
fn test_usage_error_exits_two() {
    let output = vespa(&["frobnicate"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8(output.stderr).unwrap().contains("frobnicate"));
}

#[test]
fn test_no_arguments_prints_help() {
    let output = vespa(&[]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8(output.stderr).unwrap().contains("Usage: vespa"));
}

#[test]
fn test_failure_exits_one() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let target = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let output = vespa(&["status", "--target", &target, "--color", "never"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8(output.stderr).unwrap().contains("Error: Container (query API) at"));
}

#[test]
fn test_output_is_only_from_command() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/ApplicationStatus"))
            .times(2)
            .respond_with(status_code(200)),
    );
    let target = server.url_str("/");

    let output = vespa(&["status", "--target", &target, "--color", "never"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        format!("Success: Container (query API) at {} is ready\n", target.trim_end_matches('/'))
    );
    assert!(output.stderr.is_empty());

    let output = vespa(&["status", "--target", &target, "--quiet"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(output.stdout.is_empty());
    assert!(output.stderr.is_empty());
}

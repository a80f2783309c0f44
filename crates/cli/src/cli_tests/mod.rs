// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use super::*;
use yare::parameterized;

fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
    Cli::try_parse_from(args)
}

#[test]
fn test_post_defaults() {
    let cli = parse(&["outbox", "post", "https://api.test/todos"]).unwrap();
    match cli.command {
        Command::Post(args) => {
            assert_eq!(args.url, "https://api.test/todos");
            assert_eq!(args.data, "{}");
            assert!(args.params.is_empty());
        }
        _ => panic!("Expected Post command"),
    }
    assert!(!cli.offline);
    assert_eq!(cli.state_dir, None);
}

#[test]
fn test_put_with_data_and_params() {
    let cli = parse(&[
        "outbox",
        "put",
        "https://api.test/todos/1",
        "-d",
        r#"{"done":true}"#,
        "-p",
        "userId=2323",
        "--param",
        "q=a=b",
    ])
    .unwrap();
    match cli.command {
        Command::Put(args) => {
            assert_eq!(args.data, r#"{"done":true}"#);
            assert_eq!(
                args.params,
                vec![
                    ("userId".to_string(), "2323".to_string()),
                    ("q".to_string(), "a=b".to_string()),
                ]
            );
        }
        _ => panic!("Expected Put command"),
    }
}

#[test]
fn test_param_with_empty_value() {
    let cli = parse(&["outbox", "post", "https://api.test", "-p", "flag="]).unwrap();
    match cli.command {
        Command::Post(args) => {
            assert_eq!(args.params, vec![("flag".to_string(), String::new())]);
        }
        _ => panic!("Expected Post command"),
    }
}

#[parameterized(
    missing_equals = { "userId" },
    empty_key = { "=2323" },
)]
fn test_invalid_param_rejected(param: &str) {
    assert!(parse(&["outbox", "post", "https://api.test", "-p", param]).is_err());
}

#[test]
fn test_post_requires_url() {
    assert!(parse(&["outbox", "post"]).is_err());
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = parse(&["outbox", "sync", "--offline", "--state-dir", "/tmp/q"]).unwrap();
    assert!(matches!(cli.command, Command::Sync));
    assert!(cli.offline);
    assert_eq!(cli.state_dir, Some(PathBuf::from("/tmp/q")));
}

#[parameterized(
    default = { &["outbox", "status"], OutputFormat::Text },
    text = { &["outbox", "status", "-o", "text"], OutputFormat::Text },
    json = { &["outbox", "status", "--output", "json"], OutputFormat::Json },
)]
fn test_status_output(args: &[&str], expected: OutputFormat) {
    match parse(args).unwrap().command {
        Command::Status { output } => assert_eq!(output, expected),
        _ => panic!("Expected Status command"),
    }
}

#[test]
fn test_status_rejects_unknown_output() {
    assert!(parse(&["outbox", "status", "-o", "yaml"]).is_err());
}

#[test]
fn test_watch_probe() {
    let cli = parse(&["outbox", "watch", "--probe", "127.0.0.1:443"]).unwrap();
    assert!(cli.command.is_watch());
    match cli.command {
        Command::Watch { probe } => assert_eq!(probe.as_deref(), Some("127.0.0.1:443")),
        _ => panic!("Expected Watch command"),
    }
}

#[test]
fn test_only_watch_is_watch() {
    assert!(!parse(&["outbox", "sync"]).unwrap().command.is_watch());
    assert!(parse(&["outbox", "watch"]).unwrap().command.is_watch());
}

#[test]
fn test_completions_shell() {
    let cli = parse(&["outbox", "completions", "bash"]).unwrap();
    assert!(matches!(
        cli.command,
        Command::Completions {
            shell: clap_complete::Shell::Bash
        }
    ));
}

#[test]
fn test_cli_definition_is_valid() {
    use clap::CommandFactory;
    Cli::command().debug_assert();
}

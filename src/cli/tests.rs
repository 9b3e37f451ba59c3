// devops-backup: Azure DevOps to SharePoint backup job
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::cli::{Cli, Command};
use crate::logging::LogLevel;
use clap::Parser;
use std::path::PathBuf;

#[test]
fn test_parse_commands() {
    for (arg, expected) in [
        ("run", Command::Run),
        ("options", Command::Options),
        ("version", Command::Version),
    ] {
        let cli = Cli::try_parse_from(["devops-backup", arg]).unwrap();
        assert_eq!(cli.command, Some(expected));
    }
}

#[test]
fn test_no_command_parses() {
    let cli = Cli::try_parse_from(["devops-backup"]).unwrap();
    assert_eq!(cli.command, None);
}

#[test]
fn test_parse_global_options() {
    let cli = Cli::try_parse_from([
        "devops-backup",
        "-l",
        "4",
        "--file-log-level",
        "5",
        "--log-file",
        "/var/log/backup.log",
        "--config",
        "/etc/devops-backup.toml",
        "--json",
        "run",
    ])
    .unwrap();

    assert_eq!(cli.global.log_level, Some(4));
    assert_eq!(cli.global.file_log_level, Some(5));
    assert_eq!(
        cli.global.config,
        Some(PathBuf::from("/etc/devops-backup.toml"))
    );
    assert!(cli.global.json);

    let log = cli.global.log_config();
    assert_eq!(log.console_level(), LogLevel::DEBUG);
    assert_eq!(log.file_level(), LogLevel::TRACE);
    assert_eq!(log.log_file(), Some("/var/log/backup.log"));
    assert!(log.json_console());
}

#[test]
fn test_global_options_after_command() {
    let cli = Cli::try_parse_from(["devops-backup", "run", "--log-level", "1"]).unwrap();
    assert_eq!(cli.command, Some(Command::Run));
    assert_eq!(cli.global.log_level, Some(1));
}

#[test]
fn test_file_level_defaults_to_console_level() {
    let cli = Cli::try_parse_from(["devops-backup", "-l", "2", "run"]).unwrap();
    let log = cli.global.log_config();
    assert_eq!(log.file_level(), LogLevel::WARN);
    assert_eq!(log.log_file(), None);
}

#[test]
fn test_log_level_out_of_range() {
    let err = Cli::try_parse_from(["devops-backup", "-l", "7", "run"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
}

#[test]
fn test_unknown_command() {
    assert!(Cli::try_parse_from(["devops-backup", "build"]).is_err());
}

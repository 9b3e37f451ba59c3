// devops-backup: Azure DevOps to SharePoint backup job
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{BackupError, BackupResult, ConfigError, GitError, NetworkError, SharePointError};

#[test]
fn test_config_error_display() {
    let err = ConfigError::MissingKey {
        env: "DEVOPS_PAT".to_string(),
        key: "devops.pat".to_string(),
    };
    insta::assert_snapshot!(
        err.to_string(),
        @"missing required setting 'DEVOPS_PAT' (config key 'devops.pat')"
    );
}

#[test]
fn test_boxed_conversion_display() {
    let err: BackupError = NetworkError::HttpError {
        status: 404,
        url: "https://dev.azure.com/org/_apis/projects".to_string(),
    }
    .into();
    insta::assert_snapshot!(
        err.to_string(),
        @"network error: http error 404: https://dev.azure.com/org/_apis/projects"
    );

    let err: BackupError = GitError::CommandFailed {
        command: "git fetch --prune origin".to_string(),
        message: "fatal: repository not found".to_string(),
    }
    .into();
    assert!(matches!(err, BackupError::Git(_)));
}

#[test]
fn test_sharepoint_error_display() {
    let err: BackupError = SharePointError::RequestFailed {
        operation: "Files/add".to_string(),
        status: 403,
        message: "Access denied".to_string(),
    }
    .into();
    insta::assert_snapshot!(err.to_string(), @"sharepoint error: request 'Files/add' failed with status 403: Access denied");
}

#[test]
fn test_backup_error_size() {
    // Every variant holds a thin Box.
    let size = std::mem::size_of::<BackupError>();
    assert!(size <= 24, "BackupError is {size} bytes, expected <= 24");
}

#[test]
fn test_backup_result_size() {
    let size = std::mem::size_of::<BackupResult<()>>();
    assert!(size <= 24, "BackupResult<()> is {size} bytes, expected <= 24");
}

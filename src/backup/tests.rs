// devops-backup: Azure DevOps to SharePoint backup job
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use mockall::Sequence;
use mockall::predicate::eq;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use super::traits::{MockArchiveStore, MockMirrorSync, MockRemoteCatalog, MockRemoteUploader};
use super::*;
use crate::error::{ArchiveError, BackupError, GitError, NetworkError, SharePointError};

const REMOTE_ROOT: &str = "Shared Documents/Backup";

type TestPipeline =
    Pipeline<MockRemoteCatalog, MockMirrorSync, MockArchiveStore, MockRemoteUploader>;

fn pipeline(
    catalog: MockRemoteCatalog,
    mirror: MockMirrorSync,
    archiver: MockArchiveStore,
    uploader: MockRemoteUploader,
) -> TestPipeline {
    Pipeline::builder()
        .catalog(catalog)
        .mirror(mirror)
        .archiver(archiver)
        .uploader(uploader)
        .clone_root("/clone")
        .archive_root("/archive")
        .remote_root(REMOTE_ROOT)
        .build()
}

fn items(names: &[&str]) -> Vec<RepoItem> {
    names
        .iter()
        .map(|name| RepoItem::new(*name, format!("https://dev.azure.com/org/_git/{name}")))
        .collect()
}

fn catalog(projects: &[&str], repos: &[&str], wikis: &[&str]) -> MockRemoteCatalog {
    let projects: BTreeSet<String> = projects.iter().map(ToString::to_string).collect();
    let repos = items(repos);
    let wikis = items(wikis);

    let mut catalog = MockRemoteCatalog::new();
    catalog
        .expect_list_projects()
        .times(1)
        .return_once(move || Ok(projects));
    catalog
        .expect_list_repos()
        .returning(move |_| Ok(repos.clone()));
    catalog
        .expect_list_wikis()
        .returning(move |_| Ok(wikis.clone()));
    catalog
}

fn mirror_always(changed: bool) -> MockMirrorSync {
    let mut mirror = MockMirrorSync::new();
    mirror.expect_sync().returning(move |_, _| Ok(changed));
    mirror
}

fn staged(files: &[(&str, &str)]) -> ArchivePaths {
    let mut paths = ArchivePaths::default();
    for (dir, name) in files {
        paths.dirs.insert((*dir).to_string());
        paths.files.insert(ArchiveFile {
            relative_dir: (*dir).to_string(),
            path: Path::new("/archive").join(dir).join(name),
        });
    }
    paths
}

fn git_failure() -> BackupError {
    GitError::CommandFailed {
        command: "git fetch --prune origin".to_string(),
        message: "fatal: Authentication failed".to_string(),
    }
    .into()
}

// --- Types ---

#[test]
fn test_change_key_display() {
    let key = ChangeKey::new("Platform", RepoKind::Wiki, "Platform.wiki");
    insta::assert_snapshot!(key.to_string(), @"Platform/wiki/Platform.wiki");
}

#[test]
fn test_change_key_paths() {
    let key = ChangeKey::new("Platform", RepoKind::Wiki, "Platform.wiki");
    assert_eq!(
        key.mirror_path(Path::new("/clone")),
        PathBuf::from("/clone/Platform/wiki/Platform.wiki")
    );
    assert_eq!(
        key.archive_path(Path::new("/archive")),
        PathBuf::from("/archive/Platform/wiki/Platform.wiki.zip")
    );
}

#[test]
fn test_change_set_has_set_semantics() {
    let mut changes = ChangeSet::new();
    assert!(changes.insert(ChangeKey::new("p", RepoKind::Git, "r")));
    assert!(!changes.insert(ChangeKey::new("p", RepoKind::Git, "r")));
    assert!(changes.insert(ChangeKey::new("p", RepoKind::Wiki, "r")));
    assert_eq!(changes.len(), 2);
}

#[test]
fn test_run_status_exit_codes() {
    assert_eq!(RunStatus::Success.exit_code(), 0);
    assert_eq!(RunStatus::PartialFailure { failed: 3 }.exit_code(), 1);
}

// --- Sync phase ---

#[tokio::test]
async fn test_empty_project_list_has_no_side_effects() {
    let mut archiver = MockArchiveStore::new();
    archiver
        .expect_discover()
        .times(1)
        .returning(|_| Ok(ArchivePaths::default()));
    archiver.expect_clean().times(1).returning(|_| Ok(()));

    let report = pipeline(
        catalog(&[], &["never"], &["never"]),
        MockMirrorSync::new(),
        archiver,
        MockRemoteUploader::new(),
    )
    .run()
    .await
    .unwrap();

    assert!(report.sync.items().is_empty());
    assert!(report.sync.change_set().is_empty());
    assert_eq!(report.archived, 0);
    assert_eq!(report.uploaded, 0);
    assert_eq!(report.status(), RunStatus::Success);
}

#[tokio::test]
async fn test_every_item_changed_fills_change_set() {
    let mut mirror = MockMirrorSync::new();
    mirror.expect_sync().times(8).returning(|_, _| Ok(true));

    let report = pipeline(
        catalog(&["alpha", "beta"], &["api", "web"], &["alpha.wiki", "docs"]),
        mirror,
        MockArchiveStore::new(),
        MockRemoteUploader::new(),
    )
    .sync_data()
    .await
    .unwrap();

    let changes = report.change_set();
    assert_eq!(changes.len(), 8);
    assert!(changes.contains(&ChangeKey::new("beta", RepoKind::Wiki, "docs")));
    assert!(changes.contains(&ChangeKey::new("alpha", RepoKind::Git, "web")));
}

#[tokio::test]
async fn test_sync_visits_repos_then_wikis_per_project() {
    let mut seq = Sequence::new();
    let mut mirror = MockMirrorSync::new();
    for path in [
        "/clone/a/git/r",
        "/clone/a/wiki/w",
        "/clone/b/git/r",
        "/clone/b/wiki/w",
    ] {
        mirror
            .expect_sync()
            .withf(move |_, local| local == Path::new(path))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(false));
    }

    pipeline(
        catalog(&["b", "a"], &["r"], &["w"]),
        mirror,
        MockArchiveStore::new(),
        MockRemoteUploader::new(),
    )
    .sync_data()
    .await
    .unwrap();
}

#[tokio::test]
async fn test_sync_passes_remote_url_to_mirror() {
    let mut mirror = MockMirrorSync::new();
    mirror
        .expect_sync()
        .withf(|url, local| {
            url == "https://dev.azure.com/org/_git/api" && local == Path::new("/clone/p/git/api")
        })
        .times(1)
        .returning(|_, _| Ok(true));

    pipeline(
        catalog(&["p"], &["api"], &[]),
        mirror,
        MockArchiveStore::new(),
        MockRemoteUploader::new(),
    )
    .sync_data()
    .await
    .unwrap();
}

#[tokio::test]
async fn test_item_failure_is_isolated() {
    let mut mirror = MockMirrorSync::new();
    mirror
        .expect_sync()
        .times(6)
        .returning(|_, local| {
            if local == Path::new("/clone/first/git/broken") {
                Err(git_failure())
            } else {
                Ok(true)
            }
        });

    let report = pipeline(
        catalog(&["first", "second"], &["broken", "fine"], &["wiki"]),
        mirror,
        MockArchiveStore::new(),
        MockRemoteUploader::new(),
    )
    .sync_data()
    .await
    .unwrap();

    assert_eq!(report.items().len(), 6);
    let failed: Vec<_> = report.failures().map(|item| item.key.to_string()).collect();
    assert_eq!(failed, vec!["first/git/broken"]);

    let changes = report.change_set();
    assert_eq!(changes.len(), 5);
    assert!(!changes.contains(&ChangeKey::new("first", RepoKind::Git, "broken")));
    assert!(changes.contains(&ChangeKey::new("first", RepoKind::Git, "fine")));
    assert!(changes.contains(&ChangeKey::new("second", RepoKind::Git, "broken")));
}

#[tokio::test]
async fn test_item_failure_keeps_reason() {
    let mut mirror = MockMirrorSync::new();
    mirror.expect_sync().returning(|_, _| Err(git_failure()));

    let report = pipeline(
        catalog(&["p"], &["r"], &[]),
        mirror,
        MockArchiveStore::new(),
        MockRemoteUploader::new(),
    )
    .sync_data()
    .await
    .unwrap();

    let ItemOutcome::Failed(reason) = &report.items()[0].outcome else {
        panic!("expected failure, got {:?}", report.items()[0].outcome);
    };
    assert!(reason.contains("Authentication failed"), "{reason}");
}

#[tokio::test]
async fn test_failed_item_makes_run_partial_failure() {
    let mut mirror = MockMirrorSync::new();
    mirror.expect_sync().returning(|_, local| {
        if local.ends_with("bad") {
            Err(git_failure())
        } else {
            Ok(true)
        }
    });

    let mut archiver = MockArchiveStore::new();
    archiver
        .expect_create_archive()
        .withf(|source, archive| {
            source == Path::new("/clone/p/git/good")
                && archive == Path::new("/archive/p/git/good.zip")
        })
        .times(1)
        .returning(|_, _| Ok(()));
    archiver
        .expect_discover()
        .times(1)
        .returning(|_| Ok(staged(&[("p/git", "good.zip")])));
    archiver.expect_clean().times(1).returning(|_| Ok(()));

    let mut uploader = MockRemoteUploader::new();
    uploader
        .expect_ensure_folder()
        .times(1)
        .returning(|_, _| Ok(()));
    uploader
        .expect_upload_file()
        .times(1)
        .returning(|_, _, _| Ok(()));

    let report = pipeline(catalog(&["p"], &["bad", "good"], &[]), mirror, archiver, uploader)
        .run()
        .await
        .unwrap();

    assert_eq!(report.status(), RunStatus::PartialFailure { failed: 1 });
    assert_eq!(report.status().exit_code(), 1);
    assert_eq!(report.archived, 1);
    assert_eq!(report.uploaded, 1);
}

#[tokio::test]
async fn test_enumeration_error_is_fatal() {
    let mut catalog = MockRemoteCatalog::new();
    catalog
        .expect_list_projects()
        .returning(|| Ok(BTreeSet::from(["p".to_string()])));
    catalog.expect_list_repos().returning(|_| {
        Err(NetworkError::HttpError {
            status: 401,
            url: "https://dev.azure.com/org/p/_apis/git/repositories".to_string(),
        }
        .into())
    });

    let err = pipeline(
        catalog,
        MockMirrorSync::new(),
        MockArchiveStore::new(),
        MockRemoteUploader::new(),
    )
    .run()
    .await
    .unwrap_err();

    assert!(matches!(err, BackupError::Network(_)), "{err}");
}

#[tokio::test]
async fn test_unchanged_remotes_report_no_changes() {
    let report = pipeline(
        catalog(&["a", "b"], &["r1", "r2"], &["w"]),
        mirror_always(false),
        MockArchiveStore::new(),
        MockRemoteUploader::new(),
    )
    .sync_data()
    .await
    .unwrap();

    assert_eq!(report.items().len(), 6);
    assert!(
        report
            .items()
            .iter()
            .all(|item| item.outcome == ItemOutcome::Unchanged)
    );
    assert!(report.change_set().is_empty());
}

// --- Archive phase ---

#[test]
fn test_archive_with_empty_change_set_does_nothing() {
    let archived = pipeline(
        MockRemoteCatalog::new(),
        MockMirrorSync::new(),
        MockArchiveStore::new(),
        MockRemoteUploader::new(),
    )
    .archive_changes(&ChangeSet::new())
    .unwrap();

    assert_eq!(archived, 0);
}

#[test]
fn test_archive_once_per_change_key() {
    let changes: ChangeSet = [
        ChangeKey::new("p", RepoKind::Git, "api"),
        ChangeKey::new("p", RepoKind::Wiki, "p.wiki"),
        ChangeKey::new("q", RepoKind::Git, "api"),
    ]
    .into_iter()
    .collect();

    let mut archiver = MockArchiveStore::new();
    for (source, archive) in [
        ("/clone/p/git/api", "/archive/p/git/api.zip"),
        ("/clone/p/wiki/p.wiki", "/archive/p/wiki/p.wiki.zip"),
        ("/clone/q/git/api", "/archive/q/git/api.zip"),
    ] {
        archiver
            .expect_create_archive()
            .with(eq(PathBuf::from(source)), eq(PathBuf::from(archive)))
            .times(1)
            .returning(|_, _| Ok(()));
    }

    let archived = pipeline(
        MockRemoteCatalog::new(),
        MockMirrorSync::new(),
        archiver,
        MockRemoteUploader::new(),
    )
    .archive_changes(&changes)
    .unwrap();

    assert_eq!(archived, 3);
}

#[tokio::test]
async fn test_archive_error_aborts_run() {
    let mut archiver = MockArchiveStore::new();
    archiver.expect_create_archive().times(1).returning(|source, _| {
        Err(ArchiveError::SourceNotFound(source.display().to_string()).into())
    });

    let err = pipeline(
        catalog(&["p"], &["a", "b"], &[]),
        mirror_always(true),
        archiver,
        MockRemoteUploader::new(),
    )
    .run()
    .await
    .unwrap_err();

    assert!(matches!(err, BackupError::Archive(_)), "{err}");
}

// --- Upload phase ---

#[tokio::test]
async fn test_upload_with_nothing_staged_only_cleans() {
    let mut archiver = MockArchiveStore::new();
    archiver
        .expect_discover()
        .with(eq(PathBuf::from("/archive")))
        .times(1)
        .returning(|_| Ok(ArchivePaths::default()));
    archiver
        .expect_clean()
        .with(eq(PathBuf::from("/archive")))
        .times(1)
        .returning(|_| Ok(()));

    let uploaded = pipeline(
        MockRemoteCatalog::new(),
        MockMirrorSync::new(),
        archiver,
        MockRemoteUploader::new(),
    )
    .upload_changes()
    .await
    .unwrap();

    assert_eq!(uploaded, 0);
}

#[tokio::test]
async fn test_upload_ensures_each_dir_and_uploads_each_file() {
    let paths = staged(&[
        ("p/git", "api.zip"),
        ("p/git", "web.zip"),
        ("p/wiki", "p.wiki.zip"),
        ("q/git", "tools.zip"),
    ]);
    assert_eq!(paths.dirs.len(), 3);

    let mut seq = Sequence::new();
    let mut archiver = MockArchiveStore::new();
    let mut uploader = MockRemoteUploader::new();

    archiver
        .expect_discover()
        .times(1)
        .in_sequence(&mut seq)
        .return_once(move |_| Ok(paths));
    uploader
        .expect_ensure_folder()
        .withf(|root, _| root == REMOTE_ROOT)
        .times(3)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(()));
    uploader
        .expect_upload_file()
        .withf(|root, dir, file| root == REMOTE_ROOT && file.starts_with(Path::new("/archive").join(dir)))
        .times(4)
        .in_sequence(&mut seq)
        .returning(|_, _, _| Ok(()));
    archiver
        .expect_clean()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));

    let uploaded = pipeline(
        MockRemoteCatalog::new(),
        MockMirrorSync::new(),
        archiver,
        uploader,
    )
    .upload_changes()
    .await
    .unwrap();

    assert_eq!(uploaded, 4);
}

#[tokio::test]
async fn test_upload_error_still_cleans_once() {
    let mut archiver = MockArchiveStore::new();
    archiver
        .expect_discover()
        .returning(|_| Ok(staged(&[("p/git", "a.zip"), ("p/git", "b.zip")])));
    archiver.expect_clean().times(1).returning(|_| Ok(()));

    let mut uploader = MockRemoteUploader::new();
    uploader.expect_ensure_folder().returning(|_, _| Ok(()));
    uploader.expect_upload_file().times(1).returning(|_, _, _| {
        Err(SharePointError::RequestFailed {
            operation: "Files/add".to_string(),
            status: 503,
            message: "Service Unavailable".to_string(),
        }
        .into())
    });

    let err = pipeline(
        MockRemoteCatalog::new(),
        MockMirrorSync::new(),
        archiver,
        uploader,
    )
    .upload_changes()
    .await
    .unwrap_err();

    assert!(matches!(err, BackupError::SharePoint(_)), "{err}");
}

#[tokio::test]
async fn test_folder_error_still_cleans_once() {
    let mut archiver = MockArchiveStore::new();
    archiver
        .expect_discover()
        .returning(|_| Ok(staged(&[("p/git", "a.zip")])));
    archiver.expect_clean().times(1).returning(|_| Ok(()));

    let mut uploader = MockRemoteUploader::new();
    uploader.expect_ensure_folder().times(1).returning(|_, dir| {
        Err(SharePointError::RequestFailed {
            operation: format!("folders/add('{dir}')"),
            status: 403,
            message: "Access denied".to_string(),
        }
        .into())
    });

    let result = pipeline(
        MockRemoteCatalog::new(),
        MockMirrorSync::new(),
        archiver,
        uploader,
    )
    .upload_changes()
    .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_upload_error_wins_over_cleanup_error() {
    let mut archiver = MockArchiveStore::new();
    archiver
        .expect_discover()
        .returning(|_| Ok(staged(&[("p/git", "a.zip")])));
    archiver.expect_clean().times(1).returning(|_| {
        Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "locked").into())
    });

    let mut uploader = MockRemoteUploader::new();
    uploader.expect_ensure_folder().returning(|_, _| Ok(()));
    uploader.expect_upload_file().returning(|_, _, _| {
        Err(SharePointError::TokenRequest {
            status: 401,
            message: "invalid_client".to_string(),
        }
        .into())
    });

    let err = pipeline(
        MockRemoteCatalog::new(),
        MockMirrorSync::new(),
        archiver,
        uploader,
    )
    .upload_changes()
    .await
    .unwrap_err();

    assert!(matches!(err, BackupError::SharePoint(_)), "{err}");
}

#[tokio::test]
async fn test_cleanup_error_surfaces_after_successful_upload() {
    let mut archiver = MockArchiveStore::new();
    archiver
        .expect_discover()
        .returning(|_| Ok(ArchivePaths::default()));
    archiver.expect_clean().times(1).returning(|_| {
        Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "locked").into())
    });

    let err = pipeline(
        MockRemoteCatalog::new(),
        MockMirrorSync::new(),
        archiver,
        MockRemoteUploader::new(),
    )
    .upload_changes()
    .await
    .unwrap_err();

    assert!(matches!(err, BackupError::Io(_)), "{err}");
}

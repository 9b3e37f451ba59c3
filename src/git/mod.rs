// devops-backup: Azure DevOps to SharePoint backup job
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git mirror module.
//!
//! ```text
//!          GitMirror (MirrorSync)
//!          /                  \
//!         v                    v
//!   MirrorQuery          MirrorMutation
//!   (gix, read)          (CLI, network)
//!         |                    |
//!         v                    v
//!    GixBackend           ShellBackend
//!    .is_repository       .clone_mirror
//!    .ref_snapshot        .fetch_prune
//!                         .remote_update_prune
//!                              ^
//!                              |
//!                        GitCredentials
//!                   (http.extraHeader via env)
//! ```
//!
//! **`GixBackend`**: pure Rust, no subprocess, read-only.
//! **`ShellBackend`**: git CLI for HTTPS transport and writes.

pub mod backend;
pub mod credentials;
pub mod mirror;


pub use credentials::GitCredentials;
pub use mirror::GitMirror;

// devops-backup: Azure DevOps to SharePoint backup job
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Filesystem utilities with parallel traversal.
//!
//! ```text
//! walk:  parallel_walk()        ignore::WalkParallel (multi-core), sorted
//!        WalkOptions            hidden, ignore files, links, threads
//!        relative_slash_path()  "a/b/c" relative to a root
//! ```

pub mod walk;

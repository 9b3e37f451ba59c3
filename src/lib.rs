// devops-backup: Azure DevOps to SharePoint backup job
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |                 run / options
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          config           |
//!              |    TOML + environment     |
//!              '-------------+-------------'
//!                            v
//!              ,---------------------------,
//!              |    backup::Pipeline       |
//!              |  sync -> archive -> upload|
//!              '--+------+-------+-------+-'
//!                 |      |       |       |
//!                 v      v       v       v
//!              devops   git   archive  sharepoint
//!             REST API  mirror  zip    REST upload
//!
//!   +-----------------------------------------+
//!   |  foundation   error, logging, utility   |
//!   +-----------------------------------------+
//! ```

pub mod archive;
pub mod backup;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod devops;
pub mod error;
pub mod git;
pub mod logging;
pub mod sharepoint;
pub mod utility;

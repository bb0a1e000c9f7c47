//! Framework component installer.
//!
//! Copies named components (files and directory trees) from a framework
//! template into a project, merging directories entry by entry and asking
//! before it replaces any file whose content differs.
//!
//! - **[`config`]**: component registry, built in or loaded from `components.toml`
//! - **[`merge`]**: the recursive tree merge with diffing and conflict resolution
//! - **[`install`]**: drives the merge for each selected component
//! - **[`commands`]**: top-level subcommand orchestration (`install`, `list`, ...)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod install;
pub mod logging;
pub mod merge;

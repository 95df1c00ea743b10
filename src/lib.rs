//! Reset the native platforms and plugins of a Cordova project.
//!
//! Reads the platforms and plugins declared in `package.json`, saves a
//! recovery snapshot, removes everything through the `cordova` CLI, then adds
//! it all back in declared order with each plugin's `--variable` settings.
//!
//! The public API is organised into four layers:
//!
//! - **[`config`]**: settings file, manifest and recovery snapshot
//! - **[`resources`]**: platform and plugin add/remove through the build tool
//! - **[`tasks`]**: the ordered step plan and the run state machine
//! - **[`commands`]**: top-level subcommand orchestration (`reset`, `version`, `completions`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod operations;
pub mod resources;
pub mod tasks;

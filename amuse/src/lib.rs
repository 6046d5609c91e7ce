// Copyright (c) 2024 Amuse Finance

//! Amuse - a command-line service over the AMD token ledger.
//!
//! Configuration lives in a TOML file, ledger state in a JSON file next to
//! it. Every mutating command loads the state, applies one transaction and
//! writes the state back.

// Deny print macros in library code - use tracing instead.
// Commands legitimately write their results to stdout.
#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod commands;
pub mod config;
pub mod logging;
pub mod store;

//! # dmake - Makefile generator for C/C++ trees
//!
//! dmake scans a source tree laid out as a library (`lib/`), a command-line
//! front end (`cli/`) and tests (`test/`), follows every `#include "..."`
//! transitively, and writes a Makefile whose rules list each translation
//! unit's headers. Re-run it whenever includes change.
//!
//! ## Quick Start
//!
//! ```bash
//! # Debug flags
//! dmake
//!
//! # Release flags
//! dmake --release
//!
//! # Show what a file depends on
//! dmake deps lib/tokenize.cpp
//! ```
//!
//! ## Module Organization
//!
//! - [`scan`] - File enumeration, include resolution, dependency collection
//! - [`emit`] - Makefile and qmake fragment writers
//! - [`generate`] - One full generation run
//! - [`config`] - Configuration parsing (`dmake.toml`)

/// Configuration file parsing (`dmake.toml`).
pub mod config;

/// Makefile and project-file writers.
pub mod emit;

/// Errors that abort a generation run.
pub mod error;

/// Generation run orchestration.
pub mod generate;

/// Source scanning and dependency collection.
pub mod scan;

/// Per-file dependency listing.
pub mod tree;

/// Terminal UI utilities (tables, colors).
pub mod ui;

/// Regenerate on file changes.
pub mod watch;

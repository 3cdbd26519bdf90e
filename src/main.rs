//! # dmake CLI Entry Point
//!
//! Parses arguments with clap and routes to the generator. Running `dmake`
//! with no subcommand regenerates the Makefile in the current directory.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use colored::*;
use std::path::PathBuf;

use dmake::generate::{self as generator, GenerateOptions, Summary};
use dmake::tree;
use dmake::ui;
use dmake::watch;

#[cfg(windows)]
#[link(name = "kernel32")]
unsafe extern "system" {
    fn SetConsoleOutputCP(wCodePageID: u32) -> i32;
}

#[cfg(windows)]
fn enable_windows_utf8_console() {
    unsafe {
        SetConsoleOutputCP(65001);
    }
}

#[cfg(not(windows))]
fn enable_windows_utf8_console() {}

#[derive(Parser)]
#[command(name = "dmake")]
#[command(about = "Generate a dependency-aware Makefile for a C/C++ tree", version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Use release compiler flags instead of debug flags
    #[arg(long, global = true)]
    release: bool,
    /// Project root containing the lib/, cli/ and test/ trees
    #[arg(short = 'C', long = "dir", default_value = ".", global = true)]
    dir: PathBuf,
    /// Print the Makefile to stdout instead of writing it
    #[arg(long, global = true)]
    dry_run: bool,
    /// Show every emitted rule
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the Makefile and project fragment (default)
    Generate,
    /// List the headers a file depends on
    Deps {
        /// Path relative to the project root, e.g. lib/token.cpp
        file: String,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Regenerate whenever a source tree changes
    Watch,
    /// Generate shell completion scripts
    Completion { shell: Shell },
}

fn main() -> Result<()> {
    enable_windows_utf8_console();

    let cli = Cli::parse();
    let options = GenerateOptions {
        release: cli.release,
        dry_run: cli.dry_run,
        verbose: cli.verbose,
    };

    match &cli.command {
        None | Some(Commands::Generate) => {
            let summary = generator::generate(&cli.dir, &options)?;
            if !options.dry_run {
                print_summary(&summary, options.release);
            }
            Ok(())
        }
        Some(Commands::Deps { file, json }) => tree::print_deps(&cli.dir, file, *json),
        Some(Commands::Watch) => watch::watch(&cli.dir, &options),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let bin_name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, bin_name, &mut std::io::stdout());
            Ok(())
        }
    }
}

fn print_summary(summary: &Summary, release: bool) {
    let profile = if release { "release" } else { "debug" };
    let mut table = ui::Table::new(&["Tree", "Units", "Headers"]);
    for tree in &summary.trees {
        let units = if tree.units == 0 {
            "0".dimmed().to_string()
        } else {
            tree.units.to_string()
        };
        table.add_row(vec![
            format!("{}/", tree.tree),
            units,
            tree.headers.to_string(),
        ]);
    }
    table.print();

    if let Some(pri) = &summary.project_file {
        println!("   {} Wrote {}", "+".green(), pri.display());
    }
    println!(
        "{} Wrote {} ({} rules, {} flags)",
        "✓".green(),
        summary.makefile.display(),
        summary.rules.len(),
        profile.cyan()
    );
}

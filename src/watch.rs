use crate::config::{CONFIG_FILE, load_config};
use crate::generate::{GenerateOptions, generate};
use anyhow::Result;
use colored::*;
use notify::{Config, RecursiveMode, Watcher};
use std::path::Path;
use std::sync::mpsc::channel;
use std::time::Duration;

/// Regenerates the Makefile whenever a scanned tree changes.
pub fn watch(project_root: &Path, options: &GenerateOptions) -> Result<()> {
    let config = load_config(project_root)?;
    let layout = &config.layout;

    let (tx, rx) = channel();
    let config_notify = Config::default().with_poll_interval(Duration::from_secs(1));
    let mut watcher = notify::RecommendedWatcher::new(tx, config_notify)?;

    let mut watched = Vec::new();
    for tree in [&layout.lib, &layout.cli, &layout.test] {
        let dir = project_root.join(tree);
        if dir.is_dir() {
            watcher.watch(&dir, RecursiveMode::Recursive)?;
            watched.push(format!("{}/", tree));
        }
    }
    let config_path = project_root.join(CONFIG_FILE);
    if config_path.exists() {
        watcher.watch(&config_path, RecursiveMode::NonRecursive)?;
    }
    println!("{} Watching {} for changes...", "👀".cyan(), watched.join(", "));

    regenerate(project_root, options);

    while let Ok(event) = rx.recv() {
        // Debounce
        std::thread::sleep(Duration::from_millis(100));
        while rx.try_recv().is_ok() {}

        // Our own outputs land inside the library tree.
        if let Ok(event) = event
            && event.paths.iter().all(|p| is_generated(p, &config.output.makefile))
        {
            continue;
        }
        regenerate(project_root, options);
    }
    Ok(())
}

fn is_generated(path: &Path, makefile: &str) -> bool {
    path.extension().is_some_and(|ext| ext == "pri") || path.ends_with(makefile)
}

fn regenerate(project_root: &Path, options: &GenerateOptions) {
    println!("{} Regenerating...", "🔄".yellow());
    match generate(project_root, options) {
        Ok(summary) => println!(
            "{} Wrote {} ({} rules)",
            "✓".green(),
            summary.makefile.display(),
            summary.rules.len()
        ),
        Err(e) => println!("{} Error: {}", "x".red(), e),
    }
}

//! Dependency listing for a single file.
//!
//! This module provides the `dmake deps <file>` command which prints the
//! headers a file depends on, in the order they appear in its Makefile rule.
//!
//! ## Example Output
//!
//! ```text
//! lib/tokenize.cpp
//! ├── lib/tokenize.h
//! ├── lib/classinfo.h
//! └── lib/errorlogger.h
//! ```

use crate::config::load_config;
use crate::scan::{self, DependencySet, DiskReader, ForeignTrees};
use anyhow::Result;
use colored::*;
use serde_json::json;
use std::path::Path;

pub fn dependencies_of(project_root: &Path, file: &str) -> Result<Vec<String>> {
    let config = load_config(project_root)?;
    let trees = ForeignTrees::from_layout(&config.layout)?;
    let reader = DiskReader::new(project_root);

    let file = file.replace('\\', "/");
    let file = file.strip_prefix("./").unwrap_or(&file);

    let mut deps = DependencySet::new().with_source_ext(&config.layout.source_ext);
    scan::collect_dependencies(file, &mut deps, &reader, &trees);
    Ok(deps.into_vec())
}

pub fn print_deps(project_root: &Path, file: &str, as_json: bool) -> Result<()> {
    let headers = dependencies_of(project_root, file)?;

    if as_json {
        let value = json!({ "file": file, "headers": headers });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}", file.bold().cyan());
    if headers.is_empty() {
        println!("└── (no local includes)");
        return Ok(());
    }
    for (i, header) in headers.iter().enumerate() {
        let prefix = if i == headers.len() - 1 {
            "└──"
        } else {
            "├──"
        };
        println!("{} {}", prefix, header);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_dependencies_of_normalizes_argument() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("lib")).unwrap();
        fs::write(dir.path().join("lib/a.cpp"), "#include \"a.h\"\n").unwrap();
        fs::write(dir.path().join("lib/a.h"), "").unwrap();

        let deps = dependencies_of(dir.path(), "./lib/a.cpp").unwrap();
        assert_eq!(deps, vec!["lib/a.h"]);
    }
}

//! Transitive header collection.
//!
//! [`collect_dependencies`] walks local includes depth-first, recording each
//! header the first time it is reached. Every path is visited at most once per
//! [`DependencySet`], which is what stops circular includes.

use super::fallback::ForeignTrees;
use super::include::{extract_local_includes, resolve_path};
use super::{extension, is_source_file};
use indexmap::IndexSet;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::PathBuf;

/// Source of file contents for the graph builder.
pub trait SourceReader {
    /// Contents of `path`, or `None` if it cannot be read.
    fn read(&self, path: &str) -> Option<String>;
}

/// Reads files relative to a project root.
#[derive(Debug, Clone)]
pub struct DiskReader {
    root: PathBuf,
}

impl DiskReader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SourceReader for DiskReader {
    fn read(&self, path: &str) -> Option<String> {
        // Non-UTF-8 bytes (latin-1 comments etc.) must not hide includes.
        let bytes = fs::read(self.root.join(path)).ok()?;
        Some(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl SourceReader for HashMap<String, String> {
    fn read(&self, path: &str) -> Option<String> {
        self.get(path).cloned()
    }
}

/// Ordered, duplicate-free headers reachable from one translation unit.
#[derive(Debug, Default, Clone)]
pub struct DependencySet {
    headers: IndexSet<String>,
    visited: HashSet<String>,
    source_ext: Option<String>,
}

impl DependencySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also treat files ending in `.<ext>` as translation units.
    pub fn with_source_ext(mut self, ext: &str) -> Self {
        self.source_ext = Some(ext.to_string());
        self
    }

    fn is_translation_unit(&self, path: &str) -> bool {
        is_source_file(path)
            || self
                .source_ext
                .as_deref()
                .is_some_and(|ext| extension(path) == Some(ext))
    }

    /// Headers in first-discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.headers.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.headers.into_iter().collect()
    }
}

/// Adds every header reachable from `path` to `deps`.
///
/// Unreadable paths are dropped unless `trees` redirects them to the library
/// tree, in which case the redirected path is collected instead.
pub fn collect_dependencies<R: SourceReader + ?Sized>(
    path: &str,
    deps: &mut DependencySet,
    reader: &R,
    trees: &ForeignTrees,
) {
    if !deps.visited.insert(path.to_string()) {
        return;
    }

    let Some(contents) = reader.read(path) else {
        if let Some(redirected) = trees.redirect(path) {
            collect_dependencies(&redirected, deps, reader, trees);
        }
        return;
    };

    if !deps.is_translation_unit(path) {
        deps.headers.insert(path.to_string());
    }

    for raw in extract_local_includes(&contents) {
        let candidate = resolve_path(path, raw);
        collect_dependencies(&candidate, deps, reader, trees);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(p, c)| (p.to_string(), c.to_string()))
            .collect()
    }

    fn collect(reader: &HashMap<String, String>, path: &str) -> Vec<String> {
        let trees = ForeignTrees::new("lib", &["cli", "test"]).unwrap();
        let mut deps = DependencySet::new();
        collect_dependencies(path, &mut deps, reader, &trees);
        deps.into_vec()
    }

    #[test]
    fn test_no_includes_is_empty() {
        let tree = files(&[("lib/a.cpp", "int main() {}\n")]);
        assert!(collect(&tree, "lib/a.cpp").is_empty());
    }

    #[test]
    fn test_chain_in_discovery_order() {
        let tree = files(&[
            ("lib/a.cpp", "#include \"a.h\"\n#include \"c.h\"\n"),
            ("lib/a.h", "#include \"b.h\"\n"),
            ("lib/b.h", ""),
            ("lib/c.h", "#include \"b.h\"\n"),
        ]);
        assert_eq!(collect(&tree, "lib/a.cpp"), vec!["lib/a.h", "lib/b.h", "lib/c.h"]);
    }

    #[test]
    fn test_cycle_terminates() {
        let tree = files(&[
            ("lib/x.cpp", "#include \"a.h\"\n"),
            ("lib/a.h", "#include \"b.h\"\n"),
            ("lib/b.h", "#include \"a.h\"\n#include \"b.h\"\n"),
        ]);
        assert_eq!(collect(&tree, "lib/x.cpp"), vec!["lib/a.h", "lib/b.h"]);
    }

    #[test]
    fn test_source_included_is_scanned_not_listed() {
        let tree = files(&[
            ("lib/a.cpp", "#include \"impl.cpp\"\n"),
            ("lib/impl.cpp", "#include \"impl.h\"\n#include \"a.cpp\"\n"),
            ("lib/impl.h", ""),
        ]);
        assert_eq!(collect(&tree, "lib/a.cpp"), vec!["lib/impl.h"]);
    }

    #[test]
    fn test_configured_source_ext_is_not_listed() {
        let tree = files(&[
            ("lib/a.cu", "#include \"kernel.cu\"\n"),
            ("lib/kernel.cu", "#include \"kernel.h\"\n"),
            ("lib/kernel.h", ""),
        ]);
        let mut deps = DependencySet::new().with_source_ext("cu");
        collect_dependencies("lib/a.cu", &mut deps, &tree, &ForeignTrees::none());
        assert_eq!(deps.into_vec(), vec!["lib/kernel.h"]);
    }

    #[test]
    fn test_nested_library_missing_header_terminates() {
        let tree = files(&[
            ("src/main.cpp", "#include \"missing.h\"\n#include \"util.h\"\n"),
            ("src/lib/util.h", ""),
        ]);
        let trees = ForeignTrees::new("src/lib", &["src", "test"]).unwrap();
        let mut deps = DependencySet::new();
        collect_dependencies("src/main.cpp", &mut deps, &tree, &trees);
        assert_eq!(deps.into_vec(), vec!["src/lib/util.h"]);
    }

    #[test]
    fn test_missing_header_dropped() {
        let tree = files(&[
            ("lib/a.cpp", "#include \"gen/config.h\"\n#include \"a.h\"\n"),
            ("lib/a.h", ""),
        ]);
        assert_eq!(collect(&tree, "lib/a.cpp"), vec!["lib/a.h"]);
    }

    #[test]
    fn test_foreign_tree_fallback() {
        let tree = files(&[
            ("test/testfoo.cpp", "#include \"foo.h\"\n#include \"local.h\"\n"),
            ("test/local.h", ""),
            ("lib/foo.h", "#include \"bar.h\"\n"),
            ("lib/bar.h", ""),
        ]);
        assert_eq!(
            collect(&tree, "test/testfoo.cpp"),
            vec!["lib/foo.h", "lib/bar.h", "test/local.h"]
        );
    }

    #[test]
    fn test_parent_relative_include() {
        let tree = files(&[
            ("cli/main.cpp", "#include \"../lib/foo.h\"\n"),
            ("lib/foo.h", ""),
        ]);
        assert_eq!(collect(&tree, "cli/main.cpp"), vec!["lib/foo.h"]);
    }

    #[test]
    fn test_disk_reader() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("lib")).unwrap();
        std::fs::write(dir.path().join("lib/a.cpp"), b"// \xe9t\xe9\n#include \"a.h\"\n").unwrap();
        std::fs::write(dir.path().join("lib/a.h"), "").unwrap();

        let reader = DiskReader::new(dir.path());
        let mut deps = DependencySet::new();
        collect_dependencies("lib/a.cpp", &mut deps, &reader, &ForeignTrees::none());
        assert_eq!(deps.into_vec(), vec!["lib/a.h"]);
        assert!(reader.read("lib/missing.h").is_none());
    }
}

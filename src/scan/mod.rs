//! Source-tree scanning.
//!
//! Paths handled here are `/`-separated strings relative to the project root,
//! which is how they appear in the generated Makefile.
//!
//! - [`enumerate`] - list translation units under a tree
//! - [`include`] - textual `#include "..."` extraction and resolution
//! - [`fallback`] - CLI/test to library redirect table
//! - [`graph`] - transitive header collection

pub mod enumerate;
pub mod fallback;
pub mod graph;
pub mod include;

pub use enumerate::enumerate;
pub use fallback::ForeignTrees;
pub use graph::{DependencySet, DiskReader, SourceReader, collect_dependencies};
pub use include::{extract_local_includes, resolve_path};

/// Extensions that mark a translation unit rather than a header.
pub const SOURCE_EXTENSIONS: &[&str] = &["c", "cc", "cpp", "cxx"];

/// Extension of `path` (text after the last `.` of the file name), if any.
pub fn extension(path: &str) -> Option<&str> {
    let name = path.rsplit('/').next().unwrap_or(path);
    name.rfind('.').map(|pos| &name[pos + 1..])
}

pub fn is_source_file(path: &str) -> bool {
    extension(path).is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

/// Object-file name for a translation unit: `lib/a.cpp` -> `lib/a.o`.
pub fn object_file(source: &str, object_ext: &str) -> String {
    match extension(source) {
        Some(ext) => format!("{}.{}", &source[..source.len() - ext.len() - 1], object_ext),
        None => format!("{}.{}", source, object_ext),
    }
}

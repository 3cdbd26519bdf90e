//! qmake project-file fragment (`lib.pri`).

use crate::scan;
use std::io::{self, Write};
use std::path::Path;

const ROOT_TOKEN: &str = "$$PWD/";
const CONTINUATION_INDENT: usize = 11;

/// Headers to list for the library tree.
///
/// `extra` comes first, then the header named after each source (same stem,
/// `.h`) when it exists on disk. Returned paths are relative to `lib_dir`.
pub fn library_headers(
    project_root: &Path,
    lib_dir: &str,
    sources: &[String],
    extra: &[String],
) -> Vec<String> {
    let mut headers: Vec<String> = extra.to_vec();
    for source in sources {
        let header = scan::object_file(source, "h");
        if !project_root.join(&header).is_file() {
            continue;
        }
        let relative = strip_tree(&header, lib_dir).to_string();
        if !headers.contains(&relative) {
            headers.push(relative);
        }
    }
    headers
}

/// `lib/sub/a.cpp` -> `sub/a.cpp` for tree `lib`.
pub fn strip_tree<'a>(path: &'a str, tree: &str) -> &'a str {
    path.strip_prefix(tree)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(path)
}

pub fn emit_project_file<W: Write>(
    out: &mut W,
    lib_dir: &str,
    headers: &[String],
    sources: &[String],
) -> io::Result<()> {
    write!(
        out,
        "# no manual edits - this file is autogenerated by dmake\n\n"
    )?;

    write!(out, "HEADERS += ")?;
    emit_entries(out, headers.iter().map(String::as_str))?;
    write!(out, "\n\nSOURCES += ")?;
    emit_entries(out, sources.iter().map(|s| strip_tree(s, lib_dir)))?;
    writeln!(out)
}

fn emit_entries<'a, W: Write>(
    out: &mut W,
    entries: impl Iterator<Item = &'a str>,
) -> io::Result<()> {
    for (i, entry) in entries.enumerate() {
        if i > 0 {
            write!(out, " \\\n{}", " ".repeat(CONTINUATION_INDENT))?;
        }
        write!(out, "{}{}", ROOT_TOKEN, entry)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_fragment_layout() {
        let headers = vec!["check.h".to_string(), "a.h".to_string()];
        let sources = vec!["lib/a.cpp".to_string(), "lib/sub/b.cpp".to_string()];
        let mut buf = Vec::new();
        emit_project_file(&mut buf, "lib", &headers, &sources).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "# no manual edits - this file is autogenerated by dmake\n\n\
             HEADERS += $$PWD/check.h \\\n           $$PWD/a.h\n\n\
             SOURCES += $$PWD/a.cpp \\\n           $$PWD/sub/b.cpp\n"
        );
    }

    #[test]
    fn test_library_headers_only_existing() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("lib")).unwrap();
        fs::write(dir.path().join("lib/a.h"), "").unwrap();

        let sources = vec!["lib/a.cpp".to_string(), "lib/b.cpp".to_string()];
        let extra = vec!["check.h".to_string()];
        let headers = library_headers(dir.path(), "lib", &sources, &extra);
        assert_eq!(headers, vec!["check.h", "a.h"]);
    }

    #[test]
    fn test_strip_tree() {
        assert_eq!(strip_tree("lib/a.cpp", "lib"), "a.cpp");
        assert_eq!(strip_tree("library/a.cpp", "lib"), "library/a.cpp");
    }
}

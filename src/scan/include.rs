//! Textual include scanning.
//!
//! Only `#include "..."` lines are recognised. There is no preprocessor here:
//! includes behind macros or `#if` blocks are picked up (or missed) as text.

const MARKER: &str = "#include \"";

/// Raw include strings of every local include in `contents`, in file order.
pub fn extract_local_includes(contents: &str) -> Vec<&str> {
    contents.lines().filter_map(local_include).collect()
}

fn local_include(line: &str) -> Option<&str> {
    let start = line.find(MARKER)? + MARKER.len();
    let rest = &line[start..];
    // Unterminated directives keep the rest of the line.
    let end = rest.find('"').unwrap_or(rest.len());
    Some(&rest[..end])
}

/// Joins `raw_include` onto the directory of `including_path`.
///
/// The only normalisation is for `dir/../x`: everything up to and including
/// the first `/../` is dropped.
pub fn resolve_path(including_path: &str, raw_include: &str) -> String {
    let dir = match including_path.rfind('/') {
        Some(pos) => &including_path[..=pos],
        None => "",
    };
    let mut candidate = format!("{}{}", dir, raw_include);
    if let Some(pos) = candidate.find("/../") {
        candidate.replace_range(..pos + 4, "");
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_local_includes() {
        let src = r#"#include <vector>
#include "a.h"
  #include "sub/b.h"  // trailing
int x; // #include <c.h>
#include"nospace.h"
"#;
        assert_eq!(extract_local_includes(src), vec!["a.h", "sub/b.h"]);
    }

    #[test]
    fn test_extract_unterminated_takes_rest_of_line() {
        assert_eq!(extract_local_includes("#include \"broken.h\n"), vec!["broken.h"]);
    }

    #[test]
    fn test_extract_crlf() {
        assert_eq!(extract_local_includes("#include \"a.h\"\r\nint x;\r\n"), vec!["a.h"]);
    }

    #[test]
    fn test_resolve_relative_to_including_dir() {
        assert_eq!(resolve_path("dir/sub/file.cpp", "foo.h"), "dir/sub/foo.h");
        assert_eq!(resolve_path("file.cpp", "foo.h"), "foo.h");
    }

    #[test]
    fn test_resolve_strips_parent_segment() {
        assert_eq!(resolve_path("test/testfoo.cpp", "../lib/foo.h"), "lib/foo.h");
        assert_eq!(resolve_path("", "test/../lib/foo.h"), "lib/foo.h");
    }
}

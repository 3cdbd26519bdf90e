use std::path::Path;
use walkdir::WalkDir;

/// Lists every file under `project_root/tree` with the given extension.
///
/// Entries are sorted by file name at each level so repeated runs emit the
/// same object lists. A missing tree yields an empty vector.
pub fn enumerate(project_root: &Path, tree: &str, extension: &str) -> Vec<String> {
    let mut files = Vec::new();

    for entry in WalkDir::new(project_root.join(tree))
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let matches = path
            .extension()
            .is_some_and(|ext| ext.to_string_lossy() == extension);
        if !matches {
            continue;
        }
        if let Ok(relative) = path.strip_prefix(project_root) {
            files.push(to_slash_path(relative));
        }
    }

    files
}

fn to_slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

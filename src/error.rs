use std::path::PathBuf;

/// Failures that stop a generation run.
#[derive(Debug)]
pub enum GenerateError {
    /// The mandatory library tree produced no translation units.
    NoSources { root: String },
    /// The foreign-tree table would redirect a tree onto itself.
    FallbackLoop { tree: String },
    /// The build recipe could not be written.
    Write { path: PathBuf, source: std::io::Error },
}

impl std::fmt::Display for GenerateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerateError::NoSources { root } => {
                write!(f, "no source files found under {}/", root)
            }
            GenerateError::FallbackLoop { tree } => write!(
                f,
                "tree '{}' is both the library tree and a fallback source",
                tree
            ),
            GenerateError::Write { path, source } => {
                write!(f, "cannot write {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for GenerateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GenerateError::Write { source, .. } => Some(source),
            _ => None,
        }
    }
}

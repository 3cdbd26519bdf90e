//! Foreign-tree fallback.
//!
//! CLI and test sources sometimes include library headers as if they sat next
//! to them. When such a path cannot be read, the graph builder asks this table
//! for the library-tree equivalent and retries there.

use crate::config::LayoutConfig;
use crate::error::GenerateError;

#[derive(Debug, Clone)]
pub struct ForeignTrees {
    library: String,
    foreign: Vec<String>,
}

impl ForeignTrees {
    pub fn new(library: &str, foreign: &[&str]) -> Result<Self, GenerateError> {
        let library = library.trim_end_matches('/').to_string();
        let mut trees = Vec::new();
        for tree in foreign {
            let tree = tree.trim_end_matches('/');
            if tree == library {
                return Err(GenerateError::FallbackLoop {
                    tree: tree.to_string(),
                });
            }
            trees.push(tree.to_string());
        }
        Ok(Self {
            library,
            foreign: trees,
        })
    }

    /// `cli -> lib` and `test -> lib` for the configured layout.
    pub fn from_layout(layout: &LayoutConfig) -> Result<Self, GenerateError> {
        Self::new(&layout.lib, &[layout.cli.as_str(), layout.test.as_str()])
    }

    /// An empty table; nothing is ever redirected.
    pub fn none() -> Self {
        Self {
            library: String::new(),
            foreign: Vec::new(),
        }
    }

    /// Library-tree equivalent of `path` if it lies under a foreign tree.
    ///
    /// The remainder after the foreign prefix is kept, so `test/sub/x.h`
    /// becomes `lib/sub/x.h`. Paths already inside the library tree are never
    /// redirected (nested layouts such as `cli = "src"`, `lib = "src/lib"`).
    pub fn redirect(&self, path: &str) -> Option<String> {
        if !self.library.is_empty() && under(path, &self.library) {
            return None;
        }
        let tree = self.foreign.iter().find(|tree| under(path, tree))?;
        Some(format!("{}{}", self.library, &path[tree.len()..]))
    }
}

fn under(path: &str, tree: &str) -> bool {
    path.strip_prefix(tree)
        .is_some_and(|rest| rest.starts_with('/'))
}

//! Lambda root directory fixtures

use std::path::Path;
use tempfile::TempDir;

/// Temporary lambda root with one sub-directory per lambda
pub struct LambdaTree {
    root: TempDir,
}

impl LambdaTree {
    pub fn new() -> Self {
        Self {
            root: TempDir::new().expect("Failed to create lambda root"),
        }
    }

    /// Add a lambda directory holding `files` (relative path, contents)
    pub fn lambda(self, name: &str, files: &[(&str, &str)]) -> Self {
        let dir = self.root.path().join(name);
        std::fs::create_dir_all(&dir).expect("Failed to create lambda directory");

        for (path, contents) in files {
            let path = dir.join(path);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).expect("Failed to create directory");
            }
            std::fs::write(path, contents).expect("Failed to write lambda file");
        }

        self
    }

    /// Add a plain file directly under the root
    pub fn file(self, name: &str, contents: &str) -> Self {
        std::fs::write(self.root.path().join(name), contents).expect("Failed to write file");
        self
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }
}

impl Default for LambdaTree {
    fn default() -> Self {
        Self::new()
    }
}

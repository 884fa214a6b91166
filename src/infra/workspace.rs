//! Workspace folder convention.
//!
//! ```text
//! data/        datasets, ignored by git
//! notebooks/   notebook files
//! utils/       helper modules imported by notebooks
//! docker/      container build definition
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::domain::AppError;

const DATA_GITIGNORE: &str = "*\n!.gitignore\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceLayout {
    root: PathBuf,
}

impl WorkspaceLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.join("data")
    }

    pub fn notebooks_dir(&self) -> PathBuf {
        self.root.join("notebooks")
    }

    pub fn utils_dir(&self) -> PathBuf {
        self.root.join("utils")
    }

    pub fn docker_dir(&self) -> PathBuf {
        self.root.join("docker")
    }

    pub fn directories(&self) -> [PathBuf; 4] {
        [
            self.data_dir(),
            self.notebooks_dir(),
            self.utils_dir(),
            self.docker_dir(),
        ]
    }

    /// Creates any missing directories and the `data/.gitignore`.
    ///
    /// Existing files are left untouched. Returns the paths that were created.
    pub fn scaffold(&self) -> Result<Vec<PathBuf>, AppError> {
        let mut created = Vec::new();

        for dir in self.directories() {
            if dir.is_dir() {
                debug!(path = %dir.display(), "Directory already present");
                continue;
            }
            fs::create_dir_all(&dir)?;
            created.push(dir);
        }

        let gitignore = self.data_dir().join(".gitignore");
        if !gitignore.exists() {
            fs::write(&gitignore, DATA_GITIGNORE)?;
            created.push(gitignore);
        }

        info!(root = %self.root.display(), created = created.len(), "Workspace ready");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaffold_creates_layout() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = WorkspaceLayout::new(tmp.path());

        let created = layout.scaffold().unwrap();
        assert_eq!(created.len(), 5);
        for dir in layout.directories() {
            assert!(dir.is_dir());
        }
        let ignore = fs::read_to_string(layout.data_dir().join(".gitignore")).unwrap();
        assert_eq!(ignore, DATA_GITIGNORE);
    }

    #[test]
    fn test_scaffold_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = WorkspaceLayout::new(tmp.path());
        layout.scaffold().unwrap();

        fs::write(layout.data_dir().join(".gitignore"), "custom\n").unwrap();
        let created = layout.scaffold().unwrap();
        assert!(created.is_empty());
        assert_eq!(
            fs::read_to_string(layout.data_dir().join(".gitignore")).unwrap(),
            "custom\n"
        );
    }
}

//! Working-directory-scoped file operations.
//!
//! All tool file paths are resolved relative to the session's working
//! directory; absolute-looking paths are re-rooted under it rather than
//! escaping to the filesystem root.

use std::path::{Path, PathBuf};

use maxwell_core::{MaxwellError, Result};

/// Listing of a directory split into files and subdirectories, as reported
/// by the `cd` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirListing {
    pub files: Vec<String>,
    pub dirs: Vec<String>,
}

/// File backend scoped to a mutable working directory.
///
/// The working directory is session state: `cd` mutates it, every relative
/// path resolves under it. Single-writer by construction; only the loop
/// thread touches it.
#[derive(Debug, Clone)]
pub struct FileWorkspace {
    working_dir: PathBuf,
}

impl FileWorkspace {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }

    /// The current working directory.
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Resolves a tool-supplied path under the working directory.
    ///
    /// A leading `./` or `/` is stripped first, so "absolute" paths from the
    /// model still land inside the workspace.
    pub fn resolve(&self, path: &str) -> PathBuf {
        let trimmed = path
            .strip_prefix("./")
            .or_else(|| path.strip_prefix('/'))
            .unwrap_or(path);
        self.working_dir.join(trimmed)
    }

    /// Appends text to a file, creating missing parent directories.
    pub fn append_file(&self, name: &str, text: &str) -> Result<()> {
        self.write_impl(name, text, false)
    }

    /// Truncates a file and writes text, creating missing parent directories.
    pub fn overwrite_file(&self, name: &str, text: &str) -> Result<()> {
        self.write_impl(name, text, true)
    }

    fn write_impl(&self, name: &str, text: &str, overwrite: bool) -> Result<()> {
        use std::io::Write;

        let path = self.resolve(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(overwrite)
            .append(!overwrite)
            .open(&path)?;
        file.write_all(text.as_bytes())?;
        Ok(())
    }

    /// Reads a file's contents.
    pub fn read_file(&self, name: &str) -> Result<String> {
        let path = self.resolve(name);
        if !path.exists() {
            return Err(MaxwellError::not_found("file", name));
        }
        Ok(std::fs::read_to_string(&path)?)
    }

    /// Lists entry names in a directory; `None` means the working directory.
    pub fn list_directory(&self, directory: Option<&str>) -> Result<Vec<String>> {
        let path = match directory {
            Some(dir) if !dir.is_empty() => self.resolve(dir),
            _ => self.working_dir.clone(),
        };
        if !path.exists() {
            return Err(MaxwellError::not_found(
                "directory",
                path.display().to_string(),
            ));
        }
        let mut entries: Vec<String> = std::fs::read_dir(&path)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        entries.sort();
        Ok(entries)
    }

    /// Creates a directory and its parents. Returns `false` when it already
    /// existed.
    pub fn make_directory(&self, directory: &str) -> Result<bool> {
        let path = self.resolve(directory);
        if path.exists() {
            return Ok(false);
        }
        std::fs::create_dir_all(&path)?;
        Ok(true)
    }

    /// Changes the working directory and returns its listing.
    pub fn change_directory(&mut self, directory: &str) -> Result<DirListing> {
        let path = self.resolve(directory);
        if !path.exists() {
            return Err(MaxwellError::not_found("directory", directory));
        }
        if !path.is_dir() {
            return Err(MaxwellError::io(format!("'{directory}' is not a directory")));
        }

        let mut files = Vec::new();
        let mut dirs = Vec::new();
        for entry in std::fs::read_dir(&path)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if entry.path().is_dir() {
                dirs.push(name);
            } else {
                files.push(name);
            }
        }
        files.sort();
        dirs.sort();

        self.working_dir = path;
        Ok(DirListing { files, dirs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_append_creates_missing_parents_then_read() {
        let temp = TempDir::new().unwrap();
        let ws = FileWorkspace::new(temp.path());

        ws.append_file("a/b/c.txt", "hello").unwrap();
        assert_eq!(ws.read_file("a/b/c.txt").unwrap(), "hello");
    }

    #[test]
    fn test_append_appends_overwrite_truncates() {
        let temp = TempDir::new().unwrap();
        let ws = FileWorkspace::new(temp.path());

        ws.append_file("f.txt", "one").unwrap();
        ws.append_file("f.txt", "two").unwrap();
        assert_eq!(ws.read_file("f.txt").unwrap(), "onetwo");

        ws.overwrite_file("f.txt", "first").unwrap();
        ws.overwrite_file("f.txt", "second").unwrap();
        assert_eq!(ws.read_file("f.txt").unwrap(), "second");
    }

    #[test]
    fn test_read_missing_file_is_not_found() {
        let temp = TempDir::new().unwrap();
        let ws = FileWorkspace::new(temp.path());
        let err = ws.read_file("nope.txt").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_resolve_strips_leading_slash_and_dot_slash() {
        let temp = TempDir::new().unwrap();
        let ws = FileWorkspace::new(temp.path());
        assert_eq!(ws.resolve("/abs/path.txt"), temp.path().join("abs/path.txt"));
        assert_eq!(ws.resolve("./rel.txt"), temp.path().join("rel.txt"));
        assert_eq!(ws.resolve("plain.txt"), temp.path().join("plain.txt"));
    }

    #[test]
    fn test_list_directory_defaults_to_working_dir() {
        let temp = TempDir::new().unwrap();
        let ws = FileWorkspace::new(temp.path());
        ws.append_file("one.txt", "x").unwrap();
        ws.append_file("two.txt", "y").unwrap();

        let entries = ws.list_directory(None).unwrap();
        assert_eq!(entries, vec!["one.txt", "two.txt"]);
    }

    #[test]
    fn test_list_missing_directory_is_not_found() {
        let temp = TempDir::new().unwrap();
        let ws = FileWorkspace::new(temp.path());
        assert!(ws.list_directory(Some("missing_dir")).unwrap_err().is_not_found());
    }

    #[test]
    fn test_make_directory_reports_preexisting() {
        let temp = TempDir::new().unwrap();
        let ws = FileWorkspace::new(temp.path());
        assert!(ws.make_directory("notes/math").unwrap());
        assert!(!ws.make_directory("notes/math").unwrap());
    }

    #[test]
    fn test_change_directory_moves_and_lists() {
        let temp = TempDir::new().unwrap();
        let mut ws = FileWorkspace::new(temp.path());
        ws.append_file("sub/inner.txt", "x").unwrap();
        ws.make_directory("sub/nested").unwrap();

        let listing = ws.change_directory("sub").unwrap();
        assert_eq!(listing.files, vec!["inner.txt"]);
        assert_eq!(listing.dirs, vec!["nested"]);
        assert_eq!(ws.working_dir(), temp.path().join("sub"));

        assert!(ws.change_directory("missing").unwrap_err().is_not_found());
    }
}

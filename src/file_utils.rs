use anyhow::{Result, Context};
use std::fs;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

// @module: File system helpers for transcript documents

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: Path points at an existing regular file
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        let path = path.as_ref();
        path.is_file()
    }

    // @creates: Directory and parents, idempotent
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))
    }

    /// Read a whole file into a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        let path = path.as_ref();
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))
    }

    /// Write a document, replacing any previous content
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        let path = path.as_ref();
        Self::ensure_parent(path)?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write to file: {}", path.display()))
    }

    /// Append one chunk of document content, creating the file when absent.
    /// Each call is a single write, so an interrupted run leaves the document
    /// well formed up to the last completed append.
    pub fn append_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        let path = path.as_ref();
        Self::ensure_parent(path)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open file for append: {}", path.display()))?;

        file.write_all(content.as_bytes())
            .with_context(|| format!("Failed to append to file: {}", path.display()))
    }

    // @creates: Parent directory of a target file when missing
    fn ensure_parent(path: &Path) -> Result<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => Self::ensure_dir(parent),
            _ => Ok(()),
        }
    }
}

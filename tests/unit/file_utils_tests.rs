/*!
 * Tests for file system utilities
 */

use anyhow::Result;
use vttclean::file_utils::FileManager;
use crate::common;

/// Test write then read round trip
#[test]
fn test_write_and_read_withValidPath_shouldRoundTrip() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file_path = temp_dir.path().join("doc.md");

    FileManager::write_to_file(&file_path, "# Title\n\nBody\n")?;
    let content = FileManager::read_to_string(&file_path)?;

    assert_eq!(content, "# Title\n\nBody\n");
    Ok(())
}

/// Test write creates missing parent directories
#[test]
fn test_write_to_file_withMissingParents_shouldCreateThem() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file_path = temp_dir.path().join("nested/dir/doc.md");

    FileManager::write_to_file(&file_path, "content")?;

    assert!(FileManager::file_exists(&file_path));
    Ok(())
}

/// Test append creates the file and keeps appending in order
#[test]
fn test_append_to_file_withRepeatedCalls_shouldAccumulateInOrder() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file_path = temp_dir.path().join("incremental.md");

    FileManager::append_to_file(&file_path, "# Header\n\n")?;
    FileManager::append_to_file(&file_path, "batch one\n")?;
    FileManager::append_to_file(&file_path, "batch two\n")?;

    let content = FileManager::read_to_string(&file_path)?;
    assert_eq!(content, "# Header\n\nbatch one\nbatch two\n");
    Ok(())
}

/// Test write truncates previous content while append preserves it
#[test]
fn test_write_to_file_withExistingContent_shouldTruncate() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file_path = temp_dir.path().join("doc.md");

    FileManager::write_to_file(&file_path, "old content that is long\n")?;
    FileManager::write_to_file(&file_path, "new\n")?;

    assert_eq!(FileManager::read_to_string(&file_path)?, "new\n");
    Ok(())
}

/// Test file existence checks
#[test]
fn test_file_exists_withFileAndDirectory_shouldDistinguish() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file_path = common::create_test_file(&temp_dir.path().to_path_buf(), "a.txt", "x")?;

    assert!(FileManager::file_exists(&file_path));
    assert!(!FileManager::file_exists(temp_dir.path()));
    assert!(!FileManager::file_exists(temp_dir.path().join("missing.txt")));
    Ok(())
}

/// Test directory creation is idempotent
#[test]
fn test_ensure_dir_withExistingDir_shouldSucceed() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir_path = temp_dir.path().join("out");

    FileManager::ensure_dir(&dir_path)?;
    FileManager::ensure_dir(&dir_path)?;

    assert!(dir_path.is_dir());
    Ok(())
}

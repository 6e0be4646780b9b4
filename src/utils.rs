//! Helpers shared by the CLI and integration tests.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Gets the cross-platform database path.
///
/// Returns the path as `{data_dir}/affil/catalog.db` where `data_dir` is:
/// - Linux: `~/.local/share`
/// - macOS: `~/Library/Application Support`
/// - Windows: `C:\Users\<user>\AppData\Roaming`
///
/// # Errors
///
/// Returns an error if the data directory cannot be determined.
pub fn get_database_path() -> Result<PathBuf> {
    let data_dir =
        dirs::data_dir().ok_or_else(|| anyhow::anyhow!("Failed to determine data directory"))?;

    Ok(data_dir.join("affil").join("catalog.db"))
}

/// Ensures the parent directory of the database file exists.
///
/// # Errors
///
/// Returns an error if directory creation fails.
pub fn ensure_database_directory(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create database directory: {}", parent.display())
        })?;
    }
    Ok(())
}

/// Splits a comma-separated list, trimming entries and dropping empty ones.
///
/// # Examples
///
/// ```
/// use affil::utils::parse_list;
///
/// assert_eq!(parse_list(" yoga mat, ,foam roller,"), vec!["yoga mat", "foam roller"]);
/// ```
pub fn parse_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn get_database_path_returns_valid_path() {
        let path = get_database_path();
        assert!(path.is_ok());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("affil"));
        assert!(path.to_string_lossy().ends_with("catalog.db"));
    }

    #[test]
    fn ensure_database_directory_creates_missing_parents() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("nested").join("deeper").join("catalog.db");

        ensure_database_directory(&db_path).unwrap();
        assert!(db_path.parent().unwrap().is_dir());
    }

    #[test]
    fn parse_list_handles_whitespace_and_empty_elements() {
        assert_eq!(parse_list("a,b"), vec!["a", "b"]);
        assert_eq!(parse_list(" a , b "), vec!["a", "b"]);
        assert_eq!(parse_list("a,,b,"), vec!["a", "b"]);
        assert!(parse_list("  ,  ,  ").is_empty());
        assert!(parse_list("").is_empty());
    }
}

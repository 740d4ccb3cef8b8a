use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use anyhow::Context;
use log::info;
use serde::de::DeserializeOwned;

/// Deserializes a TOML file, naming the file and the target type on failure.
pub fn read_toml<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text = fs_err::read_to_string(path)?;
    toml::from_str(&text)
        .with_context(|| format!("{path:?} is not a valid {}", std::any::type_name::<T>()))
}

/// `<path>.<timestamp>.backup`
pub fn backup_path(path: &Path, timestamp: i64) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(format!(".{timestamp}.backup"));
    PathBuf::from(name)
}

/// Moves an existing file out of the way instead of overwriting it.
/// Returns where the file went, or `None` if there was nothing to move.
pub fn backup_existing(path: &Path, timestamp: i64) -> anyhow::Result<Option<PathBuf>> {
    if !path.try_exists()? {
        return Ok(None);
    }
    let backup = backup_path(path, timestamp);
    fs_err::rename(path, &backup)?;
    info!("Moved {path:?} to {backup:?}");
    Ok(Some(backup))
}

/// Writes `contents` to `path`, keeping a previous version as a backup.
pub fn write_with_backup(path: &Path, contents: &str) -> anyhow::Result<Option<PathBuf>> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs_err::create_dir_all(parent)?;
    }
    let backup = backup_existing(path, chrono::Utc::now().timestamp())?;
    fs_err::write(path, contents)?;
    info!("Wrote {} bytes to {path:?}", contents.len());
    Ok(backup)
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::{backup_existing, backup_path, read_toml, write_with_backup};

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("tatort-{name}-{}", std::process::id()));
        let _ = fs_err::remove_dir_all(&dir);
        fs_err::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn backup_naming() {
        assert_eq!(
            backup_path(Path::new("data/list.html"), 1700000000),
            Path::new("data/list.html.1700000000.backup")
        );
    }

    #[test]
    fn backup_keeps_previous() {
        let dir = scratch_dir("backup");
        let path = dir.join("list.html");
        assert_eq!(backup_existing(&path, 1).unwrap(), None);

        assert_eq!(write_with_backup(&path, "first").unwrap(), None);
        fs_err::rename(&path, backup_path(&path, 2)).unwrap();
        fs_err::write(&path, "second").unwrap();

        let moved = backup_existing(&path, 3).unwrap().unwrap();
        assert_eq!(moved, dir.join("list.html.3.backup"));
        assert!(!path.exists());
        assert_eq!(fs_err::read_to_string(&moved).unwrap(), "second");
        assert_eq!(
            fs_err::read_to_string(backup_path(&path, 2)).unwrap(),
            "first"
        );

        assert_eq!(write_with_backup(&path, "third").unwrap(), None);
        let backup = write_with_backup(&path, "fourth").unwrap().unwrap();
        assert_eq!(fs_err::read_to_string(&backup).unwrap(), "third");
        assert_eq!(fs_err::read_to_string(&path).unwrap(), "fourth");
        fs_err::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn toml_errors_name_the_file() {
        let dir = scratch_dir("toml");
        let path = dir.join("broken.toml");
        fs_err::write(&path, "key = ").unwrap();
        let error = read_toml::<toml::Table>(&path).unwrap_err().to_string();
        assert!(error.contains("broken.toml"), "{error}");
        assert!(error.contains("is not a valid"), "{error}");

        fs_err::write(&path, "key = 1").unwrap();
        let table = read_toml::<toml::Table>(&path).unwrap();
        assert_eq!(table["key"].as_integer(), Some(1));
        fs_err::remove_dir_all(&dir).unwrap();
    }
}

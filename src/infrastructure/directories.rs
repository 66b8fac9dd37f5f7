use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::config::DirectoryConfig;

#[derive(Debug, Clone)]
pub struct ResolvedPaths {
    pub logs_dir: PathBuf,
}

pub fn ensure_directories(cfg: &DirectoryConfig) -> Result<ResolvedPaths> {
    let logs_dir = ensure_dir(&cfg.logs_dir)?;

    let probe_file = logs_dir.join(".write-test");
    fs::write(&probe_file, b"ok")
        .with_context(|| format!("logs directory {} is not writable", logs_dir.display()))?;
    fs::remove_file(&probe_file)?;
    Ok(ResolvedPaths { logs_dir })
}

/// Creates `path` if needed. Only a directory created here gets its mode
/// set; an existing one is used as it is.
fn ensure_dir(path: &str) -> Result<PathBuf> {
    let dir = PathBuf::from(path);
    if !dir.exists() {
        fs::create_dir_all(&dir).with_context(|| format!("failed to create directory {}", path))?;
        restrict_new_dir(&dir)?;
    }
    Ok(dir.canonicalize().unwrap_or(dir))
}

#[cfg(unix)]
fn restrict_new_dir(dir: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(dir, fs::Permissions::from_mode(0o755))
        .with_context(|| format!("failed to set permissions on {}", dir.display()))
}

#[cfg(not(unix))]
fn restrict_new_dir(_dir: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_nested_logs_dir() {
        let root = tempfile::tempdir().expect("tempdir");
        let nested = root.path().join("var").join("logs");
        let cfg = DirectoryConfig {
            logs_dir: nested.to_string_lossy().into_owned(),
        };

        let paths = ensure_directories(&cfg).expect("directories created");
        assert!(paths.logs_dir.is_dir());
        assert!(!paths.logs_dir.join(".write-test").exists());
    }

    #[cfg(unix)]
    #[test]
    fn existing_dir_keeps_its_mode() {
        use std::os::unix::fs::PermissionsExt;

        let shared = tempfile::tempdir().expect("tempdir");
        fs::set_permissions(shared.path(), fs::Permissions::from_mode(0o1777))
            .expect("chmod shared dir");
        let cfg = DirectoryConfig {
            logs_dir: shared.path().to_string_lossy().into_owned(),
        };

        ensure_directories(&cfg).expect("existing dir accepted");
        let mode = fs::metadata(shared.path()).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o7777, 0o1777);
    }

    #[cfg(unix)]
    #[test]
    fn created_dir_gets_owner_writable_mode() {
        use std::os::unix::fs::PermissionsExt;

        let root = tempfile::tempdir().expect("tempdir");
        let fresh = root.path().join("logs");
        let cfg = DirectoryConfig {
            logs_dir: fresh.to_string_lossy().into_owned(),
        };

        let paths = ensure_directories(&cfg).expect("directory created");
        let mode = fs::metadata(&paths.logs_dir).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}

//! Executable lookup with a process-wide cache

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

const SYSTEM_DIRS: &[&str] = &[
    "/bin",
    "/sbin",
    "/usr/bin",
    "/usr/sbin",
    "/usr/local/bin",
    "/usr/local/sbin",
];

static CACHE: Lazy<Mutex<HashMap<String, PathBuf>>> = Lazy::new(|| Mutex::new(HashMap::new()));

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

fn find_in<I, P>(dirs: I, program: &str) -> Option<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    dirs.into_iter()
        .map(|dir| dir.as_ref().join(program))
        .find(|candidate| is_executable(candidate))
}

/// Locate `program` in the usual system directories, then in `$PATH`.
///
/// Successful lookups are cached for the lifetime of the process; misses are
/// retried on every call.
pub fn find_program(program: &str) -> Option<PathBuf> {
    if let Some(hit) = CACHE.lock().get(program) {
        return Some(hit.clone());
    }

    let found = find_in(SYSTEM_DIRS, program).or_else(|| {
        let path = env::var_os("PATH")?;
        find_in(env::split_paths(&path), program)
    })?;

    tracing::debug!(program, path = %found.display(), "Program located");
    CACHE.lock().insert(program.to_string(), found.clone());
    Some(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[cfg(unix)]
    #[test]
    fn test_find_in_requires_exec_bit() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let tool = dir.path().join("lspci");
        fs::write(&tool, "#!/bin/sh\n").unwrap();

        fs::set_permissions(&tool, fs::Permissions::from_mode(0o644)).unwrap();
        assert_eq!(find_in([dir.path()], "lspci"), None);

        fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();
        assert_eq!(find_in([dir.path()], "lspci"), Some(tool));
    }

    #[test]
    fn test_find_in_skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sensors")).unwrap();
        assert_eq!(find_in([dir.path()], "sensors"), None);
    }

    #[test]
    fn test_missing_program() {
        assert_eq!(find_program("hardinfo-no-such-program-xyz"), None);
    }
}

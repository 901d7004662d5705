//! Runtime data / library path discovery and the user configuration directory

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File whose presence identifies a usable runtime data directory
pub const DATA_MARKER: &str = "benchmark.data";

/// Name of the per-user configuration directory under `$HOME`
pub const CONFIG_DIR_NAME: &str = ".hardinfo";

const DEFAULT_DATA_PREFIX: &str = match option_env!("HARDINFO_DATA_PREFIX") {
    Some(prefix) => prefix,
    None => "/usr/share/hardinfo",
};

const DEFAULT_LIB_PREFIX: &str = match option_env!("HARDINFO_LIB_PREFIX") {
    Some(prefix) => prefix,
    None => "/usr/lib/hardinfo",
};

/// Locations of runtime data and loadable modules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimePaths {
    /// Runtime data directory (benchmark data, icons)
    pub data: PathBuf,

    /// Library directory; modules live in its `modules` subdirectory
    pub lib: PathBuf,
}

impl RuntimePaths {
    /// Create paths from explicit directories
    pub fn new(data: impl Into<PathBuf>, lib: impl Into<PathBuf>) -> Self {
        Self {
            data: data.into(),
            lib: lib.into(),
        }
    }

    /// Paths compiled into the binary
    pub fn hardcoded() -> Self {
        Self::new(DEFAULT_DATA_PREFIX, DEFAULT_LIB_PREFIX)
    }

    /// Paths relative to the installation prefix of the running executable
    ///
    /// `<prefix>/bin/hardinfo` maps to `<prefix>/share/hardinfo` and
    /// `<prefix>/lib/hardinfo`.
    pub fn relocated() -> Option<Self> {
        let exe = std::env::current_exe().ok()?;
        let prefix = exe.parent()?.parent()?;
        Some(Self::new(
            prefix.join("share").join("hardinfo"),
            prefix.join("lib").join("hardinfo"),
        ))
    }

    /// Find the runtime paths.
    ///
    /// Unless `try_hardcoded` is set, the relocated prefix is tried first and
    /// the hardcoded one is the fallback.
    pub fn discover(try_hardcoded: bool) -> Result<Self> {
        debug!(try_hardcoded, "Searching for runtime data");

        let mut candidates = Vec::with_capacity(2);
        if !try_hardcoded {
            candidates.extend(Self::relocated());
        }
        candidates.push(Self::hardcoded());

        Self::first_with_data(candidates)
    }

    /// Pick the first candidate whose data directory holds [`DATA_MARKER`]
    pub fn first_with_data(candidates: impl IntoIterator<Item = Self>) -> Result<Self> {
        let mut searched = Vec::new();

        for candidate in candidates {
            debug!(
                lib = %candidate.lib.display(),
                data = %candidate.data.display(),
                "Trying runtime location"
            );
            if candidate.has_runtime_data() {
                debug!("Runtime data found");
                return Ok(candidate);
            }
            searched.push(candidate.data);
        }

        Err(Error::RuntimeDataNotFound {
            marker: DATA_MARKER.to_string(),
            searched,
        })
    }

    /// Whether the data directory looks usable
    pub fn has_runtime_data(&self) -> bool {
        self.data.join(DATA_MARKER).exists()
    }

    /// Directory scanned for loadable modules
    pub fn modules_dir(&self) -> PathBuf {
        self.lib.join("modules")
    }
}

/// Create `~/.hardinfo` (mode 0744) if it does not exist yet
pub fn ensure_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or(Error::NoHomeDirectory)?;
    ensure_config_dir_in(&home)
}

/// Create the configuration directory under an explicit home directory
pub fn ensure_config_dir_in(home: &Path) -> Result<PathBuf> {
    let dir = home.join(CONFIG_DIR_NAME);
    if dir.exists() {
        return Ok(dir);
    }

    let mut builder = fs::DirBuilder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o744);
    }
    builder.create(&dir)?;

    debug!(path = %dir.display(), "Created configuration directory");
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modules_dir() {
        let paths = RuntimePaths::new("/usr/share/hardinfo", "/usr/lib/hardinfo");
        assert_eq!(
            paths.modules_dir(),
            PathBuf::from("/usr/lib/hardinfo/modules")
        );
    }

    #[test]
    fn test_first_with_data_skips_incomplete_locations() {
        let empty = tempfile::tempdir().unwrap();
        let good = tempfile::tempdir().unwrap();
        fs::write(good.path().join(DATA_MARKER), "").unwrap();

        let found = RuntimePaths::first_with_data([
            RuntimePaths::new(empty.path(), empty.path()),
            RuntimePaths::new(good.path(), good.path()),
        ])
        .unwrap();

        assert_eq!(found.data, good.path());
    }

    #[test]
    fn test_first_with_data_reports_searched_locations() {
        let empty = tempfile::tempdir().unwrap();
        let err = RuntimePaths::first_with_data([RuntimePaths::new(empty.path(), empty.path())])
            .unwrap_err();

        match err {
            Error::RuntimeDataNotFound { searched, .. } => {
                assert_eq!(searched, vec![empty.path().to_path_buf()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_ensure_config_dir_creates_once() {
        let home = tempfile::tempdir().unwrap();

        let dir = ensure_config_dir_in(home.path()).unwrap();
        assert!(dir.is_dir());
        assert_eq!(dir.file_name().unwrap(), CONFIG_DIR_NAME);

        // Second call is a no-op
        assert_eq!(ensure_config_dir_in(home.path()).unwrap(), dir);
    }

    #[cfg(unix)]
    #[test]
    fn test_ensure_config_dir_mode() {
        use std::os::unix::fs::PermissionsExt;

        let home = tempfile::tempdir().unwrap();
        let dir = ensure_config_dir_in(home.path()).unwrap();
        let mode = fs::metadata(dir).unwrap().permissions().mode() & 0o777;
        // umask may clear group/other bits but never adds any
        assert_eq!(mode & !0o744, 0);
        assert_eq!(mode & 0o700, 0o700);
    }
}

use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use tracing::{debug, warn};

pub const WINDOW_TITLE: &str = "Simple Time Clock";

/// Window icon found in the assets directory. Terminals can't show it, so only its location and
/// size are kept.
#[derive(Debug)]
pub struct Icon {
    pub path: PathBuf,
    pub size: u64,
}

pub fn icon_file_name() -> &'static str {
    cfg_if::cfg_if! {
        if #[cfg(windows)] {
            "icon.ico"
        } else {
            "icon.xbm"
        }
    }
}

pub fn icon_path(assets_dir: &Path) -> PathBuf {
    assets_dir.join(icon_file_name())
}

/// `assets` next to the executable. This is where bundles put their resources.
pub fn default_assets_dir() -> Result<PathBuf> {
    let exe = env::current_exe()?;
    let dir = exe
        .parent()
        .ok_or_else(|| anyhow!("Executable {exe:?} has no parent directory"))?;
    Ok(dir.join("assets"))
}

pub fn load_icon(assets_dir: &Path) -> Result<Icon> {
    let path = icon_path(assets_dir);
    let metadata = std::fs::metadata(&path).with_context(|| format!("Reading icon {path:?}"))?;
    if !metadata.is_file() {
        return Err(anyhow!("Icon {path:?} is not a file"));
    }
    if metadata.len() == 0 {
        return Err(anyhow!("Icon {path:?} is empty"));
    }
    Ok(Icon {
        path,
        size: metadata.len(),
    })
}

/// Loads the icon if it can. Missing icons are never a reason to not show the clock.
pub fn try_load_icon(assets_dir: Option<&Path>) -> Option<Icon> {
    let loaded = match assets_dir {
        Some(dir) => load_icon(dir),
        None => default_assets_dir().and_then(|dir| load_icon(&dir)),
    };

    match loaded {
        Ok(icon) => {
            debug!(path = ?icon.path, bytes = icon.size, "Loaded window icon");
            Some(icon)
        }
        Err(e) => {
            warn!("Failed to set window icon. {e:?}");
            None
        }
    }
}

/// OSC sequence that sets the terminal window title.
pub fn title_sequence(title: &str) -> String {
    format!("\x1b]0;{title}\x07")
}

#[cfg(test)]
mod icon_tests {
    use std::{fs, path::Path};

    use anyhow::Result;
    use tempfile::tempdir;

    use crate::utils::logging::TEST_LOGGING;

    use super::{icon_file_name, icon_path, load_icon, title_sequence, try_load_icon};

    #[test]
    fn test_icon_follows_platform() {
        let path = icon_path(Path::new("assets"));
        if cfg!(windows) {
            assert!(path.ends_with("icon.ico"));
        } else {
            assert!(path.ends_with("icon.xbm"));
        }
    }

    #[test]
    fn test_load_existing_icon() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join(icon_file_name()), b"#define icon_width 16")?;

        let icon = load_icon(dir.path())?;
        assert_eq!(icon.path, dir.path().join(icon_file_name()));
        assert_eq!(icon.size, b"#define icon_width 16".len() as u64);
        Ok(())
    }

    #[test]
    fn test_missing_or_empty_icon_is_not_fatal() -> Result<()> {
        *TEST_LOGGING;
        let dir = tempdir()?;
        assert!(load_icon(dir.path()).is_err());
        assert!(try_load_icon(Some(dir.path())).is_none());

        fs::write(dir.path().join(icon_file_name()), b"")?;
        assert!(try_load_icon(Some(dir.path())).is_none());

        fs::remove_file(dir.path().join(icon_file_name()))?;
        fs::create_dir(dir.path().join(icon_file_name()))?;
        assert!(try_load_icon(Some(dir.path())).is_none());
        Ok(())
    }

    #[test]
    fn test_title_sequence() {
        assert_eq!(title_sequence("Clock"), "\x1b]0;Clock\x07");
    }
}

//! Command implementations behind the `toonify` binary.

mod avatar;
mod cartoonify;
mod status;
mod styles;

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

pub use avatar::{create_avatar, get_avatar};
pub use cartoonify::cartoonify;
pub use status::status;
pub use styles::styles;

/// Where to save a result image, if anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SaveTarget {
    #[default]
    None,
    /// Save under a generated name in the current directory.
    DefaultName,
    Path(PathBuf),
}

impl SaveTarget {
    pub fn from_args(save: bool, output: Option<PathBuf>) -> Self {
        match (save, output) {
            (_, Some(path)) => SaveTarget::Path(path),
            (true, None) => SaveTarget::DefaultName,
            (false, None) => SaveTarget::None,
        }
    }

    /// Resolves the target path, generating a name with `default_name` if
    /// needed.
    pub fn resolve(&self, default_name: impl FnOnce() -> String) -> Option<PathBuf> {
        match self {
            SaveTarget::None => None,
            SaveTarget::DefaultName => Some(PathBuf::from(default_name())),
            SaveTarget::Path(path) => Some(path.clone()),
        }
    }
}

pub(crate) fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

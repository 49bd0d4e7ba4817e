//! `[render]` section configuration.
//!
//! Controls which fonts are available when avatars are rasterized.
//!
//! ```toml
//! [render]
//! load_system_fonts = true
//! font_dirs = ["fonts"]      # Relative to the config file
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub load_system_fonts: bool,
    pub font_dirs: Vec<PathBuf>,
}

impl RenderConfig {
    pub const FONT_DIRS: FieldPath = FieldPath::new("render.font_dirs");

    /// Resolve relative font directories against `root`.
    pub fn normalize(&mut self, root: &Path) {
        for dir in &mut self.font_dirs {
            if dir.is_relative() {
                *dir = root.join(&*dir);
            }
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        for dir in &self.font_dirs {
            if !dir.is_dir() {
                diag.warn(
                    Self::FONT_DIRS,
                    format!("`{}` is not a directory", dir.display()),
                );
            }
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            load_system_fonts: true,
            font_dirs: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_render_config() {
        let config = test_parse_config("[render]\nload_system_fonts = false\nfont_dirs = [\"fonts\"]");
        assert!(!config.render.load_system_fonts);
        assert_eq!(config.render.font_dirs, [PathBuf::from("fonts")]);
    }

    #[test]
    fn test_normalize_and_missing_dir_warning() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("fonts")).unwrap();

        let mut render = RenderConfig {
            load_system_fonts: false,
            font_dirs: vec![PathBuf::from("fonts"), PathBuf::from("missing")],
        };
        render.normalize(dir.path());
        assert_eq!(render.font_dirs[0], dir.path().join("fonts"));

        let mut diag = ConfigDiagnostics::new();
        render.validate(&mut diag);
        assert!(diag.is_empty());
        assert_eq!(diag.warnings().len(), 1);
    }
}

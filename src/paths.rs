//! XDG-compliant path resolution for dossier.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Errors from path resolution.
#[derive(Debug, Error, Diagnostic)]
pub enum PathError {
    #[error("cannot determine home directory")]
    #[diagnostic(
        code(dossier::paths::no_home),
        help("Set the HOME environment variable or ensure a valid user profile exists.")
    )]
    NoHome,

    #[error("failed to create directory: {path}")]
    #[diagnostic(
        code(dossier::paths::create_dir),
        help("Check that the parent directory exists and you have write permissions.")
    )]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type PathResult<T> = std::result::Result<T, PathError>;

/// XDG-compliant directories for dossier.
#[derive(Debug, Clone)]
pub struct DossierPaths {
    /// `$XDG_CONFIG_HOME/dossier/`
    pub config_dir: PathBuf,
    /// `$XDG_DATA_HOME/dossier/` — the redb database, saved labels, and
    /// labeled output live here.
    pub data_dir: PathBuf,
}

impl DossierPaths {
    /// Resolve XDG directories from environment variables with standard fallbacks.
    pub fn resolve() -> PathResult<Self> {
        let home = std::env::var("HOME")
            .map(PathBuf::from)
            .map_err(|_| PathError::NoHome)?;

        let config_dir = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| home.join(".config"))
            .join("dossier");

        let data_dir = std::env::var("XDG_DATA_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| home.join(".local/share"))
            .join("dossier");

        Ok(Self {
            config_dir,
            data_dir,
        })
    }

    /// Use an explicit data directory instead of the XDG default.
    pub fn with_data_dir(mut self, data_dir: PathBuf) -> Self {
        self.data_dir = data_dir;
        self
    }

    /// Create all base directories. Idempotent.
    pub fn ensure_dirs(&self) -> PathResult<()> {
        for dir in [&self.config_dir, &self.data_dir] {
            std::fs::create_dir_all(dir).map_err(|e| PathError::CreateDir {
                path: dir.display().to_string(),
                source: e,
            })?;
        }
        Ok(())
    }

    /// Path to the config file.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// Path to the saved label list.
    pub fn labels_file(&self) -> PathBuf {
        self.data_dir.join("labels.json")
    }

    /// Path to the labeled-information output file.
    pub fn labeled_output_file(&self) -> PathBuf {
        self.data_dir.join("labeled_information.txt")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_files_live_under_their_dirs() {
        let paths = DossierPaths {
            config_dir: PathBuf::from("/cfg/dossier"),
            data_dir: PathBuf::from("/data/dossier"),
        };
        assert_eq!(paths.config_file(), PathBuf::from("/cfg/dossier/config.toml"));
        assert_eq!(paths.labels_file(), PathBuf::from("/data/dossier/labels.json"));
        assert_eq!(
            paths.labeled_output_file(),
            PathBuf::from("/data/dossier/labeled_information.txt")
        );
    }

    #[test]
    fn with_data_dir_overrides() {
        let paths = DossierPaths {
            config_dir: PathBuf::from("/cfg/dossier"),
            data_dir: PathBuf::from("/data/dossier"),
        }
        .with_data_dir(PathBuf::from("/elsewhere"));
        assert_eq!(paths.data_dir, PathBuf::from("/elsewhere"));
        assert_eq!(paths.labels_file(), PathBuf::from("/elsewhere/labels.json"));
    }

    #[test]
    fn resolve_uses_dossier_suffix() {
        let paths = DossierPaths::resolve().unwrap();
        assert!(paths.config_dir.to_string_lossy().contains("dossier"));
        assert!(paths.data_dir.to_string_lossy().contains("dossier"));
    }
}

//! Production identity and filesystem root.

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

/// Environment variable naming the production.
pub const SPECPROD_ENV: &str = "SPECPROD";

/// Environment variable naming the directory that holds all productions.
pub const REDUX_DIR_ENV: &str = "DESI_SPECTRO_REDUX";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ProductionError {
    #[error("No production given and $SPECPROD is not set")]
    MissingSpecprod,
    #[error("No reduction directory given and $DESI_SPECTRO_REDUX is not set")]
    MissingReduxDir,
}

/// Which production to work on and where it lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductionConfig {
    /// Production name, e.g. "kibo"
    pub specprod: String,

    /// Parent directory of all productions
    pub redux_dir: Utf8PathBuf,
}

impl ProductionConfig {
    pub fn new(redux_dir: impl Into<Utf8PathBuf>, specprod: impl Into<String>) -> Self {
        Self {
            specprod: specprod.into(),
            redux_dir: redux_dir.into(),
        }
    }

    /// Resolve from explicit overrides, falling back to `env` lookups.
    ///
    /// `env` is called with an environment variable name; callers pass
    /// `std::env::var` or a fixed map in tests.
    pub fn resolve<F>(
        specprod: Option<&str>,
        redux_dir: Option<&Utf8Path>,
        env: F,
    ) -> Result<Self, ProductionError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let specprod = match specprod {
            Some(name) => name.to_string(),
            None => env(SPECPROD_ENV)
                .filter(|v| !v.is_empty())
                .ok_or(ProductionError::MissingSpecprod)?,
        };

        let redux_dir = match redux_dir {
            Some(dir) => dir.to_path_buf(),
            None => env(REDUX_DIR_ENV)
                .filter(|v| !v.is_empty())
                .map(Utf8PathBuf::from)
                .ok_or(ProductionError::MissingReduxDir)?,
        };

        Ok(Self {
            specprod,
            redux_dir,
        })
    }

    /// Resolve using the process environment.
    pub fn from_env(
        specprod: Option<&str>,
        redux_dir: Option<&Utf8Path>,
    ) -> Result<Self, ProductionError> {
        Self::resolve(specprod, redux_dir, |key| std::env::var(key).ok())
    }

    /// Root directory of this production.
    pub fn root(&self) -> Utf8PathBuf {
        self.redux_dir.join(&self.specprod)
    }

    /// Directory holding the per-night processing tables.
    pub fn proctable_dir(&self) -> Utf8PathBuf {
        self.root().join("processing_tables")
    }

    /// Directory holding the healpix job scripts and logs.
    pub fn healpix_script_dir(&self) -> Utf8PathBuf {
        self.root().join("run").join("scripts").join("healpix")
    }
}

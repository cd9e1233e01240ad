use std::path::PathBuf;

use litset_check::ConfigError;
use litset_sets::PersistError;
use thiserror::Error;

/// Failures of the driver itself, as opposed to diagnostics about the
/// checked sources.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("cannot access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("set cache '{}' is unusable: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: PersistError,
    },

    #[error("set cache entry '{0}' is not a qualified set name")]
    InvalidKey(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

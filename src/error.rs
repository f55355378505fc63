/*
 * Error Module
 *
 * Errors raised while building or loading the simulation configuration.
 * The per-frame simulation itself never fails; see physics.rs for how
 * out-of-contract inputs are clamped.
 */

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    // A parameter is outside the range the simulation can work with
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),

    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

use std::path::PathBuf;

use thiserror::Error;
use vcadmin_vsphere::VmwareError;

/// Errors surfaced by the `vcadmin` binary.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{field} is not configured (pass --{flag}, set {env}, or add it to the config file)")]
    MissingSetting {
        field: &'static str,
        flag: &'static str,
        env: &'static str,
    },

    #[error("failed to read config file {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to initialise logging: {0}")]
    Logging(String),

    #[error("failed to encode output: {0}")]
    Output(#[source] serde_json::Error),

    #[error(transparent)]
    Vsphere(#[from] VmwareError),
}

//! Connection settings, resolved from flags / environment, then the JSON
//! config file, then built-in defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use vcadmin_vsphere::types::VsphereConfig;

use crate::cli::ConnectionOptions;
use crate::error::CliError;

/// Location of the config file relative to `$HOME`.
pub const DEFAULT_CONFIG_FILE: &str = ".config/vcadmin.json";

/// Contents of the JSON config file. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileConfig {
    pub server: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub insecure: Option<bool>,
    pub timeout_secs: Option<u64>,
    pub api_release: Option<String>,
    pub task_poll_interval_ms: Option<u64>,
    pub task_timeout_secs: Option<u64>,
    pub base_url: Option<String>,
}

pub fn default_config_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(DEFAULT_CONFIG_FILE))
}

pub fn load_file(path: &Path) -> Result<FileConfig, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the config file named on the command line, or the default one if it
/// exists. A missing default file is not an error; a missing explicit one is.
pub fn load_file_config(explicit: Option<&Path>) -> Result<Option<FileConfig>, CliError> {
    match explicit {
        Some(path) => load_file(path).map(Some),
        None => match default_config_path() {
            Some(path) if path.is_file() => {
                log::debug!("Reading {}", path.display());
                load_file(&path).map(Some)
            }
            _ => Ok(None),
        },
    }
}

/// Merge command-line / environment options over the file config.
pub fn resolve(opts: &ConnectionOptions, file: Option<&FileConfig>) -> Result<VsphereConfig, CliError> {
    let file = file.cloned().unwrap_or_default();
    let defaults = VsphereConfig::default();

    let host = required(opts.server.clone().or(file.server), "server", "server", "VCADMIN_SERVER")?;
    let username = required(
        opts.username.clone().or(file.username),
        "username",
        "username",
        "VCADMIN_USERNAME",
    )?;
    let password = required(
        opts.password.clone().or(file.password),
        "password",
        "password",
        "VCADMIN_PASSWORD",
    )?;

    Ok(VsphereConfig {
        host,
        port: opts.port.or(file.port).unwrap_or(defaults.port),
        username,
        password,
        insecure: opts.insecure || file.insecure.unwrap_or(defaults.insecure),
        timeout_secs: opts
            .timeout_secs
            .or(file.timeout_secs)
            .unwrap_or(defaults.timeout_secs),
        api_release: opts
            .api_release
            .clone()
            .or(file.api_release)
            .unwrap_or(defaults.api_release),
        task_poll_interval_ms: file
            .task_poll_interval_ms
            .unwrap_or(defaults.task_poll_interval_ms),
        task_timeout_secs: file.task_timeout_secs.unwrap_or(defaults.task_timeout_secs),
        base_url: file.base_url,
    })
}

fn required(
    value: Option<String>,
    field: &'static str,
    flag: &'static str,
    env: &'static str,
) -> Result<String, CliError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(CliError::MissingSetting { field, flag, env })
}

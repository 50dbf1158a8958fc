//! Configuration management for tunsup.
use serde::Deserialize;
use std::{
    fs,
    net::Ipv4Addr,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{constants, error::SessionError};

/// How a failed address assignment or link activation affects the session.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConfigureFailureMode {
    /// Log the failure and leave the child running.
    #[default]
    Continue,
    /// Tear the session down and exit non-zero.
    Abort,
}

/// Represents the structure of the configuration file. Every field has a
/// built-in default, so a session can run with no configuration at all.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Executable the session grants capabilities to and launches.
    pub executable: PathBuf,
    /// Name of the virtual interface the supervised program creates.
    pub interface: String,
    /// IPv4 address assigned to the interface once it exists.
    pub address: Ipv4Addr,
    /// Prefix length for the assigned address.
    pub prefix_len: u8,
    /// Capabilities attached to the executable file before launch. An empty
    /// list skips the grant step entirely.
    pub capabilities: Vec<String>,
    /// Whether privileged host commands run under the elevation prefix.
    pub elevate: bool,
    /// Milliseconds to wait for the child to create the interface.
    pub device_wait_ms: u64,
    /// Strict vs lenient handling of configuration failures.
    pub on_configure_error: ConfigureFailureMode,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            executable: PathBuf::from(constants::DEFAULT_EXECUTABLE),
            interface: constants::DEFAULT_INTERFACE.to_string(),
            address: constants::DEFAULT_ADDRESS,
            prefix_len: constants::DEFAULT_PREFIX_LEN,
            capabilities: constants::DEFAULT_CAPABILITIES
                .iter()
                .map(|cap| cap.to_string())
                .collect(),
            elevate: true,
            device_wait_ms: constants::DEVICE_WAIT_TIMEOUT.as_millis() as u64,
            on_configure_error: ConfigureFailureMode::default(),
        }
    }
}

impl SessionConfig {
    /// Command prefix for privileged host utilities.
    pub fn elevation_prefix(&self) -> &'static [&'static str] {
        if self.elevate {
            constants::ELEVATE_COMMAND
        } else {
            &[]
        }
    }

    /// How long to wait for the virtual interface to appear.
    pub fn device_wait(&self) -> Duration {
        Duration::from_millis(self.device_wait_ms)
    }

    fn validate(&self) -> Result<(), SessionError> {
        if self.prefix_len > 32 {
            return Err(SessionError::InvalidPrefixLen(self.prefix_len));
        }
        Ok(())
    }
}

/// Loads and parses the configuration file. A missing `--config` argument
/// falls back to `tunsup.yaml` in the working directory, and to the built-in
/// defaults when that does not exist either.
pub fn load_config(config_path: Option<&str>) -> Result<SessionConfig, SessionError> {
    let path = match config_path {
        Some(path) => PathBuf::from(path),
        None => {
            let default = Path::new(constants::DEFAULT_CONFIG_FILE);
            if !default.exists() {
                return Ok(SessionConfig::default());
            }
            default.to_path_buf()
        }
    };

    let content = fs::read_to_string(&path).map_err(|e| {
        SessionError::ConfigRead(std::io::Error::new(
            e.kind(),
            format!("{} ({})", e, path.display()),
        ))
    })?;

    let config: SessionConfig = serde_yaml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

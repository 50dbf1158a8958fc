//! Error handling for tunsup.
use std::{path::PathBuf, time::Duration};

use thiserror::Error;

/// Errors raised while attaching file capabilities to the supervised
/// executable. All of these are fatal before any child or device exists.
#[derive(Debug, Error)]
pub enum GrantError {
    /// The executable the grant should attach to does not exist.
    #[error("Executable not found: {0}")]
    MissingExecutable(PathBuf),

    /// A configured capability name did not parse.
    #[error("Invalid capability '{0}'")]
    InvalidCapability(String),

    /// The `setcap` host utility could not be spawned.
    #[error("Failed to run setcap: {0}")]
    SetcapSpawn(#[from] std::io::Error),

    /// `setcap` ran but reported failure, e.g. on a filesystem without
    /// extended-attribute support.
    #[error("setcap exited with status {status:?} for '{executable}'")]
    SetcapFailed {
        /// Path the grant was attempted on.
        executable: String,
        /// Exit code reported by `setcap`, if any.
        status: Option<i32>,
    },
}

/// Errors raised while configuring the virtual interface.
#[derive(Debug, Error)]
pub enum ConfigureError {
    /// The interface does not exist, so it cannot be addressed.
    #[error("Interface '{0}' does not exist")]
    DeviceMissing(String),

    /// The child never created the interface within the configured window.
    #[error("Timed out after {timeout:?} waiting for interface '{interface}'")]
    DeviceWaitTimeout {
        /// Name of the interface that never appeared.
        interface: String,
        /// How long the session waited before giving up.
        timeout: Duration,
    },

    /// A host `ip` invocation could not be spawned.
    #[error("Failed to run `{command}`: {source}")]
    CommandSpawn {
        /// The rendered command line.
        command: String,
        /// The underlying spawn error.
        #[source]
        source: std::io::Error,
    },

    /// A host `ip` invocation ran but exited non-zero.
    #[error("`{command}` exited with status {status:?}")]
    CommandFailed {
        /// The rendered command line.
        command: String,
        /// Exit code of the failed invocation, if any.
        status: Option<i32>,
    },
}

/// Defines all possible errors that can occur during a supervised session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Error reading or accessing the configuration file.
    #[error("Failed to read config file: {0}")]
    ConfigRead(#[from] std::io::Error),

    /// Error parsing YAML configuration.
    #[error("Invalid YAML format: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    /// A configured prefix length does not fit an IPv4 address.
    #[error("Invalid prefix length {0} (expected 0-32)")]
    InvalidPrefixLen(u8),

    /// Capability attachment failed; no child is ever started.
    #[error("Capability grant failed: {0}")]
    Grant(#[from] GrantError),

    /// The supervised executable failed to start; nothing to clean up.
    #[error("Failed to start '{executable}': {source}")]
    Launch {
        /// The executable that failed to launch.
        executable: String,
        /// The underlying error that occurred.
        #[source]
        source: std::io::Error,
    },

    /// Blocking on the child failed.
    #[error("Failed waiting on child: {source}")]
    Wait {
        /// The underlying error that occurred.
        #[source]
        source: std::io::Error,
    },

    /// Address assignment or link activation failed in strict mode.
    #[error("Interface configuration failed: {0}")]
    Configure(#[from] ConfigureError),

    /// The termination-signal listener could not be registered.
    #[error("Failed to register signal handler: {0}")]
    SignalHandler(#[from] ctrlc::Error),
}

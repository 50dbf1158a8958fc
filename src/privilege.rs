//! File-capability grants for the supervised executable.
//!
//! The grant attaches a persistent capability attribute to the executable
//! file so it can create and manage network devices without running fully
//! elevated. The attribute survives the session and is never revoked here.

use std::path::Path;

use tracing::{debug, info};

use crate::{
    constants::CAP_FLAGS,
    error::GrantError,
    netdev::elevated_command,
};

#[cfg(target_os = "linux")]
use {caps::Capability, std::str::FromStr};

/// Validates capability names ahead of the grant so typos fail before
/// `setcap` runs. On Linux the names are parsed via the `caps` crate.
fn validate_capabilities(names: &[String]) -> Result<(), GrantError> {
    #[cfg(target_os = "linux")]
    for name in names {
        let normalized = name.trim().to_ascii_uppercase();
        Capability::from_str(&normalized)
            .map_err(|_| GrantError::InvalidCapability(name.clone()))?;
    }

    #[cfg(not(target_os = "linux"))]
    for name in names {
        if !name.trim().to_ascii_lowercase().starts_with("cap_") {
            return Err(GrantError::InvalidCapability(name.clone()));
        }
    }

    Ok(())
}

/// Attaches the capability set to the executable file via the host `setcap`
/// utility, run under the elevation prefix. An empty capability list is a
/// no-op grant. Fails if the executable does not exist or `setcap` reports
/// failure; either way no child is ever started after a failed grant.
pub fn grant(
    executable: &Path,
    capabilities: &[String],
    elevation: &[&str],
) -> Result<(), GrantError> {
    if capabilities.is_empty() {
        debug!("No capabilities requested; skipping grant");
        return Ok(());
    }

    if !executable.exists() {
        return Err(GrantError::MissingExecutable(executable.to_path_buf()));
    }

    validate_capabilities(capabilities)?;

    let cap_arg = format!("{}={}", capabilities.join(","), CAP_FLAGS);
    debug!("Running `setcap {cap_arg} {}`", executable.display());

    let status = elevated_command(elevation, "setcap")
        .arg(&cap_arg)
        .arg(executable)
        .status()?;

    if !status.success() {
        return Err(GrantError::SetcapFailed {
            executable: executable.display().to_string(),
            status: status.code(),
        });
    }

    info!("Attached '{cap_arg}' to {}", executable.display());
    Ok(())
}

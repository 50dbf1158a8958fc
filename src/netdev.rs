//! Virtual interface configuration through the host `ip` utility.
//!
//! The supervised child creates the TUN device; this module only addresses,
//! activates, and eventually deletes it. Existence checks go through sysfs so
//! a missing device fails fast instead of surfacing as an opaque `ip` error.

use std::{
    net::Ipv4Addr,
    path::Path,
    process::Command,
    thread,
    time::{Duration, Instant},
};

use tracing::{debug, info};

use crate::{constants::SYS_CLASS_NET, error::ConfigureError};

/// Builds a host command, prefixed with the elevation command when one is
/// configured.
pub(crate) fn elevated_command(elevation: &[&str], program: &str) -> Command {
    match elevation.split_first() {
        Some((head, rest)) => {
            let mut cmd = Command::new(head);
            cmd.args(rest);
            cmd.arg(program);
            cmd
        }
        None => Command::new(program),
    }
}

/// Returns whether the named interface currently exists on the host.
pub fn device_exists(interface: &str) -> bool {
    Path::new(SYS_CLASS_NET).join(interface).exists()
}

/// Polls until `path` exists or the timeout elapses. Split out from
/// [`wait_for_device`] so the wait logic is testable without a real device.
fn wait_for_path(path: &Path, timeout: Duration, interval: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if path.exists() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        thread::sleep(interval);
    }
}

/// Waits for the child to create the interface, polling sysfs at the given
/// interval. Bounded by `timeout` so a crashed child cannot block the session
/// indefinitely.
pub fn wait_for_device(
    interface: &str,
    timeout: Duration,
    interval: Duration,
) -> Result<(), ConfigureError> {
    let path = Path::new(SYS_CLASS_NET).join(interface);
    if wait_for_path(&path, timeout, interval) {
        debug!("Interface '{interface}' is present");
        Ok(())
    } else {
        Err(ConfigureError::DeviceWaitTimeout {
            interface: interface.to_string(),
            timeout,
        })
    }
}

/// Runs one `ip` invocation and maps a non-zero exit to a `ConfigureError`.
fn run_ip(elevation: &[&str], args: &[&str]) -> Result<(), ConfigureError> {
    let rendered = format!("ip {}", args.join(" "));
    debug!("Running `{rendered}`");

    let status = elevated_command(elevation, "ip")
        .args(args)
        .status()
        .map_err(|source| ConfigureError::CommandSpawn {
            command: rendered.clone(),
            source,
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(ConfigureError::CommandFailed {
            command: rendered,
            status: status.code(),
        })
    }
}

/// Assigns an IPv4 address to the interface. Fails with
/// [`ConfigureError::DeviceMissing`] if the interface does not exist yet.
pub fn add_address(
    elevation: &[&str],
    interface: &str,
    address: Ipv4Addr,
    prefix_len: u8,
) -> Result<(), ConfigureError> {
    if !device_exists(interface) {
        return Err(ConfigureError::DeviceMissing(interface.to_string()));
    }

    run_ip(
        elevation,
        &[
            "addr",
            "add",
            &format!("{address}/{prefix_len}"),
            "dev",
            interface,
        ],
    )?;
    info!("Assigned {address}/{prefix_len} to '{interface}'");
    Ok(())
}

/// Administratively activates the interface link. Idempotent: activating an
/// already-active interface succeeds and leaves link state unchanged.
pub fn set_link_up(elevation: &[&str], interface: &str) -> Result<(), ConfigureError> {
    if !device_exists(interface) {
        return Err(ConfigureError::DeviceMissing(interface.to_string()));
    }

    run_ip(elevation, &["link", "set", "up", "dev", interface])?;
    info!("Interface '{interface}' is up");
    Ok(())
}

/// Deletes the interface. An already-absent device is not an error, so a
/// teardown retried against a deleted interface stays silent.
pub fn delete_device(elevation: &[&str], interface: &str) -> Result<(), ConfigureError> {
    if !device_exists(interface) {
        debug!("Interface '{interface}' already absent; nothing to delete");
        return Ok(());
    }

    run_ip(elevation, &["link", "delete", "dev", interface])?;
    info!("Deleted interface '{interface}'");
    Ok(())
}

//! Constants and default session values for tunsup.
//!
//! This module centralizes the fixed defaults of a supervised session so the
//! tool runs with no flags at all when no configuration file is present.

use std::{net::Ipv4Addr, time::Duration};

// ============================================================================
// Configuration
// ============================================================================

/// Configuration file looked up in the working directory when `--config` is
/// not given.
pub const DEFAULT_CONFIG_FILE: &str = "tunsup.yaml";

/// Executable the session grants capabilities to and launches.
pub const DEFAULT_EXECUTABLE: &str = "target/release/tunnel";

/// Name of the virtual interface the supervised program creates.
pub const DEFAULT_INTERFACE: &str = "tun0";

/// IPv4 address assigned to the interface once it exists.
pub const DEFAULT_ADDRESS: Ipv4Addr = Ipv4Addr::new(192, 168, 0, 1);

/// Prefix length for the assigned address (a /24-equivalent mask).
pub const DEFAULT_PREFIX_LEN: u8 = 24;

/// Capabilities attached to the executable file before launch.
pub const DEFAULT_CAPABILITIES: &[&str] = &["cap_net_admin"];

// ============================================================================
// Host utilities
// ============================================================================

/// Elevation prefix for privileged host commands. `-n` keeps a misconfigured
/// sudo from blocking the session on a password prompt.
pub const ELEVATE_COMMAND: &[&str] = &["sudo", "-n"];

/// Shell used to launch the supervised executable.
pub const DEFAULT_SHELL: &str = "sh";

/// Shell argument flag for executing command strings.
pub const SHELL_COMMAND_FLAG: &str = "-c";

/// Flags applied to every granted capability (`effective`, `inheritable`,
/// `permitted`), matching what `setcap` expects.
pub const CAP_FLAGS: &str = "eip";

/// Sysfs directory listing the host's network interfaces.
pub const SYS_CLASS_NET: &str = "/sys/class/net";

// ============================================================================
// Timing
// ============================================================================

/// Maximum time to wait for the child to create the virtual interface.
pub const DEVICE_WAIT_TIMEOUT: Duration = Duration::from_millis(3000);

/// Polling interval while waiting for the interface to appear.
pub const DEVICE_POLL_INTERVAL: Duration = Duration::from_millis(50);

// ============================================================================
// Exit codes
// ============================================================================

/// Exit code reported after a signal-driven teardown completes.
pub const SIGNAL_EXIT_CODE: i32 = 130;

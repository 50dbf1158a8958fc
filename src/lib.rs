//! Tunsup supervises a privileged, network-facing program that owns a
//! TUN-style virtual interface. It attaches a minimal file-capability set to
//! the executable, launches it as a background child, assigns an address to
//! the virtual interface once the child has created it, blocks until the
//! child exits, and tears both the child and the interface down when a
//! termination signal arrives.

/// CLI interface.
pub mod cli;

/// Signal-driven session teardown.
pub mod cleanup;

/// Configuration management.
pub mod config;

/// Constants and default session values.
pub mod constants;

/// Error handling.
pub mod error;

/// Child output capture.
pub mod logs;

/// Virtual interface configuration.
pub mod netdev;

/// File-capability grants.
pub mod privilege;

/// Session orchestration and child supervision.
pub mod session;

#[cfg(test)]
mod test_utils;

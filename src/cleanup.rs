//! Signal-driven session teardown.
//!
//! A [`CleanupGuard`] is armed before the child starts and listens for
//! termination signals. Its teardown routine stops the child and deletes the
//! virtual interface, guarded by an atomic state machine so repeated signals
//! cannot double-delete the device. If the child exits on its own the guard
//! never leaves [`CleanupState::Armed`] and the interface stays configured.

use std::sync::{
    Arc,
    atomic::{AtomicI32, AtomicU8, Ordering},
};

use tracing::{debug, info, warn};

use crate::{
    config::SessionConfig,
    constants::{ELEVATE_COMMAND, SIGNAL_EXIT_CODE},
    netdev,
    session::send_sigterm,
};

/// Lifecycle of the teardown routine. Transitions are strictly forward and
/// occur at most once per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CleanupState {
    /// Listening for termination signals; the default state.
    Armed = 0,
    /// A signal (or a strict-mode abort) claimed the teardown.
    Triggered = 1,
    /// The teardown body is running.
    Executing = 2,
    /// Terminal state; the child was signalled and the interface deleted.
    Done = 3,
}

impl CleanupState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => CleanupState::Armed,
            1 => CleanupState::Triggered,
            2 => CleanupState::Executing,
            _ => CleanupState::Done,
        }
    }
}

/// Owns the single-session teardown state shared between the control thread
/// and the signal listener.
pub struct CleanupGuard {
    state: AtomicU8,
    /// PID of the supervised child; 0 until the child has been started.
    child_pid: AtomicI32,
    interface: String,
    elevate: bool,
}

impl CleanupGuard {
    /// Creates an unarmed guard for the session's interface.
    pub fn new(config: &SessionConfig) -> Arc<Self> {
        Arc::new(Self {
            state: AtomicU8::new(CleanupState::Armed as u8),
            child_pid: AtomicI32::new(0),
            interface: config.interface.clone(),
            elevate: config.elevate,
        })
    }

    /// Registers the termination-signal listener. Must be called before the
    /// child starts so no signal window exists where the child is untracked.
    pub fn arm(self: &Arc<Self>) -> Result<(), ctrlc::Error> {
        let guard = Arc::clone(self);
        ctrlc::set_handler(move || {
            info!("Termination signal received; tearing session down");
            guard.trigger();
            std::process::exit(SIGNAL_EXIT_CODE);
        })
    }

    /// Records the child PID once the supervisor has started it.
    pub fn record_child(&self, pid: u32) {
        self.child_pid.store(pid as i32, Ordering::SeqCst);
    }

    /// The recorded child PID, 0 when no child has been recorded yet.
    pub(crate) fn recorded_child(&self) -> i32 {
        self.child_pid.load(Ordering::SeqCst)
    }

    /// Current state of the teardown machine.
    pub fn state(&self) -> CleanupState {
        CleanupState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// Runs the teardown exactly once: best-effort SIGTERM to the child, then
    /// interface deletion. Returns `true` if this call performed the
    /// teardown; later calls return `false` without touching the child or
    /// the device.
    pub fn trigger(&self) -> bool {
        if self
            .state
            .compare_exchange(
                CleanupState::Armed as u8,
                CleanupState::Triggered as u8,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_err()
        {
            debug!("Teardown already claimed; ignoring trigger");
            return false;
        }

        self.state
            .store(CleanupState::Executing as u8, Ordering::SeqCst);

        let pid = self.child_pid.load(Ordering::SeqCst);
        if pid > 0 {
            send_sigterm(pid);
        } else {
            debug!("No child recorded; skipping stop request");
        }

        let elevation: &[&str] = if self.elevate { ELEVATE_COMMAND } else { &[] };
        if let Err(err) = netdev::delete_device(elevation, &self.interface) {
            // Teardown is best-effort; the failure only surfaces in the log.
            warn!("Failed to delete interface '{}': {err}", self.interface);
        }

        self.state.store(CleanupState::Done as u8, Ordering::SeqCst);
        true
    }
}

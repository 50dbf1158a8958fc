//! Session orchestration and child supervision.
//!
//! A [`Session`] runs the whole supervised lifecycle: capability grant, arm
//! the cleanup guard, launch the child, configure the virtual interface, and
//! block until the child exits. The session context owns the child handle and
//! the cleanup state; nothing lives in process-wide globals.

use std::{
    os::unix::process::{CommandExt, ExitStatusExt},
    process::{Child, Command, ExitStatus, Stdio},
    sync::Arc,
    thread,
};

use nix::{
    errno::Errno,
    sys::signal::{self, Signal},
    unistd::Pid,
};
use tracing::{debug, error, info, warn};

use crate::{
    cleanup::CleanupGuard,
    config::{ConfigureFailureMode, SessionConfig},
    constants::{DEFAULT_SHELL, DEVICE_POLL_INTERVAL, SHELL_COMMAND_FLAG},
    error::{ConfigureError, SessionError},
    logs::spawn_log_writer,
    netdev, privilege,
};

/// Best-effort SIGTERM delivery to the child's process group, falling back to
/// a direct signal when the group is unreachable. Reaping is left to whoever
/// holds the [`ChildHandle`].
pub(crate) fn send_sigterm(pid: i32) {
    let target = Pid::from_raw(pid);
    match signal::killpg(target, Signal::SIGTERM) {
        Ok(()) => debug!("Sent SIGTERM to process group {pid}"),
        Err(Errno::ESRCH) => debug!("Child {pid} no longer has a live process"),
        Err(err) => {
            warn!("Failed to signal process group {pid}: {err}; trying direct signal");
            match signal::kill(target, Signal::SIGTERM) {
                Ok(()) | Err(Errno::ESRCH) => {}
                Err(err) => warn!("Failed to signal child {pid}: {err}"),
            }
        }
    }
}

/// Handle to the supervised child process. Exactly one exists per session.
pub struct ChildHandle {
    child: Child,
    pid: u32,
    log_writers: Vec<thread::JoinHandle<()>>,
}

impl ChildHandle {
    /// Process identifier recorded at launch.
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Blocks the calling thread until the child terminates, by any means,
    /// and returns its exit status. Buffered child output is drained into the
    /// log files before this returns.
    pub fn wait(&mut self) -> std::io::Result<ExitStatus> {
        let status = self.child.wait()?;
        for writer in self.log_writers.drain(..) {
            let _ = writer.join();
        }
        Ok(status)
    }

    /// Sends a termination request to the child. Best-effort: delivery is
    /// attempted once and the child is not synchronously reaped.
    pub fn stop(&self) {
        send_sigterm(self.pid as i32);
    }
}

/// Renders the shell command line that launches the executable, prefixed with
/// the elevation command when one is configured.
fn launch_command(elevation: &[&str], executable: &str) -> String {
    let mut parts: Vec<&str> = elevation.to_vec();
    parts.push(executable);
    parts.join(" ")
}

/// Maps an exit status to a process exit code, following the shell convention
/// of `128 + signal` for signal deaths.
fn exit_code_from(status: ExitStatus) -> i32 {
    match status.code() {
        Some(code) => code,
        None => 128 + status.signal().unwrap_or(0),
    }
}

/// One supervised session: owns the configuration and the cleanup guard.
pub struct Session {
    config: SessionConfig,
    cleanup: Arc<CleanupGuard>,
}

impl Session {
    /// Builds a session context from a loaded configuration.
    pub fn new(config: SessionConfig) -> Self {
        let cleanup = CleanupGuard::new(&config);
        Self { config, cleanup }
    }

    /// Runs the session to completion and returns the exit code to report:
    /// the child's own status when it exits without an external signal, or
    /// the strict-mode error path when configuration fails and
    /// `on_configure_error` is `abort`. A signal-driven teardown exits from
    /// the cleanup guard and never returns here.
    pub fn run(self) -> Result<i32, SessionError> {
        privilege::grant(
            &self.config.executable,
            &self.config.capabilities,
            self.config.elevation_prefix(),
        )?;

        // The listener is registered before launch; start records the pid
        // with the guard as soon as the spawn returns.
        self.cleanup.arm()?;

        let mut handle = self.start()?;
        info!(
            "Supervising '{}' (PID {}) on interface '{}'",
            self.config.executable.display(),
            handle.pid(),
            self.config.interface,
        );

        if let Err(err) = self.configure() {
            match self.config.on_configure_error {
                ConfigureFailureMode::Abort => {
                    error!("Interface configuration failed: {err}; aborting session");
                    self.cleanup.trigger();
                    let _ = handle.wait();
                    return Err(err.into());
                }
                ConfigureFailureMode::Continue => {
                    warn!("Interface configuration failed: {err}; child left running");
                }
            }
        }

        let status = handle.wait().map_err(|source| SessionError::Wait { source })?;
        // The child exited on its own; the cleanup guard stays armed and the
        // interface is deliberately left configured.
        info!("Child exited with {status}");
        Ok(exit_code_from(status))
    }

    /// Launches the executable as a background child in its own process group
    /// through the shell, under the elevation prefix. The pid is recorded
    /// with the cleanup guard directly after the spawn, keeping the window in
    /// which a signal could find an untracked child as small as possible.
    /// Stdout and stderr are piped into the session log files.
    fn start(&self) -> Result<ChildHandle, SessionError> {
        let executable = self.config.executable.display().to_string();
        let command = launch_command(self.config.elevation_prefix(), &executable);
        debug!("Launching `{command}`");

        let mut cmd = Command::new(DEFAULT_SHELL);
        cmd.arg(SHELL_COMMAND_FLAG).arg(&command);
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());

        unsafe {
            cmd.pre_exec(|| {
                // Own process group, so a stop request can signal the whole
                // tree without touching the supervisor's group.
                if libc::setpgid(0, 0) < 0 {
                    return Err(std::io::Error::last_os_error());
                }
                Ok(())
            });
        }

        let mut child = cmd.spawn().map_err(|source| SessionError::Launch {
            executable: executable.clone(),
            source,
        })?;
        let pid = child.id();
        self.cleanup.record_child(pid);
        debug!("Child started with PID {pid}");

        let mut log_writers = Vec::new();
        if let Some(stdout) = child.stdout.take() {
            log_writers.push(spawn_log_writer(stdout, "stdout"));
        }
        if let Some(stderr) = child.stderr.take() {
            log_writers.push(spawn_log_writer(stderr, "stderr"));
        }

        Ok(ChildHandle {
            child,
            pid,
            log_writers,
        })
    }

    /// Waits for the interface to appear, then addresses and activates it.
    fn configure(&self) -> Result<(), ConfigureError> {
        let elevation = self.config.elevation_prefix();

        netdev::wait_for_device(
            &self.config.interface,
            self.config.device_wait(),
            DEVICE_POLL_INTERVAL,
        )?;
        netdev::add_address(
            elevation,
            &self.config.interface,
            self.config.address,
            self.config.prefix_len,
        )?;
        netdev::set_link_up(elevation, &self.config.interface)?;
        Ok(())
    }
}

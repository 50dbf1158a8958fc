#![allow(dead_code)]

use std::{
    thread,
    time::{Duration, Instant},
};

use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind};

/// Returns whether any process on the host carries `marker` in its command
/// line. Markers are chosen to be unique per test (e.g. odd sleep durations)
/// so scans do not collide with unrelated processes. Command lines are only
/// populated when the refresh kind asks for them explicitly.
pub fn process_with_marker_alive(marker: &str) -> bool {
    let mut system = System::new();
    system.refresh_processes_specifics(
        ProcessesToUpdate::All,
        true,
        ProcessRefreshKind::nothing().with_cmd(UpdateKind::Always),
    );
    system.processes().values().any(|process| {
        process
            .cmd()
            .iter()
            .any(|arg| arg.to_string_lossy().contains(marker))
    })
}

/// Polls until the predicate holds or the timeout elapses.
pub fn wait_until<F>(timeout: Duration, mut predicate: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = Instant::now() + timeout;
    loop {
        if predicate() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        thread::sleep(Duration::from_millis(50));
    }
}

use std::{
    env,
    ffi::OsString,
    path::Path,
    sync::{Mutex, MutexGuard, OnceLock},
};

/// Global lock for environment variable modifications in tests.
/// All tests that modify environment variables (especially HOME) should
/// acquire this lock to prevent races between parallel test executions.
pub static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

pub fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Redirects HOME to a test directory for the guard's lifetime, holding the
/// env lock so parallel tests cannot observe the override.
pub struct HomeGuard {
    previous: Option<OsString>,
    _lock: MutexGuard<'static, ()>,
}

impl HomeGuard {
    pub fn set(home: &Path) -> Self {
        let lock = env_lock();
        let previous = env::var_os("HOME");
        unsafe {
            env::set_var("HOME", home);
        }
        Self {
            previous,
            _lock: lock,
        }
    }
}

impl Drop for HomeGuard {
    fn drop(&mut self) {
        match &self.previous {
            Some(value) => unsafe { env::set_var("HOME", value) },
            None => unsafe { env::remove_var("HOME") },
        }
    }
}

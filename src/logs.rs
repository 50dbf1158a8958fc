//! Child output capture for the supervised process.
use std::{
    env, fs,
    io::{BufRead, BufReader, Read, Write},
    path::PathBuf,
    thread,
};

use tracing::warn;

/// Directory where child output logs are written.
pub fn log_dir() -> PathBuf {
    let home = env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("/"));
    home.join(".local/share/tunsup/logs")
}

/// Resolves the log file path for one output stream of the child.
pub fn resolve_log_path(stream: &str) -> PathBuf {
    log_dir().join(format!("child.{stream}.log"))
}

/// Copies a child output stream into its log file on a background thread.
/// The thread owns its pipe end and exits when the child closes it; joining
/// the returned handle after reaping the child drains any buffered output.
pub fn spawn_log_writer<R>(source: R, stream: &'static str) -> thread::JoinHandle<()>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let path = resolve_log_path(stream);
        if let Some(parent) = path.parent()
            && let Err(err) = fs::create_dir_all(parent)
        {
            warn!("Failed to create log dir {}: {err}", parent.display());
            return;
        }

        let mut file = match fs::OpenOptions::new().create(true).append(true).open(&path)
        {
            Ok(file) => file,
            Err(err) => {
                warn!("Failed to open log file {}: {err}", path.display());
                return;
            }
        };

        let reader = BufReader::new(source);
        for line in reader.lines() {
            match line {
                Ok(line) => {
                    if writeln!(file, "{line}").is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    })
}

//! Process restart scheduling
//!
//! Restart is the supervisor's job; the gateway only asks for it. The
//! [`ProcessController`] trait keeps the supervisor pluggable and lets tests
//! observe restart requests without touching any process.

use std::process::Command;

use parking_lot::Mutex;

/// External process supervisor contract
pub trait ProcessController: Send + Sync {
    /// Request a restart of the supervised process identified by `key`
    fn restart(&self, key: &str);
}

/// Shells out to a supervisor CLI, e.g. `pm2 restart <key>`
pub struct ShellRestart {
    program: String,
}

impl ShellRestart {
    /// Use the given supervisor program
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for ShellRestart {
    fn default() -> Self {
        Self::new("pm2")
    }
}

impl ProcessController for ShellRestart {
    fn restart(&self, key: &str) {
        match Command::new(&self.program).arg("restart").arg(key).spawn() {
            Ok(child) => {
                tracing::info!(program = %self.program, key = %key, pid = child.id(), "Restart requested");
            }
            Err(e) => {
                tracing::warn!(program = %self.program, key = %key, error = %e, "Restart command failed");
            }
        }
    }
}

/// Records restart requests instead of executing them
#[derive(Default)]
pub struct NoopRestart {
    requests: Mutex<Vec<String>>,
}

impl NoopRestart {
    /// Create a recorder with no requests
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys restart was requested for, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }
}

impl ProcessController for NoopRestart {
    fn restart(&self, key: &str) {
        self.requests.lock().push(key.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_records_requests() {
        let controller = NoopRestart::new();
        controller.restart("gateway");
        controller.restart("driver");

        assert_eq!(controller.requests(), vec!["gateway", "driver"]);
    }
}

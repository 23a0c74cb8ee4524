use super::platform;

#[derive(Debug)]
pub enum KillResult {
    Success(u32, &'static str),
    Failed(u32, String),
}

/// Send a termination request to `pid`. Fire-and-forget: the process is not
/// waited on.
pub fn kill_process(pid: u32) -> KillResult {
    match platform::send_terminate(pid) {
        Ok(()) => {
            tracing::info!(pid, "sent SIGTERM");
            KillResult::Success(pid, "SIGTERM")
        }
        Err(err) => {
            tracing::warn!(pid, %err, "failed to send SIGTERM");
            KillResult::Failed(pid, format!("Failed to send SIGTERM to PID {pid}: {err}"))
        }
    }
}

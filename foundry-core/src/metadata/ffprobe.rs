use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use super::probe::{MediaProbe, ProbeOutput};
use crate::error::ProbeError;

pub const DEFAULT_FFPROBE_PROGRAM: &str = "ffprobe";
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(30);

/// [`MediaProbe`] backed by the `ffprobe` command line tool.
#[derive(Debug, Clone)]
pub struct FfprobeProbe {
    program: PathBuf,
    timeout: Option<Duration>,
}

impl Default for FfprobeProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl FfprobeProbe {
    pub fn new() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_FFPROBE_PROGRAM),
            timeout: Some(DEFAULT_PROBE_TIMEOUT),
        }
    }

    /// Use a specific ffprobe binary instead of the one on `PATH`.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Bound each invocation; `None` waits indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn command(&self, file_path: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(["-v", "error", "-print_format", "json", "-show_streams"])
            .arg(file_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Abandoned scans must not leave ffprobe processes behind.
            .kill_on_drop(true);
        command
    }
}

#[async_trait]
impl MediaProbe for FfprobeProbe {
    async fn probe(&self, path: &Path) -> Result<ProbeOutput, ProbeError> {
        let mut command = self.command(path);
        let run = command.output();

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, run)
                .await
                .map_err(|_| ProbeError::Timeout(limit))?,
            None => run.await,
        }
        .map_err(|source| ProbeError::Spawn {
            program: self.program.display().to_string(),
            source,
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProbeError::Exited {
                status: output.status,
                stderr: stderr.trim().to_string(),
            });
        }

        let parsed: ProbeOutput = serde_json::from_slice(&output.stdout)?;
        tracing::trace!(
            target: "foundry::probe",
            path = %path.display(),
            streams = parsed.streams.len(),
            "probed media file"
        );
        Ok(parsed)
    }
}

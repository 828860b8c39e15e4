//! Oracle backed by an external program speaking JSON over stdio.

use std::{process::Stdio, time::Duration};

use async_trait::async_trait;
use log::debug;
use tokio::{io::AsyncWriteExt, process::Command, time};

use super::{GenerationOracle, OracleError, OracleRequest, OracleResponse};

/// Default time budget for one oracle invocation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs a program, writes the [`OracleRequest`] as JSON to its stdin and
/// reads an [`OracleResponse`] as JSON from its stdout.
///
/// A non-zero exit status is reported as [`OracleError::Failed`] with the
/// program's stderr. The child is killed if the time budget runs out.
#[derive(Debug, Clone)]
pub struct CommandOracle {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandOracle {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn run(&self, input: Vec<u8>) -> Result<Vec<u8>, OracleError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| OracleError::Unavailable(format!("{}: {e}", self.program)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(&input)
                .await
                .map_err(|e| OracleError::Unavailable(format!("failed to write request: {e}")))?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| OracleError::Unavailable(format!("failed to read response: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OracleError::Failed(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }
        Ok(output.stdout)
    }
}

#[async_trait]
impl GenerationOracle for CommandOracle {
    async fn generate(&self, request: &OracleRequest) -> Result<OracleResponse, OracleError> {
        let input =
            serde_json::to_vec(request).map_err(|e| OracleError::Malformed(e.to_string()))?;
        debug!("Invoking oracle command '{}'", self.program);

        let stdout = time::timeout(self.timeout, self.run(input))
            .await
            .map_err(|_| OracleError::Timeout(self.timeout))??;

        serde_json::from_slice(&stdout).map_err(|e| OracleError::Malformed(e.to_string()))
    }
}

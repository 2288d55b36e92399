//! Oracle adapter that runs a local scoring command.
//!
//! Protocol: source text on stdin, flags as arguments
//! (`--extension <ext> --typescript <bool> --flow false`), a JSON
//! `ComplexityMetrics` document on stdout.

use std::process::Stdio;

use tokio::{io::AsyncWriteExt, process::Command};
use tracing::debug;

use crate::errors::OracleError;
use crate::oracle::{ComplexityMetrics, ComplexityOracle, OracleRequest};

/// A scoring command split into program and fixed leading arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOracle {
    program: String,
    args: Vec<String>,
}

impl CommandOracle {
    /// Splits a command line on whitespace, e.g. `node scripts/score.js`.
    pub fn parse(command_line: &str) -> Result<Self, OracleError> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or(OracleError::NotConfigured)?;

        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    fn request_args(request: &OracleRequest) -> [String; 6] {
        [
            "--extension".into(),
            request.extension.clone(),
            "--typescript".into(),
            request.is_typescript.to_string(),
            "--flow".into(),
            request.enable_flow.to_string(),
        ]
    }
}

impl ComplexityOracle for CommandOracle {
    async fn score(
        &self,
        text: &str,
        request: &OracleRequest,
    ) -> Result<ComplexityMetrics, OracleError> {
        debug!(program = %self.program, ext = %request.extension, "running oracle command");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .args(Self::request_args(request))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        // stdin is fed while stdout/stderr are drained, so a chatty oracle
        // cannot fill a pipe and stall both sides
        let stdin = child.stdin.take();
        let feed = async move {
            if let Some(mut stdin) = stdin {
                stdin.write_all(text.as_bytes()).await?;
                // closing stdin signals end of input
                drop(stdin);
            }
            Ok::<_, std::io::Error>(())
        };

        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        let output = output?;
        if !output.status.success() {
            return Err(OracleError::ExitStatus {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        fed?;

        Ok(serde_json::from_slice(&output.stdout)?)
    }
}

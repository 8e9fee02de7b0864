// cli_check.rs - Provider command-line cross-checks
// Purpose: Run `aws`, `gsutil` and `az` against a bucket name as opaque
//          subprocesses. Every failure mode is a value, never an Err.

use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

/// Exit code recorded when the tool never produced one
const NO_EXIT_CODE: i32 = -1;

/// How a provider tool invocation ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CliStatus {
    Success,
    NonZeroExit { code: i32 },
    Timeout,
    InvocationError { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CliCheckResult {
    pub command: String,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    pub return_code: i32,
    pub error: Option<String>,
    pub status: CliStatus,
}

impl CliCheckResult {
    pub fn from_status(command: String, status: CliStatus, stdout: String, stderr: String) -> Self {
        let (success, return_code, error, stderr) = match &status {
            CliStatus::Success => (true, 0, None, stderr),
            CliStatus::NonZeroExit { code } => (false, *code, None, stderr),
            CliStatus::Timeout => (
                false,
                NO_EXIT_CODE,
                Some("Command timeout".to_string()),
                "Timeout".to_string(),
            ),
            CliStatus::InvocationError { message } => {
                (false, NO_EXIT_CODE, Some(message.clone()), message.clone())
            }
        };

        Self {
            command,
            success,
            stdout,
            stderr,
            return_code,
            error,
            status,
        }
    }
}

/// One external tool call: program plus argument vector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliInvocation {
    pub program: String,
    pub args: Vec<String>,
    pub label: &'static str,
}

impl CliInvocation {
    /// `aws s3 ls s3://<bucket>`, optionally unsigned or with a named profile
    pub fn aws_s3_ls(bucket: &str, no_sign_request: bool, profile: Option<&str>) -> Self {
        let mut args = vec!["s3".to_string(), "ls".to_string(), format!("s3://{}", bucket)];
        if no_sign_request {
            args.push("--no-sign-request".to_string());
        }
        if let Some(profile) = profile {
            args.push("--profile".to_string());
            args.push(profile.to_string());
        }

        Self {
            program: "aws".to_string(),
            args,
            label: if no_sign_request { "AWS CLI (public)" } else { "AWS CLI (authenticated)" },
        }
    }

    pub fn gsutil_ls(bucket: &str) -> Self {
        Self {
            program: "gsutil".to_string(),
            args: vec!["ls".to_string(), format!("gs://{}", bucket)],
            label: "GCP CLI",
        }
    }

    pub fn az_blob_list(container: &str) -> Self {
        Self {
            program: "az".to_string(),
            args: vec![
                "storage".to_string(),
                "blob".to_string(),
                "list".to_string(),
                "--container-name".to_string(),
                container.to_string(),
            ],
            label: "Azure CLI",
        }
    }

    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Checks run for every name, in order: AWS authenticated, AWS unsigned, GCP, Azure.
/// The credential profile only applies to the authenticated AWS call.
pub fn standard_invocations(bucket: &str, aws_profile: Option<&str>) -> Vec<CliInvocation> {
    vec![
        CliInvocation::aws_s3_ls(bucket, false, aws_profile),
        CliInvocation::aws_s3_ls(bucket, true, None),
        CliInvocation::gsutil_ls(bucket),
        CliInvocation::az_blob_list(bucket),
    ]
}

#[async_trait]
pub trait CliRunner: Send + Sync {
    async fn run(&self, invocation: &CliInvocation) -> CliCheckResult;
}

/// Runs the real binaries with a bounded timeout
pub struct SystemCliRunner {
    timeout: Duration,
}

impl SystemCliRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl CliRunner for SystemCliRunner {
    async fn run(&self, invocation: &CliInvocation) -> CliCheckResult {
        let command = invocation.command_line();
        debug!("running {}", command);

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        match timeout(self.timeout, cmd.output()).await {
            Err(_) => CliCheckResult::from_status(command, CliStatus::Timeout, String::new(), String::new()),
            Ok(Err(e)) => CliCheckResult::from_status(
                command,
                CliStatus::InvocationError {
                    message: e.to_string(),
                },
                String::new(),
                String::new(),
            ),
            Ok(Ok(output)) => {
                let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
                let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
                let status = match output.status.code() {
                    Some(0) => CliStatus::Success,
                    Some(code) => CliStatus::NonZeroExit { code },
                    // Terminated by a signal
                    None => CliStatus::NonZeroExit { code: NO_EXIT_CODE },
                };
                CliCheckResult::from_status(command, status, stdout, stderr)
            }
        }
    }
}

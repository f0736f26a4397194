//! Direct item manipulation through the external CRUD tool.

use std::path::Path;

use super::checker::Verifier;
use super::types::VerifyError;

/// Operations the manipulation tool supports. The enum makes an unknown
/// operation unrepresentable at this boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManipOp {
    Read,
    Delete,
}

impl ManipOp {
    pub fn as_str(self) -> &'static str {
        match self {
            ManipOp::Read => "read",
            ManipOp::Delete => "delete",
        }
    }
}

const LOG_TAIL_LINES: usize = 5;

impl Verifier {
    /// Runs the manipulation tool for one object and returns its stdout.
    ///
    /// A non-zero exit becomes [`VerifyError::ToolInvocation`] carrying the
    /// exit code and the tail of the worker log for operators.
    pub async fn manipulate_item(
        &self,
        object_id: &str,
        namespace: &str,
        operation: ManipOp,
    ) -> Result<String, VerifyError> {
        let tool = &self.config.manipulation_tool;
        tracing::info!(
            operation = operation.as_str(),
            namespace,
            pid = object_id,
            "running item manipulation"
        );

        let output = tokio::process::Command::new(tool)
            .arg("-u")
            .arg("1")
            .arg(&self.config.manipulation_subcommand)
            .arg(format!("--pid={namespace}:{object_id}"))
            .arg(format!("--operation={}", operation.as_str()))
            .arg(format!("--root={}", self.config.drupal_root))
            .output()
            .await
            .map_err(|source| VerifyError::Launch {
                tool: tool.clone(),
                source,
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            tracing::error!(
                code,
                stdout = %String::from_utf8_lossy(&output.stdout),
                stderr = %String::from_utf8_lossy(&output.stderr),
                "manipulation tool failed"
            );
            let log_tail = self
                .config
                .worker_log
                .as_deref()
                .map(|path| tail_lines(path, LOG_TAIL_LINES))
                .unwrap_or_default();
            return Err(VerifyError::ToolInvocation {
                tool: tool.clone(),
                code,
                log_tail,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Last `count` lines of a log file; empty when the file is unreadable.
fn tail_lines(path: &Path, count: usize) -> Vec<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let lines: Vec<&str> = content.lines().collect();
            let start = lines.len().saturating_sub(count);
            lines[start..].iter().map(|line| line.to_string()).collect()
        }
        Err(err) => {
            tracing::warn!("could not read worker log {}: {err}", path.display());
            Vec::new()
        }
    }
}

//! Fixture task execution abstraction

use async_trait::async_trait;
use labrat_core::{LabratError, Result};
use std::path::{Path, PathBuf};
use std::process::Output;
use std::sync::Mutex;
use tokio::process::Command;
use tracing::debug;

/// Output from an external fixture task
#[derive(Debug, Clone)]
pub struct TaskOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
}

impl TaskOutput {
    pub fn ok(stdout: &str) -> Self {
        Self {
            stdout: stdout.to_string(),
            stderr: String::new(),
            success: true,
        }
    }

    pub fn failed(stderr: &str) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.to_string(),
            success: false,
        }
    }
}

impl From<Output> for TaskOutput {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
        }
    }
}

/// Trait for executing fixture tasks (allows mocking in tests)
#[async_trait]
pub trait TaskExecutor: Send + Sync {
    /// Run a shell script from the project root
    async fn run_script(&self, script: &Path) -> Result<TaskOutput>;

    /// Run SQL against the test database
    async fn run_sql(&self, sql: &str) -> Result<TaskOutput>;
}

/// Real executor: shell scripts via bash, SQL via psql inside the database
/// container
#[derive(Clone)]
pub struct DockerPsqlExecutor {
    container: String,
    db_user: String,
    db_name: String,
    project_root: PathBuf,
}

impl DockerPsqlExecutor {
    pub fn new(
        container: impl Into<String>,
        db_user: impl Into<String>,
        db_name: impl Into<String>,
        project_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            container: container.into(),
            db_user: db_user.into(),
            db_name: db_name.into(),
            project_root: project_root.into(),
        }
    }

    /// Executor against the stock local deployment
    pub fn local_default(project_root: impl Into<PathBuf>) -> Self {
        Self::new(
            "openelisglobal-database",
            "clinlims",
            "clinlims",
            project_root,
        )
    }
}

#[async_trait]
impl TaskExecutor for DockerPsqlExecutor {
    async fn run_script(&self, script: &Path) -> Result<TaskOutput> {
        debug!("Running fixture script {}", script.display());

        let output = Command::new("bash")
            .arg(script)
            .current_dir(&self.project_root)
            .output()
            .await
            .map_err(|e| {
                LabratError::Fixture(format!("Failed to run {}: {}", script.display(), e))
            })?;

        Ok(TaskOutput::from(output))
    }

    async fn run_sql(&self, sql: &str) -> Result<TaskOutput> {
        debug!("Running fixture SQL in container {}", self.container);

        let output = Command::new("docker")
            .args([
                "exec",
                "-i",
                &self.container,
                "psql",
                "-U",
                &self.db_user,
                "-d",
                &self.db_name,
                "-t",
                "-c",
                sql,
            ])
            .current_dir(&self.project_root)
            .output()
            .await
            .map_err(|e| LabratError::Fixture(format!("Failed to execute psql: {}", e)))?;

        Ok(TaskOutput::from(output))
    }
}

/// Mock executor recording every call, for unit tests
#[derive(Default)]
pub struct MockTaskExecutor {
    script_calls: Mutex<Vec<PathBuf>>,
    sql_calls: Mutex<Vec<String>>,
    script_response: Mutex<Option<Result<TaskOutput>>>,
    sql_responses: Mutex<Vec<Result<TaskOutput>>>,
}

impl MockTaskExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Response for the next `run_script` call (default: success)
    pub fn with_script_response(self, response: Result<TaskOutput>) -> Self {
        *self.script_response.lock().unwrap_or_else(|p| p.into_inner()) = Some(response);
        self
    }

    /// Queue a response for `run_sql` calls, consumed in order
    /// (default once drained: success with empty output)
    pub fn with_sql_response(self, response: Result<TaskOutput>) -> Self {
        self.sql_responses.lock().unwrap_or_else(|p| p.into_inner()).push(response);
        self
    }

    pub fn script_calls(&self) -> Vec<PathBuf> {
        self.script_calls.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    pub fn sql_calls(&self) -> Vec<String> {
        self.sql_calls.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }
}

#[async_trait]
impl TaskExecutor for MockTaskExecutor {
    async fn run_script(&self, script: &Path) -> Result<TaskOutput> {
        self.script_calls
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(script.to_path_buf());
        match self.script_response.lock().unwrap_or_else(|p| p.into_inner()).take() {
            Some(response) => response,
            None => Ok(TaskOutput::ok("")),
        }
    }

    async fn run_sql(&self, sql: &str) -> Result<TaskOutput> {
        self.sql_calls
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(sql.to_string());
        let mut responses = self.sql_responses.lock().unwrap_or_else(|p| p.into_inner());
        if responses.is_empty() {
            Ok(TaskOutput::ok(""))
        } else {
            responses.remove(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_records_calls() {
        let executor = MockTaskExecutor::new();
        executor
            .run_script(Path::new("load-test-fixtures.sh"))
            .await
            .unwrap();
        executor.run_sql("SELECT 1;").await.unwrap();

        assert_eq!(
            executor.script_calls(),
            vec![PathBuf::from("load-test-fixtures.sh")]
        );
        assert_eq!(executor.sql_calls(), vec!["SELECT 1;".to_string()]);
    }

    #[tokio::test]
    async fn test_mock_queued_sql_responses() {
        let executor = MockTaskExecutor::new()
            .with_sql_response(Ok(TaskOutput::ok(" 3")))
            .with_sql_response(Ok(TaskOutput::failed("connection refused")));

        let first = executor.run_sql("SELECT COUNT(*) ...").await.unwrap();
        assert!(first.success);
        assert_eq!(first.stdout, " 3");

        let second = executor.run_sql("SELECT COUNT(*) ...").await.unwrap();
        assert!(!second.success);
    }
}

//! The three fixture operations: load, existence probe, clean

use labrat_core::{FixtureToggles, LabratError, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::executor::TaskExecutor;

/// What to do when a fixture task fails at runtime
///
/// Missing prerequisites (loader script not on disk) are configuration
/// errors and always fatal; this policy covers execution failures only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log and swallow; the suite continues. Fixtures are idempotent and
    /// often already present, so a transient load error should not take the
    /// whole run down.
    #[default]
    Lenient,
    /// Propagate, failing the suite. For CI gating.
    Strict,
}

impl FailurePolicy {
    pub fn from_toggles(toggles: &FixtureToggles) -> Self {
        if toggles.strict {
            Self::Strict
        } else {
            Self::Lenient
        }
    }
}

/// Test rows are namespaced by these prefixes and fixed id ranges so `clean`
/// can never touch non-test data.
pub const TEST_DATA_PREFIXES: [&str; 2] = ["E2E-", "TEST-"];

/// Seed rooms the existence probe looks for
const SEED_ROOM_CODES: &str = "'MAIN', 'SEC', 'INACTIVE'";

/// Deletion order matters: children before parents, to satisfy referential
/// constraints.
const CLEAN_STATEMENTS: [&str; 13] = [
    "DELETE FROM sample_storage_movement WHERE sample_id IN (SELECT id FROM sample WHERE accession_number LIKE 'E2E-%' OR accession_number LIKE 'TEST-%');",
    "DELETE FROM sample_storage_assignment WHERE sample_id IN (SELECT id FROM sample WHERE accession_number LIKE 'E2E-%' OR accession_number LIKE 'TEST-%');",
    "DELETE FROM sample_human WHERE samp_id IN (SELECT id FROM sample WHERE accession_number LIKE 'E2E-%' OR accession_number LIKE 'TEST-%');",
    "DELETE FROM sample_item WHERE samp_id IN (SELECT id FROM sample WHERE accession_number LIKE 'E2E-%' OR accession_number LIKE 'TEST-%');",
    "DELETE FROM sample WHERE accession_number LIKE 'E2E-%' OR accession_number LIKE 'TEST-%';",
    "DELETE FROM patient_identity WHERE patient_id IN (SELECT id FROM patient WHERE external_id LIKE 'E2E-%');",
    "DELETE FROM patient WHERE external_id LIKE 'E2E-%';",
    "DELETE FROM person WHERE id IN (SELECT person_id FROM patient WHERE external_id LIKE 'E2E-%' UNION SELECT id FROM person WHERE last_name LIKE 'E2E-%');",
    "DELETE FROM storage_position WHERE id BETWEEN 100 AND 10000;",
    "DELETE FROM storage_rack WHERE id BETWEEN 30 AND 100;",
    "DELETE FROM storage_shelf WHERE id BETWEEN 20 AND 100;",
    "DELETE FROM storage_device WHERE id BETWEEN 10 AND 100;",
    "DELETE FROM storage_room WHERE id BETWEEN 1 AND 100;",
];

/// Fixture bridge configuration
#[derive(Debug, Clone)]
pub struct FixtureConfig {
    /// Unified loader script, relative to the project root
    pub loader_script: PathBuf,
    /// Existence probe passes when at least this many seed rooms are found
    pub min_seed_count: i64,
    /// Swallow or propagate runtime task failures
    pub policy: FailurePolicy,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            loader_script: PathBuf::from("src/test/resources/load-test-fixtures.sh"),
            min_seed_count: 2,
            policy: FailurePolicy::default(),
        }
    }
}

/// The fixture task bridge
pub struct FixtureTasks {
    executor: Arc<dyn TaskExecutor>,
    config: FixtureConfig,
}

impl FixtureTasks {
    pub fn new(executor: Arc<dyn TaskExecutor>, config: FixtureConfig) -> Self {
        Self { executor, config }
    }

    /// Load fixtures unconditionally via the loader script.
    ///
    /// A missing script file is a fatal configuration error regardless of
    /// policy; no meaningful suite can run against an unknown data state.
    pub async fn load(&self) -> Result<()> {
        if !self.config.loader_script.exists() {
            return Err(LabratError::Config(format!(
                "Fixture loader script not found: {}",
                self.config.loader_script.display()
            )));
        }

        info!(
            "Loading fixtures via {}",
            self.config.loader_script.display()
        );
        let result = self.executor.run_script(&self.config.loader_script).await;
        self.apply_policy("fixture load", flatten(result))
    }

    /// Probe whether seed fixtures are already present.
    ///
    /// Returns `true` iff the count probe succeeds and reports at least the
    /// configured minimum. Any error means `false`: unknown is treated as
    /// absent so the caller reloads.
    pub async fn check_exists(&self) -> bool {
        let sql = format!(
            "SELECT COUNT(*) FROM storage_room WHERE code IN ({});",
            SEED_ROOM_CODES
        );
        match self.executor.run_sql(&sql).await {
            Ok(output) if output.success => {
                let count = output.stdout.trim().parse::<i64>().unwrap_or(0);
                count >= self.config.min_seed_count
            }
            Ok(output) => {
                warn!("Fixture existence probe failed: {}", output.stderr.trim());
                false
            }
            Err(e) => {
                warn!("Fixture existence probe errored: {}", e);
                false
            }
        }
    }

    /// Delete test-created rows, children before parents.
    ///
    /// Safe to run repeatedly: every statement matches only namespaced rows
    /// and deleting zero of them is not an error.
    pub async fn clean(&self) -> Result<()> {
        info!("Cleaning fixture rows ({} tables)", CLEAN_STATEMENTS.len());
        let sql = CLEAN_STATEMENTS.join("\n");
        let result = self.executor.run_sql(&sql).await;
        self.apply_policy("fixture clean", flatten(result))
    }

    /// Run the load lifecycle the suite runner asks for.
    ///
    /// Returns whether a load was performed:
    /// - `skip` set: never touch the loader (fixtures assumed present)
    /// - `force` set: load without probing
    /// - otherwise: probe, load only when seeds are absent
    pub async fn ensure_loaded(&self, toggles: &FixtureToggles) -> Result<bool> {
        if toggles.skip {
            info!("Skipping fixture loading (LABRAT_SKIP_FIXTURES)");
            return Ok(false);
        }
        if toggles.force {
            self.load().await?;
            return Ok(true);
        }
        if self.check_exists().await {
            info!("Fixtures already present, not reloading");
            return Ok(false);
        }
        self.load().await?;
        Ok(true)
    }

    fn apply_policy(&self, operation: &str, result: Result<()>) -> Result<()> {
        match (result, self.config.policy) {
            (Ok(()), _) => Ok(()),
            (Err(e), FailurePolicy::Strict) => Err(e),
            (Err(e), FailurePolicy::Lenient) => {
                warn!("{} failed (lenient policy, continuing): {}", operation, e);
                Ok(())
            }
        }
    }
}

/// Collapse a task result: process-level errors and non-zero exits are both
/// fixture failures.
fn flatten(result: Result<crate::executor::TaskOutput>) -> Result<()> {
    match result {
        Ok(output) if output.success => Ok(()),
        Ok(output) => Err(LabratError::Fixture(output.stderr.trim().to_string())),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::{MockTaskExecutor, TaskOutput};
    use tempfile::TempDir;

    fn tasks_with(executor: MockTaskExecutor, config: FixtureConfig) -> (Arc<MockTaskExecutor>, FixtureTasks) {
        let executor = Arc::new(executor);
        let tasks = FixtureTasks::new(executor.clone(), config);
        (executor, tasks)
    }

    fn existing_script(dir: &TempDir) -> PathBuf {
        let script = dir.path().join("load-test-fixtures.sh");
        std::fs::write(&script, "#!/bin/bash\n").unwrap();
        script
    }

    #[tokio::test]
    async fn test_check_exists_true_at_threshold() {
        let (_, tasks) = tasks_with(
            MockTaskExecutor::new().with_sql_response(Ok(TaskOutput::ok(" 2\n"))),
            FixtureConfig::default(),
        );
        assert!(tasks.check_exists().await);
    }

    #[tokio::test]
    async fn test_check_exists_false_below_threshold() {
        let (_, tasks) = tasks_with(
            MockTaskExecutor::new().with_sql_response(Ok(TaskOutput::ok(" 1\n"))),
            FixtureConfig::default(),
        );
        assert!(!tasks.check_exists().await);
    }

    #[tokio::test]
    async fn test_check_exists_probe_error_is_false_not_panic() {
        let (_, tasks) = tasks_with(
            MockTaskExecutor::new()
                .with_sql_response(Err(LabratError::Fixture("no docker".into()))),
            FixtureConfig::default(),
        );
        assert!(!tasks.check_exists().await);
    }

    #[tokio::test]
    async fn test_check_exists_garbage_output_is_false() {
        let (_, tasks) = tasks_with(
            MockTaskExecutor::new().with_sql_response(Ok(TaskOutput::ok("ERROR"))),
            FixtureConfig::default(),
        );
        assert!(!tasks.check_exists().await);
    }

    #[tokio::test]
    async fn test_load_missing_script_is_fatal_config_error() {
        let (executor, tasks) = tasks_with(
            MockTaskExecutor::new(),
            FixtureConfig {
                loader_script: PathBuf::from("/nonexistent/loader.sh"),
                ..FixtureConfig::default()
            },
        );
        let err = tasks.load().await.unwrap_err();
        assert!(err.is_fatal_setup());
        // Never reached the executor
        assert!(executor.script_calls().is_empty());
    }

    #[tokio::test]
    async fn test_load_lenient_swallows_runtime_failure() {
        let dir = TempDir::new().unwrap();
        let (executor, tasks) = tasks_with(
            MockTaskExecutor::new()
                .with_script_response(Ok(TaskOutput::failed("psql: connection refused"))),
            FixtureConfig {
                loader_script: existing_script(&dir),
                ..FixtureConfig::default()
            },
        );
        tasks.load().await.unwrap();
        assert_eq!(executor.script_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_load_strict_propagates_runtime_failure() {
        let dir = TempDir::new().unwrap();
        let (_, tasks) = tasks_with(
            MockTaskExecutor::new()
                .with_script_response(Ok(TaskOutput::failed("psql: connection refused"))),
            FixtureConfig {
                loader_script: existing_script(&dir),
                policy: FailurePolicy::Strict,
                ..FixtureConfig::default()
            },
        );
        let err = tasks.load().await.unwrap_err();
        assert!(matches!(err, LabratError::Fixture(_)));
    }

    #[tokio::test]
    async fn test_ensure_loaded_skip_never_invokes_loader() {
        let (executor, tasks) = tasks_with(MockTaskExecutor::new(), FixtureConfig::default());
        let toggles = FixtureToggles {
            skip: true,
            ..FixtureToggles::default()
        };
        let loaded = tasks.ensure_loaded(&toggles).await.unwrap();
        assert!(!loaded);
        assert!(executor.script_calls().is_empty());
        assert!(executor.sql_calls().is_empty());
    }

    #[tokio::test]
    async fn test_ensure_loaded_force_skips_probe() {
        let dir = TempDir::new().unwrap();
        let (executor, tasks) = tasks_with(
            MockTaskExecutor::new(),
            FixtureConfig {
                loader_script: existing_script(&dir),
                ..FixtureConfig::default()
            },
        );
        let toggles = FixtureToggles {
            force: true,
            ..FixtureToggles::default()
        };
        let loaded = tasks.ensure_loaded(&toggles).await.unwrap();
        assert!(loaded);
        assert_eq!(executor.script_calls().len(), 1);
        assert!(executor.sql_calls().is_empty());
    }

    #[tokio::test]
    async fn test_ensure_loaded_probes_then_loads_when_absent() {
        let dir = TempDir::new().unwrap();
        let (executor, tasks) = tasks_with(
            MockTaskExecutor::new().with_sql_response(Ok(TaskOutput::ok(" 0"))),
            FixtureConfig {
                loader_script: existing_script(&dir),
                ..FixtureConfig::default()
            },
        );
        let loaded = tasks.ensure_loaded(&FixtureToggles::default()).await.unwrap();
        assert!(loaded);
        assert_eq!(executor.sql_calls().len(), 1);
        assert_eq!(executor.script_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_ensure_loaded_present_does_not_reload() {
        let (executor, tasks) = tasks_with(
            MockTaskExecutor::new().with_sql_response(Ok(TaskOutput::ok(" 3"))),
            FixtureConfig::default(),
        );
        let loaded = tasks.ensure_loaded(&FixtureToggles::default()).await.unwrap();
        assert!(!loaded);
        assert!(executor.script_calls().is_empty());
    }

    #[tokio::test]
    async fn test_clean_is_idempotent() {
        let (executor, tasks) = tasks_with(MockTaskExecutor::new(), FixtureConfig::default());
        tasks.clean().await.unwrap();
        tasks.clean().await.unwrap();

        let calls = executor.sql_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], calls[1]);
    }

    #[test]
    fn test_clean_deletes_children_before_parents() {
        let order: Vec<&str> = CLEAN_STATEMENTS
            .iter()
            .map(|s| {
                s.split_whitespace()
                    .nth(2)
                    .expect("DELETE FROM <table> shape")
            })
            .collect();

        let pos = |table: &str| order.iter().position(|t| *t == table).unwrap();
        assert!(pos("sample_storage_movement") < pos("sample"));
        assert!(pos("sample_item") < pos("sample"));
        assert!(pos("patient_identity") < pos("patient"));
        assert!(pos("storage_position") < pos("storage_rack"));
        assert!(pos("storage_rack") < pos("storage_shelf"));
        assert!(pos("storage_shelf") < pos("storage_device"));
        assert!(pos("storage_device") < pos("storage_room"));
    }

    #[test]
    fn test_clean_statements_only_touch_namespaced_rows() {
        for statement in CLEAN_STATEMENTS {
            let guarded = TEST_DATA_PREFIXES.iter().any(|p| statement.contains(p))
                || statement.contains("BETWEEN");
            assert!(guarded, "unguarded statement: {}", statement);
        }
    }
}

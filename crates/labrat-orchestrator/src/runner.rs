//! The suite runner
//!
//! Lifecycle of one run: fixture lifecycle (per env toggles) -> backend
//! readiness -> auth bootstrap -> spec ordering and planning -> execution
//! under the configured isolation mode -> optional fixture cleanup -> JSON
//! report.
//!
//! Isolation modes:
//! - `Shared`: one browser session, specs run serially, login state persists
//!   across specs. Fast, deliberately non-isolated.
//! - `PerSpec`: each spec gets a fresh browser context seeded read-only from
//!   the auth artifact; specs fan out across parallel workers (one worker
//!   under CI for determinism).

use labrat_browser::{
    capture_failure_screenshot, ArtifactStore, BrowserConfig, BrowserSession, StorageState,
};
use labrat_core::fail_open::{fail_open, retry_until_ok};
use labrat_core::{Credentials, Isolation, LabratError, Result, SuiteConfig};
use labrat_fixtures::FixtureTasks;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::bootstrap::AuthBootstrap;
use crate::journeys::{JourneyContext, JourneyFn, JourneyRegistry};
use crate::order::{compute_order, OrderConfig};
use crate::spec_file::SpecFile;

/// Readiness endpoint polled before any spec runs
pub const DEFAULT_HEALTH_PATH: &str = "/api/OpenELIS-Global/rest/menu";

/// Result of one spec
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecOutcome {
    pub spec: String,
    pub journey: String,
    pub success: bool,
    pub attempts: u32,
    pub duration_ms: u64,
    pub error: Option<String>,
    pub screenshot: Option<PathBuf>,
}

impl SpecOutcome {
    fn planning_failure(spec: &str, journey: &str, error: &LabratError) -> Self {
        Self {
            spec: spec.to_string(),
            journey: journey.to_string(),
            success: false,
            attempts: 0,
            duration_ms: 0,
            error: Some(error.to_string()),
            screenshot: None,
        }
    }
}

/// Result of the whole suite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteResult {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub duration_ms: u64,
    pub outcomes: Vec<SpecOutcome>,
}

impl SuiteResult {
    fn from_outcomes(outcomes: Vec<SpecOutcome>, skipped: usize, duration: Duration) -> Self {
        let passed = outcomes.iter().filter(|o| o.success).count();
        Self {
            total: outcomes.len(),
            passed,
            failed: outcomes.len() - passed,
            skipped,
            duration_ms: duration.as_millis() as u64,
            outcomes,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// A spec that made it through planning: parsed, tag-matched, journey bound
struct PlannedSpec {
    path: String,
    spec: SpecFile,
    journey: JourneyFn,
}

pub struct SuiteRunner {
    config: SuiteConfig,
    spec_root: PathBuf,
    order: OrderConfig,
    registry: JourneyRegistry,
    fixtures: Option<Arc<FixtureTasks>>,
    health_path: String,
}

impl SuiteRunner {
    pub fn new(config: SuiteConfig) -> Self {
        Self {
            config,
            spec_root: PathBuf::from("specs"),
            order: OrderConfig::default(),
            registry: JourneyRegistry::builtin(),
            fixtures: None,
            health_path: DEFAULT_HEALTH_PATH.to_string(),
        }
    }

    pub fn with_spec_root(mut self, spec_root: impl Into<PathBuf>) -> Self {
        self.spec_root = spec_root.into();
        self
    }

    pub fn with_order(mut self, order: OrderConfig) -> Self {
        self.order = order;
        self
    }

    pub fn with_registry(mut self, registry: JourneyRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_fixtures(mut self, fixtures: FixtureTasks) -> Self {
        self.fixtures = Some(Arc::new(fixtures));
        self
    }

    pub fn with_health_path(mut self, path: impl Into<String>) -> Self {
        self.health_path = path.into();
        self
    }

    /// Run the whole suite, optionally filtered to specs carrying `tag`.
    pub async fn run(&self, tag: Option<&str>) -> Result<SuiteResult> {
        let started = Instant::now();

        if let Some(fixtures) = &self.fixtures {
            fixtures.ensure_loaded(&self.config.fixtures).await?;
        }

        self.wait_for_backend().await?;

        // Credentials are checked before the bootstrap browser launches.
        let bootstrap = AuthBootstrap::from_env(&self.config)?;
        let state_path = bootstrap.run().await?;
        let credentials = bootstrap.credentials().clone();

        let order = compute_order(&self.spec_root, &self.order);
        info!("Running specs in custom order: {:?}", order);

        let (planned, mut outcomes, skipped) = self.plan(&order, tag);

        let state = StorageState::load(&state_path).await?;
        let store = ArtifactStore::new(&self.config.artifact_dir);

        match self.config.isolation {
            Isolation::Shared => {
                self.run_shared(planned, &state, &store, &credentials, &mut outcomes)
                    .await?;
            }
            Isolation::PerSpec => {
                self.run_per_spec(planned, state, &credentials, &mut outcomes)
                    .await?;
            }
        }

        if self.config.fixtures.cleanup {
            if let Some(fixtures) = &self.fixtures {
                fixtures.clean().await?;
            }
        }

        let result = SuiteResult::from_outcomes(outcomes, skipped, started.elapsed());
        info!(
            "Suite finished: {} passed, {} failed, {} skipped ({} ms)",
            result.passed, result.failed, result.skipped, result.duration_ms
        );

        let report_path = self.config.artifact_dir.join("report.json");
        fail_open("suite report", || write_report(&report_path, &result)).await;

        Ok(result)
    }

    /// Parse ordered spec files, filter by tag, and bind journeys.
    ///
    /// Parse failures and unknown journeys become failed outcomes rather
    /// than aborting the rest of the run.
    fn plan(
        &self,
        order: &[String],
        tag: Option<&str>,
    ) -> (Vec<PlannedSpec>, Vec<SpecOutcome>, usize) {
        let mut planned = Vec::new();
        let mut outcomes = Vec::new();
        let mut skipped = 0;

        for path in order {
            let spec = match SpecFile::from_file(&self.spec_root.join(path)) {
                Ok(spec) => spec,
                Err(e) => {
                    error!("Failed to parse spec {}: {}", path, e);
                    outcomes.push(SpecOutcome::planning_failure(path, "", &e));
                    continue;
                }
            };

            if let Some(tag) = tag {
                if !spec.has_tag(tag) {
                    skipped += 1;
                    continue;
                }
            }

            match self.registry.get(&spec.journey) {
                Ok(journey) => planned.push(PlannedSpec {
                    path: path.clone(),
                    spec,
                    journey,
                }),
                Err(e) => {
                    error!("Spec {} names an unknown journey: {}", path, e);
                    outcomes.push(SpecOutcome::planning_failure(path, &spec.journey, &e));
                }
            }
        }

        (planned, outcomes, skipped)
    }

    /// One session, serial execution, state persists across specs.
    async fn run_shared(
        &self,
        planned: Vec<PlannedSpec>,
        state: &StorageState,
        store: &ArtifactStore,
        credentials: &Credentials,
        outcomes: &mut Vec<SpecOutcome>,
    ) -> Result<()> {
        let session =
            BrowserSession::launch_with_config(BrowserConfig::from(&self.config)).await?;
        state.apply(&session).await?;

        for item in planned {
            let outcome =
                execute_spec(&session, &self.config, store, credentials, &item).await;
            outcomes.push(outcome);
        }

        session.close().await
    }

    /// Fresh session per spec, fanned out across workers.
    async fn run_per_spec(
        &self,
        planned: Vec<PlannedSpec>,
        state: StorageState,
        credentials: &Credentials,
        outcomes: &mut Vec<SpecOutcome>,
    ) -> Result<()> {
        if planned.is_empty() {
            return Ok(());
        }

        let worker_count = self.config.workers.max(1).min(planned.len());
        info!("Running {} spec(s) across {} worker(s)", planned.len(), worker_count);

        let queue: Arc<Mutex<VecDeque<PlannedSpec>>> =
            Arc::new(Mutex::new(planned.into_iter().collect()));
        let results: Arc<Mutex<Vec<SpecOutcome>>> = Arc::new(Mutex::new(Vec::new()));
        let state = Arc::new(state);
        let config = Arc::new(self.config.clone());
        let credentials = Arc::new(credentials.clone());

        let mut workers = JoinSet::new();
        for worker_id in 0..worker_count {
            let queue = Arc::clone(&queue);
            let results = Arc::clone(&results);
            let state = Arc::clone(&state);
            let config = Arc::clone(&config);
            let credentials = Arc::clone(&credentials);

            workers.spawn(async move {
                let store = ArtifactStore::new(&config.artifact_dir);
                loop {
                    let item = {
                        let mut queue = queue.lock().unwrap_or_else(|p| p.into_inner());
                        queue.pop_front()
                    };
                    let Some(item) = item else { break };

                    let outcome = match run_isolated(&config, &state, &store, &credentials, &item)
                        .await
                    {
                        Ok(outcome) => outcome,
                        Err(e) => {
                            error!("Worker {} could not run {}: {}", worker_id, item.path, e);
                            SpecOutcome::planning_failure(&item.path, &item.spec.journey, &e)
                        }
                    };
                    results
                        .lock()
                        .unwrap_or_else(|p| p.into_inner())
                        .push(outcome);
                }
            });
        }

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                warn!("Worker task panicked: {}", e);
            }
        }

        let collected = match Arc::try_unwrap(results) {
            Ok(mutex) => mutex.into_inner().unwrap_or_else(|p| p.into_inner()),
            Err(shared) => shared.lock().unwrap_or_else(|p| p.into_inner()).clone(),
        };
        outcomes.extend(collected);
        Ok(())
    }

    /// Poll the backend health endpoint until it answers.
    ///
    /// Connection errors are expected while containers start; giving up is
    /// fatal because no meaningful spec can run without the backend.
    async fn wait_for_backend(&self) -> Result<()> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| LabratError::Other(format!("Failed to build HTTP client: {}", e)))?;

        let url = self.config.url(&self.health_path);
        let delay = Duration::from_secs(2);
        let attempts = (self.config.startup_wait.as_secs() / delay.as_secs()).max(1) as usize;

        info!("Waiting for backend at {}", url);
        retry_until_ok(
            "backend readiness probe",
            || {
                let client = client.clone();
                let url = url.clone();
                async move {
                    let response = client
                        .get(&url)
                        .send()
                        .await
                        .map_err(|e| LabratError::BackendNotReady(e.to_string()))?;
                    if response.status().is_success() {
                        Ok(())
                    } else {
                        Err(LabratError::BackendNotReady(format!(
                            "{} returned {}",
                            url,
                            response.status()
                        )))
                    }
                }
            },
            attempts,
            delay,
        )
        .await?;

        info!("Backend ready: {} responded", url);
        Ok(())
    }
}

/// Launch a fresh seeded session and run one spec in it.
async fn run_isolated(
    config: &SuiteConfig,
    state: &StorageState,
    store: &ArtifactStore,
    credentials: &Credentials,
    item: &PlannedSpec,
) -> Result<SpecOutcome> {
    let session = BrowserSession::launch_with_config(BrowserConfig::from(config)).await?;
    state.apply(&session).await?;
    let outcome = execute_spec(&session, config, store, credentials, item).await;
    session.close().await?;
    Ok(outcome)
}

/// Run one spec with whole-spec retries and failure screenshots.
async fn execute_spec(
    session: &BrowserSession,
    config: &SuiteConfig,
    store: &ArtifactStore,
    credentials: &Credentials,
    item: &PlannedSpec,
) -> SpecOutcome {
    let started = Instant::now();
    let attempts_allowed = item.spec.retries.unwrap_or(config.retries) + 1;
    let mut last_error: Option<LabratError> = None;
    let mut screenshot: Option<PathBuf> = None;

    for attempt in 1..=attempts_allowed {
        let context = JourneyContext {
            pipeline: session.pipeline(&config.base_url),
            credentials: credentials.clone(),
        };

        match (item.journey)(context).await {
            Ok(()) => {
                info!("✓ {} ({} ms)", item.path, started.elapsed().as_millis());
                return SpecOutcome {
                    spec: item.path.clone(),
                    journey: item.spec.journey.clone(),
                    success: true,
                    attempts: attempt,
                    duration_ms: started.elapsed().as_millis() as u64,
                    error: None,
                    screenshot,
                };
            }
            Err(e) => {
                error!(
                    "✗ {} (attempt {}/{}): {}",
                    item.path, attempt, attempts_allowed, e
                );
                if config.screenshot_on_failure {
                    let name = format!("failure-attempt-{}", attempt);
                    screenshot = fail_open("failure screenshot", || {
                        capture_failure_screenshot(session, store, &item.path, &name)
                    })
                    .await
                    .or(screenshot);
                }
                last_error = Some(e);
            }
        }
    }

    SpecOutcome {
        spec: item.path.clone(),
        journey: item.spec.journey.clone(),
        success: false,
        attempts: attempts_allowed,
        duration_ms: started.elapsed().as_millis() as u64,
        error: last_error.map(|e| e.to_string()),
        screenshot,
    }
}

async fn write_report(path: &Path, result: &SuiteResult) -> Result<PathBuf> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_string_pretty(result)?;
    tokio::fs::write(path, json).await?;
    info!("Report written to {}", path.display());
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn runner_with_specs(files: &[(&str, &str)]) -> (TempDir, SuiteRunner) {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            let path = dir.path().join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, content).unwrap();
        }
        let runner = SuiteRunner::new(SuiteConfig::default()).with_spec_root(dir.path());
        (dir, runner)
    }

    #[test]
    fn test_plan_binds_known_journeys() {
        let (_dir, runner) = runner_with_specs(&[(
            "login.spec.yaml",
            "name: login\njourney: login\ntags: [smoke]\n",
        )]);
        let (planned, outcomes, skipped) = runner.plan(&["login.spec.yaml".to_string()], None);
        assert_eq!(planned.len(), 1);
        assert!(outcomes.is_empty());
        assert_eq!(skipped, 0);
    }

    #[test]
    fn test_plan_tag_filter_skips_unmatched() {
        let (_dir, runner) = runner_with_specs(&[
            ("login.spec.yaml", "name: login\njourney: login\ntags: [smoke]\n"),
            ("home.spec.yaml", "name: home\njourney: home\n"),
        ]);
        let order = vec!["login.spec.yaml".to_string(), "home.spec.yaml".to_string()];
        let (planned, outcomes, skipped) = runner.plan(&order, Some("smoke"));
        assert_eq!(planned.len(), 1);
        assert_eq!(planned[0].path, "login.spec.yaml");
        assert!(outcomes.is_empty());
        assert_eq!(skipped, 1);
    }

    #[test]
    fn test_plan_unknown_journey_is_a_failed_outcome() {
        let (_dir, runner) =
            runner_with_specs(&[("x.spec.yaml", "name: x\njourney: teleport\n")]);
        let (planned, outcomes, _) = runner.plan(&["x.spec.yaml".to_string()], None);
        assert!(planned.is_empty());
        assert_eq!(outcomes.len(), 1);
        assert!(!outcomes[0].success);
        assert!(outcomes[0].error.as_deref().unwrap().contains("teleport"));
    }

    #[test]
    fn test_plan_parse_error_is_a_failed_outcome_not_an_abort() {
        let (_dir, runner) = runner_with_specs(&[
            ("broken.spec.yaml", "name only, no journey ["),
            ("home.spec.yaml", "name: home\njourney: home\n"),
        ]);
        let order = vec!["broken.spec.yaml".to_string(), "home.spec.yaml".to_string()];
        let (planned, outcomes, _) = runner.plan(&order, None);
        assert_eq!(planned.len(), 1);
        assert_eq!(outcomes.len(), 1);
        assert!(!outcomes[0].success);
    }

    #[test]
    fn test_suite_result_counts() {
        let outcomes = vec![
            SpecOutcome {
                spec: "a".into(),
                journey: "login".into(),
                success: true,
                attempts: 1,
                duration_ms: 10,
                error: None,
                screenshot: None,
            },
            SpecOutcome {
                spec: "b".into(),
                journey: "home".into(),
                success: false,
                attempts: 3,
                duration_ms: 20,
                error: Some("timeout".into()),
                screenshot: None,
            },
        ];
        let result = SuiteResult::from_outcomes(outcomes, 2, Duration::from_millis(30));
        assert_eq!(result.total, 2);
        assert_eq!(result.passed, 1);
        assert_eq!(result.failed, 1);
        assert_eq!(result.skipped, 2);
        assert!(!result.all_passed());
    }

    #[tokio::test]
    async fn test_write_report_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.json");
        let result = SuiteResult::from_outcomes(Vec::new(), 0, Duration::from_millis(5));
        write_report(&path, &result).await.unwrap();

        let loaded: SuiteResult =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.total, 0);
        assert!(loaded.all_passed());
    }
}

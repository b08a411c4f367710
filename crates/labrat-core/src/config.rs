//! Suite configuration sourced from environment variables
//!
//! Behavior of a run is controlled externally (CI pipelines export the same
//! variables developers set locally). Parsing is factored over a lookup
//! closure so tests never have to mutate process environment.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::{LabratError, Result};

/// Default origin of the system under test
pub const DEFAULT_BASE_URL: &str = "https://localhost";

/// Relative path of the persisted auth storage-state artifact
pub const STORAGE_STATE_FILE: &str = "auth/storage-state.json";

/// Cross-spec isolation model, see the suite runner for semantics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Isolation {
    /// One browser session shared by every spec; login state persists across
    /// specs. Deliberate speed-over-isolation trade-off carried over from the
    /// previous harness generation -- replace consciously, not silently.
    #[default]
    Shared,
    /// Fresh browser context per spec, seeded read-only from the auth
    /// artifact. Required for parallel workers.
    PerSpec,
}

impl std::str::FromStr for Isolation {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "shared" => Ok(Self::Shared),
            "per-spec" | "perspec" | "per_spec" => Ok(Self::PerSpec),
            _ => Err(format!("Invalid isolation mode: {}", s)),
        }
    }
}

/// Fixture lifecycle toggles (all default false)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureToggles {
    /// Clean test-created rows after the suite
    pub cleanup: bool,
    /// Skip fixture loading entirely (assumes fixtures already present)
    pub skip: bool,
    /// Reload fixtures even if the existence probe says they are present
    pub force: bool,
    /// Propagate fixture-task failures instead of logging and swallowing
    pub strict: bool,
}

/// Login credentials for the session bootstrap
///
/// A hard precondition: absence of either variable is a fatal startup error,
/// never defaulted.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user: String,
    pub pass: String,
}

impl Credentials {
    /// Read `TEST_USER` / `TEST_PASS` from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read credentials through a lookup closure.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let user = lookup("TEST_USER")
            .filter(|v| !v.is_empty())
            .ok_or(LabratError::MissingEnv("TEST_USER"))?;
        let pass = lookup("TEST_PASS")
            .filter(|v| !v.is_empty())
            .ok_or(LabratError::MissingEnv("TEST_PASS"))?;
        Ok(Self { user, pass })
    }
}

/// Full suite configuration
#[derive(Debug, Clone)]
pub struct SuiteConfig {
    /// Origin of the system under test
    pub base_url: String,
    /// Running under continuous integration
    pub ci: bool,
    /// Parallel workers for per-spec isolation (forced to 1 under CI)
    pub workers: usize,
    /// Whole-spec retry count on failure
    pub retries: u32,
    /// Per-action command timeout
    pub command_timeout: Duration,
    /// Polling interval of the retrying command pipeline
    pub poll_interval: Duration,
    /// How long to wait for the backend to answer its health endpoint
    pub startup_wait: Duration,
    /// Browser viewport
    pub viewport_width: u32,
    pub viewport_height: u32,
    /// Headless browser (disable locally to watch a run)
    pub headless: bool,
    /// Cross-spec isolation model
    pub isolation: Isolation,
    /// Capture a screenshot artifact when a spec fails
    pub screenshot_on_failure: bool,
    /// Harness state root (`.labrat/`)
    pub artifact_dir: PathBuf,
    /// Fixture lifecycle toggles
    pub fixtures: FixtureToggles,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            ci: false,
            workers: 4,
            retries: 0,
            command_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_millis(200),
            startup_wait: Duration::from_secs(300),
            viewport_width: 1200,
            viewport_height: 700,
            headless: true,
            isolation: Isolation::default(),
            screenshot_on_failure: true,
            artifact_dir: PathBuf::from(".labrat"),
            fixtures: FixtureToggles::default(),
        }
    }
}

impl SuiteConfig {
    /// Build configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration through a lookup closure.
    ///
    /// `CI=true` forces one worker (determinism) and two whole-spec retries,
    /// matching the run-level retry policy the backend pipelines expect.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("BASE_URL").filter(|v| !v.is_empty()) {
            config.base_url = url.trim_end_matches('/').to_string();
        }

        config.ci = env_flag(&lookup, "CI");
        if config.ci {
            config.workers = 1;
            config.retries = 2;
        }

        config.fixtures = FixtureToggles {
            cleanup: env_flag(&lookup, "LABRAT_CLEANUP_FIXTURES"),
            skip: env_flag(&lookup, "LABRAT_SKIP_FIXTURES"),
            force: env_flag(&lookup, "LABRAT_FORCE_FIXTURES"),
            strict: env_flag(&lookup, "LABRAT_STRICT_FIXTURES"),
        };

        config
    }

    /// Absolute path of the persisted auth storage-state artifact.
    pub fn storage_state_path(&self) -> PathBuf {
        self.artifact_dir.join(STORAGE_STATE_FILE)
    }

    /// Join a path onto the base URL.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        }
    }
}

/// Boolean env toggle: only the literal `"true"` enables it.
fn env_flag(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> bool {
    lookup(key).as_deref() == Some("true")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = SuiteConfig::from_lookup(|_| None);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(!config.ci);
        assert_eq!(config.workers, 4);
        assert_eq!(config.retries, 0);
        assert_eq!(config.viewport_width, 1200);
        assert_eq!(config.viewport_height, 700);
        assert!(!config.fixtures.cleanup);
        assert!(!config.fixtures.skip);
        assert!(!config.fixtures.force);
    }

    #[test]
    fn test_ci_forces_single_worker_and_retries() {
        let config = SuiteConfig::from_lookup(lookup_from(&[("CI", "true")]));
        assert_eq!(config.workers, 1);
        assert_eq!(config.retries, 2);
    }

    #[test]
    fn test_flags_require_literal_true() {
        let config = SuiteConfig::from_lookup(lookup_from(&[
            ("LABRAT_SKIP_FIXTURES", "1"),
            ("LABRAT_FORCE_FIXTURES", "TRUE"),
            ("LABRAT_CLEANUP_FIXTURES", "true"),
        ]));
        assert!(!config.fixtures.skip);
        assert!(!config.fixtures.force);
        assert!(config.fixtures.cleanup);
    }

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let config =
            SuiteConfig::from_lookup(lookup_from(&[("BASE_URL", "https://lims.example.org/")]));
        assert_eq!(config.base_url, "https://lims.example.org");
        assert_eq!(config.url("/login"), "https://lims.example.org/login");
        assert_eq!(config.url("login"), "https://lims.example.org/login");
    }

    #[test]
    fn test_credentials_missing_is_error() {
        let err = Credentials::from_lookup(|_| None).unwrap_err();
        assert!(matches!(err, LabratError::MissingEnv("TEST_USER")));

        let err = Credentials::from_lookup(lookup_from(&[("TEST_USER", "admin")])).unwrap_err();
        assert!(matches!(err, LabratError::MissingEnv("TEST_PASS")));
    }

    #[test]
    fn test_credentials_empty_is_missing() {
        let err = Credentials::from_lookup(lookup_from(&[
            ("TEST_USER", ""),
            ("TEST_PASS", "secret"),
        ]))
        .unwrap_err();
        assert!(matches!(err, LabratError::MissingEnv("TEST_USER")));
    }

    #[test]
    fn test_isolation_parse() {
        assert_eq!("shared".parse::<Isolation>().unwrap(), Isolation::Shared);
        assert_eq!("per-spec".parse::<Isolation>().unwrap(), Isolation::PerSpec);
        assert!("chaotic".parse::<Isolation>().is_err());
    }

    #[test]
    fn test_storage_state_path() {
        let config = SuiteConfig::default();
        assert_eq!(
            config.storage_state_path(),
            PathBuf::from(".labrat/auth/storage-state.json")
        );
    }
}

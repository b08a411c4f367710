//! Authenticated session bootstrap
//!
//! Interactive login happens exactly once per suite run. The bootstrap
//! drives the login form, waits for the post-login landmark as proof of
//! success, and persists cookies plus web storage to the fixed artifact
//! path. Downstream workers seed their contexts from the artifact read-only
//! and never re-authenticate.

use labrat_browser::{BrowserConfig, BrowserSession, StorageState};
use labrat_core::{Credentials, Result, SuiteConfig};
use labrat_pages::LoginPage;
use std::path::PathBuf;
use tracing::info;

pub struct AuthBootstrap {
    config: SuiteConfig,
    credentials: Credentials,
}

impl AuthBootstrap {
    /// Credentials are validated here, before any browser interaction;
    /// a missing `TEST_USER` / `TEST_PASS` aborts the suite.
    pub fn from_env(config: &SuiteConfig) -> Result<Self> {
        let credentials = Credentials::from_env()?;
        Ok(Self::new(config, credentials))
    }

    pub fn new(config: &SuiteConfig, credentials: Credentials) -> Self {
        Self {
            config: config.clone(),
            credentials,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Log in interactively and persist the session state.
    ///
    /// Returns the artifact path the workers load.
    pub async fn run(&self) -> Result<PathBuf> {
        info!("Bootstrapping authenticated session as {}", self.credentials.user);

        let session = BrowserSession::launch_with_config(BrowserConfig::from(&self.config)).await?;
        let pipeline = session.pipeline(&self.config.base_url);

        let login = LoginPage::new(pipeline);
        login.visit().await?;
        // login() waits for the post-login landmark; reaching here proves
        // the session is live.
        login
            .login(&self.credentials.user, &self.credentials.pass)
            .await?;

        let state = StorageState::capture(&session, &self.config.base_url).await?;
        let path = self.config.storage_state_path();
        state.save(&path).await?;

        session.close().await?;
        info!("Auth bootstrap complete");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labrat_core::LabratError;

    #[test]
    fn test_missing_credentials_fail_before_any_navigation() {
        // from_lookup with an empty environment mirrors what from_env does
        // when neither variable is exported.
        let err = Credentials::from_lookup(|_| None).unwrap_err();
        assert!(matches!(err, LabratError::MissingEnv(_)));
        assert!(err.is_fatal_setup());
    }

    #[test]
    fn test_bootstrap_construction_with_explicit_credentials() {
        let config = SuiteConfig::default();
        let bootstrap = AuthBootstrap::new(
            &config,
            Credentials {
                user: "admin".to_string(),
                pass: "adminADMIN!".to_string(),
            },
        );
        assert_eq!(bootstrap.credentials().user, "admin");
    }
}

//! Persisted browser storage state (cookies + local/session storage)
//!
//! The authenticated-session bootstrap captures this once after a successful
//! interactive login and writes it to a fixed artifact path. Every
//! downstream browser context is seeded from the artifact read-only; nothing
//! mutates it mid-suite.

use crate::browser::BrowserSession;
use crate::error::Result;
use headless_chrome::protocol::cdp::Network::CookieParam;
use labrat_core::LabratError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

/// Serialized browser storage state
///
/// Cookies are stored as the CDP wire objects so nothing is lost in
/// translation; `CookieParam` (what restore needs) is a field subset of the
/// captured `Cookie` objects under the same names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageState {
    /// Origin the storage entries are scoped to
    pub origin: String,
    /// CDP cookie objects, verbatim
    pub cookies: serde_json::Value,
    /// `localStorage` entries
    pub local_storage: Vec<(String, String)>,
    /// `sessionStorage` entries
    pub session_storage: Vec<(String, String)>,
}

impl StorageState {
    /// Capture the current session's cookies and web storage
    pub async fn capture(session: &BrowserSession, origin: &str) -> Result<Self> {
        let cookies = session
            .tab()
            .get_cookies()
            .map_err(|e| LabratError::Browser(format!("Failed to read cookies: {}", e)))?;
        let cookies = serde_json::to_value(cookies)?;

        let local_storage = read_web_storage(session, "localStorage").await?;
        let session_storage = read_web_storage(session, "sessionStorage").await?;

        Ok(Self {
            origin: origin.trim_end_matches('/').to_string(),
            cookies,
            local_storage,
            session_storage,
        })
    }

    /// Seed a fresh session from this state
    ///
    /// Navigates to the origin first: web storage is origin-scoped and can
    /// only be written from a document on that origin.
    pub async fn apply(&self, session: &BrowserSession) -> Result<()> {
        session.navigate(&self.origin).await?;

        let params: Vec<CookieParam> = serde_json::from_value(self.cookies.clone())?;
        let count = params.len();
        session
            .tab()
            .set_cookies(params)
            .map_err(|e| LabratError::Browser(format!("Failed to set cookies: {}", e)))?;

        write_web_storage(session, "localStorage", &self.local_storage).await?;
        write_web_storage(session, "sessionStorage", &self.session_storage).await?;

        debug!(
            "Seeded session from storage state ({} cookies, {} local entries)",
            count,
            self.local_storage.len()
        );
        Ok(())
    }

    /// Write the state to the artifact path, creating parent directories
    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).await?;
        info!("Storage state written to {}", path.display());
        Ok(())
    }

    /// Load a previously saved state
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await.map_err(|e| {
            LabratError::Config(format!(
                "Auth storage state not found at {} (run the bootstrap first): {}",
                path.display(),
                e
            ))
        })?;
        Ok(serde_json::from_str(&content)?)
    }
}

async fn read_web_storage(
    session: &BrowserSession,
    store: &str,
) -> Result<Vec<(String, String)>> {
    let script = format!("JSON.stringify(Object.entries({}))", store);
    let value = session.evaluate_script(&script).await?;
    match value.as_str() {
        Some(json) => Ok(serde_json::from_str(json)?),
        None => Ok(Vec::new()),
    }
}

async fn write_web_storage(
    session: &BrowserSession,
    store: &str,
    entries: &[(String, String)],
) -> Result<()> {
    if entries.is_empty() {
        return Ok(());
    }
    let script = format!(
        r#"(() => {{
            const entries = {entries};
            for (const [key, value] of entries) {store}.setItem(key, value);
            return entries.length;
        }})()"#,
        entries = serde_json::to_string(entries)?,
        store = store,
    );
    session.evaluate_script(&script).await?;
    Ok(())
}

//! Failure-evidence screenshots stored under the artifact directory

use crate::browser::BrowserSession;
use crate::error::Result;
use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use labrat_core::LabratError;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Stores screenshots under `<artifact_dir>/artifacts/<spec>/`
pub struct ArtifactStore {
    base_dir: PathBuf,
}

impl ArtifactStore {
    /// # Arguments
    /// * `artifact_dir` - the harness state root (`.labrat/`)
    pub fn new(artifact_dir: &Path) -> Self {
        Self {
            base_dir: artifact_dir.join("artifacts"),
        }
    }

    /// Write a PNG for a spec; returns the stored path
    pub async fn store_screenshot(
        &self,
        spec_id: &str,
        name: &str,
        data: &[u8],
    ) -> Result<PathBuf> {
        let spec_dir = self.base_dir.join(sanitize(spec_id));
        fs::create_dir_all(&spec_dir).await?;

        let file_path = spec_dir.join(format!("{}.png", sanitize(name)));
        fs::write(&file_path, data).await?;

        info!(
            "Screenshot stored: {} ({} bytes)",
            file_path.display(),
            data.len()
        );
        Ok(file_path)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

/// Capture a full-page screenshot of the current state of a failed spec
///
/// Callers wrap this in `fail_open`: evidence capture must never mask the
/// failure that triggered it.
pub async fn capture_failure_screenshot(
    session: &BrowserSession,
    store: &ArtifactStore,
    spec_id: &str,
    name: &str,
) -> Result<PathBuf> {
    debug!("Capturing failure screenshot for {}", spec_id);

    let data = session
        .tab()
        .capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)
        .map_err(|e| LabratError::Browser(format!("Screenshot capture failed: {}", e)))?;

    store.store_screenshot(spec_id, name, &data).await
}

/// Spec ids are relative paths; flatten them into one directory component.
fn sanitize(id: &str) -> String {
    id.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | ' ' => '-',
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sanitize_flattens_paths() {
        assert_eq!(sanitize("admin/user-management.spec.yaml"), "admin-user-management.spec.yaml");
        assert_eq!(sanitize("plain"), "plain");
    }

    #[tokio::test]
    async fn test_store_screenshot() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path());

        let path = store
            .store_screenshot("admin/users.spec.yaml", "failure-attempt-1", b"png-bytes")
            .await
            .unwrap();

        assert!(path.exists());
        assert!(path.ends_with("admin-users.spec.yaml/failure-attempt-1.png"));
        let content = std::fs::read(&path).unwrap();
        assert_eq!(content, b"png-bytes");
    }
}

//! Browser lifecycle management using Chrome DevTools Protocol

use crate::error::Result;
use crate::pipeline::Pipeline;
use headless_chrome::{Browser, LaunchOptions, Tab};
use labrat_core::{LabratError, SuiteConfig};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Configuration for browser launch
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Run in headless mode (default: true)
    pub headless: bool,
    /// Browser window width
    pub window_width: u32,
    /// Browser window height
    pub window_height: u32,
    /// Per-action command timeout
    pub command_timeout: Duration,
    /// Polling interval of the command pipeline
    pub poll_interval: Duration,
    /// Accept the self-signed certificate of a local HTTPS origin
    pub ignore_certificate_errors: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1200,
            window_height: 700,
            command_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_millis(200),
            ignore_certificate_errors: true,
        }
    }
}

impl From<&SuiteConfig> for BrowserConfig {
    fn from(suite: &SuiteConfig) -> Self {
        Self {
            headless: suite.headless,
            window_width: suite.viewport_width,
            window_height: suite.viewport_height,
            command_timeout: suite.command_timeout,
            poll_interval: suite.poll_interval,
            ignore_certificate_errors: true,
        }
    }
}

/// Active browser session with Chrome DevTools Protocol
pub struct BrowserSession {
    /// Underlying browser instance (kept alive for tab lifetime)
    #[allow(dead_code)]
    browser: Browser,
    /// Current active tab
    tab: Arc<Tab>,
    /// Configuration
    config: BrowserConfig,
}

impl BrowserSession {
    /// Launch a new browser instance with default configuration
    pub async fn launch() -> Result<Self> {
        Self::launch_with_config(BrowserConfig::default()).await
    }

    /// Launch browser with custom configuration
    pub async fn launch_with_config(config: BrowserConfig) -> Result<Self> {
        info!(
            "Launching browser (headless: {}, size: {}x{})",
            config.headless, config.window_width, config.window_height
        );

        let launch_options = LaunchOptions::default_builder()
            .headless(config.headless)
            .window_size(Some((config.window_width, config.window_height)))
            .ignore_certificate_errors(config.ignore_certificate_errors)
            .build()
            .map_err(|e| LabratError::Browser(format!("Failed to build launch options: {}", e)))?;

        let browser = Browser::new(launch_options)
            .map_err(|e| LabratError::Browser(format!("Failed to launch browser: {}", e)))?;

        let tab = browser
            .new_tab()
            .map_err(|e| LabratError::Browser(format!("Failed to create tab: {}", e)))?;

        info!("Browser launched successfully");

        Ok(Self {
            browser,
            tab,
            config,
        })
    }

    /// Connect to an existing browser instance
    ///
    /// # Arguments
    /// * `port` - Chrome DevTools Protocol port (typically 9222)
    pub async fn connect(port: u16) -> Result<Self> {
        info!("Connecting to existing browser on port {}", port);

        let browser = Browser::connect(format!("http://127.0.0.1:{}", port))
            .map_err(|e| LabratError::Browser(format!("Failed to connect to browser: {}", e)))?;

        let tab = browser
            .new_tab()
            .map_err(|e| LabratError::Browser(format!("Failed to create tab: {}", e)))?;

        Ok(Self {
            browser,
            tab,
            config: BrowserConfig::default(),
        })
    }

    /// Navigate to an absolute URL and wait for the load to settle
    pub async fn navigate(&self, url: &str) -> Result<()> {
        debug!("Navigating to {}", url);

        self.tab
            .navigate_to(url)
            .map_err(|e| LabratError::Browser(format!("Failed to navigate to {}: {}", url, e)))?;

        self.tab
            .wait_until_navigated()
            .map_err(|e| LabratError::Browser(format!("Navigation timeout for {}: {}", url, e)))?;

        debug!("Navigated to {}", url);
        Ok(())
    }

    /// Execute JavaScript in the page context
    ///
    /// # Returns
    /// JSON result from JavaScript execution (`null` when the script
    /// produced no value)
    pub async fn evaluate_script(&self, script: &str) -> Result<serde_json::Value> {
        let result = self
            .tab
            .evaluate(script, false)
            .map_err(|e| LabratError::Browser(format!("JavaScript evaluation failed: {}", e)))?;

        Ok(result.value.unwrap_or(serde_json::Value::Null))
    }

    /// Get the current page title
    pub async fn get_title(&self) -> Result<String> {
        let result = self.evaluate_script("document.title").await?;
        Ok(result.as_str().unwrap_or("").to_string())
    }

    /// Get the current URL
    pub async fn get_url(&self) -> Result<String> {
        let result = self.evaluate_script("window.location.href").await?;
        Ok(result.as_str().unwrap_or("").to_string())
    }

    /// Create a command pipeline bound to this session's active tab
    ///
    /// # Arguments
    /// * `base_url` - origin the pipeline resolves relative paths against
    pub fn pipeline(&self, base_url: &str) -> Pipeline {
        Pipeline::new(
            Arc::clone(&self.tab),
            base_url,
            self.config.command_timeout,
            self.config.poll_interval,
        )
    }

    /// Get reference to the active tab
    pub fn tab(&self) -> &Arc<Tab> {
        &self.tab
    }

    /// Close the browser session
    pub async fn close(self) -> Result<()> {
        info!("Closing browser session");
        // Browser is dropped and cleaned up automatically
        Ok(())
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        debug!("BrowserSession dropped, browser will be cleaned up");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BrowserConfig::default();
        assert!(config.headless);
        assert_eq!(config.window_width, 1200);
        assert_eq!(config.window_height, 700);
        assert_eq!(config.command_timeout, Duration::from_secs(30));
        assert!(config.ignore_certificate_errors);
    }

    #[test]
    fn test_config_from_suite() {
        let mut suite = SuiteConfig::default();
        suite.headless = false;
        suite.viewport_width = 1920;
        suite.command_timeout = Duration::from_secs(10);

        let config = BrowserConfig::from(&suite);
        assert!(!config.headless);
        assert_eq!(config.window_width, 1920);
        assert_eq!(config.command_timeout, Duration::from_secs(10));
    }
}

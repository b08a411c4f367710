//! The retrying command pipeline every page-object action executes through
//!
//! Commands appear synchronous to callers but poll the DOM until the target
//! element satisfies the expected state, then perform exactly one interaction
//! or one assertion. If the element never reaches that state within the
//! configured timeout the command fails the current spec with a descriptive
//! timeout error; the pipeline performs no local recovery.
//!
//! Interactions that must fire framework event handlers (React synthetic
//! events, covered toggle labels) dispatch a native `el.click()` from page
//! context instead of a coordinate-based CDP click, which can land on an
//! overlay element.

use headless_chrome::Tab;
use labrat_core::{LabratError, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Handle to the serial command pipeline of one browser tab
///
/// Cheap to clone; page objects each hold their own copy and navigation
/// methods hand a clone to the destination page object.
#[derive(Clone)]
pub struct Pipeline {
    tab: Arc<Tab>,
    base_url: String,
    timeout: Duration,
    poll: Duration,
}

impl Pipeline {
    pub fn new(tab: Arc<Tab>, base_url: &str, timeout: Duration, poll: Duration) -> Self {
        Self {
            tab,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            poll,
        }
    }

    /// Origin the pipeline resolves relative paths against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Navigate to a path relative to the base URL and wait for the load
    pub async fn visit(&self, path: &str) -> Result<()> {
        let url = if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        };
        debug!("Visiting {}", url);

        self.tab
            .navigate_to(&url)
            .map_err(|e| LabratError::Browser(format!("Failed to navigate to {}: {}", url, e)))?;
        self.tab
            .wait_until_navigated()
            .map_err(|e| LabratError::Browser(format!("Navigation timeout for {}: {}", url, e)))?;
        Ok(())
    }

    /// Click an element once it is visible
    pub async fn click(&self, selector: &str) -> Result<()> {
        self.retry(selector, "become clickable", || {
            if !self.visible_now(selector)? {
                return Ok(None);
            }
            let element = self
                .tab
                .find_element(selector)
                .map_err(|e| LabratError::Browser(e.to_string()))?;
            element
                .click()
                .map_err(|e| LabratError::Browser(e.to_string()))?;
            Ok(Some(()))
        })
        .await
    }

    /// Dispatch a native `el.click()` from page context
    ///
    /// Coordinate-based clicks can land on a wrapper span that calls
    /// `stopPropagation()`; dispatching from the element itself guarantees
    /// the framework click handler fires.
    pub async fn click_native(&self, selector: &str) -> Result<()> {
        let script = format!(
            r#"(() => {{
                const el = document.querySelector({sel});
                if (!el) return false;
                el.click();
                return true;
            }})()"#,
            sel = js_str(selector),
        );
        self.retry_truthy(selector, "exist for native click", &script)
            .await
    }

    /// Click the first element matching `selector` whose text contains `text`
    ///
    /// Dispatches a native click from page context so wrapper spans that
    /// swallow coordinate clicks cannot intercept it.
    pub async fn click_contains(&self, selector: &str, text: &str) -> Result<()> {
        let script = format!(
            r#"(() => {{
                const els = Array.from(document.querySelectorAll({sel}));
                const el = els.find(e => (e.textContent || '').includes({text}));
                if (!el) return false;
                el.click();
                return true;
            }})()"#,
            sel = js_str(selector),
            text = js_str(text),
        );
        self.retry_truthy(selector, &format!("contain text '{}'", text), &script)
            .await
    }

    /// Type into an element once it is visible (appends to existing content)
    pub async fn type_text(&self, selector: &str, value: &str) -> Result<()> {
        self.retry(selector, "accept input", || {
            if !self.visible_now(selector)? {
                return Ok(None);
            }
            let element = self
                .tab
                .find_element(selector)
                .map_err(|e| LabratError::Browser(e.to_string()))?;
            element
                .type_into(value)
                .map_err(|e| LabratError::Browser(e.to_string()))?;
            Ok(Some(()))
        })
        .await
    }

    /// Clear a field, type a value, and assert the field holds exactly it
    pub async fn clear_and_type(&self, selector: &str, value: &str) -> Result<()> {
        let clear = format!(
            r#"(() => {{
                const el = document.querySelector({sel});
                if (!el) return false;
                el.value = '';
                el.dispatchEvent(new Event('input', {{ bubbles: true }}));
                return true;
            }})()"#,
            sel = js_str(selector),
        );
        self.retry_truthy(selector, "exist for clearing", &clear).await?;
        self.type_text(selector, value).await?;
        self.assert_value(selector, value).await
    }

    /// Set a checkbox to checked, clicking it natively if needed
    pub async fn check(&self, selector: &str) -> Result<()> {
        self.set_checked(selector, true).await
    }

    /// Set a checkbox to unchecked, clicking it natively if needed
    pub async fn uncheck(&self, selector: &str) -> Result<()> {
        self.set_checked(selector, false).await
    }

    async fn set_checked(&self, selector: &str, want: bool) -> Result<()> {
        let script = format!(
            r#"(() => {{
                const el = document.querySelector({sel});
                if (!el) return false;
                if (el.checked !== {want}) el.click();
                return el.checked === {want};
            }})()"#,
            sel = js_str(selector),
            want = want,
        );
        let expectation = if want { "become checked" } else { "become unchecked" };
        self.retry_truthy(selector, expectation, &script).await
    }

    /// Select an option of a `<select>` by value, firing a change event
    pub async fn select(&self, selector: &str, value: &str) -> Result<()> {
        let script = format!(
            r#"(() => {{
                const el = document.querySelector({sel});
                if (!el) return false;
                el.value = {val};
                el.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return el.value === {val};
            }})()"#,
            sel = js_str(selector),
            val = js_str(value),
        );
        self.retry_truthy(selector, &format!("offer option '{}'", value), &script)
            .await
    }

    /// Assert an element is visible
    pub async fn assert_visible(&self, selector: &str) -> Result<()> {
        self.retry(selector, "become visible", || {
            Ok(self.visible_now(selector)?.then_some(()))
        })
        .await
    }

    /// Assert an element exists in the DOM (visible or not)
    pub async fn assert_exists(&self, selector: &str) -> Result<()> {
        let script = format!(
            "document.querySelector({sel}) !== null",
            sel = js_str(selector)
        );
        self.retry_truthy(selector, "exist", &script).await
    }

    /// Assert an element is absent from the DOM
    pub async fn assert_not_exists(&self, selector: &str) -> Result<()> {
        let script = format!(
            "document.querySelector({sel}) === null",
            sel = js_str(selector)
        );
        self.retry_truthy(selector, "not exist", &script).await
    }

    /// Assert some element matching `selector` contains `text` and is visible
    pub async fn assert_contains_visible(&self, selector: &str, text: &str) -> Result<()> {
        let script = format!(
            r#"(() => {{
                const els = Array.from(document.querySelectorAll({sel}));
                const el = els.find(e => (e.textContent || '').includes({text}));
                if (!el) return false;
                const r = el.getBoundingClientRect();
                const s = getComputedStyle(el);
                return r.width > 0 && r.height > 0 && s.display !== 'none' && s.visibility !== 'hidden';
            }})()"#,
            sel = js_str(selector),
            text = js_str(text),
        );
        self.retry_truthy(selector, &format!("visibly contain '{}'", text), &script)
            .await
    }

    /// Assert an input holds exactly `expected`
    pub async fn assert_value(&self, selector: &str, expected: &str) -> Result<()> {
        let script = format!(
            r#"(() => {{
                const el = document.querySelector({sel});
                return el ? el.value === {val} : false;
            }})()"#,
            sel = js_str(selector),
            val = js_str(expected),
        );
        self.retry_truthy(selector, &format!("have value '{}'", expected), &script)
            .await
    }

    /// Assert the current URL contains a fragment
    pub async fn assert_url_contains(&self, fragment: &str) -> Result<()> {
        let script = format!(
            "window.location.href.includes({frag})",
            frag = js_str(fragment)
        );
        self.retry_truthy("window.location", &format!("include '{}'", fragment), &script)
            .await
    }

    /// Assert the current URL does not contain a fragment
    pub async fn assert_url_not_contains(&self, fragment: &str) -> Result<()> {
        let script = format!(
            "!window.location.href.includes({frag})",
            frag = js_str(fragment)
        );
        self.retry_truthy(
            "window.location",
            &format!("no longer include '{}'", fragment),
            &script,
        )
        .await
    }

    /// Read the trimmed text content of an element, waiting for it to exist
    pub async fn read_text(&self, selector: &str) -> Result<String> {
        let script = format!(
            r#"(() => {{
                const el = document.querySelector({sel});
                return el ? el.textContent : null;
            }})()"#,
            sel = js_str(selector),
        );
        self.retry(selector, "exist", || {
            let value = self.eval(&script)?;
            Ok(value.as_str().map(|s| s.trim().to_string()))
        })
        .await
    }

    /// Non-waiting visibility probe
    pub async fn is_visible(&self, selector: &str) -> bool {
        self.visible_now(selector).unwrap_or(false)
    }

    /// Evaluate JavaScript in page context
    pub fn eval(&self, script: &str) -> Result<serde_json::Value> {
        let result = self
            .tab
            .evaluate(script, false)
            .map_err(|e| LabratError::Browser(format!("JavaScript evaluation failed: {}", e)))?;
        Ok(result.value.unwrap_or(serde_json::Value::Null))
    }

    fn visible_now(&self, selector: &str) -> Result<bool> {
        let script = format!(
            r#"(() => {{
                const el = document.querySelector({sel});
                if (!el) return false;
                const r = el.getBoundingClientRect();
                const s = getComputedStyle(el);
                return r.width > 0 && r.height > 0 && s.display !== 'none' && s.visibility !== 'hidden';
            }})()"#,
            sel = js_str(selector),
        );
        Ok(self.eval(&script)?.as_bool().unwrap_or(false))
    }

    async fn retry_truthy(&self, selector: &str, expectation: &str, script: &str) -> Result<()> {
        self.retry(selector, expectation, || {
            Ok(self.eval(script)?.as_bool().unwrap_or(false).then_some(()))
        })
        .await
    }

    /// Poll `attempt` until it yields a value or the timeout elapses.
    ///
    /// Errors from an attempt (element mid-replacement, page navigating) are
    /// treated as not-ready and retried; only the timeout surfaces.
    async fn retry<T>(
        &self,
        selector: &str,
        expectation: &str,
        mut attempt: impl FnMut() -> Result<Option<T>>,
    ) -> Result<T> {
        let start = Instant::now();
        loop {
            match attempt() {
                Ok(Some(value)) => return Ok(value),
                Ok(None) => {}
                Err(e) => debug!("Retrying '{}' after error: {}", selector, e),
            }
            if start.elapsed() >= self.timeout {
                return Err(LabratError::Timeout {
                    selector: selector.to_string(),
                    expectation: expectation.to_string(),
                    waited_ms: start.elapsed().as_millis() as u64,
                });
            }
            tokio::time::sleep(self.poll).await;
        }
    }
}

/// Quote a string as a JavaScript literal (handles quotes in selectors)
fn js_str(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_str_quotes_selectors() {
        assert_eq!(js_str("[data-cy='add-button']"), r#""[data-cy='add-button']""#);
        assert_eq!(js_str(r#"a "b" c"#), r#""a \"b\" c""#);
    }

    #[test]
    fn test_js_str_in_script_template() {
        let script = format!("document.querySelector({})", js_str("#login-name"));
        assert_eq!(script, r##"document.querySelector("#login-name")"##);
    }
}

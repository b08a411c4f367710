//! Browser control for the labrat end-to-end harness
//!
//! This crate owns everything that touches Chrome DevTools Protocol (CDP)
//! through `headless_chrome`:
//!
//! - **Browser Management**: launch and control Chrome/Chromium sessions
//! - **Command Pipeline**: the queued, auto-retrying execution model every
//!   page-object action runs through -- each command polls the DOM until the
//!   element satisfies its expected state or the configured timeout elapses
//! - **Storage State**: serialize cookies and local/session storage once
//!   after login, re-seed fresh contexts from the artifact read-only
//! - **Screenshots**: failure evidence stored under the artifact directory
//!
//! # Requirements
//!
//! - Chrome or Chromium installed
//! - For connecting to an existing browser: `chrome --remote-debugging-port=9222`
//!
//! # Architecture
//!
//! - [`browser`]: browser lifecycle and session management
//! - [`pipeline`]: retrying DOM commands (click, type, assert)
//! - [`session_state`]: persisted auth storage state
//! - [`screenshot`]: screenshot capture into the artifact store
//! - [`error`]: error types for browser operations

pub mod browser;
pub mod error;
pub mod pipeline;
pub mod screenshot;
pub mod session_state;

pub use browser::{BrowserConfig, BrowserSession};
pub use error::{LabratError, Result};
pub use pipeline::Pipeline;
pub use screenshot::{capture_failure_screenshot, ArtifactStore};
pub use session_state::StorageState;

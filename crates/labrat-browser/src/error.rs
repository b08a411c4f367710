//! Browser error types - re-exports the unified LabratError from labrat-core
//!
//! All browser failures use the unified LabratError type:
//! - Browser(String) - launch, navigation, CDP, screenshot failures
//! - Timeout { .. } - a command pipeline action that never reached its
//!   expected state within the configured timeout
//!
//! Error messages should name the operation and the selector involved.

pub use labrat_core::{LabratError, Result};

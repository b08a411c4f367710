//! # labrat-core
//!
//! Core types for the labrat end-to-end UI test harness.
//!
//! labrat drives a browser-rendered LIMS administrative UI through real user
//! journeys: log in once, walk the admin screens, assert on what renders, and
//! manage the out-of-process database fixtures those journeys depend on.
//!
//! ## Core Paradigm
//!
//! - Specs are files on disk; run order is a pure function of the priority
//!   list and directory contents
//! - Page objects are plain values created from a session handle, never
//!   shared mutable state
//! - Fixture operations are idempotent or guarded, and their failure policy
//!   is explicit
//! - Authentication happens exactly once per suite; everything downstream
//!   consumes the persisted storage state read-only

pub mod config;
mod error;
pub mod fail_open;

pub use config::{Credentials, FixtureToggles, Isolation, SuiteConfig};
pub use error::{LabratError, Result};

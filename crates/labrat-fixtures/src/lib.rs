//! Fixture task bridge
//!
//! Journeys need seed data the UI cannot create (rooms, devices, reference
//! rows). This crate bridges to the out-of-process operations that manage
//! it: a shell loader script and direct SQL against the named test database
//! container. The bridge holds no state of its own; side effects are
//! entirely external.
//!
//! Failure handling is an explicit policy, not an unconditional catch:
//! the default `Lenient` policy logs and swallows task failures (fixtures
//! are assumed idempotent across retries), `Strict` propagates them for CI
//! gating.

mod executor;
mod tasks;

pub use executor::{DockerPsqlExecutor, MockTaskExecutor, TaskExecutor, TaskOutput};
pub use tasks::{FailurePolicy, FixtureConfig, FixtureTasks};

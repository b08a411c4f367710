//! Suite orchestration for labrat
//!
//! Everything between "a directory of spec files" and "a suite report":
//!
//! - [`order`]: deterministic spec execution order (priority list first,
//!   lexicographic remainder, exclusions filtered before ordering)
//! - [`spec_file`]: the YAML documents binding a spec to a journey
//! - [`journeys`]: built-in journeys composing page objects
//! - [`bootstrap`]: interactive login once per suite, persisted storage state
//! - [`runner`]: fixture lifecycle, backend readiness, isolation modes,
//!   worker parallelism, retries, failure screenshots, JSON report

pub mod bootstrap;
pub mod journeys;
pub mod order;
pub mod runner;
pub mod spec_file;

pub use bootstrap::AuthBootstrap;
pub use journeys::{JourneyContext, JourneyFn, JourneyRegistry};
pub use order::{compute_order, OrderConfig};
pub use runner::{SpecOutcome, SuiteResult, SuiteRunner};
pub use spec_file::SpecFile;

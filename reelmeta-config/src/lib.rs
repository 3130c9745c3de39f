//! Shared configuration library for reelmeta.
//!
//! Loads [`ResolverConfig`] from files and the environment, installs the
//! tracing subscriber, and ships the `reelmeta-probe` developer binary.
#![allow(missing_docs)]

pub mod models;
pub mod telemetry;
pub mod util;

pub use models::{ConfigSource, ResolverConfig};
pub use telemetry::init_tracing;

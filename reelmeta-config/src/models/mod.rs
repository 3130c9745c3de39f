pub mod resolver;

pub use resolver::{ConfigSource, ResolverConfig};

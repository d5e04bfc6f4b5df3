//! Service configuration.

pub mod env_resolver;
pub mod settings;

pub use env_resolver::{default_env_resolver, EnvKey, EnvResolverFn};
pub use settings::{BridgeSettings, SkillSettings};

//! Environment variables as a flag source.
//!
//! This module handles:
//! - Snapshotting `KEY=VALUE` entries
//! - `$NAME` / `${NAME}` expansion, shared with the config file layer
//! - Splitting comma-separated list values
//! - Mapping flag names to prefixed variable names

pub mod expand;
pub mod resolver;
pub mod snapshot;
pub mod split;

pub use expand::expand;
pub use resolver::{BaseName, EnvPrefix, EnvResolver, Fixed, env_key};
pub use snapshot::{EnvMap, process_env};
pub use split::split_escape;

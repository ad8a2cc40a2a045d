//! Flaglayer - fill command-line flags from environment variables and a config file.
//!
//! Flags keep a strict precedence: values given on the command line win, then
//! environment variables, then config file entries, then each flag's default.
//! This library provides:
//! - A `FlagRegistry` trait and a reference `FlagSet` implementation
//! - Environment resolution with prefixed names and comma-separated lists
//! - Config file resolution from a simple `key value` format
//! - `$NAME` / `${NAME}` expansion for both sources
//!
//! # Example
//!
//! ```no_run
//! use flaglayer::registry::{ErrorHandling, FlagSet, ListValue, StringValue};
//!
//! let mut flags = FlagSet::new("my-app", ErrorHandling::Exit);
//! flags.var("config-path", StringValue::default(), "path to a config file").unwrap();
//! flags.var("some-string", StringValue::default(), "some fancy string").unwrap();
//! flags.var("string-array", ListValue::default(), "repeatable list").unwrap();
//!
//! // After applying command-line values with `FlagSet::set`:
//! //   MY_APP_SOME_STRING=str           sets some-string
//! //   MY_APP_STRING_ARRAY=one,two\,x   sets string-array to "one", "two,x"
//! flaglayer::parse_env(&mut flags).unwrap();
//!
//! let path = flags.get("config-path").unwrap_or_default();
//! flaglayer::parse_config(&mut flags, &path).unwrap();
//! ```

pub mod config;
pub mod env;
pub mod error;
mod precedence;
pub mod registry;
pub mod report;

pub use config::ConfigResolver;
pub use env::{EnvPrefix, EnvResolver};
pub use error::{FlagError, Result, SetErrors};
pub use registry::{ErrorHandling, FlagRegistry, FlagSet};

/// Resolve unset flags from the process environment, using the base name of
/// the registry as prefix.
///
/// The error only needs checking when the registry's `ErrorHandling` is
/// `Propagate`; otherwise it has already exited or panicked.
pub fn parse_env<R: FlagRegistry + ?Sized>(flags: &mut R) -> Result<()> {
	EnvResolver::new().parse_env(flags, env::process_env())
}

/// Resolve unset flags from the config file at `path`, expanding against the
/// process environment.
pub fn parse_config<R: FlagRegistry + ?Sized>(flags: &mut R, path: &str) -> Result<()> {
	ConfigResolver::new().parse_config(flags, env::process_env(), path)
}

//! The flag registry that the environment and config layers write into.
//!
//! This module handles:
//! - The `FlagRegistry` trait the resolvers are written against
//! - A reference `FlagSet` implementation
//! - Common flag value types

pub mod flagset;
pub mod value;

pub use flagset::{Flag, FlagSet};
pub use value::{BoolValue, ListValue, Parsed, StringValue, Value};

use crate::error::Result;
use std::collections::HashSet;
use std::io::Write;

/// What a registry does once it has reported an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorHandling {
	/// Return the error to the caller.
	#[default]
	Propagate,

	/// Exit the process with status 2.
	Exit,

	/// Panic with the error message.
	Panic,
}

/// A set of named, settable flags.
pub trait FlagRegistry {
	/// Name of the registry, usually the program name.
	fn name(&self) -> &str;

	/// Names of all registered flags, in the order they should be visited.
	fn flag_names(&self) -> Vec<String>;

	/// Names of the flags that have already been set.
	fn explicitly_set(&self) -> HashSet<String>;

	/// Set the named flag from a string, recording it as set on success.
	fn set(&mut self, name: &str, value: &str) -> Result<()>;

	/// Where errors are written.
	fn output(&mut self) -> &mut dyn Write;

	/// Show usage text. Does nothing unless the registry has a usage callback.
	fn usage(&mut self) {}

	fn error_handling(&self) -> ErrorHandling;
}

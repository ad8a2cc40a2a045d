use crate::error::{FlagError, Result};
use crate::registry::value::Value;
use crate::registry::{ErrorHandling, FlagRegistry};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::io::Write;

type UsageFn = Box<dyn FnMut(&mut dyn Write)>;

/// A registered flag.
pub struct Flag {
	/// Name as used on the command line and in config files.
	pub name: String,

	/// Help text.
	pub usage: String,

	/// Display form of the value at registration time.
	pub default: String,

	value: Box<dyn Value>,
}

impl Flag {
	pub fn value(&self) -> &dyn Value {
		self.value.as_ref()
	}
}

impl fmt::Debug for Flag {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Flag")
			.field("name", &self.name)
			.field("usage", &self.usage)
			.field("default", &self.default)
			.field("value", &self.value.to_string())
			.finish()
	}
}

/// Reference flag registry.
///
/// Flags are visited in lexicographic order of their names. A flag counts as
/// set once `set` has succeeded for it, whichever source the value came from.
pub struct FlagSet {
	name: String,
	error_handling: ErrorHandling,
	flags: BTreeMap<String, Flag>,
	actual: BTreeSet<String>,
	output: Box<dyn Write>,
	usage: Option<UsageFn>,
}

impl FlagSet {
	pub fn new(name: impl Into<String>, error_handling: ErrorHandling) -> Self {
		Self {
			name: name.into(),
			error_handling,
			flags: BTreeMap::new(),
			actual: BTreeSet::new(),
			output: Box::new(std::io::stderr()),
			usage: None,
		}
	}

	/// Register a flag.
	pub fn var(
		&mut self,
		name: impl Into<String>,
		value: impl Value + 'static,
		usage: impl Into<String>,
	) -> Result<()> {
		let name = name.into();
		if self.flags.contains_key(&name) {
			return Err(FlagError::DuplicateFlag { name });
		}

		let flag = Flag {
			name: name.clone(),
			usage: usage.into(),
			default: value.to_string(),
			value: Box::new(value),
		};
		self.flags.insert(name, flag);
		Ok(())
	}

	pub fn lookup(&self, name: &str) -> Option<&Flag> {
		self.flags.get(name)
	}

	/// Display form of the named flag's current value.
	pub fn get(&self, name: &str) -> Option<String> {
		self.lookup(name).map(|flag| flag.value.to_string())
	}

	pub fn is_set(&self, name: &str) -> bool {
		self.actual.contains(name)
	}

	/// All flags in visiting order.
	pub fn flags(&self) -> impl Iterator<Item = &Flag> {
		self.flags.values()
	}

	pub fn set_output(&mut self, output: impl Write + 'static) {
		self.output = Box::new(output);
	}

	pub fn set_usage(&mut self, usage: impl FnMut(&mut dyn Write) + 'static) {
		self.usage = Some(Box::new(usage));
	}

	/// Write every flag with its usage and default.
	pub fn print_defaults(&self, out: &mut dyn Write) -> std::io::Result<()> {
		for flag in self.flags.values() {
			writeln!(out, "  -{}", flag.name)?;
			if flag.default.is_empty() {
				writeln!(out, "    \t{}", flag.usage)?;
			} else {
				writeln!(out, "    \t{} (default {:?})", flag.usage, flag.default)?;
			}
		}
		Ok(())
	}
}

impl FlagRegistry for FlagSet {
	fn name(&self) -> &str {
		&self.name
	}

	fn flag_names(&self) -> Vec<String> {
		self.flags.keys().cloned().collect()
	}

	fn explicitly_set(&self) -> HashSet<String> {
		self.actual.iter().cloned().collect()
	}

	fn set(&mut self, name: &str, value: &str) -> Result<()> {
		let flag = self
			.flags
			.get_mut(name)
			.ok_or_else(|| FlagError::UnknownFlag {
				name: name.to_string(),
			})?;

		flag.value
			.set(value)
			.map_err(|source| FlagError::InvalidValue {
				name: name.to_string(),
				value: value.to_string(),
				source,
			})?;

		self.actual.insert(name.to_string());
		Ok(())
	}

	fn output(&mut self) -> &mut dyn Write {
		self.output.as_mut()
	}

	fn usage(&mut self) {
		if let Some(usage) = self.usage.as_mut() {
			usage(self.output.as_mut());
		}
	}

	fn error_handling(&self) -> ErrorHandling {
		self.error_handling
	}
}

impl fmt::Debug for FlagSet {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FlagSet")
			.field("name", &self.name)
			.field("error_handling", &self.error_handling)
			.field("flags", &self.flags)
			.field("actual", &self.actual)
			.finish_non_exhaustive()
	}
}

use std::fmt;
use std::path::PathBuf;

/// Error returned by a flag value's setter.
pub type ValueError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Library-level structured errors for flaglayer.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The demo binary wraps these with `anyhow` for context chains.
#[derive(Debug, thiserror::Error)]
pub enum FlagError {
	#[error("open config file {path}: {source}")]
	OpenConfig {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("scan config file {path}: {source}")]
	ScanConfig {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("unknown config key {key} at {path}:{line}")]
	UnknownConfigKey {
		key: String,
		path: PathBuf,
		line: usize,
	},

	#[error("flag provided but not defined: {name}")]
	UnknownFlag { name: String },

	#[error("flag redefined: {name}")]
	DuplicateFlag { name: String },

	#[error("invalid value {value:?} for flag {name}: {source}")]
	InvalidValue {
		name: String,
		value: String,
		#[source]
		source: ValueError,
	},

	#[error(transparent)]
	InvalidValues(#[from] SetErrors),
}

/// Result type alias using FlagError.
pub type Result<T> = std::result::Result<T, FlagError>;

/// Every setter failure collected during one resolution pass.
///
/// An empty collection means the pass succeeded.
#[derive(Debug, Default)]
pub struct SetErrors {
	errors: Vec<FlagError>,
}

impl SetErrors {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push(&mut self, err: FlagError) {
		self.errors.push(err);
	}

	pub fn is_empty(&self) -> bool {
		self.errors.is_empty()
	}

	pub fn len(&self) -> usize {
		self.errors.len()
	}

	pub fn iter(&self) -> std::slice::Iter<'_, FlagError> {
		self.errors.iter()
	}

	/// `Ok(())` when nothing failed, otherwise the whole collection as one error.
	pub fn into_result(self) -> Result<()> {
		if self.is_empty() {
			Ok(())
		} else {
			Err(FlagError::InvalidValues(self))
		}
	}
}

impl fmt::Display for SetErrors {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (i, err) in self.errors.iter().enumerate() {
			if i > 0 {
				writeln!(f)?;
			}
			write!(f, "{err}")?;
		}
		Ok(())
	}
}

impl std::error::Error for SetErrors {}

impl<'a> IntoIterator for &'a SetErrors {
	type Item = &'a FlagError;
	type IntoIter = std::slice::Iter<'a, FlagError>;

	fn into_iter(self) -> Self::IntoIter {
		self.errors.iter()
	}
}

use std::collections::HashMap;

/// Immutable view of an environment, built from `KEY=VALUE` entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvMap {
	vars: HashMap<String, String>,
}

impl EnvMap {
	/// Build a snapshot from `KEY=VALUE` entries.
	///
	/// Entries without `=` are skipped. Later entries win over earlier ones.
	pub fn from_entries<I, S>(entries: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let vars = entries
			.into_iter()
			.filter_map(|entry| {
				entry
					.as_ref()
					.split_once('=')
					.map(|(k, v)| (k.to_string(), v.to_string()))
			})
			.collect();
		Self { vars }
	}

	pub fn get(&self, key: &str) -> Option<&str> {
		self.vars.get(key).map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.vars.len()
	}

	pub fn is_empty(&self) -> bool {
		self.vars.is_empty()
	}
}

/// The current process environment as `KEY=VALUE` entries.
///
/// Non-UTF-8 names and values are converted lossily.
pub fn process_env() -> Vec<String> {
	std::env::vars_os()
		.map(|(k, v)| format!("{}={}", k.to_string_lossy(), v.to_string_lossy()))
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_from_entries() {
		let env = EnvMap::from_entries(["HOME=/x", "EMPTY=", "NOEQUALS", "URL=a=b"]);
		assert_eq!(env.len(), 3);
		assert_eq!(env.get("HOME"), Some("/x"));
		assert_eq!(env.get("EMPTY"), Some(""));
		assert_eq!(env.get("URL"), Some("a=b"));
		assert_eq!(env.get("NOEQUALS"), None);
	}

	#[test]
	fn test_last_entry_wins() {
		let env = EnvMap::from_entries(vec!["A=1".to_string(), "A=2".to_string()]);
		assert_eq!(env.get("A"), Some("2"));
	}

	#[test]
	fn test_process_env_entries_have_separator() {
		assert!(process_env().iter().all(|entry| entry.contains('=')));
	}
}

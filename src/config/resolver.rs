use crate::config::parser::{ConfigTable, parse_config_file};
use crate::env::expand::expand;
use crate::env::snapshot::EnvMap;
use crate::error::{FlagError, Result};
use crate::precedence::apply_unset;
use crate::registry::FlagRegistry;
use crate::report::report;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Fills unset flags from a config file.
///
/// The file has one `key value` pair per line. Keys may repeat to build
/// lists, a key on its own means `true`, and `#` starts a comment line.
/// Values and the path itself are expanded against the environment.
///
/// ```text
/// # ignore me
/// my-flag my value
/// my-array value one
/// my-array value two
/// data-dir $HOME/dir
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver {
	strict_keys: bool,
}

impl ConfigResolver {
	pub fn new() -> Self {
		Self::default()
	}

	/// Reject keys that do not name a registered flag. Off by default, in
	/// which case such keys are ignored.
	pub fn strict_keys(mut self, strict: bool) -> Self {
		self.strict_keys = strict;
		self
	}

	/// Resolve every unset flag in `flags` from the file at `path`.
	///
	/// An empty `path` or a file that does not exist is not an error. Failing
	/// to open or read the file is, and nothing is applied in that case.
	/// Setter failures are collected into one error. Errors are handled by the
	/// registry's `ErrorHandling`.
	pub fn parse_config<R, I, S>(&self, flags: &mut R, env: I, path: &str) -> Result<()>
	where
		R: FlagRegistry + ?Sized,
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		if path.is_empty() {
			return Ok(());
		}

		let env = EnvMap::from_entries(env);
		let result = self.resolve(flags, &env, path);
		report(flags, result)
	}

	fn resolve<R>(&self, flags: &mut R, env: &EnvMap, path: &str) -> Result<()>
	where
		R: FlagRegistry + ?Sized,
	{
		let path = PathBuf::from(expand(path, env).as_ref());
		let Some(table) = parse_config_file(&path)? else {
			tracing::debug!(path = %path.display(), "config file not found, skipping");
			return Ok(());
		};
		tracing::debug!(
			path = %path.display(),
			keys = table.len(),
			"resolving flags from config file"
		);

		self.check_keys(flags, &table, &path)?;

		apply_unset(flags, "config", |name| {
			table
				.values(name)
				.iter()
				.map(|value| expand(value, env).into_owned())
				.collect()
		})
	}

	fn check_keys<R>(&self, flags: &R, table: &ConfigTable, path: &Path) -> Result<()>
	where
		R: FlagRegistry + ?Sized,
	{
		let known: HashSet<String> = flags.flag_names().into_iter().collect();
		let mut unknown: Vec<_> = table
			.iter()
			.filter(|(key, _)| !known.contains(*key))
			.collect();

		if !self.strict_keys {
			for (key, entry) in unknown {
				tracing::debug!(key, line = entry.line, "ignoring unknown config key");
			}
			return Ok(());
		}

		unknown.sort_by_key(|(_, entry)| entry.line);
		match unknown.first() {
			Some((key, entry)) => Err(FlagError::UnknownConfigKey {
				key: key.to_string(),
				path: path.to_path_buf(),
				line: entry.line,
			}),
			None => Ok(()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::registry::{BoolValue, ErrorHandling, FlagSet, ListValue, Parsed, StringValue};
	use std::fs;

	fn flag_set() -> FlagSet {
		let mut flags = FlagSet::new("my-app", ErrorHandling::Propagate);
		flags.set_output(std::io::sink());
		flags.var("str", StringValue::new("default"), "").unwrap();
		flags.var("arr", ListValue::default(), "").unwrap();
		flags.var("uh", BoolValue::default(), "").unwrap();
		flags.var("port", Parsed(8080u16), "").unwrap();
		flags
	}

	fn write_config(dir: &Path, content: &str) -> String {
		let path = dir.join("app.conf");
		fs::write(&path, content).unwrap();
		path.to_string_lossy().into_owned()
	}

	#[test]
	fn test_empty_path_is_noop() {
		let mut flags = flag_set();
		ConfigResolver::new()
			.parse_config(&mut flags, Vec::<String>::new(), "")
			.unwrap();
		assert_eq!(flags.get("str").unwrap(), "default");
	}

	#[test]
	fn test_missing_file_is_success() {
		let temp_dir = tempfile::tempdir().unwrap();
		let path = temp_dir.path().join("missing.conf");
		let mut flags = flag_set();

		ConfigResolver::new()
			.parse_config(&mut flags, Vec::<String>::new(), &path.to_string_lossy())
			.unwrap();

		assert_eq!(flags.get("str").unwrap(), "default");
		assert!(flags.explicitly_set().is_empty());
	}

	#[test]
	fn test_applies_values_in_file_order() {
		let temp_dir = tempfile::tempdir().unwrap();
		let path = write_config(
			temp_dir.path(),
			"# comment\nstr hello world\narr value 1\n\narr\tvalue 2\nuh\n",
		);
		let mut flags = flag_set();

		ConfigResolver::new()
			.parse_config(&mut flags, Vec::<String>::new(), &path)
			.unwrap();

		assert_eq!(flags.get("str").unwrap(), "hello world");
		assert_eq!(flags.get("arr").unwrap(), r#""value 1", "value 2""#);
		assert_eq!(flags.get("uh").unwrap(), "true");
	}

	#[test]
	fn test_explicit_values_win() {
		let temp_dir = tempfile::tempdir().unwrap();
		let path = write_config(temp_dir.path(), "str from config\narr a\n");
		let mut flags = flag_set();
		flags.set("str", "from cli").unwrap();

		ConfigResolver::new()
			.parse_config(&mut flags, Vec::<String>::new(), &path)
			.unwrap();

		assert_eq!(flags.get("str").unwrap(), "from cli");
		assert_eq!(flags.get("arr").unwrap(), r#""a""#);
	}

	#[test]
	fn test_expands_values_and_path() {
		let temp_dir = tempfile::tempdir().unwrap();
		write_config(temp_dir.path(), "str $HOME/dir\n");
		let mut flags = flag_set();
		let env = [
			"HOME=/x".to_string(),
			format!("CONF_DIR={}", temp_dir.path().display()),
		];

		ConfigResolver::new()
			.parse_config(&mut flags, env, "${CONF_DIR}/app.conf")
			.unwrap();

		assert_eq!(flags.get("str").unwrap(), "/x/dir");
	}

	#[test]
	fn test_unknown_keys_ignored_by_default() {
		let temp_dir = tempfile::tempdir().unwrap();
		let path = write_config(temp_dir.path(), "nope 1\nstr ok\n");
		let mut flags = flag_set();

		ConfigResolver::new()
			.parse_config(&mut flags, Vec::<String>::new(), &path)
			.unwrap();

		assert_eq!(flags.get("str").unwrap(), "ok");
	}

	#[test]
	fn test_unknown_keys_rejected_when_strict() {
		let temp_dir = tempfile::tempdir().unwrap();
		let path = write_config(temp_dir.path(), "str ok\nzzz 1\nnope 2\n");
		let mut flags = flag_set();

		let err = ConfigResolver::new()
			.strict_keys(true)
			.parse_config(&mut flags, Vec::<String>::new(), &path)
			.unwrap_err();

		match err {
			FlagError::UnknownConfigKey { key, line, .. } => {
				assert_eq!(key, "zzz");
				assert_eq!(line, 2);
			}
			_ => panic!("Expected UnknownConfigKey error"),
		}
		assert_eq!(flags.get("str").unwrap(), "default");
	}

	#[test]
	fn test_directory_fails_at_scan() {
		let temp_dir = tempfile::tempdir().unwrap();
		let mut flags = flag_set();

		let err = ConfigResolver::new()
			.parse_config(
				&mut flags,
				Vec::<String>::new(),
				&temp_dir.path().to_string_lossy(),
			)
			.unwrap_err();

		assert!(matches!(err, FlagError::ScanConfig { .. }));
		assert!(err.to_string().contains("scan config file"));
	}

	#[cfg(unix)]
	#[test]
	fn test_unreadable_file_fails_at_open() {
		use std::os::unix::fs::PermissionsExt;

		let temp_dir = tempfile::tempdir().unwrap();
		let path = write_config(temp_dir.path(), "str from config\n");
		fs::set_permissions(&path, fs::Permissions::from_mode(0o000)).unwrap();

		// Privileged users can open the file anyway.
		if fs::File::open(&path).is_ok() {
			return;
		}

		let mut flags = flag_set();
		let err = ConfigResolver::new()
			.parse_config(&mut flags, Vec::<String>::new(), &path)
			.unwrap_err();

		assert!(err.to_string().contains("open config file"));
		assert_eq!(flags.get("str").unwrap(), "default");
	}

	#[test]
	fn test_non_utf8_comment_does_not_discard_file() {
		let temp_dir = tempfile::tempdir().unwrap();
		let path = temp_dir.path().join("app.conf");
		fs::write(&path, b"# caf\xe9 settings\nstr ok\n").unwrap();
		let mut flags = flag_set();

		ConfigResolver::new()
			.parse_config(&mut flags, Vec::<String>::new(), &path.to_string_lossy())
			.unwrap();

		assert_eq!(flags.get("str").unwrap(), "ok");
	}

	#[test]
	fn test_setter_failures_do_not_block_other_flags() {
		let temp_dir = tempfile::tempdir().unwrap();
		let path = write_config(temp_dir.path(), "port http\nstr fine\n");
		let mut flags = flag_set();

		let err = ConfigResolver::new()
			.parse_config(&mut flags, Vec::<String>::new(), &path)
			.unwrap_err();

		match err {
			FlagError::InvalidValues(errors) => assert_eq!(errors.len(), 1),
			_ => panic!("Expected InvalidValues error"),
		}
		assert_eq!(flags.get("str").unwrap(), "fine");
		assert_eq!(flags.get("port").unwrap(), "8080");
	}
}

use crate::env::expand::expand;
use crate::env::snapshot::EnvMap;
use crate::env::split::split_escape;
use crate::error::Result;
use crate::precedence::apply_unset;
use crate::registry::FlagRegistry;
use crate::report::report;
use std::path::Path;

/// Chooses the environment variable prefix for a registry.
pub trait EnvPrefix {
	/// Prefix for variables of the registry called `registry_name`.
	/// An empty prefix means variables are named after the flag alone.
	fn env_prefix(&self, registry_name: &str) -> String;
}

/// Last path component of the registry name, so `/usr/bin/my-app` gives `my-app`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseName;

impl EnvPrefix for BaseName {
	fn env_prefix(&self, registry_name: &str) -> String {
		Path::new(registry_name)
			.file_name()
			.map(|name| name.to_string_lossy().into_owned())
			.unwrap_or_default()
	}
}

/// The same prefix whatever the registry is called.
#[derive(Debug, Clone, Default)]
pub struct Fixed(pub String);

impl Fixed {
	pub fn new(prefix: impl Into<String>) -> Self {
		Self(prefix.into())
	}
}

impl EnvPrefix for Fixed {
	fn env_prefix(&self, _registry_name: &str) -> String {
		self.0.clone()
	}
}

impl<F> EnvPrefix for F
where
	F: Fn(&str) -> String,
{
	fn env_prefix(&self, registry_name: &str) -> String {
		self(registry_name)
	}
}

/// Environment variable name for a flag: `MY_APP_SOME_FLAG` for prefix
/// `my-app` and flag `some-flag`, or `SOME_FLAG` without a prefix.
pub fn env_key(prefix: &str, name: &str) -> String {
	let name = name.replace('-', "_").to_uppercase();
	if prefix.is_empty() {
		return name;
	}
	format!("{}_{}", prefix.replace('-', "_").to_uppercase(), name)
}

/// Fills unset flags from environment variables.
///
/// Values are split on `,` (escape a literal comma as `\,`), each part is
/// expanded against the same environment, and the parts are applied in
/// order, so list flags receive one element per part.
#[derive(Debug, Clone, Default)]
pub struct EnvResolver<P = BaseName> {
	prefix: P,
}

impl EnvResolver {
	pub fn new() -> Self {
		Self::default()
	}
}

impl<P: EnvPrefix> EnvResolver<P> {
	pub fn with_prefix(prefix: P) -> Self {
		Self { prefix }
	}

	/// Variable name this resolver looks up for `flag` in `flags`.
	pub fn key_for<R: FlagRegistry + ?Sized>(&self, flags: &R, flag: &str) -> String {
		env_key(&self.prefix.env_prefix(flags.name()), flag)
	}

	/// Resolve every unset flag in `flags` from `env` (`KEY=VALUE` entries).
	///
	/// Empty or missing variables leave a flag alone. Setter failures are
	/// collected into one error, which is then handled by the registry's
	/// `ErrorHandling`.
	pub fn parse_env<R, I, S>(&self, flags: &mut R, env: I) -> Result<()>
	where
		R: FlagRegistry + ?Sized,
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let env = EnvMap::from_entries(env);
		let prefix = self.prefix.env_prefix(flags.name());
		tracing::debug!(prefix = %prefix, vars = env.len(), "resolving flags from environment");

		let result = apply_unset(flags, "environment", |name| {
			let raw = env.get(&env_key(&prefix, name)).unwrap_or_default();
			split_escape(raw, ',', '\\')
				.iter()
				.map(|part| expand(part, &env).into_owned())
				.collect()
		});

		report(flags, result)
	}
}

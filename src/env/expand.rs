use crate::env::snapshot::EnvMap;
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;

/// `${NAME}`, an unterminated `${`, a single shell-special character
/// (`$1`, `$?`, ...), or `$NAME`.
static VAR_REF: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"\$(?:\{([^}]*)\}|\{|([*#$@!?\-0-9])|([A-Za-z_][A-Za-z0-9_]*))")
		.expect("variable reference pattern is valid")
});

/// Replace `$NAME` and `${NAME}` references with values from `env`.
///
/// Unset names expand to the empty string. `${}` and an unterminated `${`
/// are dropped. A `$` that does not start a reference is left untouched.
/// Substituted text is not expanded again.
pub fn expand<'a>(input: &'a str, env: &EnvMap) -> Cow<'a, str> {
	if !input.contains('$') {
		return Cow::Borrowed(input);
	}

	VAR_REF.replace_all(input, |caps: &Captures<'_>| {
		let name = caps
			.get(1)
			.or_else(|| caps.get(2))
			.or_else(|| caps.get(3))
			.map_or("", |m| m.as_str());
		if name.is_empty() {
			return String::new();
		}
		env.get(name).unwrap_or_default().to_string()
	})
}

use crate::error::{Result, SetErrors};
use crate::registry::FlagRegistry;

/// Apply values from one source to every flag that has not been set yet.
///
/// `values_for` returns the values for a flag name, in the order they are
/// applied. Setter failures are collected and the pass carries on.
pub(crate) fn apply_unset<R, F>(flags: &mut R, source: &str, mut values_for: F) -> Result<()>
where
	R: FlagRegistry + ?Sized,
	F: FnMut(&str) -> Vec<String>,
{
	let already_set = flags.explicitly_set();
	let mut errors = SetErrors::new();

	for name in flags.flag_names() {
		if already_set.contains(&name) {
			tracing::trace!(flag = %name, source, "flag already set, skipping");
			continue;
		}

		for value in values_for(&name) {
			match flags.set(&name, &value) {
				Ok(()) => tracing::debug!(flag = %name, source, "applied value"),
				Err(err) => errors.push(err),
			}
		}
	}

	errors.into_result()
}

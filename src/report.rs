use crate::error::Result;
use crate::registry::{ErrorHandling, FlagRegistry};
use std::io::Write;

/// Handle the outcome of a resolution pass the way the registry handles its
/// own parse errors.
///
/// On error: write it to the registry's output, show usage, then return it,
/// exit with status 2, or panic, depending on the registry's `ErrorHandling`.
pub fn report<R: FlagRegistry + ?Sized>(flags: &mut R, result: Result<()>) -> Result<()> {
	let Err(err) = result else {
		return Ok(());
	};

	// Nothing sensible to do if the error stream itself is broken.
	let _ = writeln!(flags.output(), "{err}");
	flags.usage();

	match flags.error_handling() {
		ErrorHandling::Propagate => Err(err),
		ErrorHandling::Exit => std::process::exit(2),
		ErrorHandling::Panic => panic!("{err}"),
	}
}

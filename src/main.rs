use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::fmt;
use std::io::Write;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt as log_fmt, prelude::*};

use flaglayer::env::{BaseName, EnvPrefix, EnvResolver, process_env};
use flaglayer::error::ValueError;
use flaglayer::registry::{ErrorHandling, FlagSet, ListValue, StringValue, Value};
use flaglayer::report::report;
use flaglayer::{ConfigResolver, FlagRegistry};

#[derive(Parser)]
#[command(name = "flaglayer")]
#[command(
	author,
	version,
	about = "Resolve flags from the command line, environment variables and a config file"
)]
struct Cli {
	/// Some string
	#[arg(long, value_name = "VALUE")]
	str: Option<String>,

	/// Path to a config file
	#[arg(long, value_name = "PATH")]
	config_path: Option<String>,

	/// List value, repeat to add elements
	#[arg(long, value_name = "VALUE")]
	arr: Vec<String>,

	/// Flag that rejects every value
	#[arg(long, value_name = "VALUE")]
	will_err: Option<String>,

	/// Environment variable prefix (defaults to the program name)
	#[arg(long, value_name = "PREFIX")]
	env_prefix: Option<String>,

	/// What to do when a value is rejected
	#[arg(long, value_enum, default_value_t = OnError::Exit)]
	on_error: OnError,

	/// Reject config file keys that are not flags
	#[arg(long)]
	strict: bool,

	/// Enable verbose logging (sets log level to DEBUG)
	#[arg(short, long)]
	verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum OnError {
	Propagate,
	Exit,
	Panic,
}

impl From<OnError> for ErrorHandling {
	fn from(value: OnError) -> Self {
		match value {
			OnError::Propagate => ErrorHandling::Propagate,
			OnError::Exit => ErrorHandling::Exit,
			OnError::Panic => ErrorHandling::Panic,
		}
	}
}

/// Value that refuses everything it is given.
struct WillErr;

impl Value for WillErr {
	fn set(&mut self, _raw: &str) -> std::result::Result<(), ValueError> {
		Err("invalid option for will-err".into())
	}
}

impl fmt::Display for WillErr {
	fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
		Ok(())
	}
}

fn main() -> ExitCode {
	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();

	// RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
	let filter = if cli.verbose {
		EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
	} else {
		EnvFilter::from_default_env().add_directive(Level::WARN.into())
	};
	let _ = tracing_subscriber::registry()
		.with(log_fmt::layer().with_writer(std::io::stderr))
		.with(filter)
		.try_init();

	let program = std::env::args_os()
		.next()
		.map(|arg| arg.to_string_lossy().into_owned())
		.unwrap_or_else(|| "flaglayer".to_string());
	let mut flags = build_flags(&program, cli.on_error.into())?;

	let given = apply_command_line(&mut flags, &cli);
	report(&mut flags, given).context("Invalid command-line value")?;

	let prefix = cli.env_prefix.clone();
	let resolver = EnvResolver::with_prefix(move |name: &str| {
		prefix
			.clone()
			.unwrap_or_else(|| BaseName.env_prefix(name))
	});

	let mut failed = false;
	if let Err(e) = resolver.parse_env(&mut flags, process_env()) {
		tracing::debug!("environment resolution failed: {e}");
		failed = true;
	}

	let config_path = flags.get("config-path").unwrap_or_default();
	let config = ConfigResolver::new().strict_keys(cli.strict);
	if let Err(e) = config.parse_config(&mut flags, process_env(), &config_path) {
		tracing::debug!("config resolution failed: {e}");
		failed = true;
	}

	let mut stdout = std::io::stdout().lock();
	for flag in flags.flags() {
		writeln!(stdout, "{} {}", flag.name, flag.value()).context("Failed to write output")?;
	}

	Ok(if failed {
		ExitCode::FAILURE
	} else {
		ExitCode::SUCCESS
	})
}

fn build_flags(program: &str, error_handling: ErrorHandling) -> Result<FlagSet> {
	let mut flags = FlagSet::new(program, error_handling);
	flags.var("str", StringValue::default(), "some string")?;
	flags.var("config-path", StringValue::default(), "path to a config file")?;
	flags.var("arr", ListValue::default(), "list value, repeat to add elements")?;
	flags.var("will-err", WillErr, "flag that rejects every value")?;

	let mut defaults = Vec::new();
	flags.print_defaults(&mut defaults)?;
	let name = program.to_string();
	flags.set_usage(move |out| {
		let _ = writeln!(out, "Usage of {name}:");
		let _ = out.write_all(&defaults);
	});

	Ok(flags)
}

fn apply_command_line(flags: &mut FlagSet, cli: &Cli) -> flaglayer::Result<()> {
	if let Some(ref value) = cli.str {
		flags.set("str", value)?;
	}
	if let Some(ref value) = cli.config_path {
		flags.set("config-path", value)?;
	}
	for value in &cli.arr {
		flags.set("arr", value)?;
	}
	if let Some(ref value) = cli.will_err {
		flags.set("will-err", value)?;
	}
	Ok(())
}

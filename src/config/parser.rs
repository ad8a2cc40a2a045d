use crate::error::{FlagError, Result};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, ErrorKind};
use std::path::Path;

/// Values given for one key, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
	/// 1-based line of the first occurrence of the key.
	pub line: usize,

	pub values: Vec<String>,
}

/// Parsed config file: each key maps to every value it was given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigTable {
	entries: BTreeMap<String, Entry>,
}

impl ConfigTable {
	fn push(&mut self, key: &str, value: &str, line: usize) {
		self.entries
			.entry(key.to_string())
			.or_insert_with(|| Entry {
				line,
				values: Vec::new(),
			})
			.values
			.push(value.to_string());
	}

	/// Raw (unexpanded) values for `key`; empty if the key is absent.
	pub fn values(&self, key: &str) -> &[String] {
		self.entries
			.get(key)
			.map(|entry| entry.values.as_slice())
			.unwrap_or_default()
	}

	pub fn get(&self, key: &str) -> Option<&Entry> {
		self.entries.get(key)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
		self.entries.iter().map(|(k, e)| (k.as_str(), e))
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

/// Split one config line into key and value.
///
/// Returns `None` for blank lines and `#` comments. The key ends at the first
/// space or tab; a key on its own gets the value `"true"`.
pub fn parse_line(line: &str) -> Option<(&str, &str)> {
	let line = line.trim();
	if line.is_empty() || line.starts_with('#') {
		return None;
	}

	match line.find([' ', '\t']) {
		Some(idx) => Some((&line[..idx], line[idx..].trim())),
		None => Some((line, "true")),
	}
}

/// Parse config file content (useful for testing).
pub fn parse_config_str(content: &str) -> ConfigTable {
	let mut table = ConfigTable::default();
	for (idx, line) in content.lines().enumerate() {
		if let Some((key, value)) = parse_line(line) {
			table.push(key, value, idx + 1);
		}
	}
	table
}

/// Read and parse a config file.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn parse_config_file(path: &Path) -> Result<Option<ConfigTable>> {
	let file = match File::open(path) {
		Ok(file) => file,
		Err(err) => return open_failure(path, err),
	};

	parse_config_reader(BufReader::new(file), path).map(Some)
}

/// Parse config lines from `reader`.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected, so a
/// stray Latin-1 comment does not discard the whole file. Only read errors
/// fail, as `ScanConfig`.
pub fn parse_config_reader<R: BufRead>(mut reader: R, path: &Path) -> Result<ConfigTable> {
	let mut table = ConfigTable::default();
	let mut buf = Vec::new();
	let mut line_no = 0;

	loop {
		buf.clear();
		let read = reader
			.read_until(b'\n', &mut buf)
			.map_err(|source| FlagError::ScanConfig {
				path: path.to_path_buf(),
				source,
			})?;
		if read == 0 {
			break;
		}
		line_no += 1;

		let line = String::from_utf8_lossy(&buf);
		let line = line.trim_end_matches(['\n', '\r']);
		if let Some((key, value)) = parse_line(line) {
			table.push(key, value, line_no);
		}
	}

	Ok(table)
}

/// A missing file is not an error; anything else that stops it opening is.
fn open_failure(path: &Path, err: io::Error) -> Result<Option<ConfigTable>> {
	if err.kind() == ErrorKind::NotFound {
		return Ok(None);
	}
	Err(FlagError::OpenConfig {
		path: path.to_path_buf(),
		source: err,
	})
}

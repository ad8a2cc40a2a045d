//! Config files as a flag source.
//!
//! This module handles:
//! - Parsing the line-oriented `key value` format
//! - Resolving unset flags from the parsed table

pub mod parser;
pub mod resolver;

pub use parser::{
	ConfigTable, Entry, parse_config_file, parse_config_reader, parse_config_str, parse_line,
};
pub use resolver::ConfigResolver;

use crate::error::ValueError;
use std::fmt;
use std::str::FromStr;

/// A flag value that can be set from a string.
///
/// `set` may be called more than once; list-like values accumulate.
pub trait Value: fmt::Display {
	fn set(&mut self, raw: &str) -> Result<(), ValueError>;
}

/// Plain string value. Each set replaces the previous one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringValue(pub String);

impl StringValue {
	pub fn new(default: impl Into<String>) -> Self {
		Self(default.into())
	}
}

impl Value for StringValue {
	fn set(&mut self, raw: &str) -> Result<(), ValueError> {
		self.0 = raw.to_string();
		Ok(())
	}
}

impl fmt::Display for StringValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Boolean value. A bare key in a config file sets it to `true`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoolValue(pub bool);

impl Value for BoolValue {
	fn set(&mut self, raw: &str) -> Result<(), ValueError> {
		self.0 = match raw {
			"1" | "t" | "T" | "TRUE" | "true" | "True" => true,
			"0" | "f" | "F" | "FALSE" | "false" | "False" => false,
			_ => return Err(format!("parse bool {raw:?}").into()),
		};
		Ok(())
	}
}

impl fmt::Display for BoolValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Value that appends every string it is set to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListValue(pub Vec<String>);

impl Value for ListValue {
	fn set(&mut self, raw: &str) -> Result<(), ValueError> {
		self.0.push(raw.to_string());
		Ok(())
	}
}

impl fmt::Display for ListValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (i, item) in self.0.iter().enumerate() {
			if i > 0 {
				f.write_str(", ")?;
			}
			write!(f, "{item:?}")?;
		}
		Ok(())
	}
}

/// Any `FromStr` type, e.g. integers or socket addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parsed<T>(pub T);

impl<T> Value for Parsed<T>
where
	T: FromStr + fmt::Display,
	T::Err: std::error::Error + Send + Sync + 'static,
{
	fn set(&mut self, raw: &str) -> Result<(), ValueError> {
		self.0 = raw.parse()?;
		Ok(())
	}
}

impl<T: fmt::Display> fmt::Display for Parsed<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.0.fmt(f)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_string_value_replaces() {
		let mut v = StringValue::new("default");
		v.set("a").unwrap();
		v.set("b").unwrap();
		assert_eq!(v.to_string(), "b");
	}

	#[test]
	fn test_bool_value() {
		let mut v = BoolValue::default();
		v.set("true").unwrap();
		assert!(v.0);
		v.set("0").unwrap();
		assert!(!v.0);
		assert!(v.set("yes").is_err());
	}

	#[test]
	fn test_list_value_appends() {
		let mut v = ListValue::default();
		v.set("one").unwrap();
		v.set("two, three").unwrap();
		assert_eq!(v.0, vec!["one", "two, three"]);
		assert_eq!(v.to_string(), r#""one", "two, three""#);
	}

	#[test]
	fn test_parsed_value() {
		let mut v = Parsed(0u16);
		v.set("8080").unwrap();
		assert_eq!(v.0, 8080);
		assert!(v.set("not a port").is_err());
		assert_eq!(v.0, 8080);
	}
}

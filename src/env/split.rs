/// Split `input` on `delimiter`, treating `escape` followed by `delimiter` as a
/// literal delimiter.
///
/// An escape character that does not precede the delimiter is kept as-is.
/// Empty input yields no tokens.
pub fn split_escape(input: &str, delimiter: char, escape: char) -> Vec<String> {
	if input.is_empty() {
		return Vec::new();
	}

	let mut parts = Vec::new();
	let mut current = String::new();
	let mut chars = input.chars().peekable();

	while let Some(c) = chars.next() {
		if c == escape && chars.peek() == Some(&delimiter) {
			current.push(delimiter);
			chars.next();
		} else if c == delimiter {
			parts.push(std::mem::take(&mut current));
		} else {
			current.push(c);
		}
	}

	parts.push(current);
	parts
}

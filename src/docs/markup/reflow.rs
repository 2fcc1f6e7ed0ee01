//! Line handling for documentation prose.
//!
//! Sidecar text inherits the indentation of the source comments. [`strip_padding`] removes the
//! indentation measured on the first non-empty line and [`collapse_breaks`] joins wrapped lines
//! while keeping paragraph breaks.

/// Normalize line endings to `\n`.
pub fn normalize_newlines(text: &str) -> String {
	text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Remove the leading padding of the first non-empty line from every line.
///
/// Lines with less indentation lose only their own leading whitespace. Trailing whitespace is
/// removed from every line, and leading blank lines are dropped.
pub fn strip_padding(text: &str) -> String {
	let lines: Vec<&str> = text
		.split('\n')
		.map(str::trim_end)
		.skip_while(|line| line.is_empty())
		.collect();
	let padding = lines
		.first()
		.map(|line| line.len() - line.trim_start().len())
		.unwrap_or(0);

	lines
		.iter()
		.map(|line| {
			let indent = line.len() - line.trim_start().len();
			let cut = indent.min(padding);
			if line.is_char_boundary(cut) {
				&line[cut..]
			} else {
				&line[indent..]
			}
		})
		.collect::<Vec<_>>()
		.join("\n")
}

/// Join single line breaks with a space; runs of two or more breaks become one paragraph break.
pub fn collapse_breaks(text: &str) -> String {
	let mut output = String::with_capacity(text.len());
	let mut breaks = 0usize;

	for ch in text.chars() {
		if ch == '\n' {
			breaks += 1;
			continue;
		}
		flush_breaks(&mut output, breaks);
		breaks = 0;
		output.push(ch);
	}
	flush_breaks(&mut output, breaks);
	output
}

fn flush_breaks(output: &mut String, breaks: usize) {
	match breaks {
		0 => {}
		1 => {
			if !output.ends_with(' ') {
				output.push(' ');
			}
		}
		_ => output.push_str("\n\n"),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn padding_is_measured_on_first_content_line() {
		let text = "\n        First line\n          indented more\n        back\n   shallow";
		assert_eq!(
			strip_padding(text),
			"First line\n  indented more\nback\nshallow"
		);
	}

	#[test]
	fn single_breaks_become_spaces() {
		assert_eq!(
			collapse_breaks("one\ntwo\n\nthree\n\n\nfour"),
			"one two\n\nthree\n\nfour"
		);
	}

	#[test]
	fn reflow_is_idempotent() {
		let once = collapse_breaks(&strip_padding("  alpha\n  beta\n\n  gamma"));
		assert_eq!(once, "alpha beta\n\ngamma");
		assert_eq!(collapse_breaks(&strip_padding(&once)), once);
	}

	#[test]
	fn line_endings_are_normalized() {
		assert_eq!(normalize_newlines("a\r\nb\rc"), "a\nb\nc");
	}
}

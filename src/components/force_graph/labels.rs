//! Multi-line node labels.
//!
//! Wrapping counts characters rather than measuring pixels. Each group tunes
//! its font size and `max_chars` together, so the count is a close enough
//! stand-in for width.

/// Line spacing as a multiple of the font size.
pub const LINE_HEIGHT: f64 = 1.4;

/// A wrapped label line and its vertical offset from the node center.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelLine {
	pub text: String,
	pub dy: f64,
}

/// Greedy word wrap: keep appending words while the line stays within
/// `max_chars`, otherwise start a new line. A word longer than `max_chars`
/// gets a line of its own.
pub fn wrap_label(label: &str, max_chars: usize) -> Vec<String> {
	let mut lines = Vec::new();
	let mut current = String::new();

	for word in label.split_whitespace() {
		if current.is_empty() {
			current.push_str(word);
			continue;
		}
		if current.chars().count() + 1 + word.chars().count() <= max_chars {
			current.push(' ');
			current.push_str(word);
		} else {
			lines.push(std::mem::replace(&mut current, word.to_string()));
		}
	}
	if !current.is_empty() {
		lines.push(current);
	}
	lines
}

/// Wrap `label` and center the stack of lines vertically on the node.
pub fn layout_label(label: &str, max_chars: usize, font_size: f64) -> Vec<LabelLine> {
	let lines = wrap_label(label, max_chars);
	let mid = (lines.len() as f64 - 1.0) / 2.0;
	lines
		.into_iter()
		.enumerate()
		.map(|(i, text)| LabelLine {
			text,
			dy: (i as f64 - mid) * font_size * LINE_HEIGHT,
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn wraps_greedily_by_character_count() {
		assert_eq!(
			wrap_label("Federally Qualified Health Centers", 12),
			vec!["Federally", "Qualified", "Health", "Centers"]
		);
		assert_eq!(
			wrap_label("Data Linkage Power", 12),
			vec!["Data Linkage", "Power"]
		);
	}

	#[test]
	fn long_word_gets_its_own_line() {
		assert_eq!(
			wrap_label("An Interoperability Layer", 9),
			vec!["An", "Interoperability", "Layer"]
		);
	}

	#[test]
	fn empty_label_has_no_lines() {
		assert!(wrap_label("   ", 10).is_empty());
		assert!(layout_label("", 10, 12.0).is_empty());
	}

	#[test]
	fn lines_are_centered_on_the_node() {
		let lines = layout_label("one two three", 3, 10.0);
		let expected = [-14.0, 0.0, 14.0];
		assert_eq!(lines.len(), expected.len());
		for (line, dy) in lines.iter().zip(expected) {
			assert!((line.dy - dy).abs() < 1e-9, "{} at {}", line.text, line.dy);
		}

		let single = layout_label("hub", 10, 14.0);
		assert_eq!(single[0].dy, 0.0);

		let pair = layout_label("Primary Care", 8, 10.0);
		assert!((pair[0].dy + 7.0).abs() < 1e-9);
		assert!((pair[1].dy - 7.0).abs() < 1e-9);
	}
}

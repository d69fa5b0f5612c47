const MAX_LOG_CHARS: usize = 256;

/// Produces a copy of free-text input that is safe to embed in one log
/// line. Control characters (including CR/LF) become spaces so the text
/// cannot forge extra log records, and the copy is length-capped.
///
/// Logging path only. Matching always uses the original text.
pub fn sanitize_for_log(text: &str) -> String {
	let mut out = String::with_capacity(text.len().min(MAX_LOG_CHARS));

	for (taken, ch) in text.chars().enumerate() {
		if taken == MAX_LOG_CHARS {
			out.push('…');

			break;
		}

		out.push(if ch.is_control() { ' ' } else { ch });
	}

	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn replaces_control_characters() {
		assert_eq!(sanitize_for_log("refund\npolicy\r\t"), "refund policy  ");
	}

	#[test]
	fn passes_plain_text_through() {
		assert_eq!(sanitize_for_log("refund policy"), "refund policy");
	}

	#[test]
	fn caps_length() {
		let long = "a".repeat(MAX_LOG_CHARS + 40);
		let sanitized = sanitize_for_log(&long);

		assert_eq!(sanitized.chars().count(), MAX_LOG_CHARS + 1);
		assert!(sanitized.ends_with('…'));
	}
}

use serde_json::{Deserializer, Value};

/// Returns the first well-formed JSON object in `text`.
///
/// Scans from every `{`, so surrounding prose, markdown fences and
/// malformed leading fragments are skipped. Top-level arrays and scalars
/// are ignored.
pub fn extract_json(text: &str) -> Option<Value> {
	text.char_indices().filter(|&(_, c)| c == '{').find_map(|(start, _)| {
		match Deserializer::from_str(&text[start..]).into_iter::<Value>().next() {
			Some(Ok(value @ Value::Object(_))) => Some(value),
			_ => None,
		}
	})
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn bare_object() {
		assert_eq!(extract_json(r#"{"id": "a"}"#), Some(json!({"id": "a"})));
	}

	#[test]
	fn fenced_object_with_prose() {
		let text = "Sure! Here is the card:\n```json\n{\"id\": \"a\", \"nested\": {\"x\": [1, 2]}}\n```\nLet me know.";
		assert_eq!(extract_json(text), Some(json!({"id": "a", "nested": {"x": [1, 2]}})));
	}

	#[test]
	fn skips_malformed_leading_braces() {
		let text = "use {braces} like {this: nope} then {\"ok\": true} and {\"second\": 1}";
		assert_eq!(extract_json(text), Some(json!({"ok": true})));
	}

	#[test]
	fn braces_inside_strings_do_not_confuse_the_scan() {
		let text = r#"{"title": "a } b {", "n": 1}"#;
		assert_eq!(extract_json(text), Some(json!({"title": "a } b {", "n": 1})));
	}

	#[test]
	fn no_object_found() {
		assert_eq!(extract_json("no json here"), None);
		assert_eq!(extract_json("[1, 2, 3]"), None);
		assert_eq!(extract_json("{\"unterminated\": "), None);
		assert_eq!(extract_json(""), None);
	}
}

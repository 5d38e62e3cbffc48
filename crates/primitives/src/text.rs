use std::borrow::Cow;

use unicode_segmentation::UnicodeSegmentation;

/// Counts extended grapheme clusters, the unit all length ceilings use.
pub fn grapheme_len(s: &str) -> usize {
	s.graphemes(true).count()
}

/// Truncates `s` to at most `max` grapheme clusters.
pub fn truncate_graphemes(s: &str, max: usize) -> Cow<'_, str> {
	match s.grapheme_indices(true).nth(max) {
		Some((cut, _)) => Cow::Owned(s[..cut].to_owned()),
		None => Cow::Borrowed(s),
	}
}

/// Trims surrounding whitespace and fits the result into `max` graphemes.
///
/// Returns `None` when nothing but whitespace remains. Applying this twice
/// yields the same string as applying it once.
pub fn fit(s: &str, max: usize) -> Option<String> {
	let trimmed = s.trim();
	if trimmed.is_empty() {
		return None;
	}
	let fitted = truncate_graphemes(trimmed, max);
	let fitted = fitted.trim_end();
	(!fitted.is_empty()).then(|| fitted.to_owned())
}

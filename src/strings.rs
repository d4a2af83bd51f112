/*!
# Text handling

This module holds the storage type used for attribute values and text nodes
([`CData`]) as well as the whitespace normalization which is applied to text
runs before they become [`Node::Text`](crate::Node::Text) nodes.

## Whitespace

Only the four whitespace characters of the XML 1.0 `S` production are
considered: space (`#x20`), tab (`#x9`), carriage return (`#xD`) and line
feed (`#xA`). Everything else, including other Unicode whitespace, is
regular content.
*/

/// Storage for attribute values and text content.
///
/// With the `inline` feature (the default), this is a
/// [`smartstring::alias::String`], which keeps short strings inline and
/// avoids a heap allocation for most attribute values. Without the feature,
/// it is a plain [`String`].
#[cfg(feature = "inline")]
pub type CData = smartstring::alias::String;

/// Storage for attribute values and text content.
///
/// With the `inline` feature, this is a `smartstring::alias::String`.
/// Without the feature, it is a plain [`String`].
#[cfg(not(feature = "inline"))]
pub type CData = String;

/// Return true if `ch` matches the XML 1.0 `S` production.
#[inline]
pub fn is_xml_whitespace(ch: char) -> bool {
	matches!(ch, ' ' | '\t' | '\r' | '\n')
}

/**
Normalize whitespace in a text run.

Every maximal run of XML whitespace is collapsed into a single space and
leading as well as trailing whitespace is dropped. A string consisting only
of whitespace (or the empty string) normalizes to the empty string.

The input is processed in a single left-to-right pass; a separator is only
emitted once the next non-whitespace character has been seen, which is what
keeps trailing whitespace out of the result.

# Example

```
use xtree::strings::normalize_whitespace;

assert_eq!(normalize_whitespace(" a  b \n c "), "a b c");
assert_eq!(normalize_whitespace("\t\r\n "), "");
```
*/
pub fn normalize_whitespace(s: &str) -> String {
	let mut out = String::with_capacity(s.len());
	let mut pending_sep = false;
	for ch in s.chars() {
		if is_xml_whitespace(ch) {
			// separators are never emitted at the start of the output
			pending_sep = !out.is_empty();
			continue;
		}
		if pending_sep {
			out.push(' ');
			pending_sep = false;
		}
		out.push(ch);
	}
	out
}

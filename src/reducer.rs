/*!
# Event-to-tree reduction

The [`Reducer`] consumes tokenizer callbacks through its [`EventSink`]
implementation and assembles the typed tree bottom-up: every open element is
kept as a frame on a stack, and closing an element turns its frame into a
[`Node`] which is appended to the parent frame.

Character data is buffered raw and only normalized when the next structural
event (element start or end) flushes it. That way, a text run split over
many `characters`/`cdata` callbacks is normalized as a whole.
*/
use std::fmt;
use std::mem;

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::event::{EventSink, EventSource, Flow, Position, RawAttributes, SourceError};
use crate::kind::{AttributeKind, ElementKind};
use crate::node::Node;
use crate::strings::normalize_whitespace;

/// An open element and the children collected for it so far.
struct Frame<E, A> {
	kind: E,
	children: Vec<Node<E, A>>,
}

impl<E, A> Frame<E, A> {
	fn new(kind: E) -> Self {
		Self {
			kind,
			children: Vec::new(),
		}
	}

	fn into_node(self) -> Node<E, A> {
		Node::Element(self.kind, self.children)
	}
}

/// Name which made the reducer request an abort.
#[derive(Debug)]
enum Rejected {
	Attribute(String),
	Element(String, Option<String>),
}

enum State<E, A> {
	/// No element has been opened yet.
	Empty,
	/// At least one element is open. `open` holds the ancestors of
	/// `current`, outermost first.
	Building {
		current: Frame<E, A>,
		open: Vec<Frame<E, A>>,
	},
	/// Abort requested, waiting for the source to confirm it via `error`.
	Aborting(Rejected),
	/// The root element has been closed.
	Done(Node<E, A>),
	Failed(Error),
}

impl<E, A> State<E, A> {
	fn name(&self) -> &'static str {
		match self {
			Self::Empty => "empty",
			Self::Building { .. } => "building",
			Self::Aborting(_) => "aborting",
			Self::Done(_) => "done",
			Self::Failed(_) => "failed",
		}
	}

	fn accepts_events(&self) -> bool {
		matches!(self, Self::Empty | Self::Building { .. })
	}
}

/**
# Reducer from tokenizer events to a typed tree

A `Reducer` is good for exactly one document. Drive it with an
[`EventSource`] through [`Reducer::parse`], or feed the [`EventSink`]
callbacks by hand and call [`Reducer::finish`] afterwards.

## Example

```
use xtree::{attribute_kinds, element_kinds, EventSink, Flow, Reducer};

element_kinds! {
	enum El { Greeting = "greeting" }
}
attribute_kinds! {
	enum At { Lang = "lang" }
}

let mut reducer = Reducer::<El, At>::new();
let attrs = [("lang".to_string(), "en".to_string())];
assert_eq!(reducer.start_element("greeting", None, &attrs), Flow::Continue);
reducer.characters("  hello, ");
reducer.cdata("world  ");
reducer.end_element("greeting", None);

let root = reducer.finish(true).unwrap();
assert_eq!(root.attribute_value(&At::Lang), Some("en"));
assert_eq!(root.all_texts().next().unwrap().value(), Some("hello, world"));
```

## Failure

Unrecognized names make [`EventSink::start_element`] return
[`Flow::Abort`]. The name is remembered, and once the source confirms the
abort through [`EventSink::error`], it becomes the reported error together
with the position the source supplies. The remembered name always takes
precedence over whatever the source reports as the reason.
*/
pub struct Reducer<E, A> {
	state: State<E, A>,
	/// Raw character data since the last element start or end.
	text: String,
}

impl<E: ElementKind, A: AttributeKind> Reducer<E, A> {
	/// Create a new, empty reducer.
	pub fn new() -> Self {
		Self {
			state: State::Empty,
			text: String::new(),
		}
	}

	/// Drive `source` to the end and return the tree.
	pub fn parse<S: EventSource>(mut self, source: &mut S) -> Result<Node<E, A>> {
		let completed = source.drive(&mut self);
		self.finish(completed)
	}

	/// Return the tree after the source has finished.
	///
	/// `completed` is the source's own verdict on whether it reached the end
	/// of the input without errors. The tree is only returned if both the
	/// source completed and the root element has been closed. If an error was
	/// reported, it is returned; any other situation yields
	/// [`Error::InternalFailure`].
	pub fn finish(self, completed: bool) -> Result<Node<E, A>> {
		match self.state {
			State::Done(root) if completed => Ok(root),
			State::Failed(e) => Err(e),
			other => {
				debug!(
					state = other.name(),
					completed, "source finished without result or error"
				);
				Err(Error::InternalFailure)
			}
		}
	}

	/// Number of currently open elements.
	pub fn depth(&self) -> usize {
		match &self.state {
			State::Building { open, .. } => open.len() + 1,
			_ => 0,
		}
	}

	/// Return true once a root element or an error has been recorded, or an
	/// abort is pending.
	pub fn is_terminated(&self) -> bool {
		!self.state.accepts_events()
	}

	/// Normalize and clear the pending text; None if nothing remains.
	fn take_text(&mut self) -> Option<Node<E, A>> {
		if self.text.is_empty() {
			return None;
		}
		let text = normalize_whitespace(&self.text);
		self.text.clear();
		if text.is_empty() {
			None
		} else {
			Some(Node::Text(text.into()))
		}
	}

	/// Move pending text into the innermost open element.
	///
	/// Text outside of any element is dropped.
	fn flush_text(&mut self) {
		let text = self.take_text();
		if let (Some(text), State::Building { current, .. }) = (text, &mut self.state) {
			current.children.push(text);
		}
	}

	fn append_text(&mut self, text: &str) {
		if self.state.accepts_events() {
			self.text.push_str(text);
		} else {
			trace!(len = text.len(), state = self.state.name(), "ignoring text");
		}
	}

	fn reject(&mut self, rejected: Rejected) -> Flow {
		debug!(rejected = ?rejected, "unrecognized name, requesting abort");
		self.text.clear();
		self.state = State::Aborting(rejected);
		Flow::Abort
	}

	/// Build the frame for a new element, resolving all attributes.
	fn open_frame(
		name: &str,
		uri: Option<&str>,
		attributes: &RawAttributes,
	) -> std::result::Result<Frame<E, A>, Rejected> {
		let kind = E::recognize(name, uri.unwrap_or(""))
			.ok_or_else(|| Rejected::Element(name.to_string(), uri.map(|u| u.to_string())))?;
		let mut frame = Frame::new(kind);
		// attributes are resolved in the order the tokenizer supplies them,
		// so the first unknown name in that order is the one reported
		for (attr_name, value) in attributes.iter() {
			let attr = A::recognize(attr_name).ok_or_else(|| Rejected::Attribute(attr_name.clone()))?;
			frame.children.push(Node::Attribute(attr, value.as_str().into()));
		}
		Ok(frame)
	}
}

impl<E: ElementKind, A: AttributeKind> Default for Reducer<E, A> {
	fn default() -> Self {
		Self::new()
	}
}

impl<E: ElementKind, A: AttributeKind> EventSink for Reducer<E, A> {
	fn start_element(&mut self, name: &str, uri: Option<&str>, attributes: &RawAttributes) -> Flow {
		match self.state {
			State::Empty | State::Building { .. } => (),
			State::Aborting(_) => {
				trace!(name, "ignoring element start while aborting");
				return Flow::Abort;
			}
			_ => {
				trace!(name, state = self.state.name(), "ignoring element start");
				return Flow::Continue;
			}
		}

		self.flush_text();
		let frame = match Self::open_frame(name, uri, attributes) {
			Ok(frame) => frame,
			Err(rejected) => return self.reject(rejected),
		};
		self.state = match mem::replace(&mut self.state, State::Empty) {
			State::Empty => State::Building {
				current: frame,
				open: Vec::new(),
			},
			State::Building { current, mut open } => {
				open.push(current);
				State::Building {
					current: frame,
					open,
				}
			}
			other => other,
		};
		Flow::Continue
	}

	fn end_element(&mut self, name: &str, uri: Option<&str>) {
		let matches = match &self.state {
			State::Building { current, .. } => current.kind.matches(name, uri.unwrap_or("")),
			_ => false,
		};
		if !matches {
			// a compliant tokenizer never sends this; keep the tree as it is
			trace!(name, uri = ?uri, state = self.state.name(), "ignoring unmatched element end");
			return;
		}

		self.flush_text();
		self.state = match mem::replace(&mut self.state, State::Empty) {
			State::Building { current, mut open } => {
				let node = current.into_node();
				match open.pop() {
					Some(mut parent) => {
						parent.children.push(node);
						State::Building {
							current: parent,
							open,
						}
					}
					None => State::Done(node),
				}
			}
			other => other,
		};
	}

	fn characters(&mut self, text: &str) {
		self.append_text(text);
	}

	fn cdata(&mut self, text: &str) {
		self.append_text(text);
	}

	fn ignorable_whitespace(&mut self, _text: &str) {}

	fn error(&mut self, error: SourceError, position: Position) {
		let e = match mem::replace(&mut self.state, State::Empty) {
			State::Aborting(Rejected::Attribute(name)) => Error::UnrecognizedAttribute(name, position),
			State::Aborting(Rejected::Element(name, uri)) => {
				Error::UnrecognizedElement(name, uri, position)
			}
			State::Failed(e) => {
				trace!(error = %error, "ignoring repeated error report");
				e
			}
			_ => match error {
				SourceError::Aborted => Error::InternalFailure,
				SourceError::Malformed(cause) => Error::ParseFailure(cause, position),
			},
		};
		debug!(error = %e, "parse failed");
		self.text.clear();
		self.state = State::Failed(e);
	}
}

impl<E, A> fmt::Debug for Reducer<E, A> {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		f.debug_struct("Reducer")
			.field("state", &self.state.name())
			.field("pending_text", &self.text.len())
			.finish()
	}
}

/**
Reduce all events of `source` into a tree.

This is a shorthand for `Reducer::new().parse(source)`.
*/
pub fn parse<E, A, S>(source: &mut S) -> Result<Node<E, A>>
where
	E: ElementKind,
	A: AttributeKind,
	S: EventSource,
{
	Reducer::new().parse(source)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::Cause;
	use crate::{attribute_kinds, element_kinds};
	use std::io;

	const TEST_NS: &'static str = "urn:uuid:678ba034-6200-4ecd-803f-bbcbfa225236";

	element_kinds! {
		enum El {
			Root = "root",
			Child = "child",
			Leaf = "leaf",
		}
	}

	element_kinds! {
		enum NsEl in "urn:uuid:678ba034-6200-4ecd-803f-bbcbfa225236" {
			Root = "root",
			Child = "child",
		}
	}

	attribute_kinds! {
		enum At {
			Id = "id",
			Class = "class",
			Lang = "xml:lang",
		}
	}

	type R = Reducer<El, At>;

	fn attrs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
		pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect()
	}

	fn start(r: &mut R, name: &str) -> Flow {
		r.start_element(name, None, &[])
	}

	fn text(s: &str) -> Node<El, At> {
		Node::Text(s.into())
	}

	#[test]
	fn reducer_builds_nested_tree() {
		let mut r = R::new();
		assert_eq!(start(&mut r, "root"), Flow::Continue);
		assert_eq!(start(&mut r, "child"), Flow::Continue);
		r.characters("hi");
		r.end_element("child", None);
		r.end_element("root", None);

		let root = r.finish(true).unwrap();
		assert_eq!(root, Node::Element(El::Root, vec![Node::Element(El::Child, vec![text("hi")])]));
		let child = root.first_child_element(&El::Child).unwrap();
		assert_eq!(child.children().unwrap()[0].value(), Some("hi"));
	}

	#[test]
	fn reducer_tracks_depth() {
		let mut r = R::new();
		assert_eq!(r.depth(), 0);
		start(&mut r, "root");
		assert_eq!(r.depth(), 1);
		start(&mut r, "child");
		start(&mut r, "leaf");
		assert_eq!(r.depth(), 3);
		r.end_element("leaf", None);
		assert_eq!(r.depth(), 2);
		r.end_element("child", None);
		r.end_element("root", None);
		assert_eq!(r.depth(), 0);
		assert!(r.is_terminated());

		let root = r.finish(true).unwrap();
		let child = root.first_child_element(&El::Child).unwrap();
		assert!(child.first_child_element(&El::Leaf).is_some());
	}

	#[test]
	fn reducer_puts_attributes_first_in_supplied_order() {
		let mut r = R::new();
		r.start_element("root", None, &attrs(&[("class", "c"), ("id", "1"), ("xml:lang", "de")]));
		r.characters("body");
		r.start_element("leaf", None, &attrs(&[("id", "2")]));
		r.end_element("leaf", None);
		r.end_element("root", None);

		let root = r.finish(true).unwrap();
		assert_eq!(
			root,
			Node::Element(
				El::Root,
				vec![
					Node::Attribute(At::Class, "c".into()),
					Node::Attribute(At::Id, "1".into()),
					Node::Attribute(At::Lang, "de".into()),
					text("body"),
					Node::Element(El::Leaf, vec![Node::Attribute(At::Id, "2".into())]),
				]
			)
		);
	}

	#[test]
	fn reducer_keeps_attribute_values_raw() {
		let mut r = R::new();
		r.start_element("root", None, &attrs(&[("class", "  a  b ")]));
		r.end_element("root", None);
		let root = r.finish(true).unwrap();
		assert_eq!(root.attribute_value(&At::Class), Some("  a  b "));
	}

	#[test]
	fn reducer_merges_adjacent_text_fragments() {
		let mut r = R::new();
		start(&mut r, "root");
		r.characters("  foo");
		r.cdata("bar  ");
		r.end_element("root", None);
		let root = r.finish(true).unwrap();
		assert_eq!(root.children().unwrap(), &[text("foobar")][..]);
	}

	#[test]
	fn reducer_normalizes_whole_run_not_fragments() {
		let mut r = R::new();
		start(&mut r, "root");
		r.characters("  foo ");
		r.characters(" ");
		r.cdata(" bar  ");
		r.end_element("root", None);
		let root = r.finish(true).unwrap();
		assert_eq!(root.children().unwrap(), &[text("foo bar")][..]);
	}

	#[test]
	fn reducer_splits_text_around_child_elements() {
		let mut r = R::new();
		start(&mut r, "root");
		r.characters(" before ");
		start(&mut r, "leaf");
		r.end_element("leaf", None);
		r.characters("\n after\n");
		r.end_element("root", None);
		let root = r.finish(true).unwrap();
		assert_eq!(
			root.children().unwrap(),
			&[text("before"), Node::Element(El::Leaf, vec![]), text("after")][..]
		);
	}

	#[test]
	fn reducer_drops_whitespace_only_and_ignorable_text() {
		let mut r = R::new();
		start(&mut r, "root");
		r.ignorable_whitespace("\n\t");
		start(&mut r, "leaf");
		r.characters(" \r\n ");
		r.end_element("leaf", None);
		r.ignorable_whitespace("\n");
		r.end_element("root", None);
		let root = r.finish(true).unwrap();
		assert_eq!(root, Node::Element(El::Root, vec![Node::Element(El::Leaf, vec![])]));
	}

	#[test]
	fn reducer_drops_text_outside_root() {
		let mut r = R::new();
		r.characters("prologue");
		start(&mut r, "root");
		r.end_element("root", None);
		r.characters("epilogue");
		let root = r.finish(true).unwrap();
		assert_eq!(root, Node::Element(El::Root, vec![]));
	}

	#[test]
	fn reducer_ignores_mismatched_end() {
		let mut r = R::new();
		start(&mut r, "root");
		start(&mut r, "child");
		r.end_element("leaf", None);
		r.end_element("child", Some(TEST_NS));
		assert_eq!(r.depth(), 2);
		r.end_element("child", None);
		r.end_element("root", None);
		assert!(r.finish(true).is_ok());
	}

	#[test]
	fn reducer_ignores_end_before_any_start() {
		let mut r = R::new();
		r.end_element("root", None);
		start(&mut r, "root");
		r.end_element("root", None);
		assert!(r.finish(true).is_ok());
	}

	#[test]
	fn reducer_resolves_namespaced_elements() {
		let mut r = Reducer::<NsEl, At>::new();
		assert_eq!(r.start_element("root", Some(TEST_NS), &[]), Flow::Continue);
		assert_eq!(r.start_element("child", Some(TEST_NS), &[]), Flow::Continue);
		r.end_element("child", Some(TEST_NS));
		r.end_element("root", Some(TEST_NS));
		let root = r.finish(true).unwrap();
		assert_eq!(root.uri(), Some(TEST_NS));
		assert_eq!(root.all_child_elements().count(), 1);
	}

	#[test]
	fn reducer_rejects_unrecognized_attribute() {
		let mut r = R::new();
		start(&mut r, "root");
		let flow = r.start_element("child", None, &attrs(&[("id", "1"), ("unknownattr", "x")]));
		assert_eq!(flow, Flow::Abort);
		assert!(r.is_terminated());
		r.error(SourceError::Aborted, Position::new(3, 7));

		let err = r.finish(false).err().unwrap();
		assert_eq!(err, Error::UnrecognizedAttribute("unknownattr".to_string(), Position::new(3, 7)));
	}

	#[test]
	fn reducer_reports_first_unrecognized_attribute_in_supplied_order() {
		let mut r = R::new();
		let flow = r.start_element("root", None, &attrs(&[("zzz", "1"), ("aaa", "2")]));
		assert_eq!(flow, Flow::Abort);
		r.error(SourceError::Aborted, Position::START);
		assert!(matches!(
			r.finish(false),
			Err(Error::UnrecognizedAttribute(name, _)) if name == "zzz"
		));
	}

	#[test]
	fn reducer_rejects_unrecognized_root_element() {
		let mut r = R::new();
		assert_eq!(r.start_element("unknown-element", Some(""), &[]), Flow::Abort);
		r.error(SourceError::Aborted, Position::new(1, 17));
		assert_eq!(
			r.finish(false).err().unwrap(),
			Error::UnrecognizedElement("unknown-element".to_string(), Some(String::new()), Position::new(1, 17))
		);
	}

	#[test]
	fn reducer_rejects_unrecognized_nested_element_with_uri() {
		let mut r = R::new();
		start(&mut r, "root");
		assert_eq!(r.start_element("child", Some(TEST_NS), &[]), Flow::Abort);
		r.error(SourceError::Aborted, Position::new(2, 3));
		assert!(matches!(
			r.finish(false),
			Err(Error::UnrecognizedElement(name, Some(uri), pos))
				if name == "child" && uri == TEST_NS && pos == Position::new(2, 3)
		));
	}

	#[test]
	fn reducer_keeps_missing_uri_as_none() {
		let mut r = R::new();
		assert_eq!(r.start_element("nope", None, &[]), Flow::Abort);
		r.error(SourceError::Aborted, Position::START);
		assert!(matches!(r.finish(false), Err(Error::UnrecognizedElement(_, None, _))));
	}

	#[test]
	fn reducer_recorded_reason_wins_over_reported_error() {
		let mut r = R::new();
		start(&mut r, "root");
		r.start_element("leaf", None, &attrs(&[("bogus", "")]));
		let cause = Cause::new(io::Error::new(io::ErrorKind::Other, "generic abort"));
		r.error(SourceError::Malformed(Some(cause)), Position::new(5, 1));
		assert_eq!(
			r.finish(false).err().unwrap(),
			Error::UnrecognizedAttribute("bogus".to_string(), Position::new(5, 1))
		);
	}

	#[test]
	fn reducer_wraps_lexical_errors() {
		let mut r = R::new();
		start(&mut r, "root");
		r.characters("text");
		let cause = Cause::new(io::Error::new(io::ErrorKind::InvalidData, "invalid utf-8"));
		r.error(SourceError::Malformed(Some(cause.clone())), Position::new(9, 4));
		assert_eq!(
			r.finish(false).err().unwrap(),
			Error::ParseFailure(Some(cause), Position::new(9, 4))
		);
	}

	#[test]
	fn reducer_wraps_lexical_errors_without_cause() {
		let mut r = R::new();
		r.error(SourceError::Malformed(None), Position::new(1, 1));
		assert_eq!(r.finish(false).err().unwrap(), Error::ParseFailure(None, Position::new(1, 1)));
	}

	#[test]
	fn reducer_lexical_error_after_root_fails_parse() {
		let mut r = R::new();
		start(&mut r, "root");
		r.end_element("root", None);
		r.error(SourceError::Malformed(None), Position::new(1, 14));
		assert!(matches!(r.finish(false), Err(Error::ParseFailure(None, _))));
	}

	#[test]
	fn reducer_unexplained_abort_is_internal_failure() {
		let mut r = R::new();
		start(&mut r, "root");
		r.error(SourceError::Aborted, Position::START);
		assert_eq!(r.finish(false).err().unwrap(), Error::InternalFailure);
	}

	#[test]
	fn reducer_keeps_first_error() {
		let mut r = R::new();
		start(&mut r, "nope");
		r.error(SourceError::Aborted, Position::new(1, 2));
		r.error(SourceError::Malformed(None), Position::new(8, 8));
		assert!(matches!(r.finish(false), Err(Error::UnrecognizedElement(_, _, pos)) if pos == Position::new(1, 2)));
	}

	#[test]
	fn reducer_ignores_events_after_abort() {
		let mut r = R::new();
		start(&mut r, "root");
		assert_eq!(start(&mut r, "nope"), Flow::Abort);
		// a source which does not honor the abort
		assert_eq!(start(&mut r, "child"), Flow::Abort);
		r.characters("more");
		r.end_element("child", None);
		r.end_element("root", None);
		r.error(SourceError::Aborted, Position::new(4, 4));
		assert!(matches!(r.finish(false), Err(Error::UnrecognizedElement(name, _, _)) if name == "nope"));
	}

	#[test]
	fn reducer_ignores_second_root() {
		let mut r = R::new();
		start(&mut r, "root");
		r.end_element("root", None);
		assert_eq!(start(&mut r, "leaf"), Flow::Continue);
		r.end_element("leaf", None);
		assert_eq!(r.finish(true).unwrap(), Node::Element(El::Root, vec![]));
	}

	#[test]
	fn reducer_without_root_is_internal_failure() {
		let r = R::new();
		assert_eq!(r.finish(true).err().unwrap(), Error::InternalFailure);
	}

	#[test]
	fn reducer_with_unclosed_root_is_internal_failure() {
		let mut r = R::new();
		start(&mut r, "root");
		assert_eq!(r.finish(true).err().unwrap(), Error::InternalFailure);
	}

	#[test]
	fn reducer_requires_source_completion() {
		let mut r = R::new();
		start(&mut r, "root");
		r.end_element("root", None);
		assert_eq!(r.finish(false).err().unwrap(), Error::InternalFailure);
	}

	#[test]
	fn reducer_debug_shows_state() {
		let mut r = R::new();
		start(&mut r, "root");
		r.characters("abc");
		assert_eq!(format!("{:?}", r), "Reducer { state: \"building\", pending_text: 3 }");
	}
}

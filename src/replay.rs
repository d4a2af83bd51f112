/*!
# Replaying recorded events

[`Replay`] turns any sequence of positioned [`Event`]s into an
[`EventSource`]. It honors [`Flow::Abort`] the way a tokenizer is expected
to: delivery stops and the sink receives [`SourceError::Aborted`] at the
position of the rejected element.

[`Recording`] is a builder for such sequences. It is mostly useful for tests
and for adapting tokenizers which produce events as values instead of
invoking callbacks.
*/
use std::vec;

use crate::event::{Event, EventSink, EventSource, Flow, Position, SourceError};

/// Event source over an iterator of positioned events.
#[derive(Debug, Clone)]
pub struct Replay<I> {
	events: I,
}

impl<I: Iterator<Item = (Position, Event)>> Replay<I> {
	pub fn new<T: IntoIterator<IntoIter = I, Item = (Position, Event)>>(events: T) -> Self {
		Self {
			events: events.into_iter(),
		}
	}

	/// Return the events which have not been delivered yet.
	pub fn into_inner(self) -> I {
		self.events
	}
}

impl<I: Iterator<Item = (Position, Event)>> EventSource for Replay<I> {
	fn drive<S: EventSink + ?Sized>(&mut self, sink: &mut S) -> bool {
		for (position, event) in &mut self.events {
			match event.dispatch(sink, position) {
				Flow::Continue => (),
				Flow::Abort => {
					// error events have been reported by dispatch already
					if !matches!(event, Event::Error(_)) {
						sink.error(SourceError::Aborted, position);
					}
					return false;
				}
			}
		}
		true
	}
}

/**
# Builder for event sequences

Every event is stamped with the current position, which starts at
[`Position::START`] and only changes through [`Recording::at`].

```
use xtree::{attribute_kinds, element_kinds, Recording};

element_kinds! {
	enum El { Note = "note" }
}
attribute_kinds! {
	enum At { Id = "id" }
}

let mut source = Recording::new()
	.start_with("note", None, &[("id", "n1")])
	.characters("remember the milk")
	.end("note")
	.into_replay();
let note = xtree::parse::<El, At, _>(&mut source).unwrap();
assert_eq!(note.to_string(), "<note>[id=\"n1\", \"remember the milk\"]");
```
*/
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recording {
	events: Vec<(Position, Event)>,
	position: Position,
}

impl Recording {
	pub fn new() -> Self {
		Self::default()
	}

	/// Stamp all following events with the given position.
	pub fn at(mut self, line: usize, column: usize) -> Self {
		self.position = Position::new(line, column);
		self
	}

	/// Append an arbitrary event.
	pub fn push(mut self, event: Event) -> Self {
		self.events.push((self.position, event));
		self
	}

	/// Open an element without namespace and attributes.
	pub fn start(self, name: &str) -> Self {
		self.start_with(name, None, &[])
	}

	/// Open a namespaced element without attributes.
	pub fn start_ns(self, name: &str, uri: &str) -> Self {
		self.start_with(name, Some(uri), &[])
	}

	pub fn start_with(self, name: &str, uri: Option<&str>, attributes: &[(&str, &str)]) -> Self {
		self.push(Event::StartElement {
			name: name.to_string(),
			uri: uri.map(|u| u.to_string()),
			attributes: attributes
				.iter()
				.map(|(k, v)| (k.to_string(), v.to_string()))
				.collect(),
		})
	}

	pub fn end(self, name: &str) -> Self {
		self.push(Event::EndElement {
			name: name.to_string(),
			uri: None,
		})
	}

	pub fn end_ns(self, name: &str, uri: &str) -> Self {
		self.push(Event::EndElement {
			name: name.to_string(),
			uri: Some(uri.to_string()),
		})
	}

	pub fn characters(self, text: &str) -> Self {
		self.push(Event::Characters(text.to_string()))
	}

	pub fn cdata(self, text: &str) -> Self {
		self.push(Event::CData(text.to_string()))
	}

	pub fn ignorable_whitespace(self, text: &str) -> Self {
		self.push(Event::IgnorableWhitespace(text.to_string()))
	}

	/// Make the source fail at the current position.
	pub fn fail(self, error: SourceError) -> Self {
		self.push(Event::Error(error))
	}

	/// Recorded events, in order.
	pub fn events(&self) -> &[(Position, Event)] {
		&self.events
	}

	pub fn len(&self) -> usize {
		self.events.len()
	}

	pub fn is_empty(&self) -> bool {
		self.events.is_empty()
	}

	pub fn into_replay(self) -> Replay<vec::IntoIter<(Position, Event)>> {
		Replay::new(self.events)
	}
}

impl IntoIterator for Recording {
	type Item = (Position, Event);
	type IntoIter = vec::IntoIter<(Position, Event)>;

	fn into_iter(self) -> Self::IntoIter {
		self.events.into_iter()
	}
}

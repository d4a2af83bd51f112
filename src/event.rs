/*!
# Event source contract

The reducer does not read markup itself. A tokenizer reads the input and
invokes the callbacks of an [`EventSink`] synchronously, in document order,
once per lexical event. Anything that can drive an [`EventSink`] to
completion implements [`EventSource`].

## Aborting

[`EventSink::start_element`] returns a [`Flow`]. If it returns
[`Flow::Abort`], the source must stop delivering events and report exactly
one [`EventSink::error`] with [`SourceError::Aborted`]. The sink cannot stop
the source by itself; a source which ignores the request will still have its
remaining events ignored by the reducer.
*/
use std::fmt;

use crate::error::Cause;

/// Line and column in the input, as reported by the tokenizer.
///
/// Both are 1-based by convention; the reducer only carries them into
/// errors and never interprets them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Position {
	line: usize,
	column: usize,
}

impl Position {
	/// The first column of the first line.
	pub const START: Position = Position::new(1, 1);

	pub const fn new(line: usize, column: usize) -> Position {
		Position { line, column }
	}

	/// Line number
	pub fn line(&self) -> usize {
		self.line
	}

	/// Column number
	pub fn column(&self) -> usize {
		self.column
	}
}

impl Default for Position {
	fn default() -> Self {
		Self::START
	}
}

impl fmt::Display for Position {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		write!(f, "line {}, column {}", self.line, self.column)
	}
}

/// Raw attributes of an element start, as `(name, value)` pairs.
///
/// Names are unique within one element; the tokenizer enforces that.
pub type RawAttributes = [(String, String)];

/// Answer of a sink to an element start.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
	/// Keep delivering events.
	Continue,
	/// Stop delivering events and report [`SourceError::Aborted`].
	Abort,
}

/**
# Failure reported by an event source

This is handed to [`EventSink::error`] when the source stops before the end
of the document.
*/
#[derive(Clone, Debug, PartialEq)]
pub enum SourceError {
	/// The source stopped because the sink returned [`Flow::Abort`].
	Aborted,
	/// The input is not well-formed or could not be read.
	///
	/// The cause is optional, as not every tokenizer reports one.
	Malformed(Option<Cause>),
}

impl fmt::Display for SourceError {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Aborted => f.write_str("aborted on request"),
			Self::Malformed(Some(cause)) => write!(f, "malformed input: {}", cause),
			Self::Malformed(None) => f.write_str("malformed input"),
		}
	}
}

/**
# Receiver of tokenizer callbacks

The names mirror the classic SAX callbacks. Character data and CDATA
sections may be split into arbitrarily many fragments by the source.

Namespace URIs are passed as `None` if the tokenizer does not resolve
namespaces or the element is not in any namespace.
*/
pub trait EventSink {
	/// An element has been opened.
	fn start_element(&mut self, name: &str, uri: Option<&str>, attributes: &RawAttributes) -> Flow;

	/// The most recently opened element has been closed.
	fn end_element(&mut self, name: &str, uri: Option<&str>);

	/// A fragment of character data.
	fn characters(&mut self, text: &str);

	/// A fragment of a CDATA section.
	fn cdata(&mut self, text: &str);

	/// Whitespace which the tokenizer classified as formatting.
	///
	/// The default implementation discards it.
	fn ignorable_whitespace(&mut self, _text: &str) {}

	/// The source stopped before the end of the document.
	///
	/// Called at most once, and no other callback follows it.
	fn error(&mut self, error: SourceError, position: Position);
}

/**
# Source of tokenizer callbacks

Analogous to a parser frontend: it owns the input and drives a sink through
the whole document.
*/
pub trait EventSource {
	/// Deliver all events to `sink`.
	///
	/// Returns true if the end of the input was reached successfully and
	/// false if [`EventSink::error`] has been called.
	fn drive<S: EventSink + ?Sized>(&mut self, sink: &mut S) -> bool;
}

/**
# A single recorded callback

This is the value form of the [`EventSink`] methods, used by
[`Replay`](crate::Replay) and [`Recording`](crate::Recording).
*/
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
	/// See [`EventSink::start_element`].
	StartElement {
		name: String,
		uri: Option<String>,
		attributes: Vec<(String, String)>,
	},
	/// See [`EventSink::end_element`].
	EndElement { name: String, uri: Option<String> },
	/// See [`EventSink::characters`].
	Characters(String),
	/// See [`EventSink::cdata`].
	CData(String),
	/// See [`EventSink::ignorable_whitespace`].
	IgnorableWhitespace(String),
	/// The source fails at this point. See [`EventSink::error`].
	Error(SourceError),
}

impl Event {
	/// Deliver the event to `sink`.
	///
	/// Returns the [`Flow`] requested by the sink; only element starts can
	/// request an abort. [`Event::Error`] is delivered as is and also answers
	/// [`Flow::Abort`], since nothing may follow it.
	pub fn dispatch<S: EventSink + ?Sized>(&self, sink: &mut S, position: Position) -> Flow {
		match self {
			Self::StartElement {
				name,
				uri,
				attributes,
			} => sink.start_element(name, uri.as_deref(), attributes),
			Self::EndElement { name, uri } => {
				sink.end_element(name, uri.as_deref());
				Flow::Continue
			}
			Self::Characters(text) => {
				sink.characters(text);
				Flow::Continue
			}
			Self::CData(text) => {
				sink.cdata(text);
				Flow::Continue
			}
			Self::IgnorableWhitespace(text) => {
				sink.ignorable_whitespace(text);
				Flow::Continue
			}
			Self::Error(e) => {
				sink.error(e.clone(), position);
				Flow::Abort
			}
		}
	}
}

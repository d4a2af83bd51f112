/*!
# Error types

This module holds the error type returned by [`parse`](crate::parse) and
[`Reducer::finish`](crate::Reducer::finish).
*/
use std::error;
use std::fmt;
use std::ops::Deref;
use std::result::Result as StdResult;
use std::sync::Arc;

use crate::event::Position;

/// [`std::sync::Arc`]-based wrapper around the error reported by a tokenizer.
///
/// This allows [`Error`] to be cloned and compared. Two causes compare equal
/// only if they are the same allocation.
#[derive(Clone)]
pub struct Cause(Arc<dyn error::Error + Send + Sync + 'static>);

impl Cause {
	pub fn new<E: error::Error + Send + Sync + 'static>(e: E) -> Cause {
		Cause(Arc::new(e))
	}
}

impl From<Box<dyn error::Error + Send + Sync + 'static>> for Cause {
	fn from(e: Box<dyn error::Error + Send + Sync + 'static>) -> Cause {
		Cause(Arc::from(e))
	}
}

impl fmt::Debug for Cause {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		fmt::Debug::fmt(&*self.0, f)
	}
}

impl fmt::Display for Cause {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		fmt::Display::fmt(&*self.0, f)
	}
}

impl PartialEq for Cause {
	fn eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}
}

impl Deref for Cause {
	type Target = dyn error::Error + Send + Sync + 'static;

	fn deref(&self) -> &Self::Target {
		&*self.0
	}
}

/// Error types which may be returned from a parse.
///
/// No partial tree is ever returned together with an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
	/// The reducer ended up in a state it cannot explain.
	///
	/// This is returned if the source finished without the reducer having
	/// seen a complete root element or a reported error, or if the source
	/// confirmed an abort the reducer never asked for.
	InternalFailure,

	/// The tokenizer rejected the input, independent of any vocabulary.
	///
	/// The cause is available through [`std::error::Error::source`].
	ParseFailure(Option<Cause>, Position),

	/// An attribute name is not part of the attribute vocabulary.
	UnrecognizedAttribute(String, Position),

	/// An element (name, namespace URI) is not part of the element
	/// vocabulary.
	///
	/// The URI is kept exactly as the tokenizer reported it.
	UnrecognizedElement(String, Option<String>, Position),
}

pub type Result<T> = StdResult<T, Error>;

impl Error {
	/// Return the input position the error refers to, if any.
	pub fn position(&self) -> Option<Position> {
		match self {
			Self::InternalFailure => None,
			Self::ParseFailure(_, pos)
			| Self::UnrecognizedAttribute(_, pos)
			| Self::UnrecognizedElement(_, _, pos) => Some(*pos),
		}
	}
}

impl fmt::Display for Error {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::InternalFailure => f.write_str("internal failure"),
			Self::ParseFailure(_, pos) => write!(f, "unable to parse XML data at {}", pos),
			Self::UnrecognizedAttribute(name, pos) => {
				write!(f, "unrecognized attribute name: {} at {}", name, pos)
			}
			Self::UnrecognizedElement(name, Some(uri), pos) if !uri.is_empty() => write!(
				f,
				"unrecognized element name: {} (uri: {}) at {}",
				name, uri, pos
			),
			Self::UnrecognizedElement(name, _, pos) => {
				write!(f, "unrecognized element name: {} at {}", name, pos)
			}
		}
	}
}

impl error::Error for Error {
	fn source(&self) -> Option<&(dyn error::Error + 'static)> {
		match self {
			Self::ParseFailure(Some(cause), _) => Some(&**cause),
			Self::ParseFailure(None, _)
			| Self::InternalFailure
			| Self::UnrecognizedAttribute(..)
			| Self::UnrecognizedElement(..) => None,
		}
	}
}

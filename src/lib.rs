/*!
# Typed trees from XML events

This crate reduces the stream of SAX-style events produced by an XML
tokenizer into a single, strictly nested tree whose element and attribute
names are drawn from closed, application-defined vocabularies.

## Features (some call them restrictions)

* Closed vocabularies: unknown element or attribute names fail the parse
* Character data is whitespace-normalized, whitespace-only runs are dropped
* Attributes always precede the content of their element
* No partial trees: a parse returns either the complete root or an error
* Tokenizer-agnostic: anything implementing [`EventSource`] can drive it

## Example

```
use xtree::{attribute_kinds, element_kinds, Recording};

element_kinds! {
	pub enum El {
		Root = "root",
		Child = "child",
	}
}

attribute_kinds! {
	pub enum At {
		Id = "id",
	}
}

let mut source = Recording::new()
	.start_with("root", None, &[("id", "1")])
	.characters("\n  ")
	.start("child")
	.characters("  hi ")
	.end("child")
	.characters("\n")
	.end("root")
	.into_replay();
let root = xtree::parse::<El, At, _>(&mut source).unwrap();
assert_eq!(root.to_string(), "<root>[id=\"1\", <child>[\"hi\"]]");
assert_eq!(root.attribute_value(&At::Id), Some("1"));
```

## High-level usage

### Driving the reducer

A tokenizer feeds the [`Reducer`] through the [`EventSink`] callbacks. The
reducer may answer an element start with [`Flow::Abort`], in which case the
tokenizer is expected to stop and confirm via [`EventSink::error`]. Once the
tokenizer is done, [`Reducer::finish`] hands out the tree or the error.

Tokenizers which can run a whole document by themselves implement
[`EventSource`] and are used with [`parse`] or [`Reducer::parse`].

### Recorded events

[`Recording`] and [`Replay`] provide an [`EventSource`] over events stored
as values. They are handy in tests and to adapt pull-style tokenizers.

## Feature flags

* `inline` (default): store attribute values and text in
  [`smartstring`](https://docs.rs/smartstring), avoiding heap allocations
  for short strings. See [`CData`].
*/

pub mod error;
pub mod event;
pub mod kind;
pub mod node;
mod reducer;
mod replay;
pub mod strings;


pub use error::{Cause, Error, Result};
pub use event::{Event, EventSink, EventSource, Flow, Position, RawAttributes, SourceError};
pub use kind::{AttributeKind, ElementKind};
pub use node::Node;
pub use reducer::{parse, Reducer};
pub use replay::{Recording, Replay};
pub use strings::CData;

/// Package version
pub const VERSION: &'static str = env!("CARGO_PKG_VERSION");

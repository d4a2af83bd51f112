/*!
# Element and attribute vocabularies

The reducer does not know any element or attribute names by itself. Instead,
the application supplies a closed vocabulary through two traits:

- [`ElementKind`] maps a (local name, namespace URI) pair to a typed value.
- [`AttributeKind`] maps an attribute name to a typed value.

Anything the vocabulary does not recognize makes the parse fail with
[`Error::UnrecognizedElement`] or [`Error::UnrecognizedAttribute`],
respectively.

For the common case of a fixed set of names, the [`element_kinds!`] and
[`attribute_kinds!`] macros declare a suitable enum including the trait
implementations:

```
use xtree::{attribute_kinds, element_kinds, AttributeKind, ElementKind};

element_kinds! {
	pub enum Html in "http://www.w3.org/1999/xhtml" {
		Body = "body",
		Paragraph = "p",
	}
}

attribute_kinds! {
	pub enum HtmlAttr {
		Class = "class",
		Lang = "xml:lang",
	}
}

assert_eq!(Html::recognize("p", "http://www.w3.org/1999/xhtml"), Some(Html::Paragraph));
assert_eq!(Html::recognize("p", ""), None);
assert_eq!(HtmlAttr::recognize("xml:lang"), Some(HtmlAttr::Lang));
assert_eq!(HtmlAttr::Class.name(), "class");
```

   [`Error::UnrecognizedElement`]: crate::Error::UnrecognizedElement
   [`Error::UnrecognizedAttribute`]: crate::Error::UnrecognizedAttribute
*/
use std::hash::Hash;

/**
# Typed element names

Implementors form the closed set of elements an application accepts.
*/
pub trait ElementKind: Eq + Sized {
	/// Resolve a local name and namespace URI.
	///
	/// Elements without a namespace are passed with an empty `uri`. Return
	/// `None` if the pair is not part of the vocabulary.
	fn recognize(name: &str, uri: &str) -> Option<Self>;

	/// The local name of the element.
	fn name(&self) -> &str;

	/// The namespace URI of the element, or the empty string.
	fn uri(&self) -> &str {
		""
	}

	/// Return true if this kind is what `(name, uri)` refers to.
	///
	/// This is used to pair end tags with the element they close.
	fn matches(&self, name: &str, uri: &str) -> bool {
		self.name() == name && self.uri() == uri
	}
}

/**
# Typed attribute names

Implementors form the closed set of attributes an application accepts.

Attribute kinds must be hashable so that callers can compare and deduplicate
them, e.g. when collecting the attributes of an element into a map.
*/
pub trait AttributeKind: Eq + Hash + Sized {
	/// Resolve a raw attribute name, as delivered by the tokenizer.
	fn recognize(name: &str) -> Option<Self>;

	/// The attribute name.
	fn name(&self) -> &str;
}

#[doc(hidden)]
#[macro_export]
macro_rules! __kind_uri {
	() => {
		""
	};
	($uri:literal) => {
		$uri
	};
}

/**
Declare an enum implementing [`ElementKind`].

Each variant is bound to a local name. The optional `in "uri"` clause puts all
elements into that namespace; without it, only names in the empty namespace
are recognized.

The macro derives `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq` and `Hash`;
further attributes (such as doc comments) are passed through.

```
use xtree::{element_kinds, ElementKind};

element_kinds! {
	/// Elements of the feed format
	pub enum Feed {
		Feed = "feed",
		Entry = "entry",
	}
}

assert_eq!(Feed::recognize("entry", ""), Some(Feed::Entry));
assert_eq!(Feed::Entry.uri(), "");
```
*/
#[macro_export]
macro_rules! element_kinds {
	(
		$(#[$meta:meta])*
		$vis:vis enum $name:ident $(in $uri:literal)? {
			$($(#[$vmeta:meta])* $variant:ident = $local:literal),+ $(,)?
		}
	) => {
		$(#[$meta])*
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
		$vis enum $name {
			$($(#[$vmeta])* $variant),+
		}

		impl $crate::ElementKind for $name {
			fn recognize(name: &str, uri: &str) -> Option<Self> {
				if uri != $crate::__kind_uri!($($uri)?) {
					return None
				}
				match name {
					$($local => Some(Self::$variant),)+
					_ => None,
				}
			}

			fn name(&self) -> &str {
				match self {
					$(Self::$variant => $local,)+
				}
			}

			fn uri(&self) -> &str {
				$crate::__kind_uri!($($uri)?)
			}
		}
	};
}

/**
Declare an enum implementing [`AttributeKind`].

Each variant is bound to the attribute name exactly as the tokenizer reports
it. The macro derives `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq` and `Hash`.

```
use xtree::{attribute_kinds, AttributeKind};

attribute_kinds! {
	pub enum Attr {
		Href = "href",
		Rel = "rel",
	}
}

assert_eq!(Attr::recognize("rel"), Some(Attr::Rel));
assert_eq!(Attr::recognize("REL"), None);
```
*/
#[macro_export]
macro_rules! attribute_kinds {
	(
		$(#[$meta:meta])*
		$vis:vis enum $name:ident {
			$($(#[$vmeta:meta])* $variant:ident = $attr:literal),+ $(,)?
		}
	) => {
		$(#[$meta])*
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
		$vis enum $name {
			$($(#[$vmeta])* $variant),+
		}

		impl $crate::AttributeKind for $name {
			fn recognize(name: &str) -> Option<Self> {
				match name {
					$($attr => Some(Self::$variant),)+
					_ => None,
				}
			}

			fn name(&self) -> &str {
				match self {
					$(Self::$variant => $attr,)+
				}
			}
		}
	};
}

/*!
# Typed document tree

A parse produces a single [`Node`] for the root element. Element nodes own
their children: first the recognized attributes, then nested elements and
normalized text in document order.
*/
use std::fmt;

use crate::kind::{AttributeKind, ElementKind};
use crate::strings::CData;

/**
# Node of the typed tree

`E` is the element vocabulary and `A` the attribute vocabulary (see
[`crate::kind`]).

## Invariants

Trees built by the [`Reducer`](crate::Reducer) guarantee that:

- all [`Node::Attribute`] children of an element precede every other child,
- [`Node::Text`] values are never empty and contain no leading, trailing or
  doubled whitespace,
- no two [`Node::Text`] children are adjacent.

All accessors are total: asking a text node for its children or an
attribute for its element kind returns `None` instead of panicking.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node<E, A> {
	/// A recognized attribute and its raw value.
	Attribute(A, CData),
	/// A recognized element with its attributes and content.
	Element(E, Vec<Node<E, A>>),
	/// Normalized character data.
	Text(CData),
}

impl<E, A> Node<E, A> {
	pub fn is_attribute(&self) -> bool {
		matches!(self, Self::Attribute(..))
	}

	pub fn is_element(&self) -> bool {
		matches!(self, Self::Element(..))
	}

	pub fn is_text(&self) -> bool {
		matches!(self, Self::Text(..))
	}

	/// The attribute kind, if this is an attribute.
	pub fn attribute(&self) -> Option<&A> {
		match self {
			Self::Attribute(attr, _) => Some(attr),
			_ => None,
		}
	}

	/// The element kind, if this is an element.
	pub fn element(&self) -> Option<&E> {
		match self {
			Self::Element(elem, _) => Some(elem),
			_ => None,
		}
	}

	/// The children, if this is an element.
	pub fn children(&self) -> Option<&[Self]> {
		match self {
			Self::Element(_, children) => Some(children.as_slice()),
			_ => None,
		}
	}

	/// The value of an attribute or text node.
	pub fn value(&self) -> Option<&str> {
		match self {
			Self::Attribute(_, value) | Self::Text(value) => Some(value.as_str()),
			Self::Element(..) => None,
		}
	}

	fn child_nodes(&self) -> std::slice::Iter<'_, Self> {
		self.children().unwrap_or(&[]).iter()
	}

	/// Iterate over the attribute children of an element.
	///
	/// Yields nothing for attribute and text nodes.
	pub fn all_attributes(&self) -> impl Iterator<Item = &Self> + '_ {
		self.child_nodes().filter(|n| n.is_attribute())
	}

	/// Iterate over the element children, in document order.
	///
	/// Yields nothing for attribute and text nodes.
	pub fn all_child_elements(&self) -> impl Iterator<Item = &Self> + '_ {
		self.child_nodes().filter(|n| n.is_element())
	}

	/// Iterate over the text children, in document order.
	pub fn all_texts(&self) -> impl Iterator<Item = &Self> + '_ {
		self.child_nodes().filter(|n| n.is_text())
	}
}

impl<E: PartialEq, A> Node<E, A> {
	/// Return true if this is an element of the given kind.
	pub fn is_element_kind(&self, kind: &E) -> bool {
		match self {
			Self::Element(elem, _) => elem == kind,
			_ => false,
		}
	}

	/// Iterate over the element children of the given kind.
	pub fn all_child_elements_of<'a>(&'a self, kind: &'a E) -> impl Iterator<Item = &'a Self> + 'a {
		self.child_nodes().filter(move |n| n.is_element_kind(kind))
	}

	/// The first element child of the given kind.
	pub fn first_child_element(&self, kind: &E) -> Option<&Self> {
		self.child_nodes().find(|n| n.is_element_kind(kind))
	}
}

impl<E, A: PartialEq> Node<E, A> {
	/// Return true if this is an attribute of the given kind.
	pub fn is_attribute_kind(&self, kind: &A) -> bool {
		match self {
			Self::Attribute(attr, _) => attr == kind,
			_ => false,
		}
	}

	/// The first attribute child of the given kind.
	///
	/// As the tokenizer guarantees unique attribute names, this is also the
	/// only one.
	pub fn first_attribute(&self, kind: &A) -> Option<&Self> {
		self.child_nodes().find(|n| n.is_attribute_kind(kind))
	}

	/// Shorthand for the value of [`Self::first_attribute`].
	pub fn attribute_value(&self, kind: &A) -> Option<&str> {
		self.first_attribute(kind).and_then(|n| n.value())
	}
}

impl<E: ElementKind, A: AttributeKind> Node<E, A> {
	/// The name of an attribute or element.
	pub fn name(&self) -> Option<&str> {
		match self {
			Self::Attribute(attr, _) => Some(attr.name()),
			Self::Element(elem, _) => Some(elem.name()),
			Self::Text(_) => None,
		}
	}

	/// The namespace URI of an element (possibly empty).
	pub fn uri(&self) -> Option<&str> {
		match self {
			Self::Element(elem, _) => Some(elem.uri()),
			_ => None,
		}
	}
}

/// Diagnostic rendering.
///
/// Attributes render as `name="value"`, text as a quoted string, and
/// elements as `<name>` followed by their children in brackets, if any. The
/// output is not XML and cannot be parsed back.
impl<E: ElementKind, A: AttributeKind> fmt::Display for Node<E, A> {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Attribute(attr, value) => write!(f, "{}={:?}", attr.name(), value.as_str()),
			Self::Element(elem, children) => {
				write!(f, "<{}>", elem.name())?;
				if children.is_empty() {
					return Ok(());
				}
				f.write_str("[")?;
				for (i, child) in children.iter().enumerate() {
					if i > 0 {
						f.write_str(", ")?;
					}
					fmt::Display::fmt(child, f)?;
				}
				f.write_str("]")
			}
			Self::Text(value) => write!(f, "{:?}", value.as_str()),
		}
	}
}

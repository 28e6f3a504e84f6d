//! Static shapes for [`Block`](`crate::Block`)s.
//!
//! A [`Shape`] describes a fixed node tree with numbered dynamic locations:
//! text slots, bindings on elements (attributes, properties, classes, handlers and refs), and child slots that hold nested fragments.
//! [`Template::compile`] validates it once, after which any number of blocks can share the result.
//!
//! ```
//! use block_dom::template::{Shape, Template};
//!
//! let template = Template::compile(
//! 	Shape::element("li")
//! 		.bind_class(0)
//! 		.child(Shape::text_slot(1))
//! 		.child(Shape::child_slot(0)),
//! )
//! .unwrap();
//! assert_eq!(template.data_len(), 2);
//! assert_eq!(template.child_len(), 1);
//! ```

use crate::{
	attributes::property_name,
	error::{Error, SlotKind},
	host::Host,
};
use std::borrow::Cow;
use tracing::instrument;

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
	Element(Element),
	Text(Cow<'static, str>),
	Comment(Cow<'static, str>),
	/// A text node whose content comes from data slot `usize`.
	TextSlot(usize),
	/// A nested fragment, from child slot `usize`.
	ChildSlot(usize),
}

impl Shape {
	#[must_use]
	pub fn element(tag: impl Into<Cow<'static, str>>) -> Element {
		Element {
			tag: tag.into(),
			namespace: None,
			attributes: Vec::new(),
			bindings: Vec::new(),
			children: Vec::new(),
		}
	}

	#[must_use]
	pub fn text(text: impl Into<Cow<'static, str>>) -> Self {
		Shape::Text(text.into())
	}

	#[must_use]
	pub fn comment(comment: impl Into<Cow<'static, str>>) -> Self {
		Shape::Comment(comment.into())
	}

	#[must_use]
	pub fn text_slot(index: usize) -> Self {
		Shape::TextSlot(index)
	}

	#[must_use]
	pub fn child_slot(index: usize) -> Self {
		Shape::ChildSlot(index)
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
	pub tag: Cow<'static, str>,
	pub namespace: Option<Cow<'static, str>>,
	pub attributes: Vec<(Cow<'static, str>, Cow<'static, str>)>,
	pub bindings: Vec<Binding>,
	pub children: Vec<Shape>,
}

impl Element {
	#[must_use]
	pub fn namespace(mut self, namespace: impl Into<Cow<'static, str>>) -> Self {
		self.namespace = Some(namespace.into());
		self
	}

	/// A static attribute.
	#[must_use]
	pub fn attribute(mut self, name: impl Into<Cow<'static, str>>, value: impl Into<Cow<'static, str>>) -> Self {
		self.attributes.push((name.into(), value.into()));
		self
	}

	#[must_use]
	pub fn bind_attribute(mut self, index: usize, name: impl Into<Cow<'static, str>>) -> Self {
		self.bindings.push(Binding::Attribute { index, name: name.into() });
		self
	}

	/// Binds a live property like `value` or `checked`.
	///
	/// [`Element::bind_attribute`] already binds the properties of form controls that attributes only initialize,
	/// so this is for everything else.
	#[must_use]
	pub fn bind_property(mut self, index: usize, name: impl Into<Cow<'static, str>>) -> Self {
		self.bindings.push(Binding::Property { index, name: name.into() });
		self
	}

	/// Binds a [`Value::Map`](`crate::Value::Map`) of attribute names to values,
	/// or a single `[name, value]` [`Value::List`](`crate::Value::List`).
	#[must_use]
	pub fn bind_attributes(mut self, index: usize) -> Self {
		self.bindings.push(Binding::Attributes { index });
		self
	}

	/// Binds a [`Handler`](`crate::Handler`) that receives `&Option<H::Node>`:
	/// the element once the block is mounted, and [`None`] once it is removed.
	#[must_use]
	pub fn bind_ref(mut self, index: usize) -> Self {
		self.bindings.push(Binding::Ref { index });
		self
	}

	#[must_use]
	pub fn bind_class(mut self, index: usize) -> Self {
		self.bindings.push(Binding::Class { index });
		self
	}

	#[must_use]
	pub fn bind_handler(mut self, index: usize, event: impl Into<Cow<'static, str>>) -> Self {
		self.bindings.push(Binding::Handler { index, event: event.into() });
		self
	}

	#[must_use]
	pub fn child(mut self, child: impl Into<Shape>) -> Self {
		self.children.push(child.into());
		self
	}
}

impl From<Element> for Shape {
	fn from(element: Element) -> Self {
		Shape::Element(element)
	}
}

/// A dynamic location on an element.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
	Attribute { index: usize, name: Cow<'static, str> },
	Property { index: usize, name: Cow<'static, str> },
	Attributes { index: usize },
	Class { index: usize },
	Handler { index: usize, event: Cow<'static, str> },
	Ref { index: usize },
}

impl Binding {
	#[must_use]
	pub fn index(&self) -> usize {
		match *self {
			Binding::Attribute { index, .. }
			| Binding::Property { index, .. }
			| Binding::Attributes { index }
			| Binding::Class { index }
			| Binding::Handler { index, .. }
			| Binding::Ref { index } => index,
		}
	}
}

/// How the data value of a location is written.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Location {
	Text,
	Attribute(Cow<'static, str>),
	Property(Cow<'static, str>),
	Attributes,
	Class,
	Handler(Cow<'static, str>),
	Ref,
}

#[derive(Debug, Clone, Copy)]
pub struct Config {
	/// Drop static text nodes that only contain whitespace, except inside `<pre>`.
	pub normalize_whitespace: bool,
}

impl Default for Config {
	fn default() -> Self {
		Self { normalize_whitespace: true }
	}
}

/// A validated [`Shape`].
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
	root: Shape,
	locations: Vec<Location>,
	child_len: usize,
}

impl Template {
	/// # Errors
	///
	/// Iff data or child slot indices are duplicated or not contiguous from 0,
	/// or the root itself is a child slot.
	pub fn compile(root: impl Into<Shape>) -> Result<Self, Error> {
		Self::compile_with(root, Config::default())
	}

	/// # Errors
	///
	/// See [`Template::compile`].
	#[instrument(skip(root))]
	pub fn compile_with(root: impl Into<Shape>, config: Config) -> Result<Self, Error> {
		let mut root = root.into();
		if let Shape::ChildSlot(index) = root {
			return Err(Error::SlotIndex { kind: SlotKind::Child, index });
		}
		if config.normalize_whitespace {
			normalize(&mut root);
		}

		let mut locations = Vec::new();
		let mut children = Vec::new();
		collect(&root, &mut locations, &mut children)?;

		let locations = locations
			.into_iter()
			.enumerate()
			.map(|(index, location)| location.ok_or(Error::SlotIndex { kind: SlotKind::Data, index }))
			.collect::<Result<Vec<_>, _>>()?;
		if let Some(index) = children.iter().position(|&seen| !seen) {
			return Err(Error::SlotIndex { kind: SlotKind::Child, index });
		}

		Ok(Self {
			root,
			locations,
			child_len: children.len(),
		})
	}

	/// The number of data values a block of this template takes.
	#[must_use]
	pub fn data_len(&self) -> usize {
		self.locations.len()
	}

	/// The number of child slots.
	#[must_use]
	pub fn child_len(&self) -> usize {
		self.child_len
	}

	pub(crate) fn locations(&self) -> &[Location] {
		&self.locations
	}

	/// Builds a detached copy of the static tree and resolves all locations in it.
	pub(crate) fn instantiate<H: Host>(&self, host: &mut H) -> Instance<H> {
		let mut refs = vec![None; self.locations.len()];
		let mut children = vec![None; self.child_len];
		let root = build(host, &self.root, &mut refs, &mut children);
		Instance {
			root,
			refs: refs.into_iter().map(|r| r.expect("block-dom bug: Unresolved location")).collect(),
			children: children.into_iter().map(|c| c.expect("block-dom bug: Unresolved child slot")).collect(),
		}
	}
}

pub(crate) struct Instance<H: Host> {
	pub root: H::Node,
	/// The node each location writes to, by data index.
	pub refs: Vec<H::Node>,
	pub children: Vec<ChildTarget<H>>,
}

/// Where a child slot's fragment is mounted.
#[derive(Debug)]
pub(crate) struct ChildTarget<H: Host> {
	pub parent: H::Node,
	/// [`None`] iff the slot is the only child of its element.
	pub anchor: Option<H::Node>,
}

impl<H: Host> Clone for ChildTarget<H> {
	fn clone(&self) -> Self {
		Self {
			parent: self.parent.clone(),
			anchor: self.anchor.clone(),
		}
	}
}

fn normalize(shape: &mut Shape) {
	if let Shape::Element(element) = shape {
		if element.tag.eq_ignore_ascii_case("pre") {
			return;
		}
		element.children.retain(|child| !matches!(child, Shape::Text(text) if text.trim().is_empty()));
		element.children.iter_mut().for_each(normalize);
	}
}

fn mark(seen: &mut Vec<bool>, kind: SlotKind, index: usize) -> Result<(), Error> {
	if seen.len() <= index {
		seen.resize(index + 1, false);
	}
	if seen[index] {
		return Err(Error::SlotIndex { kind, index });
	}
	seen[index] = true;
	Ok(())
}

fn place(locations: &mut Vec<Option<Location>>, index: usize, location: Location) -> Result<(), Error> {
	if locations.len() <= index {
		locations.resize(index + 1, None);
	}
	if locations[index].is_some() {
		return Err(Error::SlotIndex { kind: SlotKind::Data, index });
	}
	locations[index] = Some(location);
	Ok(())
}

fn collect(shape: &Shape, locations: &mut Vec<Option<Location>>, children: &mut Vec<bool>) -> Result<(), Error> {
	match shape {
		Shape::Text(_) | Shape::Comment(_) => Ok(()),
		&Shape::TextSlot(index) => place(locations, index, Location::Text),
		&Shape::ChildSlot(index) => mark(children, SlotKind::Child, index),
		Shape::Element(element) => {
			for binding in &element.bindings {
				match binding {
					Binding::Attribute { index, name } => {
						let location = if name == "class" {
							Location::Class
						} else if let Some(property) = property_name(&element.tag, name) {
							Location::Property(Cow::Borrowed(property))
						} else {
							Location::Attribute(name.clone())
						};
						place(locations, *index, location)?
					}
					Binding::Property { index, name } => place(locations, *index, Location::Property(name.clone()))?,
					Binding::Attributes { index } => place(locations, *index, Location::Attributes)?,
					Binding::Class { index } => place(locations, *index, Location::Class)?,
					Binding::Handler { index, event } => place(locations, *index, Location::Handler(event.clone()))?,
					Binding::Ref { index } => place(locations, *index, Location::Ref)?,
				}
			}
			element.children.iter().try_for_each(|child| collect(child, locations, children))
		}
	}
}

fn build<H: Host>(host: &mut H, shape: &Shape, refs: &mut [Option<H::Node>], children: &mut [Option<ChildTarget<H>>]) -> H::Node {
	match shape {
		Shape::Text(text) => host.create_text(text),
		Shape::Comment(comment) => host.create_comment(comment),
		&Shape::TextSlot(index) => {
			let node = host.create_text("");
			refs[index] = Some(node.clone());
			node
		}
		Shape::ChildSlot(_) => unreachable!("block-dom bug: Child slot built as node"),
		Shape::Element(element) => {
			let node = host.create_element(&element.tag, element.namespace.as_deref());
			for (name, value) in &element.attributes {
				if name == "class" {
					value.split_whitespace().for_each(|class| host.add_class(&node, class));
				} else {
					host.set_attribute(&node, name, Some(value));
				}
			}
			for binding in &element.bindings {
				refs[binding.index()] = Some(node.clone());
			}

			if let [Shape::ChildSlot(index)] = element.children.as_slice() {
				children[*index] = Some(ChildTarget { parent: node.clone(), anchor: None });
			} else {
				for child in &element.children {
					match child {
						&Shape::ChildSlot(index) => {
							let anchor = host.create_text("");
							host.insert_before(&node, &anchor, None);
							children[index] = Some(ChildTarget {
								parent: node.clone(),
								anchor: Some(anchor),
							});
						}
						child => {
							let child = build(host, child, refs, children);
							host.insert_before(&node, &child, None);
						}
					}
				}
			}
			node
		}
	}
}

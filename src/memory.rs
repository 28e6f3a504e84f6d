//! An in-memory host tree.
//!
//! [`MemoryHost`] stores nodes in an arena and records every write in a [`Journal`],
//! which makes it possible to assert exactly which host operations a patch performed.

use crate::{
	host::Host,
	value::{Handler, Value},
};
use core::{
	any::Any,
	fmt::{self, Debug, Formatter},
};
use hashbrown::HashMap;
use std::{cell::RefCell, collections::BTreeMap, rc::Rc};
use tracing::warn;

/// Handle to a node of a [`MemoryHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// One recorded host operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
	Create(NodeId),
	Insert { parent: NodeId, node: NodeId, before: Option<NodeId> },
	Remove { parent: NodeId, node: NodeId },
	Clear(NodeId),
	SetText(NodeId),
	SetAttribute { element: NodeId, name: String },
	SetProperty { element: NodeId, name: String },
	AddClass { element: NodeId, class: String },
	RemoveClass { element: NodeId, class: String },
	SetHandler { element: NodeId, event: String },
	/// Recorded by callers through [`Journal::note`], to interleave their own events with host writes.
	Note(String),
}

impl Op {
	/// Whether this operation changed an attached tree or created a node.
	#[must_use]
	pub fn is_write(&self) -> bool {
		!matches!(self, Op::Note(_))
	}
}

/// A shared, cloneable log of [`Op`]s.
#[derive(Debug, Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<Op>>>);

impl Journal {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	pub fn note(&self, note: impl Into<String>) {
		self.0.borrow_mut().push(Op::Note(note.into()))
	}

	fn record(&self, op: Op) {
		self.0.borrow_mut().push(op)
	}

	#[must_use]
	pub fn ops(&self) -> Vec<Op> {
		self.0.borrow().clone()
	}

	/// The number of recorded writes, not counting notes.
	#[must_use]
	pub fn writes(&self) -> usize {
		self.0.borrow().iter().filter(|op| op.is_write()).count()
	}

	pub fn count(&self, filter: impl Fn(&Op) -> bool) -> usize {
		self.0.borrow().iter().filter(|op| filter(op)).count()
	}

	/// Empties the journal and returns what it contained.
	pub fn take(&self) -> Vec<Op> {
		self.0.borrow_mut().drain(..).collect()
	}
}

enum Kind {
	Element {
		tag: String,
		attributes: BTreeMap<String, String>,
		classes: Vec<String>,
		properties: HashMap<String, Value>,
		handlers: HashMap<String, Handler>,
	},
	Text(String),
	Comment(String),
}

impl Kind {
	fn element(tag: &str) -> Self {
		Kind::Element {
			tag: tag.to_owned(),
			attributes: BTreeMap::new(),
			classes: Vec::new(),
			properties: HashMap::new(),
			handlers: HashMap::new(),
		}
	}
}

struct NodeData {
	kind: Kind,
	parent: Option<NodeId>,
	children: Vec<NodeId>,
}

/// An arena-backed host tree. Nodes are never freed, so [`NodeId`]s stay valid and unique.
#[derive(Default)]
pub struct MemoryHost {
	nodes: Vec<NodeData>,
	journal: Journal,
}

impl Debug for MemoryHost {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("MemoryHost").field("nodes", &self.nodes.len()).finish_non_exhaustive()
	}
}

impl MemoryHost {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// A host that records into an existing `journal`.
	#[must_use]
	pub fn with_journal(journal: Journal) -> Self {
		Self { nodes: Vec::new(), journal }
	}

	#[must_use]
	pub fn journal(&self) -> &Journal {
		&self.journal
	}

	fn push(&mut self, kind: Kind) -> NodeId {
		let id = NodeId(self.nodes.len());
		self.nodes.push(NodeData { kind, parent: None, children: Vec::new() });
		self.journal.record(Op::Create(id));
		id
	}

	/// A detached element to mount into, created without being journaled.
	pub fn create_container(&mut self, tag: &str) -> NodeId {
		let id = NodeId(self.nodes.len());
		self.nodes.push(NodeData {
			kind: Kind::element(tag),
			parent: None,
			children: Vec::new(),
		});
		id
	}

	#[must_use]
	pub fn children(&self, node: NodeId) -> &[NodeId] {
		&self.nodes[node.0].children
	}

	#[must_use]
	pub fn parent(&self, node: NodeId) -> Option<NodeId> {
		self.nodes[node.0].parent
	}

	/// The data of a text or comment node.
	#[must_use]
	pub fn text(&self, node: NodeId) -> Option<&str> {
		match &self.nodes[node.0].kind {
			Kind::Text(text) | Kind::Comment(text) => Some(text),
			Kind::Element { .. } => None,
		}
	}

	#[must_use]
	pub fn tag(&self, node: NodeId) -> Option<&str> {
		match &self.nodes[node.0].kind {
			Kind::Element { tag, .. } => Some(tag),
			_ => None,
		}
	}

	#[must_use]
	pub fn attribute(&self, element: NodeId, name: &str) -> Option<&str> {
		match &self.nodes[element.0].kind {
			Kind::Element { attributes, .. } => attributes.get(name).map(String::as_str),
			_ => None,
		}
	}

	/// A property assigned through [`Host::set_property`]. Properties are not serialized.
	#[must_use]
	pub fn property(&self, element: NodeId, name: &str) -> Option<&Value> {
		match &self.nodes[element.0].kind {
			Kind::Element { properties, .. } => properties.get(name),
			_ => None,
		}
	}

	#[must_use]
	pub fn classes(&self, element: NodeId) -> &[String] {
		match &self.nodes[element.0].kind {
			Kind::Element { classes, .. } => classes,
			_ => &[],
		}
	}

	/// Calls the handler bound for `event` on `element`, if any. Returns whether there was one.
	pub fn dispatch(&self, element: NodeId, event: &str, payload: &dyn Any) -> bool {
		match &self.nodes[element.0].kind {
			Kind::Element { handlers, .. } => handlers.get(event).map(|handler| handler.call(payload)).is_some(),
			_ => false,
		}
	}

	/// Serializes the children of `node`. Text is not escaped and empty text nodes vanish.
	#[must_use]
	pub fn inner_html(&self, node: NodeId) -> String {
		let mut html = String::new();
		for &child in self.children(node) {
			self.write_html(child, &mut html);
		}
		html
	}

	#[must_use]
	pub fn outer_html(&self, node: NodeId) -> String {
		let mut html = String::new();
		self.write_html(node, &mut html);
		html
	}

	fn write_html(&self, node: NodeId, html: &mut String) {
		match &self.nodes[node.0].kind {
			Kind::Text(text) => html.push_str(text),
			Kind::Comment(comment) => {
				html.push_str("<!--");
				html.push_str(comment);
				html.push_str("-->");
			}
			Kind::Element { tag, attributes, classes, .. } => {
				html.push('<');
				html.push_str(tag);
				if !classes.is_empty() {
					html.push_str(&format!(" class=\"{}\"", classes.join(" ")));
				}
				for (name, value) in attributes {
					html.push_str(&format!(" {}=\"{}\"", name, value));
				}
				html.push('>');
				if !is_void(tag) {
					for &child in self.children(node) {
						self.write_html(child, html);
					}
					html.push_str("</");
					html.push_str(tag);
					html.push('>');
				}
			}
		}
	}

	#[must_use]
	pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
		let siblings = self.children(self.parent(node)?);
		let index = siblings.iter().position(|&sibling| sibling == node)?;
		siblings.get(index + 1).copied()
	}

	fn detach(&mut self, node: NodeId) {
		if let Some(parent) = self.nodes[node.0].parent.take() {
			self.nodes[parent.0].children.retain(|&child| child != node);
		}
	}

	#[allow(clippy::type_complexity)]
	fn element_mut(
		&mut self,
		element: NodeId,
	) -> Option<(&mut BTreeMap<String, String>, &mut Vec<String>, &mut HashMap<String, Value>, &mut HashMap<String, Handler>)> {
		match &mut self.nodes[element.0].kind {
			Kind::Element {
				attributes,
				classes,
				properties,
				handlers,
				..
			} => Some((attributes, classes, properties, handlers)),
			_ => {
				warn!("Expected element but found other node {:?}", element);
				None
			}
		}
	}
}

impl Host for MemoryHost {
	type Node = NodeId;

	fn create_text(&mut self, data: &str) -> NodeId {
		self.push(Kind::Text(data.to_owned()))
	}

	fn create_comment(&mut self, data: &str) -> NodeId {
		self.push(Kind::Comment(data.to_owned()))
	}

	fn create_element(&mut self, tag: &str, _namespace: Option<&str>) -> NodeId {
		self.push(Kind::element(tag))
	}

	fn parse_markup(&mut self, markup: &str) -> Vec<NodeId> {
		let mut parser = Parser { rest: markup };
		let mut roots = Vec::new();
		let mut open: Vec<(NodeId, String)> = Vec::new();
		while let Some(token) = parser.next_token() {
			let node = match token {
				Token::Text(text) => self.create_text(&decode(text)),
				Token::Comment(comment) => self.create_comment(comment),
				Token::Close(tag) => {
					if let Some(depth) = open.iter().rposition(|(_, open)| open.eq_ignore_ascii_case(tag)) {
						open.truncate(depth);
					}
					continue;
				}
				Token::Open { tag, attributes, self_closing } => {
					let element = self.create_element(tag, None);
					for (name, value) in attributes {
						if name == "class" {
							for class in value.split_whitespace() {
								self.add_class(&element, class);
							}
						} else {
							self.set_attribute(&element, name, Some(&decode(value)));
						}
					}
					self.attach(&mut roots, &open, element);
					if !self_closing && !is_void(tag) {
						open.push((element, tag.to_owned()));
					}
					continue;
				}
			};
			self.attach(&mut roots, &open, node);
		}
		roots
	}

	fn insert_before(&mut self, parent: &NodeId, node: &NodeId, before: Option<&NodeId>) {
		self.journal.record(Op::Insert {
			parent: *parent,
			node: *node,
			before: before.copied(),
		});
		// Inserting a node before itself leaves it where it is, as in the DOM.
		let before = match before {
			Some(before) if before == node => self.next_sibling(*node),
			before => before.copied(),
		};
		self.detach(*node);
		let children = &mut self.nodes[parent.0].children;
		let index = match before {
			None => children.len(),
			Some(before) => match children.iter().position(|&child| child == before) {
				Some(index) => index,
				None => {
					warn!("Insertion reference {:?} is not a child of {:?}. Appending.", before, parent);
					children.len()
				}
			},
		};
		children.insert(index, *node);
		self.nodes[node.0].parent = Some(*parent);
	}

	fn remove_child(&mut self, parent: &NodeId, node: &NodeId) {
		self.journal.record(Op::Remove { parent: *parent, node: *node });
		if self.nodes[node.0].parent != Some(*parent) {
			warn!("Removed node {:?} is not a child of {:?}", node, parent);
		}
		self.detach(*node);
	}

	fn clear(&mut self, parent: &NodeId) {
		self.journal.record(Op::Clear(*parent));
		for child in std::mem::take(&mut self.nodes[parent.0].children) {
			self.nodes[child.0].parent = None;
		}
	}

	fn set_text(&mut self, node: &NodeId, data: &str) {
		self.journal.record(Op::SetText(*node));
		match &mut self.nodes[node.0].kind {
			Kind::Text(text) | Kind::Comment(text) => *text = data.to_owned(),
			Kind::Element { .. } => warn!("Expected text node but found element {:?}", node),
		}
	}

	fn set_attribute(&mut self, element: &NodeId, name: &str, value: Option<&str>) {
		self.journal.record(Op::SetAttribute {
			element: *element,
			name: name.to_owned(),
		});
		if let Some((attributes, ..)) = self.element_mut(*element) {
			match value {
				Some(value) => attributes.insert(name.to_owned(), value.to_owned()),
				None => attributes.remove(name),
			};
		}
	}

	fn set_property(&mut self, element: &NodeId, name: &str, value: &Value) {
		self.journal.record(Op::SetProperty {
			element: *element,
			name: name.to_owned(),
		});
		if let Some((_, _, properties, _)) = self.element_mut(*element) {
			properties.insert(name.to_owned(), value.clone());
		}
	}

	fn add_class(&mut self, element: &NodeId, class: &str) {
		self.journal.record(Op::AddClass {
			element: *element,
			class: class.to_owned(),
		});
		if let Some((_, classes, ..)) = self.element_mut(*element) {
			if !classes.iter().any(|c| c == class) {
				classes.push(class.to_owned());
			}
		}
	}

	fn remove_class(&mut self, element: &NodeId, class: &str) {
		self.journal.record(Op::RemoveClass {
			element: *element,
			class: class.to_owned(),
		});
		if let Some((_, classes, ..)) = self.element_mut(*element) {
			classes.retain(|c| c != class);
		}
	}

	fn set_handler(&mut self, element: &NodeId, event: &str, handler: Option<&Handler>) {
		self.journal.record(Op::SetHandler {
			element: *element,
			event: event.to_owned(),
		});
		if let Some((.., handlers)) = self.element_mut(*element) {
			match handler {
				Some(handler) => handlers.insert(event.to_owned(), handler.clone()),
				None => handlers.remove(event),
			};
		}
	}
}

impl MemoryHost {
	fn attach(&mut self, roots: &mut Vec<NodeId>, open: &[(NodeId, String)], node: NodeId) {
		match open.last() {
			Some((parent, _)) => {
				let parent = *parent;
				self.insert_before(&parent, &node, None)
			}
			None => roots.push(node),
		}
	}
}

fn is_void(tag: &str) -> bool {
	["area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track", "wbr"]
		.iter()
		.any(|void| tag.eq_ignore_ascii_case(void))
}

fn decode(text: &str) -> String {
	text.replace("&lt;", "<")
		.replace("&gt;", ">")
		.replace("&quot;", "\"")
		.replace("&#39;", "'")
		.replace("&amp;", "&")
}

enum Token<'a> {
	Text(&'a str),
	Comment(&'a str),
	Open {
		tag: &'a str,
		attributes: Vec<(&'a str, &'a str)>,
		self_closing: bool,
	},
	Close(&'a str),
}

/// A forgiving tokenizer for the markup subset [`MemoryHost`] understands:
/// elements with quoted, unquoted or valueless attributes, text, and comments.
struct Parser<'a> {
	rest: &'a str,
}

impl<'a> Parser<'a> {
	fn next_token(&mut self) -> Option<Token<'a>> {
		if self.rest.is_empty() {
			return None;
		}
		if let Some(rest) = self.rest.strip_prefix("<!--") {
			let end = rest.find("-->").unwrap_or(rest.len());
			self.rest = rest.get(end + 3..).unwrap_or("");
			return Some(Token::Comment(&rest[..end]));
		}
		if let Some(rest) = self.rest.strip_prefix("</") {
			let end = rest.find('>').unwrap_or(rest.len());
			self.rest = rest.get(end + 1..).unwrap_or("");
			return Some(Token::Close(rest[..end].trim()));
		}
		if self.rest.starts_with('<') && self.rest[1..].starts_with(|c: char| c.is_ascii_alphabetic()) {
			return Some(self.open_tag());
		}

		let first = self.rest.chars().next().map_or(0, char::len_utf8);
		let end = self.rest[first..].find('<').map_or(self.rest.len(), |i| i + first);
		let (text, rest) = self.rest.split_at(end);
		self.rest = rest;
		Some(Token::Text(text))
	}

	fn open_tag(&mut self) -> Token<'a> {
		let rest = &self.rest[1..];
		let name_end = rest.find(|c: char| c.is_whitespace() || c == '>' || c == '/').unwrap_or(rest.len());
		let tag = &rest[..name_end];
		let mut rest = &rest[name_end..];
		let mut attributes = Vec::new();
		let mut self_closing = false;

		loop {
			rest = rest.trim_start();
			if let Some(after) = rest.strip_prefix("/>") {
				self_closing = true;
				rest = after;
				break;
			}
			if let Some(after) = rest.strip_prefix('>') {
				rest = after;
				break;
			}
			if rest.is_empty() {
				break;
			}
			if let Some(after) = rest.strip_prefix('/') {
				rest = after;
				continue;
			}

			let name_end = rest.find(|c: char| c.is_whitespace() || c == '=' || c == '>' || c == '/').unwrap_or(rest.len());
			let name = &rest[..name_end];
			rest = rest[name_end..].trim_start();
			let value = if let Some(after) = rest.strip_prefix('=') {
				let after = after.trim_start();
				match after.chars().next() {
					Some(quote @ '"') | Some(quote @ '\'') => {
						let inner = &after[1..];
						let end = inner.find(quote).unwrap_or(inner.len());
						rest = inner.get(end + 1..).unwrap_or("");
						&inner[..end]
					}
					_ => {
						let end = after.find(|c: char| c.is_whitespace() || c == '>').unwrap_or(after.len());
						rest = &after[end..];
						&after[..end]
					}
				}
			} else {
				""
			};
			attributes.push((name, value));
		}

		self.rest = rest;
		Token::Open { tag, attributes, self_closing }
	}
}

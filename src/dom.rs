//! The browser backend.

use crate::{
	host::Host,
	value::{Handler, Value},
};
use js_sys::{Function, Reflect};
use tracing::{error, instrument, trace, warn};
use wasm_bindgen::{closure::Closure, throw_str, JsCast, JsValue};
use web_sys::{CharacterData, Document, Element, HtmlTemplateElement, Node};

/// A [`Host`] that writes to a live [`web_sys::Document`].
///
/// Failed DOM calls are logged and otherwise ignored, except for failing node creation, which throws.
///
/// Event listeners added through handler locations are owned by the `DomHost`.
/// They are dropped when their element is removed through it, and all of them are dropped with it.
#[derive(Debug)]
pub struct DomHost {
	document: Document,
	listeners: Vec<Listener>,
}

#[derive(Debug)]
struct Listener {
	node: Node,
	event: String,
	closure: Closure<dyn Fn(web_sys::Event)>,
}

impl Listener {
	fn function(&self) -> &Function {
		self.closure.as_ref().unchecked_ref::<Function>()
	}
}

impl DomHost {
	#[must_use]
	pub fn new(document: Document) -> Self {
		Self {
			document,
			listeners: Vec::new(),
		}
	}

	/// A host for the document that owns `node`.
	#[must_use]
	pub fn for_node(node: &Node) -> Option<Self> {
		node.owner_document().map(Self::new)
	}

	#[must_use]
	pub fn document(&self) -> &Document {
		&self.document
	}

	/// Unbinds and drops listeners on `root` and its descendants.
	///
	/// Text and comment nodes can't hold listeners, so removing them never scans.
	fn release_listeners(&mut self, root: &Node) {
		if self.listeners.is_empty() || root.node_type() != Node::ELEMENT_NODE {
			return;
		}
		let before = self.listeners.len();
		let mut kept = Vec::with_capacity(before);
		for listener in self.listeners.drain(..) {
			if root.contains(Some(&listener.node)) {
				if let Err(error) = listener.node.remove_event_listener_with_callback(&listener.event, listener.function()) {
					error!("Failed to remove event listener {:?}: {:?}", listener.event, error)
				}
			} else {
				kept.push(listener)
			}
		}
		self.listeners = kept;
		trace!("Freed {} event listener(s).", before - self.listeners.len());
	}
}

impl Host for DomHost {
	type Node = Node;

	fn create_text(&mut self, data: &str) -> Node {
		self.document.create_text_node(data).into()
	}

	fn create_comment(&mut self, data: &str) -> Node {
		self.document.create_comment(data).into()
	}

	#[instrument(skip(self))]
	fn create_element(&mut self, tag: &str, namespace: Option<&str>) -> Node {
		let element = match namespace {
			Some(namespace) => self.document.create_element_ns(Some(namespace), tag),
			None => self.document.create_element(tag),
		};
		match element {
			Ok(element) => element.into(),
			Err(error) => {
				error!("Could not create element <{}>: {:?}", tag, error);
				throw_str("block-dom: Could not create element.")
			}
		}
	}

	fn parse_markup(&mut self, markup: &str) -> Vec<Node> {
		let template = match self.document.create_element("template").map(|element| element.dyn_into::<HtmlTemplateElement>()) {
			Ok(Ok(template)) => template,
			Ok(Err(element)) => {
				error!("Expected `web_sys::HtmlTemplateElement` but found {:?}.", element);
				throw_str("block-dom: Could not create template element.")
			}
			Err(error) => {
				error!("Could not create template element: {:?}", error);
				throw_str("block-dom: Could not create template element.")
			}
		};
		template.set_inner_html(markup);
		let child_nodes = template.content().child_nodes();
		(0..child_nodes.length()).filter_map(|i| child_nodes.get(i)).collect()
	}

	fn insert_before(&mut self, parent: &Node, node: &Node, before: Option<&Node>) {
		if let Err(error) = parent.insert_before(node, before) {
			error!("Failed to insert node: {:?}", error)
		}
	}

	fn remove_child(&mut self, parent: &Node, node: &Node) {
		self.release_listeners(node);
		if let Err(error) = parent.remove_child(node) {
			error!("Failed to remove node: {:?}", error)
		}
	}

	fn clear(&mut self, parent: &Node) {
		let child_nodes = parent.child_nodes();
		for child in (0..child_nodes.length()).filter_map(|i| child_nodes.get(i)) {
			self.release_listeners(&child);
		}
		parent.set_text_content(None);
	}

	fn set_text(&mut self, node: &Node, data: &str) {
		match node.dyn_ref::<CharacterData>() {
			Some(character_data) => character_data.set_data(data),
			None => warn!("Expected to update `web_sys::CharacterData` but found {:?}.", node),
		}
	}

	fn set_attribute(&mut self, element: &Node, name: &str, value: Option<&str>) {
		let element = match element.dyn_ref::<Element>() {
			Some(element) => element,
			None => {
				warn!("Expected to update `web_sys::Element` but found {:?}.", element);
				return;
			}
		};
		let result = match value {
			Some(value) => element.set_attribute(name, value),
			None => element.remove_attribute(name),
		};
		if let Err(error) = result {
			warn!("Could not update attribute {:?}: {:?}", name, error)
		}
	}

	fn set_property(&mut self, element: &Node, name: &str, value: &Value) {
		let value = match value {
			Value::None => JsValue::NULL,
			Value::Bool(value) => JsValue::from_bool(*value),
			Value::Number(value) => JsValue::from_f64(*value),
			other => JsValue::from_str(&other.to_text()),
		};
		if let Err(error) = Reflect::set(element, &JsValue::from_str(name), &value) {
			warn!("Could not set property {:?}: {:?}", name, error)
		}
	}

	fn add_class(&mut self, element: &Node, class: &str) {
		match element.dyn_ref::<Element>().map(|element| element.class_list().add_1(class)) {
			Some(Ok(())) => (),
			Some(Err(error)) => warn!("Could not add class {:?}: {:?}", class, error),
			None => warn!("Expected to update `web_sys::Element` but found {:?}.", element),
		}
	}

	fn remove_class(&mut self, element: &Node, class: &str) {
		match element.dyn_ref::<Element>().map(|element| element.class_list().remove_1(class)) {
			Some(Ok(())) => (),
			Some(Err(error)) => warn!("Could not remove class {:?}: {:?}", class, error),
			None => warn!("Expected to update `web_sys::Element` but found {:?}.", element),
		}
	}

	#[instrument(skip(self, handler))]
	fn set_handler(&mut self, element: &Node, event: &str, handler: Option<&Handler>) {
		if let Some(i) = self.listeners.iter().position(|listener| &listener.node == element && listener.event == event) {
			let listener = self.listeners.swap_remove(i);
			if let Err(error) = element.remove_event_listener_with_callback(event, listener.function()) {
				error!("Failed to remove event listener {:?}: {:?}", event, error)
			}
		}

		if let Some(handler) = handler {
			let handler = handler.clone();
			let listener = Listener {
				node: element.clone(),
				event: event.to_owned(),
				closure: Closure::wrap(Box::new(move |event: web_sys::Event| handler.call(&event)) as Box<dyn Fn(web_sys::Event)>),
			};
			match element.add_event_listener_with_callback(event, listener.function()) {
				Ok(()) => self.listeners.push(listener),
				Err(error) => error!("Failed to add event listener {:?}: {:?}", event, error),
			}
		}
	}
}

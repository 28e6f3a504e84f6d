//! The host tree boundary.
//!
//! Fragments never touch a document directly. Every structural or content write goes through a [`Host`],
//! which lets the same fragment trees drive the browser DOM ([`DomHost`](`crate::dom::DomHost`))
//! and the in-memory [`MemoryHost`](`crate::memory::MemoryHost`).

use crate::value::{Handler, Value};
use core::fmt::Debug;

/// A mutable host document tree.
///
/// Node handles are cheap to clone and compare by identity.
/// A fragment owns the handles it created and lends them out through [`Fragment::first_node`](`crate::Fragment::first_node`).
pub trait Host {
	/// Handle to a live (or detached) node in this tree.
	///
	/// `'static` so that handles can be passed to ref callbacks as [`Any`](`core::any::Any`).
	type Node: 'static + Clone + PartialEq + Debug;

	fn create_text(&mut self, data: &str) -> Self::Node;
	fn create_comment(&mut self, data: &str) -> Self::Node;
	fn create_element(&mut self, tag: &str, namespace: Option<&str>) -> Self::Node;

	/// Parses `markup` into zero or more detached top-level nodes.
	fn parse_markup(&mut self, markup: &str) -> Vec<Self::Node>;

	/// Inserts `node` into `parent` just before `before`, or at the end if `before` is [`None`].
	///
	/// `node` may already be attached, in which case it is moved.
	/// Re-inserting a node at the position it already occupies is legal.
	fn insert_before(&mut self, parent: &Self::Node, node: &Self::Node, before: Option<&Self::Node>);

	fn remove_child(&mut self, parent: &Self::Node, node: &Self::Node);

	/// Detaches all child nodes of `parent` at once.
	fn clear(&mut self, parent: &Self::Node);

	fn set_text(&mut self, node: &Self::Node, data: &str);

	/// Sets an attribute, or removes it if `value` is [`None`].
	fn set_attribute(&mut self, element: &Self::Node, name: &str, value: Option<&str>);

	/// Assigns a live property, like `value` or `checked` on form controls, that attributes only initialize.
	fn set_property(&mut self, element: &Self::Node, name: &str, value: &Value);

	fn add_class(&mut self, element: &Self::Node, class: &str);
	fn remove_class(&mut self, element: &Self::Node, class: &str);

	/// Binds `handler` as the listener for `event` on `element`, replacing any previous one.
	/// [`None`] unbinds.
	fn set_handler(&mut self, element: &Self::Node, event: &str, handler: Option<&Handler>);
}

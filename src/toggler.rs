//! Positions where the kind of fragment can change between renders.

use crate::{
	fragment::{AnyFragment, Fragment},
	host::Host,
};
use std::borrow::Cow;
use tracing::trace;

/// A single child selected by a branch discriminant, e.g. the active branch of a conditional.
///
/// Children under the same discriminant are patched. A changed discriminant replaces the child:
/// The old child is notified and the new child is mounted where the old one began, then the old child is removed.
#[derive(Debug)]
pub struct Toggler<H: Host> {
	discriminant: u32,
	child: Box<AnyFragment<H>>,
	parent: Option<H::Node>,
}

impl<H: Host> Toggler<H> {
	#[must_use]
	pub fn new(discriminant: u32, child: impl Into<AnyFragment<H>>) -> Self {
		Self {
			discriminant,
			child: Box::new(child.into()),
			parent: None,
		}
	}

	#[must_use]
	pub fn discriminant(&self) -> u32 {
		self.discriminant
	}
}

impl<H: Host> Fragment<H> for Toggler<H> {
	fn mount(&mut self, host: &mut H, parent: &H::Node, before: Option<&H::Node>) {
		debug_assert!(self.parent.is_none(), "block-dom: `Toggler` mounted twice");
		self.child.mount(host, parent, before);
		self.parent = Some(parent.clone());
	}

	fn patch(&mut self, host: &mut H, next: Self) {
		if self.discriminant == next.discriminant {
			return self.child.patch(host, *next.child);
		}
		trace!(from = self.discriminant, to = next.discriminant, "Toggling");
		let parent = self.parent.as_ref().expect("block-dom: `Toggler` patched before mount");
		let before = self.child.first_node().cloned();
		self.child.before_remove();
		let mut old = std::mem::replace(&mut self.child, next.child);
		self.child.mount(host, parent, before.as_ref());
		old.remove(host);
		self.discriminant = next.discriminant;
	}

	fn move_before(&mut self, host: &mut H, before: Option<&H::Node>) {
		self.child.move_before(host, before)
	}

	fn before_remove(&mut self) {
		self.child.before_remove()
	}

	fn remove(&mut self, host: &mut H) {
		self.child.remove(host);
		self.parent = None;
	}

	fn first_node(&self) -> Option<&H::Node> {
		self.child.first_node()
	}
}

/// Like [`Toggler`], for positions whose possible shapes can't be enumerated, like a dynamically selected template.
///
/// The discriminant is an arbitrary string. A `Dispatch` owns a trailing anchor, before which its child is mounted.
#[derive(Debug)]
pub struct Dispatch<H: Host> {
	key: Cow<'static, str>,
	child: Box<AnyFragment<H>>,
	anchor: Option<H::Node>,
	parent: Option<H::Node>,
}

impl<H: Host> Dispatch<H> {
	#[must_use]
	pub fn new(key: impl Into<Cow<'static, str>>, child: impl Into<AnyFragment<H>>) -> Self {
		Self {
			key: key.into(),
			child: Box::new(child.into()),
			anchor: None,
			parent: None,
		}
	}

	#[must_use]
	pub fn key(&self) -> &str {
		&self.key
	}
}

impl<H: Host> Fragment<H> for Dispatch<H> {
	fn mount(&mut self, host: &mut H, parent: &H::Node, before: Option<&H::Node>) {
		debug_assert!(self.parent.is_none(), "block-dom: `Dispatch` mounted twice");
		let anchor = host.create_text("");
		host.insert_before(parent, &anchor, before);
		self.child.mount(host, parent, Some(&anchor));
		self.anchor = Some(anchor);
		self.parent = Some(parent.clone());
	}

	fn patch(&mut self, host: &mut H, next: Self) {
		if self.key == next.key {
			return self.child.patch(host, *next.child);
		}
		trace!(from = %self.key, to = %next.key, "Dispatching");
		let (parent, anchor) = match (&self.parent, &self.anchor) {
			(Some(parent), Some(anchor)) => (parent, anchor),
			_ => panic!("block-dom: `Dispatch` patched before mount"),
		};
		self.child.before_remove();
		self.child.remove(host);
		self.child = next.child;
		self.child.mount(host, parent, Some(anchor));
		self.key = next.key;
	}

	fn move_before(&mut self, host: &mut H, before: Option<&H::Node>) {
		let (parent, anchor) = match (&self.parent, &self.anchor) {
			(Some(parent), Some(anchor)) => (parent, anchor),
			_ => panic!("block-dom: `Dispatch` moved before mount"),
		};
		self.child.move_before(host, before);
		host.insert_before(parent, anchor, before);
	}

	fn before_remove(&mut self) {
		self.child.before_remove()
	}

	fn remove(&mut self, host: &mut H) {
		self.child.remove(host);
		if let (Some(parent), Some(anchor)) = (self.parent.take(), self.anchor.take()) {
			host.remove_child(&parent, &anchor);
		}
	}

	fn first_node(&self) -> Option<&H::Node> {
		self.child.first_node().or_else(|| self.anchor.as_ref())
	}
}

use crate::{
	fragment::{AnyFragment, Fragment},
	host::Host,
};
use tracing::trace;

/// A fixed number of positional child slots, each of which may be empty.
///
/// Every slot owns an empty text node as its anchor, created when the `Multi` is mounted.
/// A slot's content sits directly before its anchor, so filling a previously empty slot never consults its neighbours.
///
/// A zero-arity `Multi` still mounts one anchor, so that it always has a position to report.
#[derive(Debug)]
pub struct Multi<H: Host> {
	children: Vec<Option<AnyFragment<H>>>,
	anchors: Vec<H::Node>,
	parent: Option<H::Node>,
	sole_content: bool,
}

impl<H: Host> Multi<H> {
	#[must_use]
	pub fn new(children: Vec<Option<AnyFragment<H>>>) -> Self {
		Self {
			children,
			anchors: Vec::new(),
			parent: None,
			sole_content: false,
		}
	}

	#[must_use]
	pub fn arity(&self) -> usize {
		self.children.len()
	}
}

impl<H: Host> Fragment<H> for Multi<H> {
	fn mount(&mut self, host: &mut H, parent: &H::Node, before: Option<&H::Node>) {
		debug_assert!(self.parent.is_none(), "block-dom: `Multi` mounted twice");
		let count = self.children.len().max(1);
		let mut anchors = Vec::with_capacity(count);
		for i in 0..count {
			let anchor = host.create_text("");
			host.insert_before(parent, &anchor, before);
			if let Some(Some(child)) = self.children.get_mut(i) {
				child.mount(host, parent, Some(&anchor));
			}
			anchors.push(anchor);
		}
		self.anchors = anchors;
		self.parent = Some(parent.clone());
	}

	fn patch(&mut self, host: &mut H, next: Self) {
		debug_assert_eq!(self.children.len(), next.children.len(), "block-dom: `Multi` patched with different arity");
		let parent = self.parent.as_ref().expect("block-dom: `Multi` patched before mount");
		for (i, ((slot, next), anchor)) in self.children.iter_mut().zip(next.children).zip(&self.anchors).enumerate() {
			match (slot.as_mut(), next) {
				(None, None) => (),
				(Some(child), Some(next)) => child.patch(host, next),
				(Some(child), None) => {
					trace!(slot = i, "Emptying slot");
					child.before_remove();
					child.remove(host);
					*slot = None;
				}
				(None, Some(mut next)) => {
					trace!(slot = i, "Filling slot");
					next.mount(host, parent, Some(anchor));
					*slot = Some(next);
				}
			}
		}
	}

	fn move_before(&mut self, host: &mut H, before: Option<&H::Node>) {
		let parent = self.parent.as_ref().expect("block-dom: `Multi` moved before mount");
		for (i, anchor) in self.anchors.iter().enumerate() {
			if let Some(Some(child)) = self.children.get_mut(i) {
				child.move_before(host, before);
			}
			host.insert_before(parent, anchor, before);
		}
	}

	fn before_remove(&mut self) {
		for child in self.children.iter_mut().flatten() {
			child.before_remove()
		}
	}

	fn remove(&mut self, host: &mut H) {
		let parent = self.parent.take().expect("block-dom: `Multi` removed before mount");
		if self.sole_content {
			return host.clear(&parent);
		}
		for (i, anchor) in self.anchors.drain(..).enumerate() {
			if let Some(Some(child)) = self.children.get_mut(i) {
				child.remove(host);
			}
			host.remove_child(&parent, &anchor);
		}
	}

	fn first_node(&self) -> Option<&H::Node> {
		match self.children.first() {
			Some(Some(child)) => child.first_node().or_else(|| self.anchors.first()),
			Some(None) | None => self.anchors.first(),
		}
	}

	fn set_sole_content(&mut self) {
		self.sole_content = true;
	}
}

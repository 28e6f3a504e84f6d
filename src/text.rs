use crate::{fragment::Fragment, host::Host};
use std::borrow::Cow;
use tracing::trace;

/// A single text node.
///
/// Patching only writes if the text changed.
#[derive(Debug)]
pub struct Text<H: Host> {
	text: Cow<'static, str>,
	mounted: Option<Mounted<H>>,
}

#[derive(Debug)]
struct Mounted<H: Host> {
	parent: H::Node,
	node: H::Node,
}

impl<H: Host> Text<H> {
	#[must_use]
	pub fn new(text: impl Into<Cow<'static, str>>) -> Self {
		Self { text: text.into(), mounted: None }
	}

	#[must_use]
	pub fn text(&self) -> &str {
		&self.text
	}
}

impl<H: Host> Fragment<H> for Text<H> {
	fn mount(&mut self, host: &mut H, parent: &H::Node, before: Option<&H::Node>) {
		debug_assert!(self.mounted.is_none(), "block-dom: `Text` mounted twice");
		let node = host.create_text(&self.text);
		host.insert_before(parent, &node, before);
		self.mounted = Some(Mounted { parent: parent.clone(), node });
	}

	fn patch(&mut self, host: &mut H, next: Self) {
		debug_assert!(next.mounted.is_none(), "block-dom: Patched with a mounted `Text`");
		if self.text != next.text {
			let Mounted { node, .. } = self.mounted.as_ref().expect("block-dom: `Text` patched before mount");
			#[cfg(feature = "dangerous-logging")]
			trace!(from = %self.text, to = %next.text, "Updating text");
			#[cfg(not(feature = "dangerous-logging"))]
			trace!("Updating text");
			host.set_text(node, &next.text);
			self.text = next.text;
		}
	}

	fn move_before(&mut self, host: &mut H, before: Option<&H::Node>) {
		let Mounted { parent, node } = self.mounted.as_ref().expect("block-dom: `Text` moved before mount");
		host.insert_before(parent, node, before);
	}

	fn before_remove(&mut self) {}

	fn remove(&mut self, host: &mut H) {
		let Mounted { parent, node } = self.mounted.take().expect("block-dom: `Text` removed before mount");
		host.remove_child(&parent, &node);
	}

	fn first_node(&self) -> Option<&H::Node> {
		self.mounted.as_ref().map(|mounted| &mounted.node)
	}
}

/// A single comment node. Its content is static once mounted.
#[derive(Debug)]
pub struct Comment<H: Host> {
	comment: Cow<'static, str>,
	mounted: Option<Mounted<H>>,
}

impl<H: Host> Comment<H> {
	#[must_use]
	pub fn new(comment: impl Into<Cow<'static, str>>) -> Self {
		Self { comment: comment.into(), mounted: None }
	}
}

impl<H: Host> Fragment<H> for Comment<H> {
	fn mount(&mut self, host: &mut H, parent: &H::Node, before: Option<&H::Node>) {
		debug_assert!(self.mounted.is_none(), "block-dom: `Comment` mounted twice");
		let node = host.create_comment(&self.comment);
		host.insert_before(parent, &node, before);
		self.mounted = Some(Mounted { parent: parent.clone(), node });
	}

	fn patch(&mut self, _host: &mut H, _next: Self) {}

	fn move_before(&mut self, host: &mut H, before: Option<&H::Node>) {
		let Mounted { parent, node } = self.mounted.as_ref().expect("block-dom: `Comment` moved before mount");
		host.insert_before(parent, node, before);
	}

	fn before_remove(&mut self) {}

	fn remove(&mut self, host: &mut H) {
		let Mounted { parent, node } = self.mounted.take().expect("block-dom: `Comment` removed before mount");
		host.remove_child(&parent, &node);
	}

	fn first_node(&self) -> Option<&H::Node> {
		self.mounted.as_ref().map(|mounted| &mounted.node)
	}
}

use crate::{fragment::Fragment, host::Host};
use std::borrow::Cow;
use tracing::trace_span;

/// Raw markup, parsed by the host on mount.
///
/// Patching compares the markup strings and replaces the whole node set if they differ.
/// An empty parse result is replaced by an empty text node, so this fragment always owns at least one node.
#[derive(Debug)]
pub struct Html<H: Host> {
	markup: Cow<'static, str>,
	parent: Option<H::Node>,
	content: Vec<H::Node>,
}

impl<H: Host> Html<H> {
	#[must_use]
	pub fn new(markup: impl Into<Cow<'static, str>>) -> Self {
		Self {
			markup: markup.into(),
			parent: None,
			content: Vec::new(),
		}
	}

	fn parse(host: &mut H, markup: &str) -> Vec<H::Node> {
		let mut content = host.parse_markup(markup);
		if content.is_empty() {
			content.push(host.create_text(""));
		}
		content
	}
}

impl<H: Host> Fragment<H> for Html<H> {
	fn mount(&mut self, host: &mut H, parent: &H::Node, before: Option<&H::Node>) {
		debug_assert!(self.parent.is_none(), "block-dom: `Html` mounted twice");
		self.content = Self::parse(host, &self.markup);
		for node in &self.content {
			host.insert_before(parent, node, before);
		}
		self.parent = Some(parent.clone());
	}

	fn patch(&mut self, host: &mut H, next: Self) {
		if self.markup == next.markup {
			return;
		}
		#[cfg(feature = "dangerous-logging")]
		let span = trace_span!("Replacing markup", from = %self.markup, to = %next.markup);
		#[cfg(not(feature = "dangerous-logging"))]
		let span = trace_span!("Replacing markup");
		let _enter = span.enter();

		let parent = self.parent.clone().expect("block-dom: `Html` patched before mount");
		let content = Self::parse(host, &next.markup);
		let before = self.content.first();
		for node in &content {
			host.insert_before(&parent, node, before);
		}
		for node in self.content.drain(..) {
			host.remove_child(&parent, &node);
		}
		self.content = content;
		self.markup = next.markup;
	}

	fn move_before(&mut self, host: &mut H, before: Option<&H::Node>) {
		let parent = self.parent.as_ref().expect("block-dom: `Html` moved before mount");
		for node in &self.content {
			host.insert_before(parent, node, before);
		}
	}

	fn before_remove(&mut self) {}

	fn remove(&mut self, host: &mut H) {
		let parent = self.parent.take().expect("block-dom: `Html` removed before mount");
		for node in self.content.drain(..) {
			host.remove_child(&parent, &node);
		}
	}

	fn first_node(&self) -> Option<&H::Node> {
		self.content.first()
	}
}

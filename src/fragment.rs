//! The protocol every renderable fragment implements, and the closed set of fragment kinds.

use crate::{
	block::Block,
	host::Host,
	html::Html,
	list::List,
	multi::Multi,
	teardown::Teardown,
	text::{Comment, Text},
	toggler::{Dispatch, Toggler},
};

/// A unit of a renderable tree.
///
/// # Lifecycle
///
/// A fragment is created unmounted, [mounted](`Fragment::mount`) exactly once,
/// then [patched](`Fragment::patch`) any number of times with fresh unmounted fragments of the same shape,
/// and finally [removed](`Fragment::remove`). The fragment passed to `patch` is consumed.
///
/// Calling these out of order is a bug in the calling code. Implementations panic or `debug_assert!` on it.
///
/// Patching with data equal to the current data performs no host writes.
pub trait Fragment<H: Host> {
	/// Attaches this fragment's nodes into `parent`, just before `before` (or at the end).
	fn mount(&mut self, host: &mut H, parent: &H::Node, before: Option<&H::Node>);

	/// Updates the live content to match `next`, reusing live nodes wherever possible.
	fn patch(&mut self, host: &mut H, next: Self)
	where
		Self: Sized;

	/// Relocates the mounted content to just before `before` (or the end) without changing it.
	fn move_before(&mut self, host: &mut H, before: Option<&H::Node>);

	/// Depth-first pre-removal notification. Must reach the whole subtree before any of it is detached.
	fn before_remove(&mut self);

	/// Detaches this fragment's nodes. The fragment is dead afterwards.
	fn remove(&mut self, host: &mut H);

	/// The first host node this fragment currently owns.
	///
	/// Fragments whose content is currently empty return their anchor instead.
	/// Every mounted fragment owns at least one node, so [`None`] means the fragment isn't mounted.
	fn first_node(&self) -> Option<&H::Node>;

	/// Informs the fragment, before it is mounted, that it will be the only content of its container.
	fn set_sole_content(&mut self) {}
}

/// Any fragment, for positions where the kind isn't known statically.
///
/// [`AnyFragment::patch`] requires both sides to be the same variant.
/// Positions where the kind may change between renders use a [`Toggler`] or [`Dispatch`].
#[derive(Debug)]
pub enum AnyFragment<H: Host> {
	Text(Text<H>),
	Comment(Comment<H>),
	Html(Html<H>),
	Block(Block<H>),
	Multi(Multi<H>),
	List(List<H>),
	Toggler(Toggler<H>),
	Dispatch(Dispatch<H>),
	Teardown(Teardown<H>),
}

impl<H: Host> AnyFragment<H> {
	#[must_use]
	pub fn kind(&self) -> &'static str {
		match self {
			AnyFragment::Text(_) => "Text",
			AnyFragment::Comment(_) => "Comment",
			AnyFragment::Html(_) => "Html",
			AnyFragment::Block(_) => "Block",
			AnyFragment::Multi(_) => "Multi",
			AnyFragment::List(_) => "List",
			AnyFragment::Toggler(_) => "Toggler",
			AnyFragment::Dispatch(_) => "Dispatch",
			AnyFragment::Teardown(_) => "Teardown",
		}
	}
}

macro_rules! dispatch {
	($this:expr, $f:ident => $body:expr) => {
		match $this {
			AnyFragment::Text($f) => $body,
			AnyFragment::Comment($f) => $body,
			AnyFragment::Html($f) => $body,
			AnyFragment::Block($f) => $body,
			AnyFragment::Multi($f) => $body,
			AnyFragment::List($f) => $body,
			AnyFragment::Toggler($f) => $body,
			AnyFragment::Dispatch($f) => $body,
			AnyFragment::Teardown($f) => $body,
		}
	};
}

impl<H: Host> Fragment<H> for AnyFragment<H> {
	fn mount(&mut self, host: &mut H, parent: &H::Node, before: Option<&H::Node>) {
		dispatch!(self, f => f.mount(host, parent, before))
	}

	fn patch(&mut self, host: &mut H, next: Self) {
		match (self, next) {
			(AnyFragment::Text(a), AnyFragment::Text(b)) => a.patch(host, b),
			(AnyFragment::Comment(a), AnyFragment::Comment(b)) => a.patch(host, b),
			(AnyFragment::Html(a), AnyFragment::Html(b)) => a.patch(host, b),
			(AnyFragment::Block(a), AnyFragment::Block(b)) => a.patch(host, b),
			(AnyFragment::Multi(a), AnyFragment::Multi(b)) => a.patch(host, b),
			(AnyFragment::List(a), AnyFragment::List(b)) => a.patch(host, b),
			(AnyFragment::Toggler(a), AnyFragment::Toggler(b)) => a.patch(host, b),
			(AnyFragment::Dispatch(a), AnyFragment::Dispatch(b)) => a.patch(host, b),
			(AnyFragment::Teardown(a), AnyFragment::Teardown(b)) => a.patch(host, b),
			(a, b) => panic!("block-dom: Cannot patch {} fragment with {} fragment. Use a `Toggler` or `Dispatch` where the shape can change.", a.kind(), b.kind()),
		}
	}

	fn move_before(&mut self, host: &mut H, before: Option<&H::Node>) {
		dispatch!(self, f => f.move_before(host, before))
	}

	fn before_remove(&mut self) {
		dispatch!(self, f => f.before_remove())
	}

	fn remove(&mut self, host: &mut H) {
		dispatch!(self, f => f.remove(host))
	}

	fn first_node(&self) -> Option<&H::Node> {
		dispatch!(self, f => f.first_node())
	}

	fn set_sole_content(&mut self) {
		dispatch!(self, f => f.set_sole_content())
	}
}

macro_rules! from_variant {
	($($variant:ident),*$(,)?) => {$(
		impl<H: Host> From<$variant<H>> for AnyFragment<H> {
			fn from(fragment: $variant<H>) -> Self {
				AnyFragment::$variant(fragment)
			}
		}
	)*};
}
from_variant!(Text, Comment, Html, Block, Multi, List, Toggler, Dispatch, Teardown);

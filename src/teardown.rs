use crate::{
	fragment::{AnyFragment, Fragment},
	host::Host,
};
use core::fmt::{self, Debug, Formatter};

/// Wraps a fragment with a hook that runs when the fragment is about to be removed,
/// the way a component instance runs its unmount hooks.
///
/// The hook runs before the hooks inside the wrapped fragment, and before any of the subtree is detached.
/// Patching keeps the mounted instance's hook.
pub struct Teardown<H: Host> {
	on_remove: Box<dyn FnMut()>,
	child: Box<AnyFragment<H>>,
}

impl<H: Host> Teardown<H> {
	#[must_use]
	pub fn new(child: impl Into<AnyFragment<H>>, on_remove: impl 'static + FnMut()) -> Self {
		Self {
			on_remove: Box::new(on_remove),
			child: Box::new(child.into()),
		}
	}
}

impl<H: Host> Fragment<H> for Teardown<H> {
	fn mount(&mut self, host: &mut H, parent: &H::Node, before: Option<&H::Node>) {
		self.child.mount(host, parent, before)
	}

	fn patch(&mut self, host: &mut H, next: Self) {
		self.child.patch(host, *next.child)
	}

	fn move_before(&mut self, host: &mut H, before: Option<&H::Node>) {
		self.child.move_before(host, before)
	}

	fn before_remove(&mut self) {
		(self.on_remove)();
		self.child.before_remove();
	}

	fn remove(&mut self, host: &mut H) {
		self.child.remove(host)
	}

	fn first_node(&self) -> Option<&H::Node> {
		self.child.first_node()
	}

	fn set_sole_content(&mut self) {
		self.child.set_sole_content()
	}
}

impl<H: Host> Debug for Teardown<H>
where
	AnyFragment<H>: Debug,
{
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Teardown").field("child", &self.child).finish_non_exhaustive()
	}
}

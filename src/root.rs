use crate::{
	fragment::{AnyFragment, Fragment},
	host::Host,
};
use tracing::{info, instrument, trace};

/// Attached to a specific container node during instantiation, this `struct` can be used to render fragment trees into its child nodes.
///
/// The first [`update`](`Root::update`) mounts, later ones patch the mounted tree in place.
/// The container is assumed to hold nothing else, so the mounted tree is told it is the container's sole content.
///
/// # Correct Use
///
/// Each tree passed to [`update`](`Root::update`) must have the same static shape as the previous one,
/// except at [`List`](`crate::List`), [`Toggler`](`crate::Toggler`) and [`Dispatch`](`crate::Dispatch`) positions.
#[derive(Debug)]
pub struct Root<H: Host, F: Fragment<H> = AnyFragment<H>> {
	container: H::Node,
	mounted: Option<F>,
	updates: usize,
}

impl<H: Host, F: Fragment<H>> Root<H, F> {
	#[must_use]
	pub fn new(container: H::Node) -> Self {
		Self {
			container,
			mounted: None,
			updates: 0,
		}
	}

	#[must_use]
	pub fn container(&self) -> &H::Node {
		&self.container
	}

	#[must_use]
	pub fn is_mounted(&self) -> bool {
		self.mounted.is_some()
	}

	#[must_use]
	pub fn fragment(&self) -> Option<&F> {
		self.mounted.as_ref()
	}

	#[instrument(skip_all, fields(updates = self.updates))]
	pub fn update(&mut self, host: &mut H, mut fragment: F) {
		match &mut self.mounted {
			Some(mounted) => {
				trace!("Patching");
				mounted.patch(host, fragment)
			}
			None => {
				trace!("Mounting");
				fragment.set_sole_content();
				fragment.mount(host, &self.container, None);
				self.mounted = Some(fragment);
			}
		}
		self.updates += 1;
		info!("Update {} done.", self.updates);
	}

	/// Removes the mounted tree, if any. The next [`update`](`Root::update`) mounts again.
	#[instrument(skip_all)]
	pub fn clear(&mut self, host: &mut H) {
		if let Some(mut mounted) = self.mounted.take() {
			mounted.before_remove();
			mounted.remove(host);
		}
	}
}
